//! Terminal rendering of a [`DiffResult`].

use owo_colors::{OwoColorize, Style};

use crate::checker::{DiffResult, Span, SpanTag};

/// Output styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Palette {
    /// ANSI colours: wrong red, missing red underlined, extra yellow.
    #[default]
    Ansi,
    /// Bracket markers for terminals without colour.
    Plain,
}

impl Palette {
    fn style(self, tag: SpanTag) -> Style {
        match tag {
            SpanTag::Equal => Style::new(),
            SpanTag::Wrong => Style::new().red(),
            SpanTag::Missing => Style::new().red().underline(),
            SpanTag::Extra => Style::new().yellow(),
        }
    }

    fn paint(self, span: &Span) -> String {
        match self {
            Palette::Ansi if span.tag == SpanTag::Equal => span.text.clone(),
            Palette::Ansi => span.text.style(self.style(span.tag)).to_string(),
            Palette::Plain => match span.tag {
                SpanTag::Equal => span.text.clone(),
                SpanTag::Wrong => format!("[~{}~]", span.text),
                SpanTag::Missing => format!("[-{}-]", span.text),
                SpanTag::Extra => format!("[+{}+]", span.text),
            },
        }
    }

    fn legend(self) -> String {
        let sample = |tag, text: &str| {
            self.paint(&Span {
                tag,
                text: text.to_string(),
            })
        };
        format!(
            "Legend: {} missing / {} extra / {} wrong",
            sample(SpanTag::Missing, "x"),
            sample(SpanTag::Extra, "x"),
            sample(SpanTag::Wrong, "x"),
        )
    }
}

fn paint_spans(spans: &[Span], palette: Palette) -> String {
    spans.iter().map(|s| palette.paint(s)).collect()
}

/// Render the three-line comparison shown after a check.
pub fn render(result: &DiffResult, palette: Palette) -> String {
    format!(
        "Expected: {}\nYour input: {}\n{}",
        paint_spans(&result.expected_spans, palette),
        paint_spans(&result.actual_spans, palette),
        palette.legend(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::check;

    #[test]
    fn test_plain_missing() {
        let out = render(&check("apple", "aple"), Palette::Plain);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "Expected: a[-p-]ple");
        assert_eq!(lines[1], "Your input: aple");
    }

    #[test]
    fn test_plain_extra() {
        let out = render(&check("apple", "applle"), Palette::Plain);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "Expected: apple");
        assert_eq!(lines[1], "Your input: app[+l+]le");
    }

    #[test]
    fn test_plain_wrong_and_legend() {
        let out = render(&check("cat", "cut"), Palette::Plain);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "Expected: c[~a~]t");
        assert_eq!(lines[1], "Your input: c[~u~]t");
        assert_eq!(lines[2], "Legend: [-x-] missing / [+x+] extra / [~x~] wrong");
    }

    #[test]
    fn test_ansi_colours_only_differences() {
        let out = render(&check("apple", "apple"), Palette::Ansi);
        let first = out.lines().next().unwrap();
        assert_eq!(first, "Expected: apple");

        let out = render(&check("cat", "cut"), Palette::Ansi);
        assert!(out.contains("\u{1b}["));
        assert!(!out.contains("[~"));
    }
}
