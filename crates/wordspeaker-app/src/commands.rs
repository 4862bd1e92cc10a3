//! REPL command parsing.

use std::path::PathBuf;

use wordspeaker_core::error::{Result, WordSpeakerError};
use wordspeaker_core::types::{
    DictationStyle, LoopMode, OrderMode, PlaybackInterval, VoiceId, Volume,
};
use wordspeaker_dictation::SentenceLevel;

/// One line of user input.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Import(PathBuf),
    List,
    History,
    /// Re-import a history entry, numbered from 1 as listed.
    Open(usize),
    Start,
    Pause,
    Resume,
    Toggle,
    Stop,
    Next,
    /// Jump to a word, numbered from 1 as listed.
    Jump(usize),
    Replay,
    Say(String),
    Order(OrderMode),
    Loop(LoopMode),
    Auto(bool),
    Manual(bool),
    Interval(PlaybackInterval),
    Volume(Volume),
    Voices,
    /// `None` returns to the engine default.
    Voice(Option<VoiceId>),
    Style(DictationStyle),
    Check(String),
    Examples {
        count: usize,
        level: Option<SentenceLevel>,
    },
    Stats(usize),
    Status,
    Help,
    Quit,
}

pub const HELP: &str = "\
Commands:
  import <file>        load a .txt or .csv word list
  list                 show the current words
  history              show recently imported files
  open <n>             re-import history entry n
  start | pause | resume | toggle | stop
  next                 advance to the next word
  jump <n>             play from word n
  replay               say the current word again
  say <text>           speak arbitrary text
  order in-order|random
  loop on|off          loop at the end of the list
  auto on|off          advance automatically
  manual on|off        allow next while paused
  interval <secs>      delay between words (min 0.5)
  volume <0-100>       speech volume
  voices               list engine voices
  voice <id>|default   select a voice
  style type|paper     Type & Check or Paper Only
  check <answer>       check your spelling of the current word
  examples [n] [level] example sentences for the current word
  stats [n]            most frequent imported words
  status               playback status
  help | quit";

fn invalid(message: impl Into<String>) -> WordSpeakerError {
    WordSpeakerError::Validation(message.into())
}

fn require<'a>(arg: &'a str, usage: &str) -> Result<&'a str> {
    if arg.is_empty() {
        Err(invalid(format!("usage: {}", usage)))
    } else {
        Ok(arg)
    }
}

fn parse_switch(arg: &str, usage: &str) -> Result<bool> {
    match arg.to_lowercase().as_str() {
        "on" | "yes" | "true" | "1" => Ok(true),
        "off" | "no" | "false" | "0" => Ok(false),
        _ => Err(invalid(format!("usage: {}", usage))),
    }
}

/// A 1-based number as the user sees it.
fn parse_ordinal(arg: &str, usage: &str) -> Result<usize> {
    match arg.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n),
        _ => Err(invalid(format!("usage: {} (numbers start at 1)", usage))),
    }
}

fn parse_examples(arg: &str) -> Result<Command> {
    let mut count = 3;
    let mut level = None;
    for token in arg.split_whitespace() {
        match token.parse::<usize>() {
            Ok(n) if n >= 1 => count = n,
            Ok(_) => return Err(invalid("usage: examples [n] [level]")),
            Err(_) => level = Some(token.parse::<SentenceLevel>()?),
        }
    }
    Ok(Command::Examples { count, level })
}

/// Parse a REPL line. Blank lines yield `None`.
pub fn parse(line: &str) -> Result<Option<Command>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (name, arg) = match line.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (line, ""),
    };

    let command = match name.to_lowercase().as_str() {
        "import" | "load" => Command::Import(PathBuf::from(require(arg, "import <file>")?)),
        "list" | "ls" => Command::List,
        "history" => Command::History,
        "open" => Command::Open(parse_ordinal(arg, "open <n>")?),
        "start" | "play" => Command::Start,
        "pause" => Command::Pause,
        "resume" => Command::Resume,
        "toggle" => Command::Toggle,
        "stop" => Command::Stop,
        "next" | "n" => Command::Next,
        "jump" => Command::Jump(parse_ordinal(arg, "jump <n>")?),
        "replay" | "r" => Command::Replay,
        "say" => Command::Say(require(arg, "say <text>")?.to_string()),
        "order" => Command::Order(require(arg, "order in-order|random")?.parse()?),
        "loop" => Command::Loop(require(arg, "loop on|off")?.parse()?),
        "auto" => Command::Auto(parse_switch(arg, "auto on|off")?),
        "manual" => Command::Manual(parse_switch(arg, "manual on|off")?),
        "interval" => {
            Command::Interval(PlaybackInterval::parse_or_default(require(arg, "interval <secs>")?))
        }
        "volume" => match arg.trim_end_matches('%').parse::<u32>() {
            Ok(p) if p <= 100 => Command::Volume(Volume::from_percent(p)),
            _ => return Err(invalid("usage: volume <0-100>")),
        },
        "voices" => Command::Voices,
        "voice" => match require(arg, "voice <id>|default")? {
            "default" => Command::Voice(None),
            id => Command::Voice(Some(VoiceId(id.to_string()))),
        },
        "style" => Command::Style(require(arg, "style type|paper")?.parse()?),
        "check" | "c" => Command::Check(arg.to_string()),
        "examples" | "ex" => parse_examples(arg)?,
        "stats" => Command::Stats(if arg.is_empty() {
            10
        } else {
            parse_ordinal(arg, "stats [n]")?
        }),
        "status" => Command::Status,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => return Err(invalid(format!("Unknown command '{}'. Type 'help'.", other))),
    };
    Ok(Some(command))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok(line: &str) -> Command {
        parse(line).unwrap().unwrap()
    }

    #[test]
    fn test_blank_line() {
        assert_eq!(parse("   ").unwrap(), None);
    }

    #[test]
    fn test_simple_commands() {
        assert_eq!(ok("start"), Command::Start);
        assert_eq!(ok("  PAUSE "), Command::Pause);
        assert_eq!(ok("q"), Command::Quit);
        assert_eq!(ok("next"), Command::Next);
    }

    #[test]
    fn test_arguments() {
        assert_eq!(ok("import ~/lists/my words.txt"), Command::Import(PathBuf::from("~/lists/my words.txt")));
        assert_eq!(ok("open 2"), Command::Open(2));
        assert_eq!(ok("jump 5"), Command::Jump(5));
        assert_eq!(ok("say hello world"), Command::Say("hello world".to_string()));
        assert_eq!(ok("order random"), Command::Order(OrderMode::Random));
        assert_eq!(ok("loop on"), Command::Loop(LoopMode::Loop));
        assert_eq!(ok("auto off"), Command::Auto(false));
        assert_eq!(ok("volume 50%"), Command::Volume(Volume::from_percent(50)));
        assert_eq!(ok("voice default"), Command::Voice(None));
        assert_eq!(ok("style paper"), Command::Style(DictationStyle::PaperOnly));
        assert_eq!(ok("check apple"), Command::Check("apple".to_string()));
        assert_eq!(ok("stats"), Command::Stats(10));
    }

    #[test]
    fn test_interval_falls_back_to_default() {
        assert_eq!(ok("interval 3"), Command::Interval(PlaybackInterval::new(3.0)));
        assert_eq!(ok("interval 0.1"), Command::Interval(PlaybackInterval::new(0.5)));
        assert_eq!(ok("interval soon"), Command::Interval(PlaybackInterval::default()));
        assert_eq!(ok("interval 1e30"), Command::Interval(PlaybackInterval::default()));
    }

    #[test]
    fn test_examples_arguments() {
        assert_eq!(ok("examples"), Command::Examples { count: 3, level: None });
        assert_eq!(
            ok("examples 5 advanced"),
            Command::Examples {
                count: 5,
                level: Some(SentenceLevel::Advanced)
            }
        );
    }

    #[test]
    fn test_invalid_input() {
        assert!(parse("open 0").is_err());
        assert!(parse("jump x").is_err());
        assert!(parse("import").is_err());
        assert!(parse("volume 150").is_err());
        assert!(parse("loop maybe").is_err());
        assert!(parse("dance").is_err());
        assert!(parse("examples 2 expert").is_err());
    }
}
