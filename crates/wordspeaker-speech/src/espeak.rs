//! eSpeak/eSpeak-NG speech engine.
//!
//! Uses the `espeak-ng` (preferred) or `espeak` command. Text is passed on
//! stdin; volume maps to the `-a` amplitude flag (0-200) and the voice to `-v`.

use async_trait::async_trait;
use tokio::process::Command;

use wordspeaker_core::types::{VoiceId, Volume};

use crate::engine::{SpeechEngine, SpeechRequest, VoiceGender, VoiceInfo};
use crate::error::SpeechError;
use crate::process::{capture_stdout, run_with_stdin};

/// Maximum eSpeak amplitude that does not distort.
const MAX_AMPLITUDE: f32 = 200.0;

#[derive(Debug, Clone)]
pub struct EspeakEngine {
    binary: String,
}

impl Default for EspeakEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl EspeakEngine {
    /// Auto-detect `espeak-ng`, falling back to `espeak`.
    pub fn new() -> Self {
        let binary = if which::which("espeak-ng").is_ok() {
            "espeak-ng".to_string()
        } else {
            "espeak".to_string()
        };
        Self { binary }
    }

    pub fn with_binary(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    fn build_args(request: &SpeechRequest) -> Vec<String> {
        let mut args = vec!["-a".to_string(), amplitude(request.volume).to_string()];
        if let Some(voice) = &request.voice {
            args.push("-v".to_string());
            args.push(voice.0.clone());
        }
        args
    }
}

fn amplitude(volume: Volume) -> u32 {
    (volume.value() * MAX_AMPLITUDE).round() as u32
}

#[async_trait]
impl SpeechEngine for EspeakEngine {
    fn name(&self) -> &str {
        &self.binary
    }

    fn is_available(&self) -> bool {
        which::which(&self.binary).is_ok()
    }

    async fn speak(&self, request: &SpeechRequest) -> Result<(), SpeechError> {
        let mut cmd = Command::new(&self.binary);
        cmd.args(Self::build_args(request));
        run_with_stdin(&self.binary, cmd, &request.text).await
    }

    async fn list_voices(&self) -> Result<Vec<VoiceInfo>, SpeechError> {
        let mut cmd = Command::new(&self.binary);
        cmd.arg("--voices");
        let stdout = capture_stdout(&self.binary, cmd).await?;
        Ok(parse_voices(&stdout))
    }
}

/// Parse `espeak --voices` output.
///
/// ```text
/// Pty Language       Age/Gender VoiceName          File                 Other Languages
///  5  af                 --/M    Afrikaans          gmw/af
///  5  en-us              --/M    English_(America)  gmw/en-US            (en 3)
/// ```
fn parse_voices(output: &str) -> Vec<VoiceInfo> {
    output
        .lines()
        .filter(|line| !line.trim().is_empty() && !line.trim_start().starts_with("Pty"))
        .filter_map(|line| {
            let voice = parse_voice_line(line);
            if voice.is_none() {
                tracing::debug!(line, "Skipping unparseable eSpeak voice line");
            }
            voice
        })
        .collect()
}

fn parse_voice_line(line: &str) -> Option<VoiceInfo> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() < 5 || parts[0].parse::<u32>().is_err() {
        return None;
    }

    let language = parts[1];
    let gender = match parts[2].rsplit('/').next() {
        Some("M") => VoiceGender::Male,
        Some("F") => VoiceGender::Female,
        _ => VoiceGender::Unknown,
    };
    let name = parts[3].replace('_', " ");

    let mut languages = vec![language.to_string()];
    for extra in parts.iter().skip(5) {
        let code = extra.trim_matches(|c| c == '(' || c == ')');
        if !code.is_empty() && code.parse::<u32>().is_err() && !languages.iter().any(|l| l == code) {
            languages.push(code.to_string());
        }
    }

    Some(VoiceInfo {
        id: VoiceId(language.to_string()),
        name,
        languages,
        gender,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "Pty Language       Age/Gender VoiceName          File                 Other Languages
 5  af              --/M      Afrikaans          gmw/af
 5  en-us           --/M      English_(America)  gmw/en-US            (en 3)
 5  fr-fr           --/F      French             roa/fr               (fr 5)
garbage line
";

    #[test]
    fn test_parse_voices() {
        let voices = parse_voices(SAMPLE);
        assert_eq!(voices.len(), 3);

        assert_eq!(voices[0].id, VoiceId("af".to_string()));
        assert_eq!(voices[0].name, "Afrikaans");
        assert_eq!(voices[0].gender, VoiceGender::Male);

        assert_eq!(voices[1].name, "English (America)");
        assert_eq!(voices[1].languages, vec!["en-us".to_string(), "en".to_string()]);

        assert_eq!(voices[2].gender, VoiceGender::Female);
        assert_eq!(voices[2].languages, vec!["fr-fr".to_string(), "fr".to_string()]);
    }

    #[test]
    fn test_parse_voice_line_rejects_short_lines() {
        assert!(parse_voice_line(" 5 en").is_none());
        assert!(parse_voice_line("x en --/M English gmw/en").is_none());
    }

    #[test]
    fn test_build_args() {
        let request = SpeechRequest {
            text: "apple".to_string(),
            volume: Volume::new(0.5),
            voice: Some(VoiceId("en-gb".to_string())),
        };
        assert_eq!(
            EspeakEngine::build_args(&request),
            vec!["-a", "100", "-v", "en-gb"]
        );

        let request = SpeechRequest {
            text: "apple".to_string(),
            volume: Volume::new(1.0),
            voice: None,
        };
        assert_eq!(EspeakEngine::build_args(&request), vec!["-a", "200"]);
    }

    #[test]
    fn test_with_binary_name() {
        let engine = EspeakEngine::with_binary("espeak");
        assert_eq!(engine.name(), "espeak");
    }
}
