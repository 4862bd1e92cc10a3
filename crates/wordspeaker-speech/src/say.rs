//! macOS `say` speech engine.

use async_trait::async_trait;
use tokio::process::Command;

use wordspeaker_core::types::{VoiceId, Volume};

use crate::engine::{SpeechEngine, SpeechRequest, VoiceGender, VoiceInfo};
use crate::error::SpeechError;
use crate::process::{capture_stdout, run_with_stdin};

#[derive(Debug, Clone)]
pub struct SayEngine {
    binary: String,
}

impl Default for SayEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl SayEngine {
    pub fn new() -> Self {
        Self::with_binary("say")
    }

    pub fn with_binary(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

/// `say` has no volume flag; the embedded `[[volm x]]` command sets it.
fn with_volume(text: &str, volume: Volume) -> String {
    format!("[[volm {:.2}]] {}", volume.value(), text)
}

#[async_trait]
impl SpeechEngine for SayEngine {
    fn name(&self) -> &str {
        &self.binary
    }

    fn is_available(&self) -> bool {
        which::which(&self.binary).is_ok()
    }

    async fn speak(&self, request: &SpeechRequest) -> Result<(), SpeechError> {
        let mut cmd = Command::new(&self.binary);
        if let Some(voice) = &request.voice {
            cmd.arg("-v").arg(&voice.0);
        }
        run_with_stdin(&self.binary, cmd, &with_volume(&request.text, request.volume)).await
    }

    async fn list_voices(&self) -> Result<Vec<VoiceInfo>, SpeechError> {
        let mut cmd = Command::new(&self.binary);
        cmd.args(["-v", "?"]);
        let stdout = capture_stdout(&self.binary, cmd).await?;
        Ok(parse_voices(&stdout))
    }
}

/// Parse `say -v ?` output: `Name   locale    # sample sentence`.
/// Names may contain spaces, so the locale is taken from the right.
fn parse_voices(output: &str) -> Vec<VoiceInfo> {
    output
        .lines()
        .filter_map(|line| {
            let head = line.split('#').next()?.trim_end();
            let (name, locale) = head.rsplit_once(char::is_whitespace)?;
            let name = name.trim();
            if name.is_empty() || locale.is_empty() {
                return None;
            }
            Some(VoiceInfo {
                id: VoiceId(name.to_string()),
                name: name.to_string(),
                languages: vec![locale.replace('_', "-")],
                gender: VoiceGender::Unknown,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_say_voices() {
        let output = "Albert              en_US    # Hello! My name is Albert.
Bad News            en_US    # Hello! My name is Bad News.
Thomas              fr_FR    # Bonjour, je m'appelle Thomas.

";
        let voices = parse_voices(output);
        assert_eq!(voices.len(), 3);
        assert_eq!(voices[0].id, VoiceId("Albert".to_string()));
        assert_eq!(voices[1].name, "Bad News");
        assert_eq!(voices[2].languages, vec!["fr-FR".to_string()]);
        assert!(voices.iter().all(|v| v.gender == VoiceGender::Unknown));
    }

    #[test]
    fn test_parse_say_voices_skips_malformed() {
        assert!(parse_voices("Lonely\n# comment only\n").is_empty());
    }

    #[test]
    fn test_volume_prefix() {
        assert_eq!(with_volume("apple", Volume::new(0.5)), "[[volm 0.50]] apple");
        assert_eq!(with_volume("pear", Volume::new(1.0)), "[[volm 1.00]] pear");
    }
}
