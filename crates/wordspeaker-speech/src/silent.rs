use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use wordspeaker_core::types::VoiceId;

use crate::engine::{SpeechEngine, SpeechRequest, VoiceGender, VoiceInfo};
use crate::error::SpeechError;

/// Engine that produces no audio. Utterances are logged and optionally
/// take `delay` to "finish", which keeps playback timing realistic in tests
/// and on hosts without a TTS binary.
#[derive(Debug, Clone, Default)]
pub struct SilentEngine {
    delay: Option<Duration>,
}

impl SilentEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self { delay: Some(delay) }
    }
}

#[async_trait]
impl SpeechEngine for SilentEngine {
    fn name(&self) -> &str {
        "silent"
    }

    fn is_available(&self) -> bool {
        true
    }

    async fn speak(&self, request: &SpeechRequest) -> Result<(), SpeechError> {
        debug!(
            text = %request.text,
            volume = request.volume.percent(),
            voice = ?request.voice,
            "Silent utterance"
        );
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        Ok(())
    }

    async fn list_voices(&self) -> Result<Vec<VoiceInfo>, SpeechError> {
        Ok(vec![VoiceInfo {
            id: VoiceId("default".to_string()),
            name: "Default".to_string(),
            languages: Vec::new(),
            gender: VoiceGender::Unknown,
        }])
    }
}
