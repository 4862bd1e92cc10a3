//! Speech engine abstraction.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use wordspeaker_core::types::{SpeechEngineKind, VoiceId, Volume};

use crate::error::SpeechError;
use crate::espeak::EspeakEngine;
use crate::say::SayEngine;
use crate::silent::SilentEngine;

/// A single utterance as handed to an engine.
#[derive(Clone, Debug, PartialEq)]
pub struct SpeechRequest {
    pub text: String,
    pub volume: Volume,
    /// Gateway-wide voice selection at the time of the request.
    pub voice: Option<VoiceId>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoiceGender {
    Male,
    Female,
    Unknown,
}

/// A voice offered by an engine, for user-facing selection.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceInfo {
    pub id: VoiceId,
    pub name: String,
    pub languages: Vec<String>,
    pub gender: VoiceGender,
}

/// A text-to-speech backend.
///
/// `speak` resolves once the utterance has finished playing. Dropping the
/// returned future must stop playback; the gateway cancels utterances by
/// aborting the task that polls it.
#[async_trait]
pub trait SpeechEngine: Send + Sync {
    /// Short engine name used in logs and errors.
    fn name(&self) -> &str;

    /// Whether the engine can be used on this host.
    fn is_available(&self) -> bool;

    async fn speak(&self, request: &SpeechRequest) -> Result<(), SpeechError>;

    async fn list_voices(&self) -> Result<Vec<VoiceInfo>, SpeechError>;
}

/// Build the engine selected in configuration.
pub fn engine_for(kind: SpeechEngineKind, binary: Option<&str>) -> Arc<dyn SpeechEngine> {
    match kind {
        SpeechEngineKind::Espeak => match binary {
            Some(b) => Arc::new(EspeakEngine::with_binary(b)),
            None => Arc::new(EspeakEngine::new()),
        },
        SpeechEngineKind::Say => match binary {
            Some(b) => Arc::new(SayEngine::with_binary(b)),
            None => Arc::new(SayEngine::new()),
        },
        SpeechEngineKind::Silent => Arc::new(SilentEngine::new()),
    }
}
