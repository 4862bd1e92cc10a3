//! WordSpeaker Speech crate - text-to-speech gateway and host engines.
//!
//! The [`SpeechGateway`] owns the single speech engine handle, serializes
//! utterances (a new one cancels the active one) and reports completion on an
//! event channel. Engines wrap host TTS programs behind the async
//! [`SpeechEngine`] trait.

pub mod engine;
pub mod error;
pub mod espeak;
pub mod gateway;
pub mod process;
pub mod say;
pub mod silent;

pub use engine::{engine_for, SpeechEngine, SpeechRequest, VoiceGender, VoiceInfo};
pub use error::SpeechError;
pub use espeak::EspeakEngine;
pub use gateway::{Speaker, SpeechEvent, SpeechGateway, UtteranceId};
pub use say::SayEngine;
pub use silent::SilentEngine;
