//! WordSpeaker Playback crate - the playback scheduler and its timer.
//!
//! Drives a word list through a strict state machine:
//! Stopped -> Playing -> Paused -> Playing -> Stopped. Every change that
//! invalidates an armed timer or an in-flight utterance bumps the generation
//! token; anything tagged with an older generation is ignored.

pub mod error;
pub mod queue;
pub mod scheduler;
pub mod settings;
pub mod state;
pub mod ticker;

pub use error::PlaybackError;
pub use queue::PlaybackQueue;
pub use scheduler::{PlaybackScheduler, PlaybackSnapshot};
pub use settings::PlaybackSettings;
pub use state::PlaybackState;
pub use ticker::{Ticker, TimerHandle, TokioTicker};
