//! WordSpeaker Core crate - shared types, configuration, errors and user notices.

pub mod config;
pub mod error;
pub mod events;
pub mod types;

pub use config::WordSpeakerConfig;
pub use error::{Result, WordSpeakerError};
pub use events::{Notice, NoticeCategory, NoticeLevel};
pub use types::*;
