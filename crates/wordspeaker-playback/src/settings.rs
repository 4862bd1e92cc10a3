use wordspeaker_core::config::WordSpeakerConfig;
use wordspeaker_core::types::{LoopMode, OrderMode, PlaybackInterval, Volume};

/// Playback options. The scheduler owns the live copy; the interface renders
/// from it and never reads settings back from its own widgets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackSettings {
    pub order: OrderMode,
    pub loop_mode: LoopMode,
    pub auto_advance: bool,
    pub interval: PlaybackInterval,
    pub volume: Volume,
    pub allow_manual_while_paused: bool,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            order: OrderMode::InOrder,
            loop_mode: LoopMode::StopAtEnd,
            auto_advance: true,
            interval: PlaybackInterval::default(),
            volume: Volume::default(),
            allow_manual_while_paused: false,
        }
    }
}

impl PlaybackSettings {
    pub fn from_config(config: &WordSpeakerConfig) -> Self {
        Self {
            order: config.playback.order,
            loop_mode: config.playback.loop_mode,
            auto_advance: config.playback.auto_advance,
            interval: config.playback.interval(),
            volume: config.speech.volume(),
            allow_manual_while_paused: config.playback.allow_manual_while_paused,
        }
    }
}
