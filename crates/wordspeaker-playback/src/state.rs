//! Playback state and its transition rules.
//!
//! Valid status transitions:
//! - Stopped -> Playing (start, jump)
//! - Playing -> Paused (pause, speech failure)
//! - Paused -> Playing (resume)
//! - Playing -> Stopped (stop, completion)
//! - Paused -> Stopped (stop, completion)

use tracing::debug;

use wordspeaker_core::types::{Generation, PlaybackStatus};
use wordspeaker_speech::UtteranceId;

use crate::error::PlaybackError;
use crate::queue::PlaybackQueue;
use crate::ticker::TimerHandle;

/// Returns whether a status change from `from` to `to` is valid.
pub fn can_transition(from: PlaybackStatus, to: PlaybackStatus) -> bool {
    matches!(
        (from, to),
        (PlaybackStatus::Stopped, PlaybackStatus::Playing)
            | (PlaybackStatus::Playing, PlaybackStatus::Paused)
            | (PlaybackStatus::Paused, PlaybackStatus::Playing)
            | (PlaybackStatus::Playing, PlaybackStatus::Stopped)
            | (PlaybackStatus::Paused, PlaybackStatus::Stopped)
    )
}

/// The utterance the scheduler issued last, and under which generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IssuedUtterance {
    pub id: UtteranceId,
    pub generation: Generation,
}

#[derive(Debug, Default)]
pub struct PlaybackState {
    pub status: PlaybackStatus,
    pub queue: PlaybackQueue,
    /// Position in `queue`. Meaningful only while not stopped.
    pub position: usize,
    pub generation: Generation,
    pub timer: Option<TimerHandle>,
    pub utterance: Option<IssuedUtterance>,
    /// Set when a stop-at-end session ran past its last word.
    pub completed: bool,
}

impl PlaybackState {
    /// Apply a status change, rejecting invalid ones.
    pub fn transition(
        &mut self,
        target: PlaybackStatus,
        action: &'static str,
    ) -> Result<(), PlaybackError> {
        if can_transition(self.status, target) {
            debug!("Playback state: {} -> {}", self.status, target);
            self.status = target;
            Ok(())
        } else {
            Err(PlaybackError::InvalidTransition {
                from: self.status,
                action,
            })
        }
    }

    /// Start a new generation. Returns it.
    pub fn bump(&mut self) -> Generation {
        self.generation = self.generation.next();
        self.generation
    }

    /// Word index at the current position, if any.
    pub fn current_index(&self) -> Option<usize> {
        if self.status == PlaybackStatus::Stopped {
            return None;
        }
        self.queue.get(self.position)
    }

    /// Drop the queue and position. Status is left to the caller.
    pub fn clear(&mut self) {
        self.queue = PlaybackQueue::default();
        self.position = 0;
        self.timer = None;
        self.utterance = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_transitions() {
        assert!(can_transition(PlaybackStatus::Stopped, PlaybackStatus::Playing));
        assert!(can_transition(PlaybackStatus::Playing, PlaybackStatus::Paused));
        assert!(can_transition(PlaybackStatus::Paused, PlaybackStatus::Playing));
        assert!(can_transition(PlaybackStatus::Playing, PlaybackStatus::Stopped));
        assert!(can_transition(PlaybackStatus::Paused, PlaybackStatus::Stopped));
    }

    #[test]
    fn test_invalid_transitions() {
        assert!(!can_transition(PlaybackStatus::Stopped, PlaybackStatus::Paused));
        assert!(!can_transition(PlaybackStatus::Stopped, PlaybackStatus::Stopped));
        assert!(!can_transition(PlaybackStatus::Playing, PlaybackStatus::Playing));
        assert!(!can_transition(PlaybackStatus::Paused, PlaybackStatus::Paused));
    }

    #[test]
    fn test_transition_error_names_state_and_action() {
        let mut state = PlaybackState::default();
        let err = state.transition(PlaybackStatus::Paused, "pause").unwrap_err();
        assert_eq!(err.to_string(), "Cannot pause while Stopped");
        assert_eq!(state.status, PlaybackStatus::Stopped);
    }

    #[test]
    fn test_current_index_hidden_when_stopped() {
        let mut state = PlaybackState {
            queue: PlaybackQueue::ordered(3, 1, true),
            ..Default::default()
        };
        assert_eq!(state.current_index(), None);
        state.transition(PlaybackStatus::Playing, "start").unwrap();
        assert_eq!(state.current_index(), Some(1));
    }

    #[test]
    fn test_bump_is_monotonic() {
        let mut state = PlaybackState::default();
        let g1 = state.bump();
        let g2 = state.bump();
        assert!(g2 > g1);
        assert_eq!(state.generation, g2);
    }
}
