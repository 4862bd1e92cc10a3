//! The playback scheduler.
//!
//! Owns the word list, settings and [`PlaybackState`], and is the only thing
//! that talks to the speaker and the ticker. All methods run on the caller's
//! event loop; asynchronous results come back through [`on_timer`] and
//! [`on_speech_event`], which discard anything tagged with a stale generation.
//!
//! [`on_timer`]: PlaybackScheduler::on_timer
//! [`on_speech_event`]: PlaybackScheduler::on_speech_event

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, warn};

use wordspeaker_core::events::{Notice, NoticeCategory};
use wordspeaker_core::types::{
    Generation, LoopMode, OrderMode, PlaybackInterval, PlaybackStatus, Volume, WordList,
};
use wordspeaker_speech::{Speaker, SpeechEvent};

use crate::error::PlaybackError;
use crate::queue::PlaybackQueue;
use crate::settings::PlaybackSettings;
use crate::state::{IssuedUtterance, PlaybackState};
use crate::ticker::Ticker;

/// Read-only view of the scheduler for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackSnapshot {
    pub status: PlaybackStatus,
    /// Zero-based position in the queue, `None` when stopped.
    pub position: Option<usize>,
    pub queue_len: usize,
    pub current_index: Option<usize>,
    pub current_word: Option<String>,
    pub generation: Generation,
    pub completed: bool,
    pub settings: PlaybackSettings,
}

pub struct PlaybackScheduler {
    words: WordList,
    settings: PlaybackSettings,
    state: PlaybackState,
    speaker: Arc<dyn Speaker>,
    ticker: Box<dyn Ticker>,
    rng: StdRng,
    notices: Vec<Notice>,
}

impl PlaybackScheduler {
    pub fn new(
        speaker: Arc<dyn Speaker>,
        ticker: Box<dyn Ticker>,
        settings: PlaybackSettings,
    ) -> Self {
        Self {
            words: WordList::default(),
            settings,
            state: PlaybackState::default(),
            speaker,
            ticker,
            rng: StdRng::from_os_rng(),
            notices: Vec::new(),
        }
    }

    /// Replace the shuffle source, for reproducible random queues.
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn words(&self) -> &WordList {
        &self.words
    }

    pub fn settings(&self) -> &PlaybackSettings {
        &self.settings
    }

    pub fn status(&self) -> PlaybackStatus {
        self.state.status
    }

    pub fn generation(&self) -> Generation {
        self.state.generation
    }

    pub fn queue(&self) -> &PlaybackQueue {
        &self.state.queue
    }

    pub fn current_index(&self) -> Option<usize> {
        self.state.current_index()
    }

    pub fn current_word(&self) -> Option<&str> {
        self.current_index().and_then(|i| self.words.get(i))
    }

    pub fn is_completed(&self) -> bool {
        self.state.completed
    }

    /// Whether a timer is armed for the live generation.
    pub fn timer_armed(&self) -> bool {
        self.state.timer.is_some()
    }

    pub fn snapshot(&self) -> PlaybackSnapshot {
        PlaybackSnapshot {
            status: self.state.status,
            position: (self.state.status != PlaybackStatus::Stopped).then_some(self.state.position),
            queue_len: self.state.queue.len(),
            current_index: self.current_index(),
            current_word: self.current_word().map(str::to_string),
            generation: self.state.generation,
            completed: self.state.completed,
            settings: self.settings,
        }
    }

    /// One-line status for display.
    pub fn status_line(&self) -> String {
        match self.state.status {
            PlaybackStatus::Paused => "Paused".to_string(),
            PlaybackStatus::Playing => format!(
                "Current: {}/{}  Word: {}",
                self.state.position + 1,
                self.state.queue.len(),
                self.current_word().unwrap_or_default()
            ),
            PlaybackStatus::Stopped if self.state.completed => "Completed".to_string(),
            PlaybackStatus::Stopped => "Not started".to_string(),
        }
    }

    /// Notices raised by asynchronous events since the last call.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    // -------------------------------------------------------------------------
    // Transport
    // -------------------------------------------------------------------------

    /// Replace the word list. Playback always returns to stopped.
    pub fn replace_words(&mut self, words: WordList) {
        self.stop();
        info!(count = words.len(), "Word list replaced");
        self.words = words;
    }

    pub fn start(&mut self) -> Result<(), PlaybackError> {
        if self.words.is_empty() {
            return Err(PlaybackError::EmptyWordList);
        }
        if self.state.status != PlaybackStatus::Stopped {
            return Err(PlaybackError::InvalidTransition {
                from: self.state.status,
                action: "start",
            });
        }

        self.state.queue = self.build_queue(None, None);
        self.state.position = 0;
        self.state.completed = false;
        self.state.transition(PlaybackStatus::Playing, "start")?;
        self.begin_word();

        info!(
            generation = %self.state.generation,
            words = self.words.len(),
            order = %self.settings.order,
            "Playback started"
        );
        Ok(())
    }

    pub fn pause(&mut self) -> Result<(), PlaybackError> {
        self.state.transition(PlaybackStatus::Paused, "pause")?;
        self.invalidate();
        self.speaker.cancel();
        self.state.utterance = None;
        debug!(generation = %self.state.generation, "Playback paused");
        Ok(())
    }

    /// Continue from the current word. The queue is not rebuilt.
    pub fn resume(&mut self) -> Result<(), PlaybackError> {
        if self.state.status != PlaybackStatus::Paused {
            return Err(PlaybackError::InvalidTransition {
                from: self.state.status,
                action: "resume",
            });
        }
        self.state.transition(PlaybackStatus::Playing, "resume")?;
        self.begin_word();
        debug!(generation = %self.state.generation, "Playback resumed");
        Ok(())
    }

    pub fn toggle(&mut self) -> Result<(), PlaybackError> {
        match self.state.status {
            PlaybackStatus::Stopped => self.start(),
            PlaybackStatus::Playing => self.pause(),
            PlaybackStatus::Paused => self.resume(),
        }
    }

    /// Stop from any state. Idempotent.
    pub fn stop(&mut self) {
        self.invalidate();
        self.speaker.cancel();
        self.state.clear();
        self.state.completed = false;
        if self.state.status != PlaybackStatus::Stopped {
            debug!("Playback state: {} -> {}", self.state.status, PlaybackStatus::Stopped);
            self.state.status = PlaybackStatus::Stopped;
        }
    }

    /// Manual "next".
    pub fn advance(&mut self) -> Result<(), PlaybackError> {
        match self.state.status {
            PlaybackStatus::Stopped => Err(PlaybackError::InvalidTransition {
                from: PlaybackStatus::Stopped,
                action: "advance",
            }),
            PlaybackStatus::Paused if !self.settings.allow_manual_while_paused => {
                Err(PlaybackError::ManualAdvanceWhilePaused)
            }
            _ => {
                self.step();
                Ok(())
            }
        }
    }

    /// Rebuild the queue to start at word `index`.
    ///
    /// From stopped this starts playback. From paused the word is cued but
    /// not spoken.
    pub fn jump_to(&mut self, index: usize) -> Result<(), PlaybackError> {
        if self.words.is_empty() {
            return Err(PlaybackError::EmptyWordList);
        }
        if index >= self.words.len() {
            return Err(PlaybackError::IndexOutOfRange {
                index,
                len: self.words.len(),
            });
        }

        self.state.queue = self.build_queue(Some(index), None);
        self.state.position = 0;
        self.state.completed = false;

        match self.state.status {
            PlaybackStatus::Stopped => {
                self.state.transition(PlaybackStatus::Playing, "jump")?;
                self.begin_word();
            }
            PlaybackStatus::Playing => self.begin_word(),
            PlaybackStatus::Paused => {
                self.invalidate();
            }
        }
        debug!(index, generation = %self.state.generation, "Jumped");
        Ok(())
    }

    /// Speak the current word again without moving.
    pub fn replay(&mut self) -> Result<(), PlaybackError> {
        if self.current_word().is_none() {
            return Err(PlaybackError::NoCurrentWord);
        }
        self.speak_current();
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Settings
    // -------------------------------------------------------------------------

    pub fn set_order(&mut self, order: OrderMode) {
        self.settings.order = order;
        self.rebuild_from_current();
    }

    pub fn set_loop(&mut self, loop_mode: LoopMode) {
        self.settings.loop_mode = loop_mode;
        self.rebuild_from_current();
    }

    pub fn set_auto_advance(&mut self, enabled: bool) {
        self.settings.auto_advance = enabled;
        self.rearm();
    }

    pub fn set_interval(&mut self, interval: PlaybackInterval) {
        self.settings.interval = interval;
        self.rearm();
    }

    /// Applies from the next utterance.
    pub fn set_volume(&mut self, volume: Volume) {
        self.settings.volume = volume;
    }

    pub fn set_allow_manual_while_paused(&mut self, allowed: bool) {
        self.settings.allow_manual_while_paused = allowed;
    }

    // -------------------------------------------------------------------------
    // Asynchronous results
    // -------------------------------------------------------------------------

    /// A timer fired. Timers from older generations are ignored.
    pub fn on_timer(&mut self, generation: Generation) {
        if generation != self.state.generation || self.state.status != PlaybackStatus::Playing {
            debug!(
                fired = %generation,
                live = %self.state.generation,
                "Ignoring stale timer"
            );
            return;
        }
        self.state.timer = None;
        self.step();
    }

    /// A speech event arrived. Only the last utterance issued under the live
    /// generation counts.
    pub fn on_speech_event(&mut self, event: &SpeechEvent) {
        let live = match self.state.utterance {
            Some(issued)
                if issued.id == event.id() && issued.generation == self.state.generation =>
            {
                issued
            }
            _ => {
                debug!(id = event.id().0, "Ignoring stale speech event");
                return;
            }
        };
        self.state.utterance = None;

        match event {
            SpeechEvent::Finished { .. } => {
                debug!(id = live.id.0, "Utterance finished");
            }
            SpeechEvent::Failed { message, .. } => {
                warn!(id = live.id.0, error = %message, "Speech failed");
                self.notices.push(Notice::error(
                    NoticeCategory::Speech,
                    format!("Error: {}", message),
                ));
                // Hold the word rather than advancing past it unheard.
                if self.state.status == PlaybackStatus::Playing {
                    self.invalidate();
                    if let Err(e) = self.state.transition(PlaybackStatus::Paused, "pause") {
                        warn!(error = %e, "Could not pause after speech failure");
                    }
                }
            }
        }
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    fn build_queue(&mut self, start: Option<usize>, avoid_first: Option<usize>) -> PlaybackQueue {
        PlaybackQueue::build(
            self.settings.order,
            self.words.len(),
            start,
            self.settings.loop_mode.is_looping(),
            avoid_first,
            &mut self.rng,
        )
    }

    /// Disarm the live timer and start a new generation.
    fn invalidate(&mut self) -> Generation {
        if let Some(handle) = self.state.timer.take() {
            self.ticker.disarm(handle);
        }
        self.state.bump()
    }

    /// New generation, speak the current word, arm the timer if playing.
    fn begin_word(&mut self) {
        self.invalidate();
        self.speak_current();
        self.arm_if_auto();
    }

    fn speak_current(&mut self) {
        let Some(index) = self.state.current_index() else {
            return;
        };
        let Some(word) = self.words.get(index) else {
            return;
        };
        let id = self.speaker.speak(word, self.settings.volume);
        self.state.utterance = Some(IssuedUtterance {
            id,
            generation: self.state.generation,
        });
    }

    fn arm_if_auto(&mut self) {
        if self.state.status == PlaybackStatus::Playing && self.settings.auto_advance {
            let handle = self
                .ticker
                .arm(self.settings.interval.as_duration(), self.state.generation);
            self.state.timer = Some(handle);
        }
    }

    fn rearm(&mut self) {
        if self.state.status == PlaybackStatus::Playing {
            self.invalidate();
            self.arm_if_auto();
        }
    }

    fn rebuild_from_current(&mut self) {
        if self.state.status == PlaybackStatus::Stopped {
            return;
        }
        let current = self.state.current_index();
        self.state.queue = self.build_queue(current, None);
        self.state.position = 0;
        self.invalidate();
        self.arm_if_auto();
        debug!(
            order = %self.settings.order,
            loop_mode = %self.settings.loop_mode,
            queue_len = self.state.queue.len(),
            "Queue rebuilt"
        );
    }

    /// Move to the next word, regenerating or completing at the end.
    fn step(&mut self) {
        let next = self.state.position + 1;
        if next < self.state.queue.len() {
            self.state.position = next;
        } else if self.settings.loop_mode.is_looping() {
            let previous_last = self.state.queue.last();
            self.state.queue = self.build_queue(None, previous_last);
            self.state.position = 0;
            debug!(queue_len = self.state.queue.len(), "Cycle complete, queue regenerated");
        } else {
            self.complete();
            return;
        }
        self.begin_word();
    }

    fn complete(&mut self) {
        self.invalidate();
        if let Err(e) = self.state.transition(PlaybackStatus::Stopped, "complete") {
            warn!(error = %e, "Unexpected state at completion");
            self.state.status = PlaybackStatus::Stopped;
        }
        self.state.clear();
        self.state.completed = true;
        info!(generation = %self.state.generation, "Playback completed");
        self.notices
            .push(Notice::info(NoticeCategory::Completion, "Completed"));
    }
}
