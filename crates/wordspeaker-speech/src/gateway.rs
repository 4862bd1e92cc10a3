//! Single-flight speech gateway.
//!
//! At most one utterance is in flight. Starting a new one aborts the previous
//! task, which drops the engine future and kills its process. Completion and
//! failure are reported on an event channel tagged with the utterance id;
//! an aborted utterance reports nothing.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use wordspeaker_core::types::{VoiceId, Volume};

use crate::engine::{SpeechEngine, SpeechRequest, VoiceInfo};
use crate::error::SpeechError;

/// Identifies one call to [`Speaker::speak`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UtteranceId(pub u64);

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SpeechEvent {
    Finished { id: UtteranceId },
    Failed { id: UtteranceId, message: String },
}

impl SpeechEvent {
    pub fn id(&self) -> UtteranceId {
        match self {
            SpeechEvent::Finished { id } | SpeechEvent::Failed { id, .. } => *id,
        }
    }
}

/// What the playback scheduler needs from speech output.
pub trait Speaker: Send + Sync {
    /// Start speaking `text`, cancelling any utterance in flight.
    fn speak(&self, text: &str, volume: Volume) -> UtteranceId;

    /// Stop the utterance in flight, if any. Idempotent.
    fn cancel(&self);
}

struct ActiveUtterance {
    id: UtteranceId,
    task: JoinHandle<()>,
}

pub struct SpeechGateway {
    engine: Arc<dyn SpeechEngine>,
    voice: RwLock<Option<VoiceId>>,
    active: Mutex<Option<ActiveUtterance>>,
    next_id: AtomicU64,
    events: mpsc::UnboundedSender<SpeechEvent>,
}

impl SpeechGateway {
    /// Create a gateway and the receiver for its completion events.
    ///
    /// `speak` spawns onto the current tokio runtime and must be called
    /// from within one.
    pub fn new(
        engine: Arc<dyn SpeechEngine>,
        voice: Option<VoiceId>,
    ) -> (Self, mpsc::UnboundedReceiver<SpeechEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        let gateway = Self {
            engine,
            voice: RwLock::new(voice),
            active: Mutex::new(None),
            next_id: AtomicU64::new(1),
            events,
        };
        (gateway, rx)
    }

    pub fn engine_name(&self) -> &str {
        self.engine.name()
    }

    pub fn is_available(&self) -> bool {
        self.engine.is_available()
    }

    /// Select the voice for all subsequent utterances.
    pub fn set_voice(&self, voice: Option<VoiceId>) {
        let mut guard = self.voice.write().unwrap_or_else(|e| e.into_inner());
        debug!(voice = ?voice, "Voice changed");
        *guard = voice;
    }

    pub fn voice(&self) -> Option<VoiceId> {
        self.voice.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn is_speaking(&self) -> bool {
        self.active
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
            .is_some_and(|a| !a.task.is_finished())
    }

    pub async fn list_voices(&self) -> Result<Vec<VoiceInfo>, SpeechError> {
        self.engine.list_voices().await
    }
}

impl Speaker for SpeechGateway {
    fn speak(&self, text: &str, volume: Volume) -> UtteranceId {
        let id = UtteranceId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let request = SpeechRequest {
            text: text.to_string(),
            volume,
            voice: self.voice(),
        };

        let mut active = self.active.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(previous) = active.take() {
            debug!(id = previous.id.0, "Cancelling previous utterance");
            previous.task.abort();
        }

        let engine = Arc::clone(&self.engine);
        let events = self.events.clone();
        let task = tokio::spawn(async move {
            let event = match engine.speak(&request).await {
                Ok(()) => SpeechEvent::Finished { id },
                Err(e) => {
                    warn!(id = id.0, engine = engine.name(), error = %e, "Utterance failed");
                    SpeechEvent::Failed {
                        id,
                        message: e.to_string(),
                    }
                }
            };
            // Receiver gone means the application is shutting down.
            let _ = events.send(event);
        });

        debug!(id = id.0, text, volume = volume.percent(), "Utterance started");
        *active = Some(ActiveUtterance { id, task });
        id
    }

    fn cancel(&self) {
        let mut active = self.active.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(previous) = active.take() {
            debug!(id = previous.id.0, "Utterance cancelled");
            previous.task.abort();
        }
    }
}

impl Drop for SpeechGateway {
    fn drop(&mut self) {
        if let Some(active) = self.active.get_mut().unwrap_or_else(|e| e.into_inner()).take() {
            active.task.abort();
        }
    }
}
