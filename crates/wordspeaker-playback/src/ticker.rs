//! Playback timer.
//!
//! The scheduler arms one timer per generation. A fired timer delivers its
//! generation back to the scheduler, which drops it if a newer generation has
//! begun in the meantime.

use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::trace;

use wordspeaker_core::types::Generation;

/// An armed timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle {
    pub id: u64,
    pub generation: Generation,
}

pub trait Ticker: Send {
    /// Deliver `generation` after `delay`.
    fn arm(&mut self, delay: Duration, generation: Generation) -> TimerHandle;

    /// Cancel a timer. Disarming a fired or unknown timer is a no-op.
    fn disarm(&mut self, handle: TimerHandle);
}

/// Timer backed by tokio tasks. Fired generations arrive on the receiver
/// returned by [`TokioTicker::new`].
pub struct TokioTicker {
    tx: mpsc::UnboundedSender<Generation>,
    tasks: HashMap<u64, JoinHandle<()>>,
    next_id: u64,
}

impl TokioTicker {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Generation>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let ticker = Self {
            tx,
            tasks: HashMap::new(),
            next_id: 0,
        };
        (ticker, rx)
    }

    /// Number of timers not yet fired or disarmed.
    pub fn pending(&self) -> usize {
        self.tasks.values().filter(|t| !t.is_finished()).count()
    }
}

impl Ticker for TokioTicker {
    fn arm(&mut self, delay: Duration, generation: Generation) -> TimerHandle {
        self.tasks.retain(|_, task| !task.is_finished());

        self.next_id += 1;
        let handle = TimerHandle {
            id: self.next_id,
            generation,
        };
        let tx = self.tx.clone();
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(generation);
        });
        trace!(id = handle.id, %generation, ?delay, "Timer armed");
        self.tasks.insert(handle.id, task);
        handle
    }

    fn disarm(&mut self, handle: TimerHandle) {
        if let Some(task) = self.tasks.remove(&handle.id) {
            trace!(id = handle.id, generation = %handle.generation, "Timer disarmed");
            task.abort();
        }
    }
}

impl Drop for TokioTicker {
    fn drop(&mut self) {
        for (_, task) in self.tasks.drain() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_timer_fires_with_generation() {
        let (mut ticker, mut rx) = TokioTicker::new();
        ticker.arm(Duration::from_secs(2), Generation(5));
        assert_eq!(rx.recv().await, Some(Generation(5)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_disarmed_timer_never_fires() {
        let (mut ticker, mut rx) = TokioTicker::new();
        let first = ticker.arm(Duration::from_secs(1), Generation(1));
        ticker.arm(Duration::from_secs(3), Generation(2));
        ticker.disarm(first);
        ticker.disarm(first);

        assert_eq!(rx.recv().await, Some(Generation(2)));
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert!(rx.try_recv().is_err());
        assert_eq!(ticker.pending(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timers_fire_in_delay_order() {
        let (mut ticker, mut rx) = TokioTicker::new();
        ticker.arm(Duration::from_millis(1500), Generation(2));
        ticker.arm(Duration::from_millis(500), Generation(1));
        assert_eq!(rx.recv().await, Some(Generation(1)));
        assert_eq!(rx.recv().await, Some(Generation(2)));
    }
}
