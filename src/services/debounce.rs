//! Debounce timer with a generation token for stale-response suppression.
//!
//! Only one scheduled action is ever pending: scheduling again aborts the
//! previous timer. Once the quiet period elapses the action is detached onto
//! its own task and is no longer cancelable; callers use a [`Generation`]
//! captured at scheduling time to decide whether its result still applies.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::trace;

/// Snapshot of the debouncer's generation counter
#[derive(Debug, Clone)]
pub struct Generation {
    source: Arc<AtomicU64>,
    value: u64,
}

impl Generation {
    /// True while no newer generation has been started
    pub fn is_current(&self) -> bool {
        self.source.load(Ordering::SeqCst) == self.value
    }

    pub fn value(&self) -> u64 {
        self.value
    }
}

pub struct Debouncer {
    delay: Duration,
    generation: Arc<AtomicU64>,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            generation: Arc::new(AtomicU64::new(0)),
            pending: Mutex::new(None),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Start a new generation, invalidating every earlier one
    pub fn advance(&self) -> Generation {
        let value = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        Generation {
            source: Arc::clone(&self.generation),
            value,
        }
    }

    /// The latest generation
    pub fn current(&self) -> Generation {
        Generation {
            source: Arc::clone(&self.generation),
            value: self.generation.load(Ordering::SeqCst),
        }
    }

    /// Run `action` after the quiet period, replacing any pending one.
    ///
    /// Must be called from within a tokio runtime.
    pub fn schedule<F>(&self, action: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let delay = self.delay;
        let timer = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            tokio::spawn(action);
        });

        if let Some(previous) = self.slot().replace(timer) {
            previous.abort();
            trace!("Replaced pending debounce timer");
        }
    }

    /// Abort the pending timer, if any. Returns whether one was still waiting.
    pub fn cancel(&self) -> bool {
        match self.slot().take() {
            Some(timer) => {
                let waiting = !timer.is_finished();
                timer.abort();
                waiting
            }
            None => false,
        }
    }

    /// Whether a timer is scheduled and has not fired yet
    pub fn is_pending(&self) -> bool {
        self.slot()
            .as_ref()
            .is_some_and(|timer| !timer.is_finished())
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<JoinHandle<()>>> {
        self.pending
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn test_generation_tracking() {
        let debouncer = Debouncer::new(Duration::from_millis(200));
        let first = debouncer.advance();
        assert!(first.is_current());

        let second = debouncer.advance();
        assert!(!first.is_current());
        assert!(second.is_current());
        assert_eq!(debouncer.current().value(), second.value());
    }

    #[tokio::test(start_paused = true)]
    async fn test_only_last_scheduled_action_runs() {
        let debouncer = Debouncer::new(Duration::from_millis(200));
        let runs = Arc::new(AtomicUsize::new(0));
        let last = Arc::new(AtomicUsize::new(0));

        for i in 1..=3 {
            let runs = Arc::clone(&runs);
            let last = Arc::clone(&last);
            debouncer.schedule(async move {
                runs.fetch_add(1, Ordering::SeqCst);
                last.store(i, Ordering::SeqCst);
            });
            tokio::time::sleep(Duration::from_millis(50)).await;
        }

        tokio::time::sleep(Duration::from_millis(300)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 1);
        assert_eq!(last.load(Ordering::SeqCst), 3);
        assert!(!debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_action_waits_for_quiet_period() {
        let debouncer = Debouncer::new(Duration::from_millis(200));
        let runs = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&runs);
        debouncer.schedule(async move {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 0);
        assert!(debouncer.is_pending());

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_prevents_action() {
        let debouncer = Debouncer::new(Duration::from_millis(200));
        let runs = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&runs);
        debouncer.schedule(async move {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        assert!(debouncer.cancel());
        assert!(!debouncer.cancel());

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 0);
    }
}
