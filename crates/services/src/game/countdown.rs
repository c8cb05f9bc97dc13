use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep_until};

use crate::error::GameError;

/// Receives countdown events. Called from the countdown task.
pub trait CountdownListener: Send + Sync + 'static {
    /// Time left at this tick; never zero.
    fn on_tick(&self, remaining: Duration);

    /// Time ran out. Called at most once.
    fn on_finish(&self);
}

/// Periodic countdown from `total` to zero.
///
/// Ticks fire at `total`, `total - interval`, ... while time remains, then
/// `on_finish` fires when it reaches zero. Deadlines are measured from the start
/// instant so slow listeners do not stretch the round.
#[derive(Debug, Clone, Copy)]
pub struct Countdown {
    total: Duration,
    interval: Duration,
}

impl Countdown {
    #[must_use]
    pub fn new(total: Duration, interval: Duration) -> Self {
        Self {
            total,
            interval: interval.max(Duration::from_millis(1)),
        }
    }

    /// Spawn the countdown on the current tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns `GameError::RuntimeUnavailable` when called outside a runtime.
    pub fn start(
        self,
        listener: Arc<dyn CountdownListener>,
    ) -> Result<CountdownHandle, GameError> {
        let runtime = Handle::try_current().map_err(|_| GameError::RuntimeUnavailable)?;
        let cancelled = Arc::new(AtomicBool::new(false));
        let task = runtime.spawn(self.run(listener, Arc::clone(&cancelled)));
        Ok(CountdownHandle { cancelled, task })
    }

    async fn run(self, listener: Arc<dyn CountdownListener>, cancelled: Arc<AtomicBool>) {
        let started = Instant::now();
        let mut elapsed = Duration::ZERO;

        while elapsed < self.total {
            if cancelled.load(Ordering::Acquire) {
                return;
            }
            listener.on_tick(self.total - elapsed);
            elapsed = (elapsed + self.interval).min(self.total);
            sleep_until(started + elapsed).await;
        }

        if !cancelled.load(Ordering::Acquire) {
            listener.on_finish();
        }
    }
}

/// Owner of a running countdown. Dropping it cancels the countdown.
#[derive(Debug)]
pub struct CountdownHandle {
    cancelled: Arc<AtomicBool>,
    task: JoinHandle<()>,
}

impl CountdownHandle {
    /// Stop the countdown; no tick or finish is delivered afterwards.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
        self.task.abort();
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    /// The countdown task has exited, by finishing or by cancellation.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for CountdownHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}
