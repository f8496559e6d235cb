use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

#[derive(Clone, Debug)]
pub struct PacingLimits {
    /// Minimum gap between the previous lookup starting or finishing and the next one starting.
    pub delay: Duration,
    /// Maximum number of lookups in flight.
    pub concurrency: usize,
}

impl Default for PacingLimits {
    fn default() -> Self {
        Self {
            delay: Duration::from_millis(crate::constants::DEFAULT_DELAY_MS),
            concurrency: crate::constants::DEFAULT_CONCURRENCY,
        }
    }
}

/// Spaces out lookups against the donor site and bounds how many run at once.
#[derive(Clone, Debug)]
pub struct Pacer {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    delay: Duration,
    // time of the most recent start or finish
    last_event: Mutex<Option<Instant>>,
    sem: Arc<Semaphore>,
}

/// Held for the duration of one lookup; dropping it frees the slot.
#[derive(Debug)]
pub struct PacerPermit {
    _permit: OwnedSemaphorePermit,
    inner: Arc<Inner>,
}

impl Drop for PacerPermit {
    fn drop(&mut self) {
        let mut last = self.inner.last_event.lock().unwrap_or_else(|e| e.into_inner());
        let now = Instant::now();
        if last.map_or(true, |t| t < now) {
            *last = Some(now);
        }
    }
}

impl Pacer {
    pub fn new(limits: PacingLimits) -> Self {
        Self {
            inner: Arc::new(Inner {
                delay: limits.delay,
                last_event: Mutex::new(None),
                sem: Arc::new(Semaphore::new(limits.concurrency.max(1))),
            }),
        }
    }

    /// Waits for a free slot, then for the pacing delay to elapse.
    pub async fn acquire(&self) -> PacerPermit {
        let permit = self
            .inner
            .sem
            .clone()
            .acquire_owned()
            .await
            .expect("pacer semaphore is never closed");

        let wait = {
            let mut last = self.inner.last_event.lock().unwrap_or_else(|e| e.into_inner());
            let now = Instant::now();
            let wait = last
                .map(|t| (t + self.inner.delay).saturating_duration_since(now))
                .unwrap_or_default();
            // reserve the slot so the next caller queues behind this start
            *last = Some(now + wait);
            wait
        };
        if !wait.is_zero() {
            tokio::time::sleep(wait).await;
        }

        PacerPermit {
            _permit: permit,
            inner: self.inner.clone(),
        }
    }
}
