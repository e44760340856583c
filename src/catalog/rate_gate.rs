use std::time::{Duration, Instant};

/// Enforces a minimum spacing between consecutive outbound requests.
///
/// This is a token bucket with a capacity of one: the first request passes
/// immediately, every later request blocks until `interval` has elapsed since
/// the previous one was let through. Every request a client makes must pass
/// through the same gate.
#[derive(Debug, Clone)]
pub struct RateGate {
    interval: Duration,
    last: Option<Instant>,
}

impl RateGate {
    /// Create a gate that lets one request through per `interval`.
    #[must_use]
    pub const fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    /// Returns the configured spacing between requests.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Block until the next request may be sent, then claim the slot.
    ///
    /// Returns how long the caller was held back.
    pub fn wait(&mut self) -> Duration {
        let waited = self.remaining();
        if !waited.is_zero() {
            tracing::trace!("rate gate holding request for {waited:?}");
            std::thread::sleep(waited);
        }
        self.last = Some(Instant::now());
        waited
    }

    fn remaining(&self) -> Duration {
        self.last.map_or(Duration::ZERO, |last| {
            self.interval.saturating_sub(last.elapsed())
        })
    }
}
