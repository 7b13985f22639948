//! Time utilities with a clock abstraction for testability.
//!
//! The matchmaking pool stamps every waiting client with a join time that is
//! only ever compared against other join times, so the clock is monotonic
//! rather than wall-clock: it can never go backwards and is immune to NTP
//! adjustments.

use std::time::Instant;

/// Clock trait for dependency injection and testing
pub trait Clock: Send + Sync {
    /// Nanoseconds elapsed since the clock's origin
    fn now_nanos(&self) -> u64;
}

/// Monotonic clock backed by [`Instant`], anchored at construction time
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now_nanos(&self) -> u64 {
        self.origin.elapsed().as_nanos() as u64
    }
}

/// Manually advanced clock for deterministic tests
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    nanos: std::sync::Arc<std::sync::atomic::AtomicU64>,
}

#[cfg(test)]
impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the clock by the given number of nanoseconds
    pub fn advance(&self, nanos: u64) {
        self.nanos
            .fetch_add(nanos, std::sync::atomic::Ordering::SeqCst);
    }
}

#[cfg(test)]
impl Clock for ManualClock {
    fn now_nanos(&self) -> u64 {
        self.nanos.load(std::sync::atomic::Ordering::SeqCst)
    }
}
