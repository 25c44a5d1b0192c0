//! Millisecond clocks shared by providers and the game session.

use chrono::Utc;
use tokio::time::Instant;

pub trait Clock: Send + Sync {
    /// Unix-epoch milliseconds
    fn now_millis(&self) -> i64;
}

/// Plain wall clock
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// Wall-clock anchor advanced by tokio's monotonic time.
///
/// Under `tokio::time::pause()` this clock only moves when the runtime's
/// virtual time does, which keeps timer-driven tests deterministic.
#[derive(Clone, Copy, Debug)]
pub struct TokioClock {
    anchor_millis: i64,
    origin: Instant,
}

impl TokioClock {
    pub fn new() -> Self {
        Self::anchored_at(Utc::now().timestamp_millis())
    }

    pub fn anchored_at(anchor_millis: i64) -> Self {
        Self {
            anchor_millis,
            origin: Instant::now(),
        }
    }
}

impl Default for TokioClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for TokioClock {
    fn now_millis(&self) -> i64 {
        self.anchor_millis + self.origin.elapsed().as_millis() as i64
    }
}
