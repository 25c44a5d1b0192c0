//! Cadence gate for accepted samples.

/// Default cadence window between accepted samples
pub const DEFAULT_WINDOW_MILLIS: i64 = 15_000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SampleThrottle {
    window_millis: i64,
}

impl SampleThrottle {
    pub fn new(window_millis: i64) -> Self {
        Self {
            window_millis: window_millis.max(0),
        }
    }

    pub fn window_millis(&self) -> i64 {
        self.window_millis
    }

    /// Whole seconds in a full window, rounded up. The countdown starts here.
    pub fn window_seconds(&self) -> u32 {
        ceil_seconds(self.window_millis)
    }

    pub fn should_accept(&self, now_millis: i64, last_accepted_at_millis: Option<i64>) -> bool {
        match last_accepted_at_millis {
            None => true,
            Some(last) => now_millis.saturating_sub(last) >= self.window_millis,
        }
    }

    /// Seconds until the next sample is due, never negative.
    ///
    /// A `now` earlier than `last_accepted_at_millis` counts as no time
    /// elapsed.
    pub fn remaining_seconds(&self, now_millis: i64, last_accepted_at_millis: i64) -> u32 {
        let elapsed = now_millis.saturating_sub(last_accepted_at_millis).max(0);
        ceil_seconds(self.window_millis - elapsed)
    }
}

impl Default for SampleThrottle {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW_MILLIS)
    }
}

fn ceil_seconds(millis: i64) -> u32 {
    if millis <= 0 {
        return 0;
    }
    u32::try_from((millis - 1) / 1000 + 1).unwrap_or(u32::MAX)
}
