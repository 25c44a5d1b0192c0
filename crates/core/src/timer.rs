//! The one-second display clock.
//!
//! Before any sample is accepted there is nothing real to count down to, so
//! the timer runs a cosmetic countdown that wraps around. Once the tracker has
//! an accepted sample, the countdown is derived from the time elapsed since
//! that sample and the timer's own counter is no longer consulted.

use crate::tracker::PositionTracker;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerMode {
    /// No accepted sample yet
    FreeRunning,
    /// Counting down from the last accepted sample
    Anchored { last_accepted_at_millis: i64 },
}

impl TimerMode {
    pub fn of(tracker: &PositionTracker) -> Self {
        match tracker.last_accepted_at() {
            Some(last_accepted_at_millis) => Self::Anchored {
                last_accepted_at_millis,
            },
            None => Self::FreeRunning,
        }
    }
}

/// Result of one tick
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tick {
    FreeRunning { countdown: u32 },
    Remaining { countdown: u32 },
    /// The window just ran out; show the waiting indicator
    WaitingStarted,
    /// Still waiting, indicator already shown
    Waiting,
}

#[derive(Clone, Copy, Debug)]
pub struct DisplayTimer {
    seed: u32,
    free_running: u32,
}

impl DisplayTimer {
    pub fn new(seed: u32) -> Self {
        Self {
            seed,
            free_running: seed,
        }
    }

    pub fn for_tracker(tracker: &PositionTracker) -> Self {
        Self::new(tracker.throttle().window_seconds())
    }

    pub fn tick(&mut self, now_millis: i64, tracker: &mut PositionTracker) -> Tick {
        match TimerMode::of(tracker) {
            TimerMode::FreeRunning => {
                self.free_running = self.free_running.saturating_sub(1);
                let countdown = self.free_running;
                if self.free_running == 0 {
                    self.free_running = self.seed;
                }
                tracker.set_countdown(countdown);
                Tick::FreeRunning { countdown }
            }
            TimerMode::Anchored {
                last_accepted_at_millis,
            } => {
                let remaining = tracker
                    .throttle()
                    .remaining_seconds(now_millis, last_accepted_at_millis);
                tracker.set_countdown(remaining);

                if remaining > 0 {
                    Tick::Remaining {
                        countdown: remaining,
                    }
                } else if tracker.begin_waiting() {
                    Tick::WaitingStarted
                } else {
                    Tick::Waiting
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use warmer_location::{Coordinate, Sample};

    fn tracker_with_sample_at(at: i64) -> PositionTracker {
        let target = Coordinate::new(10.0, 20.0).unwrap();
        let mut tracker = PositionTracker::default();
        tracker.set_target(target).unwrap();
        tracker.on_sample(Sample::new(target, at));
        tracker
    }

    #[test]
    fn test_free_running_wraps() {
        let mut tracker = PositionTracker::default();
        let mut timer = DisplayTimer::for_tracker(&tracker);

        let shown: Vec<Tick> = (0..17).map(|_| timer.tick(0, &mut tracker)).collect();
        let expected: Vec<Tick> = (0..15)
            .rev()
            .chain([14, 13])
            .map(|countdown| Tick::FreeRunning { countdown })
            .collect();

        assert_eq!(shown, expected);
        assert_eq!(tracker.countdown(), 13);
    }

    #[test]
    fn test_anchored_counts_from_last_sample() {
        let mut tracker = tracker_with_sample_at(0);
        let mut timer = DisplayTimer::for_tracker(&tracker);

        assert_eq!(timer.tick(1_000, &mut tracker), Tick::Remaining { countdown: 14 });
        assert_eq!(timer.tick(14_500, &mut tracker), Tick::Remaining { countdown: 1 });
        assert_eq!(tracker.countdown(), 1);
    }

    #[test]
    fn test_waiting_fires_once_per_window() {
        let mut tracker = tracker_with_sample_at(0);
        let mut timer = DisplayTimer::for_tracker(&tracker);

        assert_eq!(timer.tick(15_000, &mut tracker), Tick::WaitingStarted);
        assert!(tracker.display().show_waiting_indicator);
        assert_eq!(tracker.display().countdown, 0);

        for now in [16_000, 17_000, 30_000] {
            assert_eq!(timer.tick(now, &mut tracker), Tick::Waiting);
        }

        // A new accepted sample opens the next window
        let target = tracker.target().unwrap();
        tracker.on_sample(Sample::new(target, 31_000));
        assert_eq!(timer.tick(32_000, &mut tracker), Tick::Remaining { countdown: 14 });
        assert_eq!(timer.tick(46_000, &mut tracker), Tick::WaitingStarted);
    }

    #[test]
    fn test_free_running_counter_ignored_once_anchored() {
        let target = Coordinate::new(10.0, 20.0).unwrap();
        let mut tracker = PositionTracker::default();
        tracker.set_target(target).unwrap();
        let mut timer = DisplayTimer::for_tracker(&tracker);

        for _ in 0..4 {
            timer.tick(0, &mut tracker);
        }
        assert_eq!(tracker.countdown(), 11);

        tracker.on_sample(Sample::new(target, 4_500));
        assert_eq!(TimerMode::of(&tracker), TimerMode::Anchored { last_accepted_at_millis: 4_500 });
        assert_eq!(timer.tick(5_000, &mut tracker), Tick::Remaining { countdown: 15 });
    }
}
