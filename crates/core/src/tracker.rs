//! The position-tracking state machine.
//!
//! ```text
//! Idle --set_target--> Armed --accepted sample--> Tracking
//!                        |                           |
//!                        +--------- on_error --------+--> Faulted
//!
//! any phase --stop--> Stopped
//! ```
//!
//! All state changes go through the methods here. The tracker is synchronous
//! and owns no timers or subscriptions; the session actor drives it.

use warmer_location::{Coordinate, LocationError, Sample};

use crate::display::{
    DisplayPayload, NO_DISTANCE_TEXT, StatusText, UNAVAILABLE_DISTANCE_TEXT,
    UNKNOWN_DISTANCE_TEXT, format_distance,
};
use crate::distance::distance;
use crate::throttle::SampleThrottle;
use crate::trend::{TrendState, classify};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// No target yet
    Idle,
    /// Target set, waiting for the first accepted sample
    Armed,
    Tracking,
    /// The location source failed; samples are no longer processed
    Faulted(LocationError),
    Stopped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TrackerError {
    #[error("Cannot {action} while {phase:?}")]
    InvalidTransition { action: &'static str, phase: Phase },
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TrackerState {
    pub last_accepted_coordinate: Option<Coordinate>,
    pub last_accepted_at_millis: Option<i64>,
    pub last_distance_meters: Option<f64>,
    pub trend: TrendState,

    /// The cadence window ran out and no new sample has been accepted yet
    pub awaiting_sample: bool,
}

/// What happened to an incoming sample
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SampleOutcome {
    Accepted {
        distance_meters: f64,
        trend: TrendState,
    },
    /// Arrived inside the current window; only the countdown was refreshed
    Throttled { remaining_seconds: u32 },
    /// The tracker is not in a phase that processes samples
    Ignored,
}

#[derive(Debug, Clone)]
pub struct PositionTracker {
    phase: Phase,
    target: Option<Coordinate>,
    throttle: SampleThrottle,
    state: TrackerState,
    countdown: u32,
}

impl PositionTracker {
    pub fn new(throttle: SampleThrottle) -> Self {
        Self {
            phase: Phase::Idle,
            target: None,
            throttle,
            state: TrackerState::default(),
            countdown: throttle.window_seconds(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn target(&self) -> Option<Coordinate> {
        self.target
    }

    pub fn state(&self) -> &TrackerState {
        &self.state
    }

    pub fn throttle(&self) -> SampleThrottle {
        self.throttle
    }

    pub fn countdown(&self) -> u32 {
        self.countdown
    }

    pub fn last_accepted_at(&self) -> Option<i64> {
        self.state.last_accepted_at_millis
    }

    pub fn set_target(&mut self, target: Coordinate) -> Result<(), TrackerError> {
        if self.phase != Phase::Idle {
            return Err(TrackerError::InvalidTransition {
                action: "set target",
                phase: self.phase,
            });
        }

        tracing::info!(%target, "Target set");
        self.target = Some(target);
        self.phase = Phase::Armed;
        Ok(())
    }

    /// The single accept/reject decision point.
    pub fn on_sample(&mut self, sample: Sample) -> SampleOutcome {
        let target = match (self.phase, self.target) {
            (Phase::Armed | Phase::Tracking, Some(target)) => target,
            (phase, _) => {
                tracing::debug!(?phase, "Ignoring sample");
                return SampleOutcome::Ignored;
            }
        };

        let now = sample.observed_at_millis;
        let last = self.state.last_accepted_at_millis;

        if !self.throttle.should_accept(now, last) {
            // `should_accept` only refuses when there is a previous sample
            let remaining = last.map_or(0, |last| self.throttle.remaining_seconds(now, last));
            tracing::debug!(remaining, "Sample inside cadence window");
            self.countdown = remaining;
            return SampleOutcome::Throttled {
                remaining_seconds: remaining,
            };
        }

        let meters = distance(&sample.coordinate, &target);
        let trend = classify(self.state.last_distance_meters, meters);

        tracing::info!(
            distance = %format!("{meters:.2}"),
            previous = ?self.state.last_distance_meters,
            %trend,
            "Sample accepted"
        );

        self.state = TrackerState {
            last_accepted_coordinate: Some(sample.coordinate),
            last_accepted_at_millis: Some(now),
            last_distance_meters: Some(meters),
            trend,
            awaiting_sample: false,
        };
        self.countdown = self.throttle.window_seconds();
        self.phase = Phase::Tracking;

        SampleOutcome::Accepted {
            distance_meters: meters,
            trend,
        }
    }

    /// Returns whether the tracker moved to `Faulted`.
    pub fn on_error(&mut self, error: LocationError) -> bool {
        match self.phase {
            Phase::Armed | Phase::Tracking => {
                tracing::warn!(%error, "Location error");
                self.phase = Phase::Faulted(error);
                true
            }
            phase => {
                tracing::debug!(?phase, %error, "Ignoring location error");
                false
            }
        }
    }

    pub fn set_countdown(&mut self, countdown: u32) {
        self.countdown = countdown;
    }

    /// Raise the waiting flag. Returns `true` only for the call that raised it.
    pub fn begin_waiting(&mut self) -> bool {
        if self.state.awaiting_sample {
            return false;
        }
        tracing::debug!("Cadence window elapsed, waiting for a sample");
        self.state.awaiting_sample = true;
        true
    }

    /// Returns `false` when already stopped.
    pub fn stop(&mut self) -> bool {
        if self.phase == Phase::Stopped {
            return false;
        }
        tracing::info!(phase = ?self.phase, "Tracker stopped");
        self.phase = Phase::Stopped;
        true
    }

    pub fn display(&self) -> DisplayPayload {
        let (distance_text, status, fault) = match self.phase {
            Phase::Faulted(error) => {
                let text = match error {
                    LocationError::Unsupported => UNAVAILABLE_DISTANCE_TEXT,
                    _ => UNKNOWN_DISTANCE_TEXT,
                };
                (text.to_string(), StatusText::from(error), Some(error))
            }
            _ => match self.state.last_distance_meters {
                Some(meters) => (
                    format_distance(meters),
                    StatusText::from(self.state.trend),
                    None,
                ),
                None => (NO_DISTANCE_TEXT.to_string(), StatusText::Seeking, None),
            },
        };

        DisplayPayload {
            distance_text,
            status,
            countdown: self.countdown,
            show_waiting_indicator: self.state.awaiting_sample,
            fault,
        }
    }
}

impl Default for PositionTracker {
    fn default() -> Self {
        Self::new(SampleThrottle::default())
    }
}
