//! One game, from target selection to teardown.
//!
//! The tracker and display timer live inside a single tokio task. Location
//! events and timer ticks are both handled by that task, one at a time, so
//! each handler sees and leaves a consistent [`TrackerState`] without any
//! locking.
//!
//! [`TrackerState`]: crate::tracker::TrackerState

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use warmer_location::{
    Clock, Coordinate, LocationEvent, LocationError, LocationSource, Sample, Subscription,
};

use crate::config::{ConfigError, SessionConfig};
use crate::display::{DisplayPayload, DisplaySink};
use crate::throttle::SampleThrottle;
use crate::timer::{DisplayTimer, Tick};
use crate::tracker::{PositionTracker, SampleOutcome, TrackerError};

/// Providers deliver one event at a time
const EVENT_CHANNEL_CAPACITY: usize = 1;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Tracker(#[from] TrackerError),
}

pub struct GameSession {
    source: Arc<dyn LocationSource>,
    subscription: Option<Subscription>,
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<PositionTracker>>,
}

impl GameSession {
    /// Arm a tracker for `target`, subscribe to `source`, and start the
    /// display timer. Must be called from within a tokio runtime.
    ///
    /// A source that refuses the subscription does not fail the session; the
    /// tracker goes straight to `Faulted` and the sink is told so.
    pub fn start(
        target: Coordinate,
        source: Arc<dyn LocationSource>,
        clock: Arc<dyn Clock>,
        config: SessionConfig,
        sink: impl DisplaySink + 'static,
    ) -> Result<Self, SessionError> {
        config.validate()?;

        let mut tracker = PositionTracker::new(SampleThrottle::new(config.cadence_millis));
        tracker.set_target(target)?;
        let timer = DisplayTimer::for_tracker(&tracker);

        let (events_tx, events_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let subscription = match source.subscribe(events_tx, config.subscription) {
            Ok(subscription) => {
                tracing::info!(id = %subscription.id(), "Watching position");
                Some(subscription)
            }
            Err(error) => {
                tracker.on_error(error);
                None
            }
        };

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let actor = SessionActor {
            tracker,
            timer,
            clock,
            sink: Box::new(sink),
            last_emitted: None,
        };
        let task = tokio::spawn(actor.run(
            events_rx,
            shutdown_rx,
            Duration::from_millis(config.tick_millis),
        ));

        Ok(Self {
            source,
            subscription,
            shutdown: Some(shutdown_tx),
            task: Some(task),
        })
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Release the location subscription and the display timer.
    ///
    /// Once this returns the sink receives nothing more. Calling it again is a
    /// no-op that returns `None`; the first call returns the final tracker.
    pub async fn stop(&mut self) -> Option<PositionTracker> {
        if let Some(subscription) = self.subscription.take() {
            self.source.unsubscribe(&subscription);
        }

        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }

        let task = self.task.take()?;
        match task.await {
            Ok(tracker) => Some(tracker),
            Err(e) => {
                tracing::warn!("Session task ended abnormally: {e}");
                None
            }
        }
    }
}

impl Drop for GameSession {
    fn drop(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            self.source.unsubscribe(&subscription);
        }
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

struct SessionActor {
    tracker: PositionTracker,
    timer: DisplayTimer,
    clock: Arc<dyn Clock>,
    sink: Box<dyn DisplaySink>,
    last_emitted: Option<DisplayPayload>,
}

impl SessionActor {
    async fn run(
        mut self,
        mut events: mpsc::Receiver<LocationEvent>,
        mut shutdown: oneshot::Receiver<()>,
        tick_period: Duration,
    ) -> PositionTracker {
        let mut ticker = tokio::time::interval_at(Instant::now() + tick_period, tick_period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut events_open = true;
        self.emit();

        loop {
            tokio::select! {
                biased;

                // Also fires if the session handle was dropped
                _ = &mut shutdown => break,

                event = events.recv(), if events_open => match event {
                    Some(LocationEvent::Sample(sample)) => self.handle_sample(sample),
                    Some(LocationEvent::Error(error)) => self.handle_error(error),
                    None => {
                        tracing::debug!("Location stream closed");
                        events_open = false;
                    }
                },

                _ = ticker.tick() => self.handle_tick(),
            }
        }

        self.tracker.stop();
        self.tracker
    }

    fn handle_sample(&mut self, sample: Sample) {
        if let SampleOutcome::Ignored = self.tracker.on_sample(sample) {
            return;
        }
        self.emit();
    }

    fn handle_error(&mut self, error: LocationError) {
        if self.tracker.on_error(error) {
            self.emit();
        }
    }

    fn handle_tick(&mut self) {
        let now = self.clock.now_millis();
        if let Tick::WaitingStarted = self.timer.tick(now, &mut self.tracker) {
            tracing::debug!("Showing waiting indicator");
        }
        self.emit();
    }

    /// Hand the current payload to the sink if it differs from the last one
    fn emit(&mut self) {
        let payload = self.tracker.display();
        if self.last_emitted.as_ref() == Some(&payload) {
            return;
        }
        self.sink.present(&payload);
        self.last_emitted = Some(payload);
    }
}
