//! Replays a fixed sequence of fixes on a timer.
//!
//! Each subscription gets its own task that walks the script from the start,
//! sleeping `delay` before each entry. Positions are stamped with the
//! source's clock at the moment they are delivered.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::clock::Clock;
use crate::models::coordinate::Coordinate;
use crate::models::types::{LocationError, LocationEvent, Sample};
use crate::source::{LocationSource, Subscription, SubscriptionId, SubscriptionOptions};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Fix {
    Position(Coordinate),
    Failure(LocationError),
}

/// One script entry, delivered `delay` after the previous one
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScriptedFix {
    pub delay: Duration,
    pub fix: Fix,
}

impl ScriptedFix {
    pub fn position(delay: Duration, coordinate: Coordinate) -> Self {
        Self {
            delay,
            fix: Fix::Position(coordinate),
        }
    }

    pub fn failure(delay: Duration, error: LocationError) -> Self {
        Self {
            delay,
            fix: Fix::Failure(error),
        }
    }
}

pub struct ScriptedSource {
    script: Arc<[ScriptedFix]>,
    clock: Arc<dyn Clock>,
    tasks: Mutex<HashMap<SubscriptionId, JoinHandle<()>>>,
}

impl ScriptedSource {
    pub fn new(script: Vec<ScriptedFix>, clock: Arc<dyn Clock>) -> Self {
        Self {
            script: script.into(),
            clock,
            tasks: Mutex::new(HashMap::new()),
        }
    }

    /// Number of subscriptions whose replay task is still registered
    pub fn active_subscriptions(&self) -> usize {
        let tasks = self.tasks.lock().unwrap_or_else(PoisonError::into_inner);
        tasks.values().filter(|task| !task.is_finished()).count()
    }
}

async fn replay(
    script: Arc<[ScriptedFix]>,
    clock: Arc<dyn Clock>,
    sink: mpsc::Sender<LocationEvent>,
    options: SubscriptionOptions,
    id: SubscriptionId,
) {
    let first_fix_deadline = Duration::from_millis(options.timeout_millis);

    for (index, entry) in script.iter().enumerate() {
        // The request timeout only bounds acquisition of the first fix
        if index == 0 && entry.delay > first_fix_deadline {
            tokio::time::sleep(first_fix_deadline).await;
            tracing::debug!(%id, "No first fix within {}ms", options.timeout_millis);
            let _ = sink.send(LocationEvent::Error(LocationError::Timeout)).await;
            return;
        }

        tokio::time::sleep(entry.delay).await;

        let event = match entry.fix {
            Fix::Position(coordinate) => {
                LocationEvent::Sample(Sample::new(coordinate, clock.now_millis()))
            }
            Fix::Failure(error) => LocationEvent::Error(error),
        };

        if sink.send(event).await.is_err() {
            tracing::debug!(%id, "Subscriber went away, ending replay");
            return;
        }

        if let LocationEvent::Error(error) = event {
            tracing::debug!(%id, %error, "Replay ended with an error");
            return;
        }
    }

    tracing::debug!(%id, "Replay finished");
}

impl LocationSource for ScriptedSource {
    fn subscribe(
        &self,
        sink: mpsc::Sender<LocationEvent>,
        options: SubscriptionOptions,
    ) -> Result<Subscription, LocationError> {
        let id = SubscriptionId::next();
        tracing::debug!(
            %id,
            fixes = self.script.len(),
            high_accuracy = options.high_accuracy,
            "Starting scripted replay"
        );

        let task = tokio::spawn(replay(
            Arc::clone(&self.script),
            Arc::clone(&self.clock),
            sink,
            options,
            id,
        ));

        self.tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, task);

        Ok(Subscription::new(id))
    }

    fn unsubscribe(&self, subscription: &Subscription) {
        let task = self
            .tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&subscription.id());

        if let Some(task) = task {
            tracing::debug!(id = %subscription.id(), "Unsubscribed");
            task.abort();
        }
    }
}

impl Drop for ScriptedSource {
    fn drop(&mut self) {
        let tasks = self.tasks.get_mut().unwrap_or_else(PoisonError::into_inner);
        for (_, task) in tasks.drain() {
            task.abort();
        }
    }
}
