//! Stand-in for devices without any positioning hardware.

use tokio::sync::mpsc;

use crate::models::types::{LocationError, LocationEvent};
use crate::source::{LocationSource, Subscription, SubscriptionOptions};

#[derive(Clone, Copy, Debug, Default)]
pub struct UnsupportedSource;

impl LocationSource for UnsupportedSource {
    fn subscribe(
        &self,
        _sink: mpsc::Sender<LocationEvent>,
        _options: SubscriptionOptions,
    ) -> Result<Subscription, LocationError> {
        tracing::info!("Geolocation is not supported");
        Err(LocationError::Unsupported)
    }

    fn unsubscribe(&self, _subscription: &Subscription) {}
}
