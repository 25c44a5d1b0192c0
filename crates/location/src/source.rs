//! The provider-facing subscription interface.
//!
//! A provider delivers positions continuously into a bounded channel until it
//! is unsubscribed or reports an error. The consumer owns the receiving end
//! and processes one event at a time.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::mpsc;

use crate::models::types::{LocationError, LocationEvent};

/// Request options forwarded to the provider
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SubscriptionOptions {
    pub high_accuracy: bool,

    /// How long the provider may take to produce the first fix
    pub timeout_millis: u64,

    /// Oldest cached fix the provider may hand back
    pub max_cached_age_millis: u64,
}

impl Default for SubscriptionOptions {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            timeout_millis: 10_000,
            max_cached_age_millis: 30_000,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

/// Handle returned by [`LocationSource::subscribe`]
#[derive(Debug, PartialEq, Eq)]
pub struct Subscription {
    id: SubscriptionId,
}

impl Subscription {
    pub fn new(id: SubscriptionId) -> Self {
        Self { id }
    }

    pub fn id(&self) -> SubscriptionId {
        self.id
    }
}

/// A continuous position provider.
///
/// Implementations push [`LocationEvent`]s into `sink`. After sending a
/// [`LocationEvent::Error`] a provider sends nothing more on that
/// subscription. A closed sink means the consumer went away and the provider
/// should wind the subscription down on its own.
pub trait LocationSource: Send + Sync {
    fn subscribe(
        &self,
        sink: mpsc::Sender<LocationEvent>,
        options: SubscriptionOptions,
    ) -> Result<Subscription, LocationError>;

    /// Stop delivery. Unknown or already-released handles are a no-op.
    fn unsubscribe(&self, subscription: &Subscription);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subscription_ids_are_unique() {
        let a = SubscriptionId::next();
        let b = SubscriptionId::next();
        assert_ne!(a, b);
    }

    #[test]
    fn test_default_options() {
        let options = SubscriptionOptions::default();
        assert!(options.high_accuracy);
        assert_eq!(options.timeout_millis, 10_000);
        assert_eq!(options.max_cached_age_millis, 30_000);
    }
}
