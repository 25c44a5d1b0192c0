//! # warmer-location
//!
//! Position model and location providers for the warmer game.
//!
//! ## Features
//!
//! - **Validated coordinates**: out-of-range positions never reach the game
//! - **Channel-based subscriptions**: providers push [`LocationEvent`]s into a
//!   bounded tokio channel instead of invoking callbacks
//! - **Replayable tracks**: scripted providers for tests and recorded walks
//! - **Pluggable clocks**: wall clock for production, tokio-driven clock for
//!   paused-time tests
//!
//! ## Example
//!
//! ```
//! use warmer_location::prelude::*;
//!
//! let berlin = Coordinate::new(52.5200, 13.4050).unwrap();
//! assert_eq!(berlin.latitude(), 52.52);
//!
//! // Latitude outside [-90, 90] is rejected up front
//! assert!(Coordinate::new(91.0, 0.0).is_err());
//!
//! let point: geo::Point = berlin.into();
//! assert_eq!(point.x(), 13.4050);
//! ```

pub mod clock;
pub mod models;
pub mod provider;
pub mod source;

// Re-exports for convenience
pub mod prelude {
    pub use crate::clock::{Clock, SystemClock, TokioClock};
    pub use crate::models::{
        Coordinate, CoordinateError, LocationError, LocationEvent, Sample,
    };
    pub use crate::provider::{
        scripted::{Fix, ScriptedFix, ScriptedSource},
        track::{TrackError, parse_track},
        unsupported::UnsupportedSource,
    };
    pub use crate::source::{LocationSource, Subscription, SubscriptionId, SubscriptionOptions};
}

pub use prelude::*;
