//! # warmer-core
//!
//! The hot/cold game engine: distance to a fixed target, a cadence gate on
//! incoming positions, and the warmer/colder verdict between accepted
//! samples.

pub mod config;
pub mod display;
pub mod distance;
pub mod session;
pub mod target;
pub mod throttle;
pub mod timer;
pub mod tracker;
pub mod trend;

// Re-export location from the location crate
pub use warmer_location as location;

pub use config::SessionConfig;
pub use display::{DisplayPayload, DisplaySink, StatusText};
pub use session::{GameSession, SessionError};
pub use tracker::{Phase, PositionTracker};
