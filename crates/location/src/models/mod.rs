//! Location data models, samples, and errors.

pub mod coordinate;
pub mod types;

// Re-exports for convenience
pub use coordinate::{Coordinate, CoordinateError};
pub use types::{LocationError, LocationEvent, Sample};
