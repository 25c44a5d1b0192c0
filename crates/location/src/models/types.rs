//! Samples, provider errors, and the events a subscription delivers.

use crate::models::coordinate::Coordinate;

// ============================================================================
// Data Structures
// ============================================================================

/// A single position fix reported by a provider.
///
/// `observed_at_millis` is Unix-epoch milliseconds, taken from the same
/// [`Clock`](crate::clock::Clock) the game uses for its display timer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sample {
    pub coordinate: Coordinate,
    pub observed_at_millis: i64,
}

impl Sample {
    pub fn new(coordinate: Coordinate, observed_at_millis: i64) -> Self {
        Self {
            coordinate,
            observed_at_millis,
        }
    }
}

/// What a live subscription pushes into its sink
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LocationEvent {
    Sample(Sample),
    Error(LocationError),
}

// ============================================================================
// Errors
// ============================================================================

/// Provider failures. Every variant is terminal for the subscription that
/// reported it; nothing in this crate retries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum LocationError {
    #[error("Location access denied by user")]
    PermissionDenied,

    #[error("Location information unavailable")]
    PositionUnavailable,

    #[error("Location request timed out")]
    Timeout,

    #[error("Unknown location error")]
    Unknown,

    /// Returned by `subscribe` on devices without any location capability
    #[error("Geolocation is not supported")]
    Unsupported,
}

impl LocationError {
    /// Map a W3C `GeolocationPositionError.code`
    pub fn from_code(code: u16) -> Self {
        match code {
            1 => Self::PermissionDenied,
            2 => Self::PositionUnavailable,
            3 => Self::Timeout,
            _ => Self::Unknown,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "permission_denied" => Some(Self::PermissionDenied),
            "position_unavailable" => Some(Self::PositionUnavailable),
            "timeout" => Some(Self::Timeout),
            "unknown" => Some(Self::Unknown),
            "unsupported" => Some(Self::Unsupported),
            _ => None,
        }
    }
}
