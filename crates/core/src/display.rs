//! What the presentation layer gets to see.
//!
//! The tracker never renders anything itself. It builds a [`DisplayPayload`]
//! and the session hands it to a [`DisplaySink`] whenever it changes.

use serde::Serialize;
use tokio::sync::mpsc;
use warmer_location::LocationError;

use crate::trend::TrendState;

/// Shown as the distance before the first accepted sample
pub const NO_DISTANCE_TEXT: &str = "--";
pub const UNKNOWN_DISTANCE_TEXT: &str = "unknown";
pub const UNAVAILABLE_DISTANCE_TEXT: &str = "unavailable";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, strum::Display, strum::IntoStaticStr)]
pub enum StatusText {
    #[strum(serialize = "seeking")]
    #[serde(rename = "seeking")]
    Seeking,

    #[strum(serialize = "warmer")]
    #[serde(rename = "warmer")]
    Warmer,

    #[strum(serialize = "colder")]
    #[serde(rename = "colder")]
    Colder,

    #[strum(serialize = "steady")]
    #[serde(rename = "steady")]
    Steady,

    #[strum(serialize = "no signal")]
    #[serde(rename = "no signal")]
    NoSignal,

    #[strum(serialize = "no gps")]
    #[serde(rename = "no gps")]
    NoGps,

    #[strum(serialize = "unavailable")]
    #[serde(rename = "unavailable")]
    Unavailable,
}

impl From<TrendState> for StatusText {
    fn from(trend: TrendState) -> Self {
        match trend {
            TrendState::Initial => StatusText::Seeking,
            TrendState::Closer => StatusText::Warmer,
            TrendState::Farther => StatusText::Colder,
            TrendState::Same => StatusText::Steady,
        }
    }
}

impl From<LocationError> for StatusText {
    fn from(error: LocationError) -> Self {
        match error {
            LocationError::Unsupported => StatusText::NoGps,
            LocationError::PositionUnavailable => StatusText::Unavailable,
            LocationError::PermissionDenied | LocationError::Timeout | LocationError::Unknown => {
                StatusText::NoSignal
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DisplayPayload {
    pub distance_text: String,
    pub status: StatusText,
    pub countdown: u32,
    pub show_waiting_indicator: bool,

    /// Set once the location source has failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fault: Option<LocationError>,
}

/// "1.23 km" from 1000 m up, whole meters below
pub fn format_distance(meters: f64) -> String {
    if meters >= 1000.0 {
        format!("{:.2} km", meters / 1000.0)
    } else {
        format!("{:.0} m", meters.round())
    }
}

/// Receives every payload the session emits
pub trait DisplaySink: Send {
    fn present(&mut self, payload: &DisplayPayload);
}

impl DisplaySink for mpsc::UnboundedSender<DisplayPayload> {
    fn present(&mut self, payload: &DisplayPayload) {
        if self.send(payload.clone()).is_err() {
            tracing::debug!("Display receiver dropped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_distance() {
        assert_eq!(format_distance(0.0), "0 m");
        assert_eq!(format_distance(842.4), "842 m");
        assert_eq!(format_distance(842.5), "843 m");
        assert_eq!(format_distance(999.4), "999 m");
        assert_eq!(format_distance(1000.0), "1.00 km");
        assert_eq!(format_distance(1234.0), "1.23 km");
        assert_eq!(format_distance(2500.0), "2.50 km");
    }

    #[test]
    fn test_status_text() {
        assert_eq!(StatusText::from(TrendState::Initial).to_string(), "seeking");
        assert_eq!(StatusText::from(TrendState::Closer).to_string(), "warmer");
        assert_eq!(StatusText::from(TrendState::Farther).to_string(), "colder");
        assert_eq!(StatusText::from(TrendState::Same).to_string(), "steady");

        let text: &'static str = StatusText::NoSignal.into();
        assert_eq!(text, "no signal");
    }

    #[test]
    fn test_error_status() {
        assert_eq!(StatusText::from(LocationError::Unsupported), StatusText::NoGps);
        assert_eq!(
            StatusText::from(LocationError::PositionUnavailable),
            StatusText::Unavailable
        );
        assert_eq!(StatusText::from(LocationError::Timeout), StatusText::NoSignal);
    }

    #[test]
    fn test_payload_json() {
        let payload = DisplayPayload {
            distance_text: "842 m".into(),
            status: StatusText::Warmer,
            countdown: 15,
            show_waiting_indicator: false,
            fault: None,
        };
        let json = serde_json::to_string(&payload).unwrap();
        assert_eq!(
            json,
            r#"{"distance_text":"842 m","status":"warmer","countdown":15,"show_waiting_indicator":false}"#
        );

        let faulted = DisplayPayload {
            fault: Some(LocationError::PermissionDenied),
            status: StatusText::NoSignal,
            ..payload
        };
        let json = serde_json::to_string(&faulted).unwrap();
        assert!(json.contains(r#""status":"no signal""#));
        assert!(json.contains(r#""fault":"permission_denied""#));
    }
}
