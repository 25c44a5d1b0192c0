//! Plain-text recorded tracks.
//!
//! One entry per line, delay in milliseconds since the previous entry:
//!
//! ```text
//! # walk to the fountain
//! 0,52.5200,13.4050
//! 15000,52.5203,13.4049
//! 15000,error,timeout
//! 15000,error,2
//! ```
//!
//! An error is named (`timeout`, `permission_denied`, ...) or given as a
//! numeric geolocation error code. Blank lines and lines starting with `#`
//! are skipped.

use std::time::Duration;

use crate::models::coordinate::{Coordinate, CoordinateError};
use crate::models::types::LocationError;
use crate::provider::scripted::ScriptedFix;

#[derive(Debug, thiserror::Error)]
pub enum TrackError {
    #[error("line {line}: expected 3 comma-separated fields, found {found}")]
    FieldCount { line: usize, found: usize },

    #[error("line {line}: invalid delay {value:?}")]
    InvalidDelay { line: usize, value: String },

    #[error("line {line}: invalid number {value:?}")]
    InvalidNumber { line: usize, value: String },

    #[error("line {line}: unknown error kind {value:?}")]
    UnknownErrorKind { line: usize, value: String },

    #[error("line {line}: {source}")]
    Coordinate {
        line: usize,
        #[source]
        source: CoordinateError,
    },
}

pub fn parse_track(input: &str) -> Result<Vec<ScriptedFix>, TrackError> {
    let mut fixes = Vec::new();

    for (index, raw) in input.lines().enumerate() {
        let line = index + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = trimmed.split(',').map(str::trim).collect();
        if fields.len() != 3 {
            return Err(TrackError::FieldCount {
                line,
                found: fields.len(),
            });
        }

        let delay = fields[0]
            .parse::<u64>()
            .map(Duration::from_millis)
            .map_err(|_| TrackError::InvalidDelay {
                line,
                value: fields[0].to_string(),
            })?;

        if fields[1] == "error" {
            let error = parse_error_kind(fields[2]).ok_or_else(|| TrackError::UnknownErrorKind {
                line,
                value: fields[2].to_string(),
            })?;
            fixes.push(ScriptedFix::failure(delay, error));
            continue;
        }

        let latitude = parse_number(fields[1], line)?;
        let longitude = parse_number(fields[2], line)?;
        let coordinate = Coordinate::new(latitude, longitude)
            .map_err(|source| TrackError::Coordinate { line, source })?;

        fixes.push(ScriptedFix::position(delay, coordinate));
    }

    Ok(fixes)
}

fn parse_error_kind(value: &str) -> Option<LocationError> {
    match value.parse::<u16>() {
        Ok(code) => Some(LocationError::from_code(code)),
        Err(_) => LocationError::from_name(value),
    }
}

fn parse_number(value: &str, line: usize) -> Result<f64, TrackError> {
    value.parse::<f64>().map_err(|_| TrackError::InvalidNumber {
        line,
        value: value.to_string(),
    })
}
