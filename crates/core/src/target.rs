//! Reading the target position from user input.
//!
//! Accepts plain numbers, a `"lat,lng"` pair, or a map share link in one of
//! these shapes (checked in this order):
//!
//! - `.../@52.5200,13.4050,15z`
//! - `...!3d52.5200!4d13.4050`
//! - `...?ll=52.5200,13.4050`
//!
//! Whatever comes out is range-checked through [`Coordinate::new`]. None of
//! this touches the tracker.

use std::sync::OnceLock;

use regex::Regex;
use warmer_location::{Coordinate, CoordinateError};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TargetError {
    #[error("Could not find coordinates in link")]
    NoCoordinates,

    #[error("Invalid number: {0:?}")]
    InvalidNumber(String),

    #[error(transparent)]
    Coordinate(#[from] CoordinateError),
}

fn at_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        // @lat,lng, followed by the zoom segment
        Regex::new(r"@(-?\d+\.?\d*),(-?\d+\.?\d*),").expect("valid regex")
    })
}

fn data_lat_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"!3d(-?\d+\.?\d*)").expect("valid regex"))
}

fn data_lng_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"!4d(-?\d+\.?\d*)").expect("valid regex"))
}

fn ll_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"ll=(-?\d+\.?\d*),(-?\d+\.?\d*)").expect("valid regex"))
}

pub fn parse_lat_lng(latitude: &str, longitude: &str) -> Result<Coordinate, TargetError> {
    let latitude = parse_number(latitude)?;
    let longitude = parse_number(longitude)?;
    Ok(Coordinate::new(latitude, longitude)?)
}

/// `"52.52, 13.405"`
pub fn parse_pair(input: &str) -> Result<Coordinate, TargetError> {
    let (latitude, longitude) = input
        .split_once(',')
        .ok_or_else(|| TargetError::InvalidNumber(input.trim().to_string()))?;
    parse_lat_lng(latitude, longitude)
}

pub fn parse_share_link(link: &str) -> Result<Coordinate, TargetError> {
    let link = link.trim();

    let (latitude, longitude) = extract_from_link(link).ok_or(TargetError::NoCoordinates)?;
    let coordinate = parse_lat_lng(latitude, longitude)?;

    tracing::debug!(%coordinate, "Extracted coordinates from link");
    Ok(coordinate)
}

/// A pair if the input looks like one, a share link otherwise
pub fn parse_target(input: &str) -> Result<Coordinate, TargetError> {
    let trimmed = input.trim();
    let looks_like_pair = trimmed
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '-' | '+' | '.' | ',' | ' '));

    if looks_like_pair {
        parse_pair(trimmed)
    } else {
        parse_share_link(trimmed)
    }
}

fn extract_from_link(link: &str) -> Option<(&str, &str)> {
    if let Some(captures) = at_pattern().captures(link) {
        return Some((captures.get(1)?.as_str(), captures.get(2)?.as_str()));
    }

    let latitude = data_lat_pattern().captures(link).and_then(|c| c.get(1));
    let longitude = data_lng_pattern().captures(link).and_then(|c| c.get(1));
    if let (Some(latitude), Some(longitude)) = (latitude, longitude) {
        return Some((latitude.as_str(), longitude.as_str()));
    }

    let captures = ll_pattern().captures(link)?;
    Some((captures.get(1)?.as_str(), captures.get(2)?.as_str()))
}

fn parse_number(value: &str) -> Result<f64, TargetError> {
    let value = value.trim();
    value
        .parse::<f64>()
        .map_err(|_| TargetError::InvalidNumber(value.to_string()))
}
