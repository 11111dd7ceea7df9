//! Validation utilities for coordinates and zone geometry
//!
//! Zone geometry arrives from the data store in loosely typed form (the
//! boundary may be a JSON array or a JSON document stored as text). Everything
//! here turns that into typed values or a [`GeometryError`].

use serde_json::Value;
use thiserror::Error;

use crate::types::Coordinate;

/// Minimum number of vertices for a usable polygon
pub const MIN_POLYGON_POINTS: usize = 3;

/// Malformed zone geometry
#[derive(Debug, Clone, Error, PartialEq)]
pub enum GeometryError {
    #[error("zone has no boundary data")]
    MissingBoundary,

    #[error("boundary is not valid JSON: {0}")]
    MalformedBoundary(String),

    #[error("boundary point {index} is not a valid [lat, lng] pair")]
    InvalidBoundaryPoint { index: usize },

    #[error("polygon needs at least 3 points, got {0}")]
    TooFewPoints(usize),

    #[error("circle zone has no center")]
    MissingCenter,

    #[error("circle center is not a valid coordinate")]
    InvalidCenter,

    #[error("circle radius must be positive, got {0}")]
    InvalidRadius(f64),

    #[error("unknown area type: {0}")]
    UnknownAreaType(String),

    #[error("zone has no area type")]
    MissingAreaType,

    #[error("{field} is not a number")]
    MalformedNumber { field: &'static str },
}

// ============================================================================
// Coordinate Validations
// ============================================================================

/// Both values finite, latitude in [-90, 90], longitude in [-180, 180]
pub fn is_valid_coordinate(lat: f64, lng: f64) -> bool {
    lat.is_finite()
        && lng.is_finite()
        && (-90.0..=90.0).contains(&lat)
        && (-180.0..=180.0).contains(&lng)
}

// ============================================================================
// Zone Geometry Validations
// ============================================================================

/// Parse a polygon boundary from its stored form.
///
/// Accepts an array of `[lat, lng]` pairs, or a string holding the same
/// array serialized as JSON.
pub fn parse_boundary(raw: &Value) -> Result<Vec<Coordinate>, GeometryError> {
    let points = match raw {
        Value::Null => return Err(GeometryError::MissingBoundary),
        Value::String(text) => {
            let parsed: Value = serde_json::from_str(text)
                .map_err(|e| GeometryError::MalformedBoundary(e.to_string()))?;
            return match parsed {
                Value::String(_) => Err(GeometryError::MalformedBoundary(
                    "boundary text is doubly encoded".to_string(),
                )),
                other => parse_boundary(&other),
            };
        }
        Value::Array(points) => points,
        other => {
            return Err(GeometryError::MalformedBoundary(format!(
                "expected an array of points, got {}",
                other
            )))
        }
    };

    let boundary = points
        .iter()
        .enumerate()
        .map(|(index, point)| parse_point(point).ok_or(GeometryError::InvalidBoundaryPoint { index }))
        .collect::<Result<Vec<_>, _>>()?;

    if boundary.len() < MIN_POLYGON_POINTS {
        return Err(GeometryError::TooFewPoints(boundary.len()));
    }

    Ok(boundary)
}

fn parse_point(point: &Value) -> Option<Coordinate> {
    let pair = point.as_array()?;
    if pair.len() != 2 {
        return None;
    }
    let lat = pair[0].as_f64()?;
    let lng = pair[1].as_f64()?;
    Coordinate::new(lat, lng).ok()
}

/// Read an optional numeric column.
///
/// `null` is `None`; numbers and numeric text are accepted; anything else is
/// a [`GeometryError::MalformedNumber`] naming `field`.
pub fn parse_number(raw: &Value, field: &'static str) -> Result<Option<f64>, GeometryError> {
    match raw {
        Value::Null => Ok(None),
        Value::Number(n) => n.as_f64().map(Some).ok_or(GeometryError::MalformedNumber { field }),
        Value::String(text) => text
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| GeometryError::MalformedNumber { field }),
        _ => Err(GeometryError::MalformedNumber { field }),
    }
}

/// Validate a circle radius in meters
pub fn validate_radius(radius_m: f64) -> Result<f64, GeometryError> {
    if radius_m.is_finite() && radius_m > 0.0 {
        Ok(radius_m)
    } else {
        Err(GeometryError::InvalidRadius(radius_m))
    }
}
