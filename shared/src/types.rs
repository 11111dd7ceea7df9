//! Common types used across the platform

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::validation::is_valid_coordinate;

/// Errors raised by the geometry functions
#[derive(Debug, Clone, Error, PartialEq)]
pub enum GeoError {
    #[error("invalid coordinate: lat={lat}, lng={lng}")]
    InvalidCoordinate { lat: f64, lng: f64 },

    #[error("polygon has no vertices")]
    EmptyPolygon,
}

/// A WGS84 position in decimal degrees.
///
/// Always finite and within range: the only ways to obtain one are
/// [`Coordinate::new`] and deserialization, both of which validate.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(try_from = "RawCoordinate")]
pub struct Coordinate {
    lat: f64,
    lng: f64,
}

#[derive(Deserialize)]
struct RawCoordinate {
    lat: f64,
    lng: f64,
}

impl TryFrom<RawCoordinate> for Coordinate {
    type Error = GeoError;

    fn try_from(raw: RawCoordinate) -> Result<Self, Self::Error> {
        Coordinate::new(raw.lat, raw.lng)
    }
}

impl Coordinate {
    pub fn new(lat: f64, lng: f64) -> Result<Self, GeoError> {
        if !is_valid_coordinate(lat, lng) {
            return Err(GeoError::InvalidCoordinate { lat, lng });
        }
        Ok(Self { lat, lng })
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lng(&self) -> f64 {
        self.lng
    }

    /// `[lat, lng]`, the pair order used by stored zone boundaries
    pub fn to_pair(self) -> [f64; 2] {
        [self.lat, self.lng]
    }
}

impl TryFrom<[f64; 2]> for Coordinate {
    type Error = GeoError;

    fn try_from([lat, lng]: [f64; 2]) -> Result<Self, Self::Error> {
        Coordinate::new(lat, lng)
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lng)
    }
}

/// Metro Manila, the map's initial view before a location fix arrives
pub const DEFAULT_CENTER: Coordinate = Coordinate {
    lat: 14.5995,
    lng: 120.9842,
};

/// Bounding box over a set of zones
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Bounds {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
    pub center: Coordinate,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinate_rejects_out_of_range() {
        assert!(Coordinate::new(91.0, 0.0).is_err());
        assert!(Coordinate::new(0.0, -180.5).is_err());
        assert!(Coordinate::new(f64::NAN, 0.0).is_err());
        assert!(Coordinate::new(0.0, f64::INFINITY).is_err());
        assert!(Coordinate::new(-90.0, 180.0).is_ok());
    }

    #[test]
    fn test_coordinate_deserialize_validates() {
        let ok: Coordinate = serde_json::from_str(r#"{"lat": 14.5, "lng": 121.0}"#).unwrap();
        assert_eq!(ok.lat(), 14.5);
        assert_eq!(ok.lng(), 121.0);

        let bad = serde_json::from_str::<Coordinate>(r#"{"lat": 120.0, "lng": 14.5}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn test_default_center_is_valid() {
        assert!(is_valid_coordinate(DEFAULT_CENTER.lat(), DEFAULT_CENTER.lng()));
    }
}
