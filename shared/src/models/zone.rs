//! Evacuation zone models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::format::format_distance;
use crate::geo::{distance, point_in_polygon, polygon_centroid};
use crate::models::ZoneRisk;
use crate::types::Coordinate;
use crate::validation::{parse_boundary, parse_number, validate_radius, GeometryError};

/// Radius applied to circle zones stored without one
pub const DEFAULT_CIRCLE_RADIUS_M: f64 = 100.0;

/// Occupancy status of a shelter, or activation status of a risk zone.
///
/// Parsing is case-insensitive; `null` and unrecognized values are `Unknown`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase", from = "Option<String>")]
pub enum ZoneStatus {
    #[default]
    Available,
    Limited,
    Full,
    Active,
    Inactive,
    Unknown,
}

/// Map styling for a zone status
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct StatusStyle {
    pub border: &'static str,
    pub fill: &'static str,
    pub opacity: f64,
}

impl ZoneStatus {
    /// Fill and border colors; statuses without a palette use the `available` one
    pub fn style(&self) -> StatusStyle {
        match self {
            ZoneStatus::Limited => StatusStyle {
                border: "#f59e0b",
                fill: "#f59e0b",
                opacity: 0.3,
            },
            ZoneStatus::Full => StatusStyle {
                border: "#ef4444",
                fill: "#ef4444",
                opacity: 0.3,
            },
            _ => StatusStyle {
                border: "#10b981",
                fill: "#10b981",
                opacity: 0.2,
            },
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ZoneStatus::Available => "Available",
            ZoneStatus::Limited => "Limited",
            ZoneStatus::Full => "Full",
            ZoneStatus::Active => "Active",
            ZoneStatus::Inactive => "Inactive",
            ZoneStatus::Unknown => "Unknown",
        }
    }
}

impl From<&str> for ZoneStatus {
    fn from(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "available" => ZoneStatus::Available,
            "limited" => ZoneStatus::Limited,
            "full" => ZoneStatus::Full,
            "active" => ZoneStatus::Active,
            "inactive" => ZoneStatus::Inactive,
            _ => ZoneStatus::Unknown,
        }
    }
}

impl From<Option<String>> for ZoneStatus {
    fn from(value: Option<String>) -> Self {
        match value {
            Some(status) => ZoneStatus::from(status.as_str()),
            None => ZoneStatus::Unknown,
        }
    }
}

impl std::fmt::Display for ZoneStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A zone row as delivered by the data store.
///
/// Only `id`, `name` and `active` must be well typed for a row to decode.
/// Geometry is still in its stored form here; [`ZoneRecord::parse_shape`]
/// validates it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZoneRecord {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub status: ZoneStatus,
    pub zone_type: Option<String>,
    /// `circle` or `polygon`
    #[serde(default)]
    pub area_type: Option<String>,
    /// Polygon vertices as `[[lat, lng], ...]`, either as JSON or as JSON text
    #[serde(default)]
    pub area_boundaries: Value,
    /// Circle radius in meters
    #[serde(default)]
    pub area_radius: Value,
    /// Circle center latitude
    #[serde(default)]
    pub latitude: Value,
    /// Circle center longitude
    #[serde(default)]
    pub longitude: Value,
    #[serde(default)]
    pub priority: i32,
    pub active: bool,
    pub address: Option<String>,
    pub capacity: Option<i64>,
    pub facilities: Option<Vec<String>>,
    pub contact_number: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl ZoneRecord {
    /// Validate the stored geometry into a typed shape
    pub fn parse_shape(&self) -> Result<ZoneShape, GeometryError> {
        let area_type = self.area_type.as_deref().ok_or(GeometryError::MissingAreaType)?;

        match area_type.trim().to_ascii_lowercase().as_str() {
            "circle" => {
                let lat = parse_number(&self.latitude, "latitude")?;
                let lng = parse_number(&self.longitude, "longitude")?;
                let (lat, lng) = lat.zip(lng).ok_or(GeometryError::MissingCenter)?;
                let center = Coordinate::new(lat, lng).map_err(|_| GeometryError::InvalidCenter)?;
                let radius_m = parse_number(&self.area_radius, "area_radius")?;
                let radius_m = validate_radius(radius_m.unwrap_or(DEFAULT_CIRCLE_RADIUS_M))?;
                Ok(ZoneShape::Circle { center, radius_m })
            }
            "polygon" => Ok(ZoneShape::Polygon {
                boundary: parse_boundary(&self.area_boundaries)?,
            }),
            other => Err(GeometryError::UnknownAreaType(other.to_string())),
        }
    }

    /// Build the typed zone; `shape` is `None` when the geometry was unusable
    pub fn into_zone(self, shape: Option<ZoneShape>) -> Zone {
        let risk = self.zone_type.as_deref().and_then(ZoneRisk::parse);

        Zone {
            id: self.id,
            name: self.name,
            status: self.status,
            priority: self.priority,
            active: self.active,
            risk,
            shape,
            details: ZoneDetails {
                description: self.description,
                address: self.address,
                capacity: self.capacity,
                facilities: self.facilities.unwrap_or_default(),
                contact_number: self.contact_number,
            },
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Geometry of a zone
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "area_type", rename_all = "snake_case")]
pub enum ZoneShape {
    Circle { center: Coordinate, radius_m: f64 },
    Polygon { boundary: Vec<Coordinate> },
}

impl ZoneShape {
    /// Every coordinate the shape is defined by
    pub fn coordinates(&self) -> &[Coordinate] {
        match self {
            ZoneShape::Circle { center, .. } => std::slice::from_ref(center),
            ZoneShape::Polygon { boundary } => boundary,
        }
    }

    /// Marker position: the circle center or the polygon's vertex centroid
    pub fn anchor(&self) -> Option<Coordinate> {
        match self {
            ZoneShape::Circle { center, .. } => Some(*center),
            ZoneShape::Polygon { boundary } => polygon_centroid(boundary).ok(),
        }
    }

    pub fn contains(&self, point: Coordinate) -> bool {
        match self {
            ZoneShape::Circle { center, radius_m } => distance(*center, point) * 1000.0 <= *radius_m,
            ZoneShape::Polygon { boundary } => point_in_polygon(point, boundary),
        }
    }
}

/// Descriptive fields shown in the zone info card
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ZoneDetails {
    pub description: Option<String>,
    pub address: Option<String>,
    pub capacity: Option<i64>,
    #[serde(default)]
    pub facilities: Vec<String>,
    pub contact_number: Option<String>,
}

/// An evacuation zone ready for display and geometry queries
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Zone {
    pub id: Uuid,
    pub name: String,
    pub status: ZoneStatus,
    pub priority: i32,
    pub active: bool,
    pub risk: Option<ZoneRisk>,
    pub shape: Option<ZoneShape>,
    #[serde(flatten)]
    pub details: ZoneDetails,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Zone {
    /// Active zone with a fresh id, priority 0 and no details
    pub fn new(name: impl Into<String>, status: ZoneStatus, shape: Option<ZoneShape>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            status,
            priority: 0,
            active: true,
            risk: None,
            shape,
            details: ZoneDetails::default(),
            created_at: None,
            updated_at: None,
        }
    }

    pub fn coordinates(&self) -> &[Coordinate] {
        match &self.shape {
            Some(shape) => shape.coordinates(),
            None => &[],
        }
    }

    pub fn anchor(&self) -> Option<Coordinate> {
        self.shape.as_ref().and_then(ZoneShape::anchor)
    }

    /// Whether `point` lies inside the zone; shapeless zones contain nothing
    pub fn contains(&self, point: Coordinate) -> bool {
        self.shape.as_ref().is_some_and(|shape| shape.contains(point))
    }

    /// Distance in kilometers from `from` to the zone's anchor
    pub fn distance_km(&self, from: Coordinate) -> Option<f64> {
        self.anchor().map(|anchor| distance(from, anchor))
    }

    /// Human-readable distance, e.g. `"2.3 km"`
    pub fn distance_label(&self, from: Coordinate) -> Option<String> {
        self.distance_km(from).map(|km| format_distance(km * 1000.0))
    }
}
