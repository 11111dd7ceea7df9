//! Geodesic helpers for zones and user locations
//!
//! Coordinates are `(lat, lng)` in decimal degrees. Distances are great-circle
//! distances on a spherical Earth; no planar shortcuts, since the map works at
//! the scale of tens of kilometers.

use serde::Serialize;

use crate::models::Zone;
use crate::types::{Bounds, Coordinate, GeoError};

/// Mean Earth radius used by the Haversine formula
pub const EARTH_RADIUS_KM: f64 = 6371.0;

pub fn to_radians(degrees: f64) -> f64 {
    degrees * (std::f64::consts::PI / 180.0)
}

pub fn to_degrees(radians: f64) -> f64 {
    radians * (180.0 / std::f64::consts::PI)
}

/// Great-circle distance between two coordinates in kilometers (Haversine)
pub fn distance(a: Coordinate, b: Coordinate) -> f64 {
    let d_lat = to_radians(b.lat() - a.lat());
    let d_lng = to_radians(b.lng() - a.lng());

    let h = (d_lat / 2.0).sin().powi(2)
        + to_radians(a.lat()).cos() * to_radians(b.lat()).cos() * (d_lng / 2.0).sin().powi(2);
    // Rounding can push h a hair outside [0, 1] for antipodal points
    let h = h.clamp(0.0, 1.0);

    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_KM * c
}

/// Ray-casting point-in-polygon test.
///
/// Casts a ray along the latitude line through `point` and counts edge
/// crossings; each edge is the pair `(i, i - 1)`, wrapping from the first
/// vertex back to the last. Polygons with fewer than three vertices contain
/// nothing. A point lying exactly on an edge may land on either side.
pub fn point_in_polygon(point: Coordinate, polygon: &[Coordinate]) -> bool {
    if polygon.len() < 3 {
        return false;
    }

    let x = point.lng();
    let y = point.lat();
    let mut inside = false;

    let mut j = polygon.len() - 1;
    for i in 0..polygon.len() {
        let (xi, yi) = (polygon[i].lng(), polygon[i].lat());
        let (xj, yj) = (polygon[j].lng(), polygon[j].lat());

        if (yi > y) != (yj > y) && x < (xj - xi) * (y - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }

    inside
}

/// Arithmetic mean of the polygon's vertices (not the area-weighted centroid).
///
/// Fails with [`GeoError::EmptyPolygon`] when there are no vertices.
pub fn polygon_centroid(polygon: &[Coordinate]) -> Result<Coordinate, GeoError> {
    if polygon.is_empty() {
        return Err(GeoError::EmptyPolygon);
    }

    let n = polygon.len() as f64;
    let (lat_sum, lng_sum) = polygon
        .iter()
        .fold((0.0, 0.0), |(lat, lng), p| (lat + p.lat(), lng + p.lng()));

    Coordinate::new(lat_sum / n, lng_sum / n)
}

/// Bounding box over every coordinate of every zone.
///
/// Polygon zones contribute their vertices, circle zones their center.
/// Returns `None` when no zone carries coordinates.
pub fn polygon_bounds(zones: &[Zone]) -> Option<Bounds> {
    let mut points = zones.iter().flat_map(|zone| zone.coordinates().iter());
    let first = points.next()?;

    let (mut south, mut north) = (first.lat(), first.lat());
    let (mut west, mut east) = (first.lng(), first.lng());

    for p in points {
        south = south.min(p.lat());
        north = north.max(p.lat());
        west = west.min(p.lng());
        east = east.max(p.lng());
    }

    let center = Coordinate::new((south + north) / 2.0, (west + east) / 2.0).ok()?;

    Some(Bounds {
        north,
        south,
        east,
        west,
        center,
    })
}

/// A zone paired with its distance from some location
#[derive(Debug, Clone, Serialize)]
pub struct ZoneDistance<'a> {
    pub zone: &'a Zone,
    pub distance_km: f64,
}

/// Closest zone to `location`, measured to each zone's anchor point.
///
/// Zones without usable geometry are skipped. Ties keep the zone that comes
/// first in `zones`.
pub fn closest_zone(location: Coordinate, zones: &[Zone]) -> Option<ZoneDistance<'_>> {
    let mut closest: Option<ZoneDistance<'_>> = None;

    for zone in zones {
        let Some(anchor) = zone.anchor() else {
            continue;
        };
        let distance_km = distance(location, anchor);

        if closest
            .as_ref()
            .map_or(true, |best| distance_km < best.distance_km)
        {
            closest = Some(ZoneDistance { zone, distance_km });
        }
    }

    closest
}
