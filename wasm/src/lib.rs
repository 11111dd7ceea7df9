//! WebAssembly module for the Evacuation Map Platform
//!
//! Provides client-side computation for:
//! - Distances and coordinate validation
//! - Point-in-polygon and centroid queries
//! - Map bounds and closest-shelter lookup
//! - Display formatting and status styling
//!
//! Structured inputs and outputs are passed as JSON strings.

use serde::Serialize;
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::types::*;

use shared::{closest_zone, distance, point_in_polygon, polygon_bounds, polygon_centroid};

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    web_sys::console::debug_1(&JsValue::from_str("evacuation map geometry loaded"));
}

/// Great-circle distance in kilometers
#[wasm_bindgen]
pub fn haversine_distance_km(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> Result<f64, JsValue> {
    distance_between(lat1, lng1, lat2, lng2).map_err(|e| JsValue::from_str(&e))
}

/// Whether `lat`/`lng` are finite and within range
#[wasm_bindgen]
pub fn is_valid_coordinates(lat: f64, lng: f64) -> bool {
    shared::is_valid_coordinate(lat, lng)
}

/// Whether the point lies inside `polygon_json` (`[[lat, lng], ...]`)
#[wasm_bindgen]
pub fn point_in_polygon_json(lat: f64, lng: f64, polygon_json: &str) -> Result<bool, JsValue> {
    contains_point(lat, lng, polygon_json).map_err(|e| JsValue::from_str(&e))
}

/// Vertex centroid of `polygon_json` as `{"lat": .., "lng": ..}`
#[wasm_bindgen]
pub fn polygon_centroid_json(polygon_json: &str) -> Result<String, JsValue> {
    centroid(polygon_json).map_err(|e| JsValue::from_str(&e))
}

/// Bounding box of a JSON array of zones, or `null` when nothing has geometry
#[wasm_bindgen]
pub fn map_bounds_json(zones_json: &str) -> Result<String, JsValue> {
    bounds(zones_json).map_err(|e| JsValue::from_str(&e))
}

/// Closest zone to the user as `{zone, distance_km, distance_label}`, or `null`
#[wasm_bindgen]
pub fn closest_zone_json(lat: f64, lng: f64, zones_json: &str) -> Result<String, JsValue> {
    closest(lat, lng, zones_json).map_err(|e| JsValue::from_str(&e))
}

#[wasm_bindgen]
pub fn format_distance(meters: f64) -> String {
    shared::format_distance(meters)
}

#[wasm_bindgen]
pub fn format_capacity(n: f64) -> String {
    shared::format_capacity(n)
}

/// Border and fill colors for a zone status; unknown statuses use `available`
#[wasm_bindgen]
pub fn status_style_json(status: &str) -> String {
    to_json(&ZoneStatus::from(status).style())
}

/// Label, description and color for a `zone_type`, or `null` when unknown
#[wasm_bindgen]
pub fn risk_info_json(zone_type: &str) -> String {
    to_json(&ZoneRisk::parse(zone_type).map(RiskInfo::from))
}

/// Emoji marker for a facility name
#[wasm_bindgen]
pub fn facility_icon(facility: &str) -> String {
    shared::facility_icon(facility).to_string()
}

#[derive(Serialize)]
struct RiskInfo {
    label: &'static str,
    description: &'static str,
    color: &'static str,
    priority: u8,
}

impl From<ZoneRisk> for RiskInfo {
    fn from(risk: ZoneRisk) -> Self {
        Self {
            label: risk.label(),
            description: risk.description(),
            color: risk.color(),
            priority: risk.priority(),
        }
    }
}

#[derive(Serialize)]
struct ClosestZone<'a> {
    zone: &'a Zone,
    distance_km: f64,
    distance_label: String,
}

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "null".to_string())
}

fn coordinate(lat: f64, lng: f64) -> Result<Coordinate, String> {
    Coordinate::new(lat, lng).map_err(|e| e.to_string())
}

fn parse_polygon(polygon_json: &str) -> Result<Vec<Coordinate>, String> {
    let pairs: Vec<[f64; 2]> =
        serde_json::from_str(polygon_json).map_err(|e| format!("Invalid polygon JSON: {}", e))?;

    pairs
        .into_iter()
        .map(|pair| Coordinate::try_from(pair).map_err(|e| e.to_string()))
        .collect()
}

fn parse_zones(zones_json: &str) -> Result<Vec<Zone>, String> {
    serde_json::from_str(zones_json).map_err(|e| format!("Invalid zones JSON: {}", e))
}

fn distance_between(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> Result<f64, String> {
    Ok(distance(coordinate(lat1, lng1)?, coordinate(lat2, lng2)?))
}

fn contains_point(lat: f64, lng: f64, polygon_json: &str) -> Result<bool, String> {
    let polygon = parse_polygon(polygon_json)?;
    Ok(point_in_polygon(coordinate(lat, lng)?, &polygon))
}

fn centroid(polygon_json: &str) -> Result<String, String> {
    let polygon = parse_polygon(polygon_json)?;
    let center = polygon_centroid(&polygon).map_err(|e| e.to_string())?;
    Ok(to_json(&center))
}

fn bounds(zones_json: &str) -> Result<String, String> {
    let zones = parse_zones(zones_json)?;
    Ok(to_json(&polygon_bounds(&zones)))
}

fn closest(lat: f64, lng: f64, zones_json: &str) -> Result<String, String> {
    let location = coordinate(lat, lng)?;
    let zones = parse_zones(zones_json)?;

    let found = closest_zone(location, &zones).map(|found| ClosestZone {
        zone: found.zone,
        distance_km: found.distance_km,
        distance_label: shared::format_distance(found.distance_km * 1000.0),
    });
    Ok(to_json(&found))
}
