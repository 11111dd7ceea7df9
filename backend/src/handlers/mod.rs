//! HTTP handlers for the Evacuation Map Platform

pub mod health;
pub mod zones;

pub use health::health_check;
pub use zones::{closest_zone, containing_zones, list_zones, zone_bounds};
