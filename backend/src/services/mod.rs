//! Business logic services for the Evacuation Map Platform

pub mod zone_repository;
pub mod zone_source;
pub mod zone_store;

pub use zone_repository::{ZoneFetch, ZoneRepository};
pub use zone_source::ZoneSource;
pub use zone_store::PgZoneSource;
