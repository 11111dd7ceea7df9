//! PostgreSQL-backed zone source

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use shared::{Coordinate, ZoneRecord, ZoneStatus};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::SourceError;
use crate::services::zone_source::ZoneSource;

/// SQLSTATE for a call to a function that does not exist
const UNDEFINED_FUNCTION: &str = "42883";

const ZONE_COLUMNS: &str = r#"
    id, name, description, status, zone_type, area_type, area_boundaries,
    area_radius, latitude, longitude, priority, active, address, capacity,
    facilities, contact_number, created_at, updated_at
"#;

/// Zone source reading `evacuation_zones` directly
#[derive(Clone)]
pub struct PgZoneSource {
    db: PgPool,
}

/// Row of `evacuation_zones`
#[derive(Debug, Clone, FromRow)]
struct ZoneRow {
    id: Uuid,
    name: String,
    description: Option<String>,
    status: String,
    zone_type: Option<String>,
    area_type: String,
    area_boundaries: Option<Value>,
    area_radius: Option<f64>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    priority: i32,
    active: bool,
    address: Option<String>,
    capacity: Option<i32>,
    facilities: Option<Vec<String>>,
    contact_number: Option<String>,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
}

impl From<ZoneRow> for ZoneRecord {
    fn from(row: ZoneRow) -> Self {
        ZoneRecord {
            id: row.id,
            name: row.name,
            description: row.description,
            status: ZoneStatus::from(row.status.as_str()),
            zone_type: row.zone_type,
            area_type: Some(row.area_type),
            area_boundaries: row.area_boundaries.unwrap_or(Value::Null),
            area_radius: number(row.area_radius),
            latitude: number(row.latitude),
            longitude: number(row.longitude),
            priority: row.priority,
            active: row.active,
            address: row.address,
            capacity: row.capacity.map(i64::from),
            facilities: row.facilities,
            contact_number: row.contact_number,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

fn number(value: Option<f64>) -> Value {
    value.map(Value::from).unwrap_or(Value::Null)
}

impl PgZoneSource {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ZoneSource for PgZoneSource {
    async fn nearby_zones(
        &self,
        center: Coordinate,
        radius_km: f64,
    ) -> Result<Vec<ZoneRecord>, SourceError> {
        let query = format!("SELECT {} FROM nearby_zones($1, $2, $3)", ZONE_COLUMNS);
        let rows = sqlx::query_as::<_, ZoneRow>(&query)
            .bind(center.lat())
            .bind(center.lng())
            .bind(radius_km)
            .fetch_all(&self.db)
            .await
            .map_err(classify_error)?;

        Ok(rows.into_iter().map(ZoneRecord::from).collect())
    }

    async fn active_zones(&self) -> Result<Vec<ZoneRecord>, SourceError> {
        let query = format!(
            "SELECT {} FROM evacuation_zones WHERE active = true ORDER BY priority ASC",
            ZONE_COLUMNS
        );
        let rows = sqlx::query_as::<_, ZoneRow>(&query)
            .fetch_all(&self.db)
            .await
            .map_err(|e| SourceError::Query(e.to_string()))?;

        Ok(rows.into_iter().map(ZoneRecord::from).collect())
    }

    fn name(&self) -> &'static str {
        "postgres"
    }
}

/// Only the proximity query can be missing; listing errors are always query failures
fn classify_error(err: sqlx::Error) -> SourceError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some(UNDEFINED_FUNCTION) => {
            SourceError::CapabilityUnavailable(db_err.message().to_string())
        }
        _ => SourceError::Query(err.to_string()),
    }
}
