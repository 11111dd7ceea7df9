//! HTTP handlers for evacuation zone endpoints

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use shared::{
    closest_zone as find_closest_zone, format_distance, polygon_bounds, Bounds, Coordinate,
};

use crate::error::{AppError, AppResult};
use crate::models::{FetchTier, Zone, ZoneLoadState, ZoneRisk};
use crate::services::ZoneFetch;
use crate::AppState;

/// Optional user location; both parts or neither
#[derive(Debug, Default, Deserialize)]
pub struct LocationQuery {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

impl LocationQuery {
    pub fn coordinate(&self) -> AppResult<Option<Coordinate>> {
        match (self.lat, self.lng) {
            (None, None) => Ok(None),
            (Some(lat), Some(lng)) => Ok(Some(Coordinate::new(lat, lng)?)),
            _ => Err(AppError::InvalidCoordinate(
                "lat and lng must be given together".to_string(),
            )),
        }
    }

    pub fn require(&self) -> AppResult<Coordinate> {
        self.coordinate()?
            .ok_or_else(|| AppError::InvalidCoordinate("lat and lng are required".to_string()))
    }
}

/// Fetch zones for `location`, giving up when the server shuts down
async fn fetch_zones(state: &AppState, location: Option<Coordinate>) -> AppResult<ZoneFetch> {
    state
        .repository
        .fetch_zones_until(location, &state.shutdown)
        .await
        .ok_or(AppError::ShuttingDown)
}

async fn load_zones(
    state: &AppState,
    location: Option<Coordinate>,
) -> AppResult<(Vec<Zone>, FetchTier)> {
    match fetch_zones(state, location).await? {
        ZoneFetch::Served { zones, tier } => Ok((zones, tier)),
        ZoneFetch::Failed { message } => Err(AppError::ZoneListingFailed(message)),
    }
}

/// List zones near the user, or all active zones without a location
pub async fn list_zones(
    State(state): State<AppState>,
    Query(query): Query<LocationQuery>,
) -> AppResult<Json<ZoneLoadState>> {
    let location = query.coordinate()?;

    match fetch_zones(&state, location).await?.into_load_state() {
        ZoneLoadState::Failed { message } => Err(AppError::ZoneListingFailed(message)),
        loaded => Ok(Json(loaded)),
    }
}

#[derive(Debug, Serialize)]
pub struct ClosestZone {
    pub zone: Zone,
    pub distance_km: f64,
    pub distance_label: String,
}

#[derive(Debug, Serialize)]
pub struct ClosestZoneResponse {
    pub closest: Option<ClosestZone>,
    pub tier: FetchTier,
}

/// Nearest zone to the user, measured to each zone's anchor point
pub async fn closest_zone(
    State(state): State<AppState>,
    Query(query): Query<LocationQuery>,
) -> AppResult<Json<ClosestZoneResponse>> {
    let location = query.require()?;
    let (zones, tier) = load_zones(&state, Some(location)).await?;

    let closest = find_closest_zone(location, &zones).map(|found| ClosestZone {
        zone: found.zone.clone(),
        distance_km: found.distance_km,
        distance_label: format_distance(found.distance_km * 1000.0),
    });

    Ok(Json(ClosestZoneResponse { closest, tier }))
}

#[derive(Debug, Serialize)]
pub struct ContainingZonesResponse {
    pub zones: Vec<Zone>,
    /// Most urgent risk level among the containing zones
    pub risk: Option<ZoneRisk>,
    pub advisory: Option<&'static str>,
}

/// Zones whose geometry contains the user's location
pub async fn containing_zones(
    State(state): State<AppState>,
    Query(query): Query<LocationQuery>,
) -> AppResult<Json<ContainingZonesResponse>> {
    let location = query.require()?;
    let (zones, _) = load_zones(&state, Some(location)).await?;

    let zones: Vec<Zone> = zones.into_iter().filter(|zone| zone.contains(location)).collect();
    let risk = zones.iter().filter_map(|zone| zone.risk).min();

    Ok(Json(ContainingZonesResponse {
        zones,
        risk,
        advisory: risk.map(|r| r.advisory()),
    }))
}

#[derive(Debug, Serialize)]
pub struct BoundsResponse {
    pub bounds: Option<Bounds>,
    pub zone_count: usize,
}

/// Box enclosing every zone, for fitting the map viewport
pub async fn zone_bounds(
    State(state): State<AppState>,
    Query(query): Query<LocationQuery>,
) -> AppResult<Json<BoundsResponse>> {
    let location = query.coordinate()?;
    let (zones, _) = load_zones(&state, location).await?;

    Ok(Json(BoundsResponse {
        bounds: polygon_bounds(&zones),
        zone_count: zones.len(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_query_pairs() {
        let none = LocationQuery::default();
        assert!(none.coordinate().unwrap().is_none());
        assert!(none.require().is_err());

        let full = LocationQuery {
            lat: Some(14.6),
            lng: Some(121.0),
        };
        assert_eq!(
            full.coordinate().unwrap(),
            Some(Coordinate::new(14.6, 121.0).unwrap())
        );

        let partial = LocationQuery {
            lat: Some(14.6),
            lng: None,
        };
        assert!(matches!(partial.coordinate(), Err(AppError::InvalidCoordinate(_))));
    }

    #[test]
    fn test_location_query_rejects_out_of_range() {
        let query = LocationQuery {
            lat: Some(91.0),
            lng: Some(0.0),
        };
        assert!(matches!(query.coordinate(), Err(AppError::InvalidCoordinate(_))));
    }
}
