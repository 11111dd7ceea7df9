//! Zone repository: proximity query with fallback to the full listing

use std::sync::Arc;

use shared::{Coordinate, FallbackReason, FetchTier, Zone, ZoneLoadState, ZoneRecord};
use tokio_util::sync::CancellationToken;

use crate::error::SourceError;
use crate::services::zone_source::ZoneSource;

/// Search radius handed to the store's proximity query
pub const PROXIMITY_RADIUS_KM: f64 = 50.0;

/// Outcome of one fetch
#[derive(Debug, Clone, PartialEq)]
pub enum ZoneFetch {
    Served { zones: Vec<Zone>, tier: FetchTier },
    Failed { message: String },
}

impl ZoneFetch {
    pub fn zones(&self) -> &[Zone] {
        match self {
            ZoneFetch::Served { zones, .. } => zones,
            ZoneFetch::Failed { .. } => &[],
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ZoneFetch::Failed { message } => Some(message),
            ZoneFetch::Served { .. } => None,
        }
    }

    pub fn into_load_state(self) -> ZoneLoadState {
        match self {
            ZoneFetch::Served { zones, tier } => ZoneLoadState::Loaded { zones, tier },
            ZoneFetch::Failed { message } => ZoneLoadState::Failed { message },
        }
    }
}

/// Loads evacuation zones from a [`ZoneSource`]
#[derive(Clone)]
pub struct ZoneRepository {
    source: Arc<dyn ZoneSource>,
}

impl ZoneRepository {
    pub fn new(source: Arc<dyn ZoneSource>) -> Self {
        Self { source }
    }

    pub fn source_name(&self) -> &'static str {
        self.source.name()
    }

    /// Fetch the zones relevant to `user_location`.
    ///
    /// With a location the store's proximity query is tried first. If it is
    /// missing or fails, the full active listing is served instead. Without a
    /// location only the listing is queried. Failures never escape as errors;
    /// they become [`ZoneFetch::Failed`].
    pub async fn fetch_zones(&self, user_location: Option<Coordinate>) -> ZoneFetch {
        let fallback = match user_location {
            Some(center) => match self.source.nearby_zones(center, PROXIMITY_RADIUS_KM).await {
                Ok(records) => {
                    let zones = ingest(records);
                    tracing::debug!(count = zones.len(), %center, "Served nearby zones");
                    return ZoneFetch::Served {
                        zones,
                        tier: FetchTier::Nearby,
                    };
                }
                Err(SourceError::CapabilityUnavailable(message)) => {
                    tracing::warn!(
                        source = self.source.name(),
                        "Proximity query unavailable, falling back to full listing: {}",
                        message
                    );
                    Some(FallbackReason::CapabilityUnavailable)
                }
                Err(SourceError::Query(message)) => {
                    tracing::warn!(
                        source = self.source.name(),
                        "Proximity query failed, falling back to full listing: {}",
                        message
                    );
                    Some(FallbackReason::TransientFailure { message })
                }
            },
            None => None,
        };

        match self.source.active_zones().await {
            Ok(records) => {
                let mut zones = ingest(records);
                // Stable, so equal priorities keep retrieval order
                zones.sort_by_key(|zone| zone.priority);
                tracing::debug!(count = zones.len(), "Served zone listing");
                ZoneFetch::Served {
                    zones,
                    tier: fallback.map_or(FetchTier::Listing, FetchTier::Fallback),
                }
            }
            Err(err) => {
                tracing::error!(source = self.source.name(), "Zone listing failed: {}", err);
                ZoneFetch::Failed {
                    message: err.to_string(),
                }
            }
        }
    }

    /// Like [`fetch_zones`](Self::fetch_zones), but gives up with `None` once
    /// `cancel` fires. A superseded fetch must not publish its result.
    pub async fn fetch_zones_until(
        &self,
        user_location: Option<Coordinate>,
        cancel: &CancellationToken,
    ) -> Option<ZoneFetch> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::debug!("Zone fetch cancelled");
                None
            }
            fetch = self.fetch_zones(user_location) => Some(fetch),
        }
    }
}

/// Drop inactive rows and type the geometry of the rest.
///
/// A zone whose geometry does not validate is kept without a shape.
fn ingest(records: Vec<ZoneRecord>) -> Vec<Zone> {
    records
        .into_iter()
        .filter(|record| record.active)
        .map(|record| {
            let shape = match record.parse_shape() {
                Ok(shape) => Some(shape),
                Err(err) => {
                    tracing::warn!(zone_id = %record.id, zone = %record.name, "Invalid zone geometry: {}", err);
                    None
                }
            };
            record.into_zone(shape)
        })
        .collect()
}
