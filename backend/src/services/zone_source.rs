//! Data source abstraction for evacuation zone rows

use async_trait::async_trait;
use shared::{Coordinate, ZoneRecord};

use crate::error::SourceError;

/// A store that can list evacuation zones.
///
/// Implementations return rows in the order the store delivered them.
#[async_trait]
pub trait ZoneSource: Send + Sync {
    /// Zones within `radius_km` of `center`, as decided by the store
    async fn nearby_zones(
        &self,
        center: Coordinate,
        radius_km: f64,
    ) -> Result<Vec<ZoneRecord>, SourceError>;

    /// Every active zone, ascending by priority
    async fn active_zones(&self) -> Result<Vec<ZoneRecord>, SourceError>;

    /// Short name for logs and the health endpoint
    fn name(&self) -> &'static str;
}

#[cfg(test)]
pub(crate) mod testing {
    //! In-memory source used by repository and handler tests

    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    pub struct StaticZoneSource {
        pub nearby: Result<Vec<ZoneRecord>, SourceError>,
        pub listing: Result<Vec<ZoneRecord>, SourceError>,
        pub delay: Option<Duration>,
        pub nearby_calls: AtomicUsize,
        pub listing_calls: AtomicUsize,
        pub last_radius_km: Mutex<Option<f64>>,
    }

    impl StaticZoneSource {
        pub fn new(
            nearby: Result<Vec<ZoneRecord>, SourceError>,
            listing: Result<Vec<ZoneRecord>, SourceError>,
        ) -> Self {
            Self {
                nearby,
                listing,
                delay: None,
                nearby_calls: AtomicUsize::new(0),
                listing_calls: AtomicUsize::new(0),
                last_radius_km: Mutex::new(None),
            }
        }

        pub fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = Some(delay);
            self
        }

        pub fn nearby_calls(&self) -> usize {
            self.nearby_calls.load(Ordering::SeqCst)
        }

        pub fn listing_calls(&self) -> usize {
            self.listing_calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ZoneSource for StaticZoneSource {
        async fn nearby_zones(
            &self,
            _center: Coordinate,
            radius_km: f64,
        ) -> Result<Vec<ZoneRecord>, SourceError> {
            self.nearby_calls.fetch_add(1, Ordering::SeqCst);
            *self.last_radius_km.lock().unwrap() = Some(radius_km);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.nearby.clone()
        }

        async fn active_zones(&self) -> Result<Vec<ZoneRecord>, SourceError> {
            self.listing_calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.listing.clone()
        }

        fn name(&self) -> &'static str {
            "static"
        }
    }

    /// A polygon shelter around `(lat, lng)`
    pub fn polygon_zone(name: &str, lat: f64, lng: f64, priority: i32) -> ZoneRecord {
        serde_json::from_value(json!({
            "id": uuid::Uuid::new_v4(),
            "name": name,
            "status": "available",
            "zone_type": "safe",
            "area_type": "polygon",
            "area_boundaries": [
                [lat - 0.01, lng - 0.01],
                [lat - 0.01, lng + 0.01],
                [lat + 0.01, lng + 0.01],
                [lat + 0.01, lng - 0.01]
            ],
            "priority": priority,
            "active": true
        }))
        .unwrap()
    }
}
