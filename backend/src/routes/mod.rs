//! Route definitions for the Evacuation Map Platform

use axum::{routing::get, Router};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/zones", zone_routes())
}

/// Zone routes (public, read-only)
fn zone_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_zones))
        .route("/closest", get(handlers::closest_zone))
        .route("/containing", get(handlers::containing_zones))
        .route("/bounds", get(handlers::zone_bounds))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::Value;
    use tokio_util::sync::CancellationToken;
    use tower::ServiceExt;

    use super::*;
    use crate::error::SourceError;
    use crate::services::zone_source::testing::{polygon_zone, StaticZoneSource};
    use crate::services::ZoneRepository;
    use crate::Config;

    fn app(source: StaticZoneSource) -> (Router, CancellationToken) {
        let shutdown = CancellationToken::new();
        let state = AppState {
            repository: Arc::new(ZoneRepository::new(Arc::new(source))),
            config: Arc::new(Config::default()),
            shutdown: shutdown.clone(),
        };
        (Router::new().nest("/api/v1", api_routes()).with_state(state), shutdown)
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn shelters() -> StaticZoneSource {
        StaticZoneSource::new(
            Ok(vec![
                polygon_zone("Far", 14.70, 121.10, 1),
                polygon_zone("Near", 14.60, 120.99, 2),
            ]),
            Ok(vec![polygon_zone("Listed", 14.65, 121.05, 1)]),
        )
    }

    #[tokio::test]
    async fn test_list_zones_with_location() {
        let (app, _) = app(shelters());
        let (status, body) = get_json(app, "/api/v1/zones?lat=14.5995&lng=120.9842").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "loaded");
        assert_eq!(body["tier"], "nearby");
        assert_eq!(body["zones"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_list_zones_without_location_uses_listing() {
        let (app, _) = app(shelters());
        let (status, body) = get_json(app, "/api/v1/zones").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["tier"], "listing");
        assert_eq!(body["zones"][0]["name"], "Listed");
    }

    #[tokio::test]
    async fn test_partial_location_is_rejected() {
        let (app, _) = app(shelters());
        let (status, body) = get_json(app, "/api/v1/zones?lat=14.5").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "INVALID_COORDINATE");
    }

    #[tokio::test]
    async fn test_listing_failure_is_service_unavailable() {
        let source = StaticZoneSource::new(
            Err(SourceError::CapabilityUnavailable("missing".to_string())),
            Err(SourceError::Query("connection refused".to_string())),
        );
        let (app, _) = app(source);
        let (status, body) = get_json(app, "/api/v1/zones?lat=14.5&lng=121.0").await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"]["code"], "ZONE_LISTING_FAILED");
        assert_eq!(body["error"]["message"], "connection refused");
    }

    #[tokio::test]
    async fn test_closest_zone() {
        let (app, _) = app(shelters());
        let (status, body) = get_json(app, "/api/v1/zones/closest?lat=14.5995&lng=120.9842").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["closest"]["zone"]["name"], "Near");
        assert!(body["closest"]["distance_km"].as_f64().unwrap() < 1.0);
    }

    #[tokio::test]
    async fn test_closest_zone_requires_location() {
        let (app, _) = app(shelters());
        let (status, _) = get_json(app, "/api/v1/zones/closest").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_containing_zones() {
        let (app, _) = app(shelters());
        let (status, body) = get_json(app, "/api/v1/zones/containing?lat=14.601&lng=120.991").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["zones"].as_array().unwrap().len(), 1);
        assert_eq!(body["risk"], "safe");
        assert!(body["advisory"].as_str().unwrap().contains("safe area"));
    }

    #[tokio::test]
    async fn test_zone_bounds() {
        let (app, _) = app(shelters());
        let (status, body) = get_json(app, "/api/v1/zones/bounds").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["zone_count"], 1);
        assert!((body["bounds"]["north"].as_f64().unwrap() - 14.66).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_requests_after_shutdown_are_refused() {
        let (app, shutdown) = app(shelters());
        shutdown.cancel();
        let (status, body) = get_json(app, "/api/v1/zones").await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"]["code"], "SHUTTING_DOWN");
    }

    #[tokio::test]
    async fn test_health_reports_source() {
        let (app, _) = app(shelters());
        let (status, body) = get_json(app, "/api/v1/health").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["zone_source"], "static");
    }
}
