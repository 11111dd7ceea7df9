//! PostgREST client for hosted zone tables (e.g. Supabase)
//!
//! Calls the `nearby_zones` RPC for proximity queries and reads the
//! `evacuation_zones` table for the full listing.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared::{Coordinate, ZoneRecord};

use crate::error::{AppError, AppResult, SourceError};
use crate::services::ZoneSource;

/// PostgREST error code for an RPC that is not in the schema cache
const PGRST_FUNCTION_NOT_FOUND: &str = "PGRST202";
/// PostgreSQL `undefined_function`
const PG_UNDEFINED_FUNCTION: &str = "42883";

/// PostgREST API client
#[derive(Clone)]
pub struct PostgrestClient {
    client: Client,
    base_url: Url,
    api_key: String,
}

#[derive(Debug, Serialize)]
struct NearbyZonesParams {
    user_lat: f64,
    user_lng: f64,
    radius_km: f64,
}

/// Error body returned by PostgREST
#[derive(Debug, Deserialize)]
struct PostgrestErrorBody {
    code: Option<String>,
    message: Option<String>,
}

impl PostgrestClient {
    /// Create a client for the project at `base_url`
    pub fn new(base_url: &str, api_key: String, timeout: Duration) -> AppResult<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| AppError::Configuration(format!("Invalid zone source URL '{}': {}", base_url, e)))?;
        if api_key.trim().is_empty() {
            return Err(AppError::Configuration("Zone source API key is empty".to_string()));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url,
            api_key,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, SourceError> {
        self.base_url
            .join(path)
            .map_err(|e| SourceError::Query(format!("Invalid zone endpoint '{}': {}", path, e)))
    }

    async fn fetch(
        &self,
        request: RequestBuilder,
        on_error: fn(StatusCode, &str) -> SourceError,
    ) -> Result<Vec<ZoneRecord>, SourceError> {
        let response = request
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| SourceError::Query(format!("Zone request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(on_error(status, &body));
        }

        let rows = response
            .json::<Vec<Value>>()
            .await
            .map_err(|e| SourceError::Query(format!("Failed to parse zone response: {}", e)))?;

        Ok(decode_rows(rows))
    }
}

/// Decode each row on its own; rows without a usable identity are skipped
fn decode_rows(rows: Vec<Value>) -> Vec<ZoneRecord> {
    rows.into_iter()
        .enumerate()
        .filter_map(|(index, row)| match serde_json::from_value::<ZoneRecord>(row) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!("Skipping zone row {}: {}", index, e);
                None
            }
        })
        .collect()
}

#[async_trait]
impl ZoneSource for PostgrestClient {
    async fn nearby_zones(
        &self,
        center: Coordinate,
        radius_km: f64,
    ) -> Result<Vec<ZoneRecord>, SourceError> {
        let url = self.endpoint("rest/v1/rpc/nearby_zones")?;
        let params = NearbyZonesParams {
            user_lat: center.lat(),
            user_lng: center.lng(),
            radius_km,
        };

        self.fetch(self.client.post(url).json(&params), classify_error)
            .await
    }

    async fn active_zones(&self) -> Result<Vec<ZoneRecord>, SourceError> {
        let url = self.endpoint("rest/v1/evacuation_zones")?;
        let request = self.client.get(url).query(&[
            ("select", "*"),
            ("active", "eq.true"),
            ("order", "priority.asc"),
        ]);

        self.fetch(request, listing_error).await
    }

    fn name(&self) -> &'static str {
        "postgrest"
    }
}

/// Error code and message of a failed response
fn error_details(status: StatusCode, body: &str) -> (Option<String>, String) {
    let parsed = serde_json::from_str::<PostgrestErrorBody>(body).ok();
    let code = parsed.as_ref().and_then(|e| e.code.clone());
    let message = parsed
        .and_then(|e| e.message)
        .unwrap_or_else(|| format!("{} - {}", status, body));
    (code, message)
}

/// Map a failed listing response to a query failure
fn listing_error(status: StatusCode, body: &str) -> SourceError {
    SourceError::Query(error_details(status, body).1)
}

/// Map a failed proximity response to a source error.
///
/// A missing `nearby_zones` function is reported as
/// [`SourceError::CapabilityUnavailable`]; anything else is a query failure.
fn classify_error(status: StatusCode, body: &str) -> SourceError {
    let (code, message) = error_details(status, body);

    let lowered = message.to_lowercase();
    let missing_function = matches!(
        code.as_deref(),
        Some(PGRST_FUNCTION_NOT_FOUND) | Some(PG_UNDEFINED_FUNCTION)
    ) || (lowered.contains("function")
        && (lowered.contains("not found") || lowered.contains("could not find")));

    if missing_function {
        SourceError::CapabilityUnavailable(message)
    } else {
        SourceError::Query(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use shared::ZoneStatus;

    fn rest_row(id: &str, name: &str) -> Value {
        json!({
            "id": id,
            "name": name,
            "status": "available",
            "area_type": "polygon",
            "area_boundaries": [[14.60, 121.03], [14.60, 121.04], [14.61, 121.04]],
            "priority": 1,
            "active": true
        })
    }

    #[test]
    fn test_schema_cache_miss_is_capability_unavailable() {
        let body = r#"{"code":"PGRST202","details":null,"hint":null,"message":"Could not find the function public.nearby_zones(radius_km, user_lat, user_lng) in the schema cache"}"#;
        let err = classify_error(StatusCode::NOT_FOUND, body);
        assert!(matches!(err, SourceError::CapabilityUnavailable(_)));
    }

    #[test]
    fn test_undefined_function_code() {
        let body = r#"{"code":"42883","message":"function nearby_zones(double precision) does not exist"}"#;
        assert!(matches!(
            classify_error(StatusCode::NOT_FOUND, body),
            SourceError::CapabilityUnavailable(_)
        ));
    }

    #[test]
    fn test_message_only_function_not_found() {
        let body = r#"{"message":"Function nearby_zones not found"}"#;
        assert!(matches!(
            classify_error(StatusCode::BAD_REQUEST, body),
            SourceError::CapabilityUnavailable(_)
        ));
    }

    #[test]
    fn test_other_failures_are_query_errors() {
        let body = r#"{"code":"42P01","message":"relation \"public.evacuation_zones\" does not exist"}"#;
        assert_eq!(
            classify_error(StatusCode::NOT_FOUND, body),
            SourceError::Query("relation \"public.evacuation_zones\" does not exist".to_string())
        );

        let err = classify_error(StatusCode::BAD_GATEWAY, "upstream unavailable");
        assert_eq!(
            err,
            SourceError::Query("502 Bad Gateway - upstream unavailable".to_string())
        );
    }

    #[test]
    fn test_listing_errors_are_never_capability_errors() {
        let body = r#"{"code":"PGRST202","message":"Could not find the function public.nearby_zones in the schema cache"}"#;
        assert!(matches!(
            listing_error(StatusCode::NOT_FOUND, body),
            SourceError::Query(_)
        ));
        assert_eq!(
            listing_error(StatusCode::BAD_GATEWAY, "upstream unavailable"),
            SourceError::Query("502 Bad Gateway - upstream unavailable".to_string())
        );
    }

    #[test]
    fn test_bad_rows_do_not_sink_the_batch() {
        let mut no_area_type = rest_row("2d0c3f3e-1b7a-4f43-8d4c-6a1d9c0e2b02", "No Area Type");
        no_area_type["area_type"] = Value::Null;

        let mut text_radius = rest_row("2d0c3f3e-1b7a-4f43-8d4c-6a1d9c0e2b03", "Text Radius");
        text_radius["area_type"] = json!("circle");
        text_radius["area_radius"] = json!("150");
        text_radius["latitude"] = json!(14.6);
        text_radius["longitude"] = json!(121.0);
        text_radius["status"] = json!("Limited");

        let mut no_id = rest_row("2d0c3f3e-1b7a-4f43-8d4c-6a1d9c0e2b04", "No Id");
        no_id["id"] = Value::Null;

        let records = decode_rows(vec![
            rest_row("2d0c3f3e-1b7a-4f43-8d4c-6a1d9c0e2b01", "First"),
            no_area_type,
            text_radius,
            no_id,
            rest_row("2d0c3f3e-1b7a-4f43-8d4c-6a1d9c0e2b05", "Last"),
        ]);

        let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["First", "No Area Type", "Text Radius", "Last"]);
        assert!(records[1].parse_shape().is_err());
        assert!(records[2].parse_shape().is_ok());
        assert_eq!(records[2].status, ZoneStatus::Limited);
    }

    #[test]
    fn test_client_rejects_bad_configuration() {
        assert!(PostgrestClient::new("not a url", "key".to_string(), Duration::from_secs(5)).is_err());
        assert!(
            PostgrestClient::new("https://demo.supabase.co", "  ".to_string(), Duration::from_secs(5))
                .is_err()
        );
    }

    #[test]
    fn test_endpoints_join_base_url() {
        let client =
            PostgrestClient::new("https://demo.supabase.co", "key".to_string(), Duration::from_secs(5)).unwrap();
        assert_eq!(
            client.endpoint("rest/v1/rpc/nearby_zones").unwrap().as_str(),
            "https://demo.supabase.co/rest/v1/rpc/nearby_zones"
        );
    }
}
