//! Zone loading state as seen by the map UI

use serde::{Deserialize, Serialize};

use crate::models::Zone;

/// Why the proximity query was abandoned for the full listing
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FallbackReason {
    /// The store has no proximity query
    CapabilityUnavailable,
    /// The proximity query failed for any other reason
    TransientFailure { message: String },
}

/// Which query produced a zone list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FetchTier {
    /// Server-side proximity filter around the user
    Nearby,
    /// Full listing, no location was given
    Listing,
    /// Full listing after the proximity query was abandoned
    Fallback(FallbackReason),
}

impl FetchTier {
    pub fn used_fallback(&self) -> bool {
        matches!(self, FetchTier::Fallback(_))
    }
}

/// `Loading -> Loaded | Failed`; a refetch starts again from `Loading`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ZoneLoadState {
    #[default]
    Loading,
    Loaded { zones: Vec<Zone>, tier: FetchTier },
    Failed { message: String },
}

impl ZoneLoadState {
    pub fn zones(&self) -> &[Zone] {
        match self {
            ZoneLoadState::Loaded { zones, .. } => zones,
            _ => &[],
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ZoneLoadState::Failed { message } => Some(message),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, ZoneLoadState::Loading)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_loaded_state_serialization() {
        let state = ZoneLoadState::Loaded {
            zones: vec![],
            tier: FetchTier::Fallback(FallbackReason::CapabilityUnavailable),
        };
        assert_eq!(
            serde_json::to_value(&state).unwrap(),
            json!({
                "status": "loaded",
                "zones": [],
                "tier": { "fallback": { "kind": "capability_unavailable" } }
            })
        );
    }

    #[test]
    fn test_failed_state_has_no_zones() {
        let state = ZoneLoadState::Failed {
            message: "connection refused".to_string(),
        };
        assert!(state.zones().is_empty());
        assert_eq!(state.error(), Some("connection refused"));
        assert!(ZoneLoadState::default().is_loading());
    }
}
