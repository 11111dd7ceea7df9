//! Risk classification of evacuation zones

use serde::{Deserialize, Serialize};

/// Risk level attached to a zone by the emergency management office
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ZoneRisk {
    HighRisk,
    MediumRisk,
    LowRisk,
    Safe,
}

impl ZoneRisk {
    /// Parse the stored `zone_type`; unknown values have no risk level
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "high_risk" => Some(ZoneRisk::HighRisk),
            "medium_risk" => Some(ZoneRisk::MediumRisk),
            "low_risk" => Some(ZoneRisk::LowRisk),
            "safe" => Some(ZoneRisk::Safe),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ZoneRisk::HighRisk => "High Risk Zone",
            ZoneRisk::MediumRisk => "Medium Risk Zone",
            ZoneRisk::LowRisk => "Low Risk Zone",
            ZoneRisk::Safe => "Safe Zone",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ZoneRisk::HighRisk => "Immediate evacuation required",
            ZoneRisk::MediumRisk => "Prepare for evacuation",
            ZoneRisk::LowRisk => "Monitor situation",
            ZoneRisk::Safe => "No immediate threat",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            ZoneRisk::HighRisk => "#ef4444",
            ZoneRisk::MediumRisk => "#f97316",
            ZoneRisk::LowRisk => "#22c55e",
            ZoneRisk::Safe => "#3b82f6",
        }
    }

    /// 1 is the most urgent
    pub fn priority(&self) -> u8 {
        match self {
            ZoneRisk::HighRisk => 1,
            ZoneRisk::MediumRisk => 2,
            ZoneRisk::LowRisk => 3,
            ZoneRisk::Safe => 4,
        }
    }

    /// Message shown to a user standing inside a zone of this level
    pub fn advisory(&self) -> &'static str {
        match self {
            ZoneRisk::HighRisk => {
                "You are in a HIGH RISK evacuation zone! Please evacuate immediately!"
            }
            ZoneRisk::MediumRisk => "You are in a MEDIUM RISK zone. Prepare for potential evacuation.",
            ZoneRisk::LowRisk => "You are in a LOW RISK zone. Monitor the situation.",
            ZoneRisk::Safe => "You are in a safe area. Stay informed about the situation.",
        }
    }
}

impl std::fmt::Display for ZoneRisk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}
