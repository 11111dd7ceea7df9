//! Facility tags listed on shelters

/// Map icon for a facility tag such as `medical_center`
pub fn facility_icon(facility: &str) -> &'static str {
    match facility {
        "hospital" | "clinic" | "medical_center" => "🏥",
        "pharmacy" => "💊",
        "fire_station" => "🚒",
        "police_station" => "👮",
        "evacuation_center" => "🏢",
        "school" => "🏫",
        "church" => "⛪",
        "gymnasium" => "🏟️",
        "community_center" | "barangay_hall" => "🏛️",
        "mall" => "🏬",
        "hotel" => "🏨",
        "restaurant" => "🍽️",
        "gas_station" => "⛽",
        "atm" => "🏧",
        "bank" => "🏦",
        "post_office" => "📮",
        "library" => "📚",
        "park" => "🌳",
        "playground" => "🎪",
        "market" | "supermarket" => "🛒",
        _ => "📍",
    }
}

/// Display text for a facility tag: `medical_center` becomes `medical center`
pub fn facility_label(facility: &str) -> String {
    facility.replace('_', " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_facility_icon() {
        assert_eq!(facility_icon("clinic"), facility_icon("hospital"));
        assert_eq!(facility_icon("supermarket"), "🛒");
        assert_eq!(facility_icon("helipad"), "📍");
    }

    #[test]
    fn test_facility_label() {
        assert_eq!(facility_label("barangay_hall"), "barangay hall");
        assert_eq!(facility_label("school"), "school");
    }
}
