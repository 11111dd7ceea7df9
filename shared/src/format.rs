//! Human-readable rendering of distances and counts

/// Format a distance given in meters.
///
/// Under 1000 m renders whole meters (`"450 m"`), under 10 km one decimal
/// (`"2.3 km"`), otherwise whole kilometers (`"12 km"`). Non-finite input
/// renders as `"0 m"`.
pub fn format_distance(meters: f64) -> String {
    if !meters.is_finite() {
        return "0 m".to_string();
    }

    if meters < 1000.0 {
        return format!("{} m", meters.round());
    }

    let kilometers = meters / 1000.0;
    if kilometers < 10.0 {
        format!("{:.1} km", kilometers)
    } else {
        format!("{} km", kilometers.round())
    }
}

/// Format a count with comma thousands separators (`5000` becomes `"5,000"`).
///
/// Fractions are rounded to the nearest whole number; non-finite input
/// renders as `"0"`.
pub fn format_capacity(n: f64) -> String {
    if !n.is_finite() {
        return "0".to_string();
    }

    let rounded = n.round();
    let digits = format!("{}", rounded.abs());

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if rounded < 0.0 {
        grouped.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
