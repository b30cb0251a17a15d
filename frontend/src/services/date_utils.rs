use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Parse a strict `YYYY-MM-DD` date
pub fn parse_date_string(date_str: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d").ok()
}

/// Format YYYY-MM-DD date string for display
pub fn format_date_for_display(date_str: &str) -> String {
    match parse_date_string(date_str) {
        Some(date) => date.format("%B %-d, %Y").to_string(),
        None => date_str.to_string(),
    }
}

/// Render a server timestamp as `YYYY-MM-DD HH:MM`.
///
/// The backend emits both RFC 3339 and zone-less ISO timestamps; anything
/// else is shown unchanged.
pub fn format_timestamp(timestamp: &str) -> String {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(timestamp) {
        return parsed.format("%Y-%m-%d %H:%M").to_string();
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%dT%H:%M:%S%.f") {
        return parsed.format("%Y-%m-%d %H:%M").to_string();
    }
    timestamp.to_string()
}
