/// Utilities for date and time formatting
///
/// Backend dates come as ISO strings, with or without offset
/// ("2025-03-15T14:02:26", "2025-03-15T14:02:26.123Z").
use chrono::{DateTime, NaiveDateTime};

/// Format ISO datetime string to DD/MM/YYYY HH:MM format
/// Example: "2025-03-15T14:02:26.123Z" -> "15/03/2025 14:02"
pub fn format_datetime(datetime_str: &str) -> String {
    match parse_datetime(datetime_str) {
        Some(dt) => dt.format("%d/%m/%Y %H:%M").to_string(),
        None => datetime_str.to_string(),
    }
}

/// Format ISO date string to DD/MM/YYYY format
/// Example: "2025-03-15" or "2025-03-15T14:02:26Z" -> "15/03/2025"
pub fn format_date(date_str: &str) -> String {
    let date_part = date_str.split('T').next().unwrap_or(date_str);
    if let Some((year, rest)) = date_part.split_once('-') {
        if let Some((month, day)) = rest.split_once('-') {
            return format!("{}/{}/{}", day, month, year);
        }
    }
    date_str.to_string()
}

fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_utc());
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M"))
        .ok()
}

/// Planned duration of a job: "2h 30m", "3h" or "45m".
/// Unparseable dates give an empty string.
pub fn estimated_duration(start: &str, end: &str) -> String {
    let (Some(start), Some(end)) = (parse_datetime(start), parse_datetime(end)) else {
        return String::new();
    };
    let total_minutes = (end - start).num_minutes();
    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;
    if hours > 0 && minutes > 0 {
        format!("{}h {}m", hours, minutes)
    } else if hours > 0 {
        format!("{}h", hours)
    } else {
        format!("{}m", minutes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_datetime() {
        assert_eq!(format_datetime("2025-03-15T14:02:26.123Z"), "15/03/2025 14:02");
        assert_eq!(format_datetime("2025-12-31T23:59:59"), "31/12/2025 23:59");
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date("2025-03-15"), "15/03/2025");
        assert_eq!(format_date("2025-03-15T14:02:26.123Z"), "15/03/2025");
    }

    #[test]
    fn test_invalid_format() {
        assert_eq!(format_datetime("invalid"), "invalid");
        assert_eq!(format_date("invalid"), "invalid");
        assert_eq!(estimated_duration("invalid", "2025-01-01T10:00:00"), "");
    }

    #[test]
    fn test_estimated_duration() {
        assert_eq!(
            estimated_duration("2025-01-01T08:00:00", "2025-01-01T10:30:00"),
            "2h 30m"
        );
        assert_eq!(
            estimated_duration("2025-01-01T08:00:00", "2025-01-01T11:00:00"),
            "3h"
        );
        assert_eq!(
            estimated_duration("2025-01-01T08:00:00Z", "2025-01-01T08:45:00Z"),
            "45m"
        );
    }
}
