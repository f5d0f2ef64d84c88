use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Parse a date as written in front matter.
///
/// Accepts RFC 3339, RFC 2822, `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DDTHH:MM:SS`,
/// `YYYY-MM-DD HH:MM` and bare `YYYY-MM-DD` (midnight). Offsets are folded
/// into UTC.
pub fn parse_date(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_utc());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(value) {
        return Some(dt.naive_utc());
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_formats() {
        assert!(parse_date("2024-01-01").is_some());
        assert!(parse_date("2024-01-01 12:30:00").is_some());
        assert!(parse_date("2024-01-01T12:30:00").is_some());
        assert!(parse_date("2024-01-01T12:30:00Z").is_some());
        assert!(parse_date("Mon, 01 Jan 2024 12:30:00 +0000").is_some());
        assert!(parse_date("yesterday").is_none());
    }

    #[test]
    fn test_offsets_fold_to_utc() {
        let a = parse_date("2024-01-01T02:00:00+02:00").unwrap();
        let b = parse_date("2024-01-01 00:00:00").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_bare_date_is_midnight() {
        let dt = parse_date(" 2023-06-01 ").unwrap();
        assert_eq!(dt.to_string(), "2023-06-01 00:00:00");
    }
}
