use chrono::{DateTime, NaiveDate, Utc};

use crate::errors::SchoolError;

/// 解析日期：接受 `YYYY-MM-DD`（视为 UTC 零点）或 RFC 3339 时间戳
pub fn parse_date(raw: &str) -> Result<DateTime<Utc>, SchoolError> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .ok_or_else(|| {
            SchoolError::date_parse(format!(
                "Invalid date '{raw}', expected YYYY-MM-DD or RFC 3339"
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_plain_date() {
        let dt = parse_date("2026-03-01").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_rfc3339_with_offset() {
        let dt = parse_date("2026-03-01T10:30:00+02:00").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2026, 3, 1, 8, 30, 0).unwrap());
        assert!(parse_date(" 2026-03-01T10:30:00Z ").is_ok());
    }

    #[test]
    fn test_invalid_dates() {
        assert_eq!(parse_date("yesterday").unwrap_err().code(), "E010");
        assert!(parse_date("2026-13-01").is_err());
        assert!(parse_date("").is_err());
    }
}
