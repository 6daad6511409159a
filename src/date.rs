//! ISO-8601-like date parsing for [`value_date`](crate::StreamTokenizer::value_date).
//!
//! Accepted shapes, tried in order:
//!
//! - RFC 3339 (`2011-07-18T01:09:18Z`, `2011-07-18T01:09:18.25+02:00`)
//! - a zone written without a colon (`2011-07-18T01:09:18+0000`), with `T` or a space
//! - a zone-less date-time, taken as UTC
//! - compact `20110718T010918`, taken as UTC
//! - a date alone (`2011-07-18` or `20110718`), midnight UTC

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};

const ZONED_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%d %H:%M:%S%.f%z"];

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y%m%dT%H%M%S",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y%m%d"];

/// Parses a timestamp, returning `None` when no accepted shape matches.
///
/// # Examples
///
/// ```rust
/// use streamtok::date::parse_iso_datetime;
///
/// let dt = parse_iso_datetime("2011-07-18T01:09:18+0000").unwrap();
/// assert_eq!(dt.timestamp(), 1_310_951_358);
/// assert!(parse_iso_datetime("yesterday").is_none());
/// ```
#[must_use]
pub fn parse_iso_datetime(text: &str) -> Option<DateTime<FixedOffset>> {
    let text = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt);
    }
    for format in ZONED_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(text, format) {
            return Some(dt);
        }
    }
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(Utc.from_utc_datetime(&naive).into());
        }
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(text, format) {
            let naive = date.and_hms_opt(0, 0, 0)?;
            return Some(Utc.from_utc_datetime(&naive).into());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<FixedOffset> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap().into()
    }

    #[test]
    fn test_zone_without_colon() {
        assert_eq!(
            parse_iso_datetime("2011-07-18T01:09:18+0000"),
            Some(utc(2011, 7, 18, 1, 9, 18))
        );
    }

    #[test]
    fn test_rfc3339_with_offset() {
        let dt = parse_iso_datetime("2011-07-18T03:09:18.500+02:00").unwrap();
        assert_eq!(dt.offset().local_minus_utc(), 7200);
        assert_eq!(dt.timestamp(), utc(2011, 7, 18, 1, 9, 18).timestamp());
        assert_eq!(dt.timestamp_subsec_millis(), 500);
    }

    #[test]
    fn test_zoneless_is_utc() {
        assert_eq!(
            parse_iso_datetime("2011-07-18 01:09:18"),
            Some(utc(2011, 7, 18, 1, 9, 18))
        );
        assert_eq!(
            parse_iso_datetime("20110718T010918"),
            Some(utc(2011, 7, 18, 1, 9, 18))
        );
    }

    #[test]
    fn test_date_only() {
        assert_eq!(parse_iso_datetime("2011-07-18"), Some(utc(2011, 7, 18, 0, 0, 0)));
        assert_eq!(parse_iso_datetime("20110718"), Some(utc(2011, 7, 18, 0, 0, 0)));
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(parse_iso_datetime("").is_none());
        assert!(parse_iso_datetime("2011-13-45").is_none());
        assert!(parse_iso_datetime("not a date").is_none());
    }
}
