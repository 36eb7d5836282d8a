use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};

use forage_core::clock::{Clock, FixedClock, SystemClock};

/// Parse an RFC 3339 instant, e.g. `2024-06-15T12:00:00Z`.
pub(crate) fn parse_instant(s: &str) -> Result<DateTime<Utc>> {
    let ts = DateTime::parse_from_rfc3339(s.trim())
        .with_context(|| format!("Invalid timestamp '{s}'. Use RFC 3339, e.g. 2024-06-15T12:00:00Z"))?;
    Ok(ts.with_timezone(&Utc))
}

/// Wall clock unless `--now` pins the instant.
pub(crate) fn build_clock(now: Option<&str>) -> Result<Arc<dyn Clock>> {
    match now {
        Some(s) => Ok(Arc::new(FixedClock(parse_instant(s)?))),
        None => Ok(Arc::new(SystemClock)),
    }
}

pub(crate) fn no_neg_zero(v: f64) -> f64 {
    if v == 0.0 { 0.0 } else { v }
}

pub(crate) fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let end = s.char_indices().nth(max - 3).map_or(s.len(), |(i, _)| i);
        format!("{}...", &s[..end])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_instant_utc() {
        let ts = parse_instant("2024-06-15T12:00:00Z").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_instant_offset_normalized() {
        let ts = parse_instant("2024-06-15T14:00:00+02:00").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_instant_invalid() {
        assert!(parse_instant("2024-06-15").is_err());
        assert!(parse_instant("yesterday").is_err());
    }

    #[test]
    fn test_build_clock_fixed() {
        let clock = build_clock(Some("2024-06-15T12:00:00Z")).unwrap();
        assert_eq!(clock.now(), Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap());
    }

    #[test]
    fn test_build_clock_rejects_garbage() {
        assert!(build_clock(Some("soon")).is_err());
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello world this is long", 10), "hello w...");
        assert_eq!(truncate("Crème fraîche", 10), "Crème f...");
    }

    #[test]
    fn test_no_neg_zero() {
        assert_eq!(no_neg_zero(-0.0).to_bits(), 0.0_f64.to_bits());
        assert_eq!(no_neg_zero(5.0), 5.0);
    }
}
