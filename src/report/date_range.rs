//! Inclusive UTC date ranges built from calendar-date query parameters.

use chrono::{DateTime, NaiveDate, NaiveTime, TimeDelta, TimeZone, Utc};

use crate::types::ReportError;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Inclusive `[from, to]` interval.
///
/// `from` is midnight UTC of the first day, `to` is the last millisecond of
/// the final day, so every record stamped on either day is included.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

impl DateRange {
    /// Parse two `YYYY-MM-DD` strings into an inclusive range.
    ///
    /// A `from` later than `to` is accepted; the range is then empty and
    /// matches no record.
    pub fn parse(from: Option<&str>, to: Option<&str>) -> Result<Self, ReportError> {
        let from = from.ok_or_else(|| ReportError::InvalidRange("\"from\" is required".into()))?;
        let to = to.ok_or_else(|| ReportError::InvalidRange("\"to\" is required".into()))?;

        Ok(Self {
            from: start_of_day(parse_day(from)?),
            to: end_of_day(parse_day(to)?)?,
        })
    }

    /// Whether the range can contain anything at all
    pub fn is_empty(&self) -> bool {
        self.from > self.to
    }

    /// Whether `instant` falls inside the range, bounds included
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.from && instant <= self.to
    }

    /// Same as [`contains`](Self::contains) for BSON timestamps; missing is never in range
    pub fn contains_bson(&self, instant: Option<bson::DateTime>) -> bool {
        instant.is_some_and(|t| self.contains(t.to_chrono()))
    }
}

fn parse_day(raw: &str) -> Result<NaiveDate, ReportError> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .map_err(|e| {
            ReportError::InvalidRange(format!("'{}' is not a YYYY-MM-DD date: {}", raw, e))
        })
}

fn start_of_day(day: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&day.and_time(NaiveTime::MIN))
}

/// Last millisecond of `day`, the finest instant a BSON date can hold
fn end_of_day(day: NaiveDate) -> Result<DateTime<Utc>, ReportError> {
    start_of_day(day)
        .checked_add_signed(TimeDelta::days(1) - TimeDelta::milliseconds(1))
        .ok_or_else(|| ReportError::InvalidRange(format!("'{}' is out of range", day)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_bounds_cover_whole_days() {
        let range = DateRange::parse(Some("2024-03-01"), Some("2024-03-31")).unwrap();
        assert_eq!(range.from.to_rfc3339(), "2024-03-01T00:00:00+00:00");
        assert_eq!(
            range.to,
            Utc.with_ymd_and_hms(2024, 3, 31, 23, 59, 59).unwrap() + Duration::milliseconds(999)
        );
    }

    #[test]
    fn test_inclusive_bounds() {
        let range = DateRange::parse(Some("2024-03-01"), Some("2024-03-01")).unwrap();
        assert!(range.contains(range.from));
        assert!(range.contains(range.to));
        assert!(!range.contains(range.from - Duration::milliseconds(1)));
        assert!(!range.contains(range.to + Duration::milliseconds(1)));
    }

    #[test]
    fn test_last_day_evening_included() {
        let range = DateRange::parse(Some("2024-03-01"), Some("2024-03-02")).unwrap();
        let evening = Utc.with_ymd_and_hms(2024, 3, 2, 21, 30, 0).unwrap();
        assert!(range.contains(evening));
    }

    #[test]
    fn test_bson_bounds() {
        let range = DateRange::parse(Some("2024-03-01"), Some("2024-03-02")).unwrap();
        assert!(range.contains_bson(Some(bson::DateTime::from_chrono(range.to))));
        assert!(!range.contains_bson(None));
    }

    #[test]
    fn test_missing_bounds() {
        assert!(matches!(
            DateRange::parse(None, Some("2024-03-01")),
            Err(ReportError::InvalidRange(_))
        ));
        assert!(matches!(
            DateRange::parse(Some("2024-03-01"), None),
            Err(ReportError::InvalidRange(_))
        ));
    }

    #[test]
    fn test_unparseable_dates() {
        assert!(DateRange::parse(Some("2024-13-01"), Some("2024-12-01")).is_err());
        assert!(DateRange::parse(Some("yesterday"), Some("2024-12-01")).is_err());
        assert!(DateRange::parse(Some("2024-02-30"), Some("2024-03-01")).is_err());
    }

    #[test]
    fn test_reversed_range_matches_nothing() {
        let range = DateRange::parse(Some("2024-03-02"), Some("2024-03-01")).unwrap();
        assert!(range.is_empty());
        assert!(!range.contains(Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()));
        assert!(!range.contains(Utc.with_ymd_and_hms(2024, 3, 2, 0, 0, 0).unwrap()));
    }

    #[test]
    fn test_end_of_day_across_month_and_leap_day() {
        let range = DateRange::parse(Some("2024-02-29"), Some("2024-02-29")).unwrap();
        assert!(!range.is_empty());
        assert_eq!(
            range.to + Duration::milliseconds(1),
            Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()
        );

        let range = DateRange::parse(Some("2023-12-31"), Some("2023-12-31")).unwrap();
        assert_eq!(range.to.to_rfc3339(), "2023-12-31T23:59:59.999+00:00");
    }
}
