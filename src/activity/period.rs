use chrono::{Datelike, NaiveDate};
use thiserror::Error;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Error)]
pub enum PeriodError {
    #[error("Invalid date '{value}': expected YYYY-MM-DD ({source})")]
    InvalidDate {
        value: String,
        #[source]
        source: chrono::ParseError,
    },
}

/// The reporting window `[start, end)` plus days off inside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Period {
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// Paid-time-off days subtracted from the working-day count
    pub pto_days: u32,
}

impl Period {
    pub fn new(start: NaiveDate, end: NaiveDate, pto_days: u32) -> Self {
        Self { start, end, pto_days }
    }

    /// Parse two `YYYY-MM-DD` dates. An end before the start is accepted;
    /// it only disables the rate statistics.
    pub fn parse(start: &str, end: &str, pto_days: u32) -> Result<Self, PeriodError> {
        Ok(Self::new(parse_date(start)?, parse_date(end)?, pto_days))
    }

    /// Whole days between start and end. Negative when end precedes start.
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date < self.end
    }

    /// Monday through Friday dates in `[start, end)`.
    pub fn weekdays(&self) -> i64 {
        self.start
            .iter_days()
            .take_while(|day| *day < self.end)
            .filter(|day| day.weekday().number_from_monday() <= 5)
            .count() as i64
    }

    /// Weekdays minus PTO. May go negative if more PTO than weekdays is given.
    pub fn working_days(&self) -> i64 {
        self.weekdays() - i64::from(self.pto_days)
    }

    /// Working days expressed as five-day weeks.
    pub fn working_weeks(&self) -> f64 {
        self.working_days() as f64 / 5.0
    }
}

pub fn parse_date(value: &str) -> Result<NaiveDate, PeriodError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|source| PeriodError::InvalidDate {
        value: value.to_string(),
        source,
    })
}

/// `count` scaled to a seven-day rate over `days`, rounded to one decimal.
/// `None` for a non-positive span.
pub fn weekly_rate(count: usize, days: i64) -> Option<f64> {
    if days <= 0 {
        return None;
    }
    Some(round_to_tenths(count as f64 * 7.0 / days as f64))
}

/// Round half away from zero to one decimal place.
pub fn round_to_tenths(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_period() {
        let period = Period::parse("2025-01-01", "2025-01-08", 2).unwrap();
        assert_eq!(period.start, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        assert_eq!(period.days(), 7);
        assert_eq!(period.pto_days, 2);
    }

    #[test]
    fn test_parse_invalid_dates() {
        assert!(Period::parse("2025-13-01", "2025-01-08", 0).is_err());
        assert!(Period::parse("yesterday", "2025-01-08", 0).is_err());
        assert!(Period::parse("2025-01-01", "01/08/2025", 0).is_err());
    }

    #[test]
    fn test_invalid_date_message_names_value() {
        let err = parse_date("2025-02-30").unwrap_err();
        assert!(err.to_string().contains("2025-02-30"));
    }

    #[test]
    fn test_reversed_period_has_negative_days() {
        let period = Period::parse("2025-01-08", "2025-01-01", 0).unwrap();
        assert_eq!(period.days(), -7);
        assert_eq!(period.weekdays(), 0);
    }

    #[test]
    fn test_contains_is_end_exclusive() {
        let period = Period::parse("2025-01-01", "2025-01-08", 0).unwrap();
        assert!(period.contains(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()));
        assert!(period.contains(NaiveDate::from_ymd_opt(2025, 1, 7).unwrap()));
        assert!(!period.contains(NaiveDate::from_ymd_opt(2025, 1, 8).unwrap()));
    }

    #[test]
    fn test_weekdays_and_working_time() {
        // 2025-01-06 is a Monday; two full weeks
        let period = Period::parse("2025-01-06", "2025-01-20", 3).unwrap();
        assert_eq!(period.weekdays(), 10);
        assert_eq!(period.working_days(), 7);
        assert!((period.working_weeks() - 1.4).abs() < f64::EPSILON);
    }

    #[test]
    fn test_weekly_rate() {
        assert_eq!(weekly_rate(7, 7), Some(7.0));
        assert_eq!(weekly_rate(10, 30), Some(2.3));
        assert_eq!(weekly_rate(5, 0), None);
        assert_eq!(weekly_rate(5, -3), None);
    }

    #[test]
    fn test_weekly_rate_rounds_rather_than_truncates() {
        // 2 * 7 / 3 = 4.666..
        assert_eq!(weekly_rate(2, 3), Some(4.7));
    }
}
