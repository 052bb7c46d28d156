use anyhow::{anyhow, Result};
use chrono::{Datelike, Duration, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A civil (Gregorian) calendar day as a canonical "YYYY-MM-DD" string.
///
/// All storage and navigation uses these keys; lexicographic order equals
/// chronological order. Hijri dates are display-only and derived on demand.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DateKey(String);

impl DateKey {
    /// Today according to the local civil calendar fields (never UTC —
    /// a UTC instant shifts the date near midnight in most timezones).
    pub fn today() -> DateKey {
        DateKey::from_date(Local::now().date_naive())
    }

    pub fn from_date(date: NaiveDate) -> DateKey {
        DateKey(format!(
            "{:04}-{:02}-{:02}",
            date.year(),
            date.month(),
            date.day()
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn to_date(&self) -> NaiveDate {
        // Keys are validated on construction, so this cannot fail.
        NaiveDate::parse_from_str(&self.0, "%Y-%m-%d").unwrap_or(NaiveDate::MIN)
    }

    /// Calendar arithmetic across month/year boundaries and leap years.
    pub fn add_days(&self, n: i64) -> DateKey {
        DateKey::from_date(self.to_date() + Duration::days(n))
    }

    pub fn prev_day(&self) -> DateKey {
        self.add_days(-1)
    }

    pub fn next_day(&self) -> DateKey {
        self.add_days(1)
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for DateKey {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map_err(|e| anyhow!("Bad date '{}' (expected YYYY-MM-DD): {}", s, e))?;
        Ok(DateKey::from_date(date))
    }
}

/// All keys from `start` to `end` inclusive, in order.
pub fn date_range(start: &DateKey, end: &DateKey) -> Vec<DateKey> {
    let mut days = Vec::new();
    let mut cur = start.clone();
    while cur <= *end {
        days.push(cur.clone());
        cur = cur.next_day();
    }
    days
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_days_crosses_month_boundary() {
        let k: DateKey = "2025-01-31".parse().unwrap();
        assert_eq!(k.add_days(1).as_str(), "2025-02-01");
    }

    #[test]
    fn add_days_crosses_year_boundary() {
        let k: DateKey = "2024-12-31".parse().unwrap();
        assert_eq!(k.add_days(1).as_str(), "2025-01-01");
        assert_eq!(k.add_days(-30).as_str(), "2024-12-01");
    }

    #[test]
    fn add_days_handles_leap_years() {
        let k: DateKey = "2024-02-28".parse().unwrap();
        assert_eq!(k.add_days(1).as_str(), "2024-02-29");
        let k: DateKey = "2025-02-28".parse().unwrap();
        assert_eq!(k.add_days(1).as_str(), "2025-03-01");
    }

    #[test]
    fn add_days_round_trips() {
        let k: DateKey = "2025-03-15".parse().unwrap();
        for n in [-400, -30, -1, 0, 1, 29, 365] {
            assert_eq!(k.add_days(n).add_days(-n), k);
        }
    }

    #[test]
    fn keys_are_zero_padded_and_ordered() {
        let a: DateKey = "2025-9-5".parse().unwrap();
        assert_eq!(a.as_str(), "2025-09-05");
        let jan: DateKey = "2025-01-09".parse().unwrap();
        assert!(jan < a);
    }

    #[test]
    fn bad_keys_are_rejected() {
        assert!("2025-13-01".parse::<DateKey>().is_err());
        assert!("2025-02-30".parse::<DateKey>().is_err());
        assert!("not-a-date".parse::<DateKey>().is_err());
    }

    #[test]
    fn date_range_is_inclusive() {
        let start: DateKey = "2025-02-27".parse().unwrap();
        let end: DateKey = "2025-03-02".parse().unwrap();
        let days = date_range(&start, &end);
        assert_eq!(days.len(), 4);
        assert_eq!(days[0], start);
        assert_eq!(days[3], end);
    }
}
