use chrono::{Datelike, Duration, NaiveDate};
use hijri_date::HijriDate;

use crate::calendar::civil::DateKey;

/// Islamic month names in English (index 0 = Muharram = month 1)
const HIJRI_MONTH_NAMES: &[&str] = &[
    "Muharram",
    "Safar",
    "Rabi' al-Awwal",
    "Rabi' al-Thani",
    "Jumada al-Awwal",
    "Jumada al-Thani",
    "Rajab",
    "Sha'ban",
    "Ramadan",
    "Shawwal",
    "Dhu al-Qi'dah",
    "Dhu al-Hijjah",
];

/// First year of the lunar era; used in the conversion-failure fallback.
pub const LUNAR_EPOCH_YEAR: u32 = 1;

pub fn hijri_month_name(month: u32) -> &'static str {
    if (1..=12).contains(&month) {
        HIJRI_MONTH_NAMES[(month - 1) as usize]
    } else {
        "Unknown"
    }
}

/// A Hijri (day, month, year) triple, derived on demand from a civil key.
/// Never stored — always recomputed so refinements to the conversion table
/// cannot leave stale dates behind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LunarParts {
    pub day: u32,
    pub month: u32,
    pub year: u32,
}

impl LunarParts {
    pub fn formatted(&self) -> String {
        format!("{} {} {}", self.day, hijri_month_name(self.month), self.year)
    }

    pub fn month_year(&self) -> String {
        format!("{} {}", hijri_month_name(self.month), self.year)
    }

    /// Same lunar month, i.e. same (month, year) pair.
    pub fn same_month(&self, other: &LunarParts) -> bool {
        self.month == other.month && self.year == other.year
    }
}

/// Civil years covered by hijri_date's conversion tables.
const TABLE_YEARS: std::ops::RangeInclusive<i32> = 1938..=2075;

fn convert(date: NaiveDate) -> Option<LunarParts> {
    if !TABLE_YEARS.contains(&date.year()) {
        return None;
    }
    let hd = HijriDate::from_gr(
        date.year() as usize,
        date.month() as usize,
        date.day() as usize,
    )
    .ok()?;
    Some(LunarParts {
        day: hd.day() as u32,
        month: hd.month() as u32,
        year: hd.year() as u32,
    })
}

/// Hijri parts for a civil day. `offset_days` adjusts for local moon
/// sighting (e.g. -1 if your country is one day behind Saudi Arabia).
///
/// Conversion failures fall back to day 1 of Muharram in the epoch year —
/// a wrong date must never crash calendar navigation.
pub fn lunar_parts(key: &DateKey, offset_days: i32) -> LunarParts {
    let adjusted = key.to_date() + Duration::days(offset_days as i64);
    convert(adjusted).unwrap_or(LunarParts {
        day: 1,
        month: 1,
        year: LUNAR_EPOCH_YEAR,
    })
}

/// Hijri date line for headers, empty on conversion failure.
pub fn format_hijri(key: &DateKey, offset_days: i32) -> String {
    let adjusted = key.to_date() + Duration::days(offset_days as i64);
    match convert(adjusted) {
        Some(parts) => parts.formatted(),
        None => String::new(),
    }
}

/// Render a number with Arabic-Indic digit glyphs: 12 → "١٢".
/// Pure display formatting, no calendrical meaning.
pub fn to_arabic_numerals(n: u32) -> String {
    const DIGITS: [char; 10] = ['٠', '١', '٢', '٣', '٤', '٥', '٦', '٧', '٨', '٩'];
    n.to_string()
        .chars()
        .map(|ch| match ch.to_digit(10) {
            Some(d) => DIGITS[d as usize],
            None => ch,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_conversion() {
        // Mid-March 2025 falls safely inside Ramadan 1446.
        let key: DateKey = "2025-03-15".parse().unwrap();
        let parts = lunar_parts(&key, 0);
        assert_eq!(parts.month, 9);
        assert_eq!(parts.year, 1446);
    }

    #[test]
    fn offset_shifts_the_day() {
        let key: DateKey = "2025-03-10".parse().unwrap();
        let base = lunar_parts(&key, 0);
        let behind = lunar_parts(&key, -1);
        assert_eq!(behind, lunar_parts(&key.prev_day(), 0));
        assert_ne!(base.day, behind.day);
    }

    #[test]
    fn out_of_range_falls_back_to_epoch() {
        // hijri_date's tables do not reach the year 3000.
        let key: DateKey = "3000-01-01".parse().unwrap();
        let parts = lunar_parts(&key, 0);
        assert_eq!(
            parts,
            LunarParts {
                day: 1,
                month: 1,
                year: LUNAR_EPOCH_YEAR
            }
        );
        assert_eq!(format_hijri(&key, 0), "");
    }

    #[test]
    fn month_names_cover_the_year() {
        assert_eq!(hijri_month_name(1), "Muharram");
        assert_eq!(hijri_month_name(9), "Ramadan");
        assert_eq!(hijri_month_name(12), "Dhu al-Hijjah");
        assert_eq!(hijri_month_name(0), "Unknown");
        assert_eq!(hijri_month_name(13), "Unknown");
    }

    #[test]
    fn arabic_numerals() {
        assert_eq!(to_arabic_numerals(0), "٠");
        assert_eq!(to_arabic_numerals(12), "١٢");
        assert_eq!(to_arabic_numerals(1446), "١٤٤٦");
    }
}
