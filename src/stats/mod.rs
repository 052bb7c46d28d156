//! Derived aggregation over the entry collection: streaks and per-habit
//! compliance. Stateless; everything is recomputed from the map on demand.

use std::collections::BTreeMap;

use crate::calendar::DateKey;
use crate::models::{Entry, Habit};

/// A streak can never be reported as unbounded.
const STREAK_CAP: u32 = 365;

/// Consecutive submitted days counting backward from `from` (inclusive).
/// Zero when `from` itself is absent or not submitted.
pub fn streak(entries: &BTreeMap<DateKey, Entry>, from: &DateKey) -> u32 {
    let mut count = 0;
    let mut cur = from.clone();
    while count < STREAK_CAP {
        match entries.get(&cur) {
            Some(e) if e.submitted => count += 1,
            _ => break,
        }
        cur = cur.prev_day();
    }
    count
}

/// Longest run of consecutive submitted days within the given range,
/// in a single scan.
pub fn best_streak_in_range(entries: &BTreeMap<DateKey, Entry>, days: &[DateKey]) -> u32 {
    let mut best = 0;
    let mut current = 0;
    for day in days {
        if entries.get(day).is_some_and(|e| e.submitted) {
            current += 1;
            best = best.max(current);
        } else {
            current = 0;
        }
    }
    best
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HabitStat {
    pub habit: Habit,
    pub count: u32,
    /// Percent of *tracked* days (days in range with any stored entry);
    /// untracked days are excluded from the denominator, not counted as
    /// failures. Zero when nothing is tracked.
    pub percentage: u32,
}

pub fn compliance_stats(
    entries: &BTreeMap<DateKey, Entry>,
    days: &[DateKey],
    habits: &[Habit],
) -> Vec<HabitStat> {
    let tracked: Vec<&Entry> = days.iter().filter_map(|d| entries.get(d)).collect();
    habits
        .iter()
        .map(|&habit| {
            let count = tracked.iter().filter(|e| e.habit_done(habit)).count() as u32;
            let percentage = if tracked.is_empty() {
                0
            } else {
                (100.0 * count as f64 / tracked.len() as f64).round() as u32
            };
            HabitStat {
                habit,
                count,
                percentage,
            }
        })
        .collect()
}

/// Everything the monthly report shows, computed in one pass over the
/// month's day keys.
#[derive(Debug, Clone)]
pub struct MonthReport {
    pub total_days: u32,
    pub days_tracked: u32,
    pub submitted_days: u32,
    pub best_streak: u32,
    pub habit_stats: Vec<HabitStat>,
}

impl MonthReport {
    pub fn strongest(&self) -> Option<&HabitStat> {
        self.habit_stats
            .iter()
            .max_by_key(|h| h.percentage)
            .filter(|h| h.percentage > 0)
    }

    pub fn weakest(&self) -> Option<&HabitStat> {
        if self.days_tracked == 0 {
            return None;
        }
        self.habit_stats.iter().min_by_key(|h| h.percentage)
    }
}

pub fn month_report(entries: &BTreeMap<DateKey, Entry>, days: &[DateKey]) -> MonthReport {
    let days_tracked = days.iter().filter(|d| entries.contains_key(*d)).count() as u32;
    let submitted_days = days
        .iter()
        .filter(|d| entries.get(*d).is_some_and(|e| e.submitted))
        .count() as u32;
    MonthReport {
        total_days: days.len() as u32,
        days_tracked,
        submitted_days,
        best_streak: best_streak_in_range(entries, days),
        habit_stats: compliance_stats(entries, days, &Habit::all()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::date_range;

    fn key(s: &str) -> DateKey {
        s.parse().unwrap()
    }

    fn submitted_entry() -> Entry {
        let mut e = Entry::empty();
        e.submitted = true;
        e
    }

    #[test]
    fn streak_is_zero_without_a_submitted_today() {
        let mut entries = BTreeMap::new();
        assert_eq!(streak(&entries, &key("2025-03-10")), 0);

        entries.insert(key("2025-03-10"), Entry::empty());
        assert_eq!(streak(&entries, &key("2025-03-10")), 0);
    }

    #[test]
    fn streak_counts_back_to_the_first_gap() {
        let mut entries = BTreeMap::new();
        for d in ["2025-03-08", "2025-03-09", "2025-03-10"] {
            entries.insert(key(d), submitted_entry());
        }
        // 03-07 missing, 03-06 submitted but unreachable across the gap.
        entries.insert(key("2025-03-06"), submitted_entry());
        assert_eq!(streak(&entries, &key("2025-03-10")), 3);
    }

    #[test]
    fn streak_stops_at_an_unsubmitted_day() {
        let mut entries = BTreeMap::new();
        entries.insert(key("2025-03-10"), submitted_entry());
        entries.insert(key("2025-03-09"), Entry::empty());
        entries.insert(key("2025-03-08"), submitted_entry());
        assert_eq!(streak(&entries, &key("2025-03-10")), 1);
    }

    #[test]
    fn streak_is_capped() {
        let mut entries = BTreeMap::new();
        let today = key("2025-03-10");
        for n in 0..400 {
            entries.insert(today.add_days(-n), submitted_entry());
        }
        assert_eq!(streak(&entries, &today), 365);
    }

    #[test]
    fn best_streak_finds_the_longest_run() {
        let days = date_range(&key("2025-03-01"), &key("2025-03-10"));
        let mut entries = BTreeMap::new();
        for d in ["2025-03-01", "2025-03-02"] {
            entries.insert(key(d), submitted_entry());
        }
        for d in ["2025-03-05", "2025-03-06", "2025-03-07"] {
            entries.insert(key(d), submitted_entry());
        }
        assert_eq!(best_streak_in_range(&entries, &days), 3);
    }

    #[test]
    fn best_streak_is_zero_for_empty_range() {
        let entries = BTreeMap::new();
        assert_eq!(best_streak_in_range(&entries, &[]), 0);
    }

    #[test]
    fn compliance_excludes_untracked_days_from_the_denominator() {
        // 30-day range, 10 days tracked, 5 of them with prayer done → 50%.
        let days = date_range(&key("2025-03-01"), &key("2025-03-30"));
        let mut entries = BTreeMap::new();
        for n in 0..10 {
            let mut e = Entry::empty();
            if n < 5 {
                e.set_all_prayers(true);
            }
            entries.insert(key("2025-03-01").add_days(n), e);
        }
        let stats = compliance_stats(&entries, &days, &[Habit::Prayer]);
        assert_eq!(stats[0].count, 5);
        assert_eq!(stats[0].percentage, 50);
    }

    #[test]
    fn compliance_is_zero_when_nothing_is_tracked() {
        let days = date_range(&key("2025-03-01"), &key("2025-03-30"));
        let entries = BTreeMap::new();
        let stats = compliance_stats(&entries, &days, &Habit::all());
        assert!(stats.iter().all(|s| s.count == 0 && s.percentage == 0));
    }

    #[test]
    fn compliance_rounds_to_the_nearest_percent() {
        let days = date_range(&key("2025-03-01"), &key("2025-03-03"));
        let mut entries = BTreeMap::new();
        let mut done = Entry::empty();
        done.qiyam = true;
        entries.insert(key("2025-03-01"), done);
        entries.insert(key("2025-03-02"), Entry::empty());
        entries.insert(key("2025-03-03"), Entry::empty());
        let stats = compliance_stats(&entries, &days, &[Habit::Qiyam]);
        assert_eq!(stats[0].percentage, 33);
    }

    #[test]
    fn strongest_is_absent_when_no_habit_was_done() {
        let days = date_range(&key("2025-03-01"), &key("2025-03-30"));
        let mut entries = BTreeMap::new();
        entries.insert(key("2025-03-01"), Entry::empty());
        let report = month_report(&entries, &days);
        assert!(report.strongest().is_none());
        assert!(report.weakest().is_some(), "weakest still reported once tracked");
    }

    #[test]
    fn month_report_bundles_the_numbers() {
        let days = date_range(&key("2025-03-01"), &key("2025-03-30"));
        let mut entries = BTreeMap::new();
        let mut e = submitted_entry();
        e.set_habit(Habit::Charity, true);
        entries.insert(key("2025-03-01"), e);
        entries.insert(key("2025-03-02"), submitted_entry());

        let report = month_report(&entries, &days);
        assert_eq!(report.total_days, 30);
        assert_eq!(report.days_tracked, 2);
        assert_eq!(report.submitted_days, 2);
        assert_eq!(report.best_streak, 2);
        let strongest = report.strongest().unwrap();
        assert_eq!(strongest.habit, Habit::Charity);
        assert_eq!(strongest.percentage, 50);
    }
}
