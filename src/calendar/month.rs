use crate::calendar::civil::DateKey;
use crate::calendar::hijri::{lunar_parts, LunarParts};

/// Safety bound on the day-by-day scans: a lunar month is never longer than
/// 30 days, so 35 probes means the calendar authority is misbehaving.
const MONTH_SCAN_CAP: usize = 35;

/// Walk backward from `anchor` until the authority reports lunar day 1.
/// Every day of a lunar month maps to the same start key. If the cap is
/// exhausted the walk stops where it is rather than looping forever.
pub fn find_lunar_month_start(anchor: &DateKey, offset_days: i32) -> DateKey {
    let mut cur = anchor.clone();
    for _ in 0..MONTH_SCAN_CAP {
        if lunar_parts(&cur, offset_days).day == 1 {
            return cur;
        }
        cur = cur.prev_day();
    }
    cur
}

/// Every civil day of the lunar month containing `anchor`, in order.
/// Always 29 or 30 entries, contiguous.
pub fn build_lunar_month_days(anchor: &DateKey, offset_days: i32) -> Vec<DateKey> {
    let start = find_lunar_month_start(anchor, offset_days);
    let month = lunar_parts(&start, offset_days);

    let mut days = Vec::new();
    let mut cur = start;
    for _ in 0..MONTH_SCAN_CAP {
        if !lunar_parts(&cur, offset_days).same_month(&month) {
            break;
        }
        days.push(cur.clone());
        cur = cur.next_day();
    }
    days
}

/// A lunar month as its ordered civil-day keys, with navigation.
#[derive(Debug, Clone)]
pub struct LunarMonth {
    days: Vec<DateKey>,
    offset_days: i32,
}

impl LunarMonth {
    pub fn containing(anchor: &DateKey, offset_days: i32) -> LunarMonth {
        LunarMonth {
            days: build_lunar_month_days(anchor, offset_days),
            offset_days,
        }
    }

    pub fn days(&self) -> &[DateKey] {
        &self.days
    }

    pub fn first(&self) -> &DateKey {
        &self.days[0]
    }

    pub fn last(&self) -> &DateKey {
        &self.days[self.days.len() - 1]
    }

    pub fn parts(&self) -> LunarParts {
        lunar_parts(self.first(), self.offset_days)
    }

    pub fn title(&self) -> String {
        self.parts().month_year()
    }

    /// Rebuild around the day before this month's first day.
    pub fn prev(&self) -> LunarMonth {
        LunarMonth::containing(&self.first().prev_day(), self.offset_days)
    }

    /// Rebuild around the day after this month's last day.
    pub fn next(&self) -> LunarMonth {
        LunarMonth::containing(&self.last().next_day(), self.offset_days)
    }
}
