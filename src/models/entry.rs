#![allow(dead_code)]
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Upper bound on a day's recorded Qur'an pages; out-of-range input is
/// clamped, never rejected.
pub const QURAN_PAGES_MAX: u32 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrayerName {
    Fajr,
    Dhuhr,
    Asr,
    Maghrib,
    Isha,
}

impl PrayerName {
    pub fn all() -> [PrayerName; 5] {
        [
            PrayerName::Fajr,
            PrayerName::Dhuhr,
            PrayerName::Asr,
            PrayerName::Maghrib,
            PrayerName::Isha,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PrayerName::Fajr => "fajr",
            PrayerName::Dhuhr => "dhuhr",
            PrayerName::Asr => "asr",
            PrayerName::Maghrib => "maghrib",
            PrayerName::Isha => "isha",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PrayerName::Fajr => "Fajr",
            PrayerName::Dhuhr => "Dhuhr",
            PrayerName::Asr => "Asr",
            PrayerName::Maghrib => "Maghrib",
            PrayerName::Isha => "Isha",
        }
    }
}

impl fmt::Display for PrayerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for PrayerName {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fajr" => Ok(PrayerName::Fajr),
            "dhuhr" | "zuhr" | "dhuhur" => Ok(PrayerName::Dhuhr),
            "asr" => Ok(PrayerName::Asr),
            "maghrib" => Ok(PrayerName::Maghrib),
            "isha" => Ok(PrayerName::Isha),
            _ => Err(anyhow::anyhow!("Unknown prayer: {}", s)),
        }
    }
}

/// The trackable habits, as they appear in entry fields and reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Habit {
    Prayer,
    Quran,
    Fasting,
    Qiyam,
    Charity,
    Dhikr,
}

impl Habit {
    pub fn all() -> [Habit; 6] {
        [
            Habit::Prayer,
            Habit::Quran,
            Habit::Fasting,
            Habit::Qiyam,
            Habit::Charity,
            Habit::Dhikr,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Habit::Prayer => "prayer",
            Habit::Quran => "quran",
            Habit::Fasting => "fasting",
            Habit::Qiyam => "qiyam",
            Habit::Charity => "charity",
            Habit::Dhikr => "dhikr",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Habit::Prayer => "Prayer",
            Habit::Quran => "Qur'an",
            Habit::Fasting => "Fasting",
            Habit::Qiyam => "Qiyam",
            Habit::Charity => "Charity",
            Habit::Dhikr => "Dhikr",
        }
    }
}

impl fmt::Display for Habit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for Habit {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "prayer" | "salah" => Ok(Habit::Prayer),
            "quran" | "qur'an" => Ok(Habit::Quran),
            "fasting" | "sawm" => Ok(Habit::Fasting),
            "qiyam" => Ok(Habit::Qiyam),
            "charity" | "sadaqah" => Ok(Habit::Charity),
            "dhikr" | "adhkar" => Ok(Habit::Dhikr),
            _ => Err(anyhow::anyhow!("Unknown habit: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Prayers {
    pub fajr: bool,
    pub dhuhr: bool,
    pub asr: bool,
    pub maghrib: bool,
    pub isha: bool,
}

impl Prayers {
    pub fn get(&self, name: PrayerName) -> bool {
        match name {
            PrayerName::Fajr => self.fajr,
            PrayerName::Dhuhr => self.dhuhr,
            PrayerName::Asr => self.asr,
            PrayerName::Maghrib => self.maghrib,
            PrayerName::Isha => self.isha,
        }
    }

    fn get_mut(&mut self, name: PrayerName) -> &mut bool {
        match name {
            PrayerName::Fajr => &mut self.fajr,
            PrayerName::Dhuhr => &mut self.dhuhr,
            PrayerName::Asr => &mut self.asr,
            PrayerName::Maghrib => &mut self.maghrib,
            PrayerName::Isha => &mut self.isha,
        }
    }

    pub fn all_done(&self) -> bool {
        PrayerName::all().iter().all(|p| self.get(*p))
    }

    pub fn done_count(&self) -> u32 {
        PrayerName::all().iter().filter(|p| self.get(**p)).count() as u32
    }

    pub fn uniform(done: bool) -> Prayers {
        Prayers {
            fajr: done,
            dhuhr: done,
            asr: done,
            maghrib: done,
            isha: done,
        }
    }
}

/// Per-prayer sub-attributes: prayed in congregation, supererogatory prayed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrayerDetail {
    pub jamaa: bool,
    pub nafila: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrayerDetails {
    pub fajr: PrayerDetail,
    pub dhuhr: PrayerDetail,
    pub asr: PrayerDetail,
    pub maghrib: PrayerDetail,
    pub isha: PrayerDetail,
}

impl PrayerDetails {
    pub fn get(&self, name: PrayerName) -> PrayerDetail {
        match name {
            PrayerName::Fajr => self.fajr,
            PrayerName::Dhuhr => self.dhuhr,
            PrayerName::Asr => self.asr,
            PrayerName::Maghrib => self.maghrib,
            PrayerName::Isha => self.isha,
        }
    }

    fn get_mut(&mut self, name: PrayerName) -> &mut PrayerDetail {
        match name {
            PrayerName::Fajr => &mut self.fajr,
            PrayerName::Dhuhr => &mut self.dhuhr,
            PrayerName::Asr => &mut self.asr,
            PrayerName::Maghrib => &mut self.maghrib,
            PrayerName::Isha => &mut self.isha,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdhkarDetails {
    pub morning: bool,
    pub evening: bool,
    pub duaa: bool,
}

/// One day's record of observances. Stored under its civil date key;
/// implicitly an all-false default until first mutated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Entry {
    /// Denormalized: true iff all five `prayers` sub-flags are true.
    pub prayer: bool,
    pub prayers: Prayers,
    pub prayer_details: PrayerDetails,
    pub quran: bool,
    pub quran_pages: Option<u32>,
    pub qiyam: bool,
    pub charity: bool,
    pub dhikr: bool,
    pub adhkar_details: AdhkarDetails,
    pub fasting: bool,
    /// Day-level lock: once submitted, the store rejects further edits
    /// until an explicit unlock.
    pub submitted: bool,
    pub note: String,
    /// Fields a newer schema wrote that this build does not know about;
    /// carried through reads and writes untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Entry {
    pub fn empty() -> Entry {
        Entry::default()
    }

    pub fn habit_done(&self, habit: Habit) -> bool {
        match habit {
            Habit::Prayer => self.prayer,
            Habit::Quran => self.quran,
            Habit::Fasting => self.fasting,
            Habit::Qiyam => self.qiyam,
            Habit::Charity => self.charity,
            Habit::Dhikr => self.dhikr,
        }
    }

    /// Completion score for the calendar dots (fasting is seasonal and
    /// excluded, matching the month grid).
    pub fn score(&self) -> u32 {
        [Habit::Prayer, Habit::Quran, Habit::Qiyam, Habit::Charity, Habit::Dhikr]
            .iter()
            .filter(|h| self.habit_done(**h))
            .count() as u32
    }

    /// True when nothing has been recorded against the day.
    pub fn is_blank(&self) -> bool {
        *self == Entry::empty()
    }

    pub fn set_prayer(&mut self, name: PrayerName, done: bool) {
        *self.prayers.get_mut(name) = done;
        self.prayer = self.prayers.all_done();
    }

    /// Toggle the parent row: all five prayers move together.
    pub fn set_all_prayers(&mut self, done: bool) {
        self.prayers = Prayers::uniform(done);
        self.prayer = done;
    }

    pub fn set_jamaa(&mut self, name: PrayerName, jamaa: bool) {
        self.prayer_details.get_mut(name).jamaa = jamaa;
    }

    /// No supererogatory prayer is recognized after asr; setting it there
    /// is silently dropped.
    pub fn set_nafila(&mut self, name: PrayerName, nafila: bool) {
        let detail = self.prayer_details.get_mut(name);
        detail.nafila = match name {
            PrayerName::Asr => false,
            _ => nafila,
        };
    }

    /// Clearing the flag clears the page count with it.
    pub fn set_quran(&mut self, done: bool) {
        self.quran = done;
        if !done {
            self.quran_pages = None;
        }
    }

    /// Pages are clamped to `0..=QURAN_PAGES_MAX`; a positive count implies
    /// the reading flag.
    pub fn set_quran_pages(&mut self, pages: Option<u32>) {
        let clamped = pages.map(|p| p.min(QURAN_PAGES_MAX));
        if matches!(clamped, Some(p) if p > 0) {
            self.quran = true;
        }
        self.quran_pages = clamped;
    }

    /// Sub-flags are independent of the parent `dhikr` flag.
    pub fn set_adhkar_morning(&mut self, done: bool) {
        self.adhkar_details.morning = done;
    }

    pub fn set_adhkar_evening(&mut self, done: bool) {
        self.adhkar_details.evening = done;
    }

    pub fn set_adhkar_duaa(&mut self, done: bool) {
        self.adhkar_details.duaa = done;
    }

    pub fn set_habit(&mut self, habit: Habit, done: bool) {
        match habit {
            Habit::Prayer => self.set_all_prayers(done),
            Habit::Quran => self.set_quran(done),
            Habit::Fasting => self.fasting = done,
            Habit::Qiyam => self.qiyam = done,
            Habit::Charity => self.charity = done,
            Habit::Dhikr => self.dhikr = done,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_entry_is_all_false() {
        let e = Entry::empty();
        assert!(!e.prayer && !e.quran && !e.qiyam && !e.charity && !e.dhikr);
        assert!(!e.fasting && !e.submitted);
        assert_eq!(e.quran_pages, None);
        assert_eq!(e.note, "");
        assert!(!e.prayers.all_done());
        assert_eq!(e.score(), 0);
    }

    #[test]
    fn single_prayer_recomputes_parent() {
        let mut e = Entry::empty();
        for p in PrayerName::all() {
            assert!(!e.prayer);
            e.set_prayer(p, true);
        }
        assert!(e.prayer, "all five set implies the parent flag");
        e.set_prayer(PrayerName::Asr, false);
        assert!(!e.prayer);
    }

    #[test]
    fn parent_toggle_fans_out() {
        let mut e = Entry::empty();
        e.set_all_prayers(true);
        assert!(e.prayers.all_done() && e.prayer);
        e.set_all_prayers(false);
        assert_eq!(e.prayers, Prayers::default());
    }

    #[test]
    fn asr_nafila_is_never_set() {
        let mut e = Entry::empty();
        e.set_nafila(PrayerName::Asr, true);
        assert!(!e.prayer_details.asr.nafila);
        e.set_nafila(PrayerName::Fajr, true);
        assert!(e.prayer_details.fajr.nafila);
        e.set_jamaa(PrayerName::Asr, true);
        assert!(e.prayer_details.asr.jamaa, "jamaa is unrestricted");
    }

    #[test]
    fn quran_pages_clamp_and_imply_flag() {
        let mut e = Entry::empty();
        e.set_quran_pages(Some(1500));
        assert_eq!(e.quran_pages, Some(QURAN_PAGES_MAX));
        assert!(e.quran);
        e.set_quran_pages(Some(0));
        assert_eq!(e.quran_pages, Some(0));
        assert!(e.quran, "zero pages does not clear the flag");
        e.set_quran(false);
        assert_eq!(e.quran_pages, None);
    }

    #[test]
    fn dhikr_parent_is_independent_of_sub_flags() {
        let mut e = Entry::empty();
        e.set_adhkar_morning(true);
        e.set_adhkar_evening(true);
        e.set_adhkar_duaa(true);
        assert!(!e.dhikr);
        e.set_habit(Habit::Dhikr, true);
        assert!(e.dhikr);
        e.set_adhkar_morning(false);
        assert!(e.dhikr);
    }

    #[test]
    fn unknown_fields_round_trip() {
        let json = r#"{"prayer":true,"futureField":{"x":1}}"#;
        let e: Entry = serde_json::from_str(json).unwrap();
        assert!(e.extra.contains_key("futureField"));
        let back = serde_json::to_value(&e).unwrap();
        assert_eq!(back["futureField"]["x"], 1);
    }

    #[test]
    fn serde_uses_the_persisted_field_names() {
        let mut e = Entry::empty();
        e.set_quran_pages(Some(5));
        let v = serde_json::to_value(&e).unwrap();
        assert_eq!(v["quranPages"], 5);
        assert!(v["prayerDetails"]["asr"].is_object());
        assert!(v["adhkarDetails"]["morning"].is_boolean());
    }
}
