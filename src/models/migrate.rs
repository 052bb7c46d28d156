//! Forward migration of persisted entry shapes.
//!
//! Entries have been written by several generations of the schema: a single
//! `prayer` boolean, later per-prayer flags, later per-prayer details (with
//! the supererogatory flag briefly named `sunnah`), later `adhkarDetails`,
//! `fasting` and `submitted`. There is no version tag; the shape itself says
//! how far along an entry is. Migration is an ordered list of pure steps,
//! each idempotent, each keyed on structural presence, so any mix of old and
//! new fields upgrades to the canonical shape without data loss.

use serde_json::{json, Map, Value};

use crate::models::entry::{Entry, PrayerName, QURAN_PAGES_MAX};

/// Upgrade a raw persisted value to the canonical entry shape.
///
/// `None` or JSON null means no record exists and maps to `None`. Anything
/// else migrates without error: unknown future fields pass through, and a
/// value too mangled to decode at all degrades to the empty entry. Running
/// the result through `migrate` again is a no-op.
pub fn migrate(raw: Option<Value>) -> Option<Entry> {
    let value = match raw {
        None | Some(Value::Null) => return None,
        Some(v) => v,
    };

    let mut obj = match value {
        Value::Object(obj) => obj,
        _ => return Some(Entry::empty()),
    };

    fan_out_prayers(&mut obj);
    fill_prayer_details(&mut obj);
    fill_adhkar_details(&mut obj);
    default_flag(&mut obj, "fasting");
    default_flag(&mut obj, "submitted");
    clamp_quran_pages(&mut obj);

    let entry = serde_json::from_value(Value::Object(obj)).unwrap_or_else(|e| {
        log::warn!("Unreadable entry replaced with an empty one: {}", e);
        Entry::empty()
    });
    Some(entry)
}

fn missing(obj: &Map<String, Value>, key: &str) -> bool {
    matches!(obj.get(key), None | Some(Value::Null))
}

/// Oldest schema: a single `prayer` boolean. Fan it out to all five.
fn fan_out_prayers(obj: &mut Map<String, Value>) {
    if missing(obj, "prayers") {
        let done = obj.get("prayer").and_then(Value::as_bool).unwrap_or(false);
        let mut prayers = Map::new();
        for p in PrayerName::all() {
            prayers.insert(p.as_str().to_string(), json!(done));
        }
        obj.insert("prayers".to_string(), Value::Object(prayers));
    }
}

fn default_detail() -> Value {
    json!({ "jamaa": false, "nafila": false })
}

/// Install or repair `prayerDetails`. The supererogatory flag was once
/// named `sunnah`; rename it. Whatever was stored, `asr.nafila` ends up
/// false — this is corrective enforcement, not default-filling.
fn fill_prayer_details(obj: &mut Map<String, Value>) {
    if !matches!(obj.get("prayerDetails"), Some(Value::Object(_))) {
        let mut details = Map::new();
        for p in PrayerName::all() {
            details.insert(p.as_str().to_string(), default_detail());
        }
        obj.insert("prayerDetails".to_string(), Value::Object(details));
        return;
    }

    let Some(Value::Object(details)) = obj.get_mut("prayerDetails") else {
        return;
    };

    for p in PrayerName::all() {
        let slot = details
            .entry(p.as_str().to_string())
            .or_insert_with(default_detail);
        let (jamaa, nafila) = match slot.as_object() {
            Some(detail) => (
                detail.get("jamaa").and_then(Value::as_bool).unwrap_or(false),
                if detail.contains_key("nafila") {
                    detail.get("nafila").and_then(Value::as_bool).unwrap_or(false)
                } else {
                    // Legacy attribute name.
                    detail.get("sunnah").and_then(Value::as_bool).unwrap_or(false)
                },
            ),
            None => (false, false),
        };
        *slot = json!({ "jamaa": jamaa, "nafila": nafila });
    }

    if let Some(Value::Object(asr)) = details.get_mut("asr") {
        asr.insert("nafila".to_string(), json!(false));
    }
}

fn fill_adhkar_details(obj: &mut Map<String, Value>) {
    if missing(obj, "adhkarDetails") {
        obj.insert(
            "adhkarDetails".to_string(),
            json!({ "morning": false, "evening": false, "duaa": false }),
        );
    }
}

fn default_flag(obj: &mut Map<String, Value>, key: &str) {
    if missing(obj, key) {
        obj.insert(key.to_string(), json!(false));
    }
}

/// Out-of-range page counts are clamped, never rejected; non-numeric
/// garbage becomes null.
fn clamp_quran_pages(obj: &mut Map<String, Value>) {
    let Some(pages) = obj.get_mut("quranPages") else {
        return;
    };
    if pages.is_null() {
        return;
    }
    *pages = match pages.as_i64().or_else(|| pages.as_f64().map(|f| f as i64)) {
        Some(n) => json!(n.clamp(0, QURAN_PAGES_MAX as i64)),
        None => Value::Null,
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::entry::Prayers;

    #[test]
    fn absent_record_stays_absent() {
        assert_eq!(migrate(None), None);
        assert_eq!(migrate(Some(Value::Null)), None);
    }

    #[test]
    fn legacy_prayer_flag_fans_out() {
        let e = migrate(Some(json!({ "prayer": true }))).unwrap();
        assert_eq!(e.prayers, Prayers::uniform(true));
        assert!(!e.prayer_details.asr.nafila);
        assert!(!e.fasting);
        assert!(!e.submitted);
    }

    #[test]
    fn legacy_without_any_prayer_field_defaults_false() {
        let e = migrate(Some(json!({ "quran": true }))).unwrap();
        assert_eq!(e.prayers, Prayers::uniform(false));
        assert!(e.quran);
    }

    #[test]
    fn sunnah_renames_to_nafila() {
        let e = migrate(Some(json!({
            "prayer": false,
            "prayers": { "fajr": true, "dhuhr": false, "asr": false, "maghrib": false, "isha": false },
            "prayerDetails": {
                "fajr": { "jamaa": true, "sunnah": true },
                "dhuhr": { "jamaa": false },
            },
        })))
        .unwrap();
        assert!(e.prayer_details.fajr.jamaa);
        assert!(e.prayer_details.fajr.nafila, "sunnah carried into nafila");
        assert!(!e.prayer_details.dhuhr.nafila);
        // Missing per-prayer objects are installed as all-false.
        assert!(!e.prayer_details.maghrib.jamaa);
    }

    #[test]
    fn stored_asr_nafila_is_reset() {
        let e = migrate(Some(json!({
            "prayerDetails": {
                "asr": { "jamaa": true, "nafila": true },
            },
        })))
        .unwrap();
        assert!(e.prayer_details.asr.jamaa);
        assert!(!e.prayer_details.asr.nafila);
    }

    #[test]
    fn quran_pages_are_clamped() {
        let e = migrate(Some(json!({ "quranPages": 1500 }))).unwrap();
        assert_eq!(e.quran_pages, Some(QURAN_PAGES_MAX));
        let e = migrate(Some(json!({ "quranPages": -3 }))).unwrap();
        assert_eq!(e.quran_pages, Some(0));
        let e = migrate(Some(json!({ "quranPages": null }))).unwrap();
        assert_eq!(e.quran_pages, None);
        let e = migrate(Some(json!({ "quranPages": "ten" }))).unwrap();
        assert_eq!(e.quran_pages, None);
    }

    #[test]
    fn unknown_fields_pass_through() {
        let e = migrate(Some(json!({ "prayer": true, "moonPhase": "waxing" }))).unwrap();
        assert_eq!(e.extra["moonPhase"], "waxing");
    }

    #[test]
    fn hopeless_shapes_become_the_empty_entry() {
        let e = migrate(Some(json!("scribble"))).unwrap();
        assert_eq!(e, Entry::empty());
        let e = migrate(Some(json!(42))).unwrap();
        assert_eq!(e, Entry::empty());
    }

    #[test]
    fn migrate_is_idempotent_across_generations() {
        let shapes = [
            json!({ "prayer": true }),
            json!({ "prayer": true, "quran": true, "quranPages": 5 }),
            json!({
                "prayers": { "fajr": true, "dhuhr": true, "asr": true, "maghrib": true, "isha": true },
                "prayerDetails": { "fajr": { "jamaa": true, "sunnah": true } },
            }),
            json!({ "dhikr": true, "adhkarDetails": { "morning": true, "evening": false, "duaa": false } }),
            json!({ "submitted": true, "note": "alhamdulillah", "someFutureField": [1, 2] }),
        ];
        for shape in shapes {
            let once = migrate(Some(shape)).unwrap();
            let raw = serde_json::to_value(&once).unwrap();
            let twice = migrate(Some(raw)).unwrap();
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn fully_current_shape_is_untouched() {
        let mut e = Entry::empty();
        e.set_prayer(PrayerName::Fajr, true);
        e.set_quran_pages(Some(10));
        e.note = "read at fajr".to_string();
        let raw = serde_json::to_value(&e).unwrap();
        assert_eq!(migrate(Some(raw)).unwrap(), e);
    }
}
