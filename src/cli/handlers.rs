use anyhow::Result;
use chrono::Datelike;
use std::io::{self, BufRead, Write};
use std::str::FromStr;

use crate::calendar::{date_range, format_hijri, lunar_parts, to_arabic_numerals, DateKey, LunarMonth};
use crate::config::AppConfig;
use crate::models::{Habit, PrayerName};
use crate::stats;
use crate::store::PersistenceLayer;
use crate::utils::format::{check_mark, progress_bar};

// ─── ANSI helpers ────────────────────────────────────────────────────────────

macro_rules! println_colored {
    ($color:expr, $($arg:tt)*) => {{
        print!("{}", $color);
        print!($($arg)*);
        println!("\x1b[0m");
    }};
}

const GREEN: &str = "\x1b[32m";
const AMBER: &str = "\x1b[33m";
const DIM: &str = "\x1b[2m";
const BOLD: &str = "\x1b[1m";
const GOLD: &str = "\x1b[38;2;196;160;68m";

fn resolve_date(date: &Option<String>) -> Result<DateKey> {
    match date {
        Some(s) => DateKey::from_str(s),
        None => Ok(DateKey::today()),
    }
}

// ─── Show ────────────────────────────────────────────────────────────────────

pub fn handle_show(layer: &PersistenceLayer, config: &AppConfig, date: &Option<String>) -> Result<()> {
    let date = resolve_date(date)?;
    let entry = layer.entry(&date);
    let offset = config.hijri.offset_days;

    println!();
    println_colored!(GOLD, "  {}", date);
    let parts = lunar_parts(&date, offset);
    println_colored!(
        DIM,
        "  {}  ({}/{}/{})",
        format_hijri(&date, offset),
        to_arabic_numerals(parts.day),
        to_arabic_numerals(parts.month),
        to_arabic_numerals(parts.year)
    );
    println!();

    if entry.is_blank() && !layer.entries().contains_key(&date) {
        println_colored!(DIM, "  Nothing recorded for this day yet.");
        println!();
    }

    for p in PrayerName::all() {
        let done = entry.prayers.get(p);
        let detail = entry.prayer_details.get(p);
        let mut tags = Vec::new();
        if detail.jamaa {
            tags.push("jamaa");
        }
        if detail.nafila {
            tags.push("nafila");
        }
        let tags = if tags.is_empty() {
            String::new()
        } else {
            format!("  ({})", tags.join(", "))
        };
        if done {
            println_colored!(GREEN, "  {} {:<8}{}", check_mark(true), p.display_name(), tags);
        } else {
            println_colored!(DIM, "  {} {:<8}", check_mark(false), p.display_name());
        }
    }
    println_colored!(DIM, "    {}/5 prayers", entry.prayers.done_count());

    println!();
    for habit in [Habit::Quran, Habit::Fasting, Habit::Qiyam, Habit::Charity, Habit::Dhikr] {
        let done = entry.habit_done(habit);
        let extra = match habit {
            Habit::Quran => match entry.quran_pages {
                Some(pages) => format!("  {} pages", pages),
                None => String::new(),
            },
            Habit::Dhikr => {
                let a = entry.adhkar_details;
                let mut parts = Vec::new();
                if a.morning {
                    parts.push("morning");
                }
                if a.evening {
                    parts.push("evening");
                }
                if a.duaa {
                    parts.push("duaa");
                }
                if parts.is_empty() {
                    String::new()
                } else {
                    format!("  ({})", parts.join(", "))
                }
            }
            _ => String::new(),
        };
        if done || !extra.is_empty() {
            println_colored!(GREEN, "  {} {:<8}{}", check_mark(done), habit.display_name(), extra);
        } else {
            println_colored!(DIM, "  {} {:<8}", check_mark(false), habit.display_name());
        }
    }

    if !entry.note.is_empty() {
        println!();
        println_colored!(DIM, "  Note: {}", entry.note);
    }

    println!();
    if entry.submitted {
        println_colored!(GOLD, "  Submitted — locked against edits");
    }
    let streak = stats::streak(layer.entries(), &date);
    if streak > 0 {
        println_colored!(AMBER, "  Streak: {} day(s)", streak);
    }
    println!();
    Ok(())
}

// ─── Edits ───────────────────────────────────────────────────────────────────

pub fn handle_mark(
    layer: &mut PersistenceLayer,
    habit: &str,
    off: bool,
    date: &Option<String>,
) -> Result<()> {
    let date = resolve_date(date)?;
    let habit = Habit::from_str(habit)?;
    let mut entry = layer.entry(&date);
    entry.set_habit(habit, !off);
    layer.update(&date, entry)?;
    let state = if off { "cleared" } else { "done" };
    println_colored!(GREEN, "  {} {} — {}", habit.display_name(), state, date);
    Ok(())
}

pub fn handle_pray(
    layer: &mut PersistenceLayer,
    prayer: &str,
    jamaa: bool,
    nafila: bool,
    undo: bool,
    date: &Option<String>,
) -> Result<()> {
    let date = resolve_date(date)?;
    let prayer = PrayerName::from_str(prayer)?;
    let mut entry = layer.entry(&date);

    entry.set_prayer(prayer, !undo);
    if undo {
        entry.set_jamaa(prayer, false);
        entry.set_nafila(prayer, false);
    } else {
        if jamaa {
            entry.set_jamaa(prayer, true);
        }
        if nafila {
            if prayer == PrayerName::Asr {
                println_colored!(AMBER, "  No nafila is recorded after asr; flag ignored");
            }
            entry.set_nafila(prayer, true);
        }
    }
    let all_done = entry.prayer;
    layer.update(&date, entry)?;

    if undo {
        println_colored!(AMBER, "  {} un-marked — {}", prayer.display_name(), date);
    } else {
        println_colored!(GREEN, "  {} prayed — {}", prayer.display_name(), date);
        if all_done {
            println_colored!(GOLD, "  All five prayers complete, alhamdulillah");
        }
    }
    Ok(())
}

pub fn handle_quran(
    layer: &mut PersistenceLayer,
    pages: Option<u32>,
    date: &Option<String>,
) -> Result<()> {
    let date = resolve_date(date)?;
    let mut entry = layer.entry(&date);
    match pages {
        Some(pages) => entry.set_quran_pages(Some(pages)),
        None => entry.set_quran(true),
    }
    let recorded = entry.quran_pages;
    layer.update(&date, entry)?;
    match recorded {
        Some(pages) => println_colored!(GREEN, "  Qur'an: {} page(s) — {}", pages, date),
        None => println_colored!(GREEN, "  Qur'an reading recorded — {}", date),
    }
    Ok(())
}

pub fn handle_adhkar(
    layer: &mut PersistenceLayer,
    which: &str,
    off: bool,
    date: &Option<String>,
) -> Result<()> {
    let date = resolve_date(date)?;
    let mut entry = layer.entry(&date);
    match which.to_lowercase().as_str() {
        "morning" => entry.set_adhkar_morning(!off),
        "evening" => entry.set_adhkar_evening(!off),
        "duaa" | "dua" => entry.set_adhkar_duaa(!off),
        other => anyhow::bail!("Unknown adhkar '{}' (morning, evening, duaa)", other),
    }
    layer.update(&date, entry)?;
    println_colored!(GREEN, "  Adhkar ({}) updated — {}", which, date);
    Ok(())
}

pub fn handle_note(layer: &mut PersistenceLayer, text: &str, date: &Option<String>) -> Result<()> {
    let date = resolve_date(date)?;
    let mut entry = layer.entry(&date);
    entry.note = text.to_string();
    layer.update(&date, entry)?;
    println_colored!(GREEN, "  Note saved — {}", date);
    Ok(())
}

pub fn handle_submit(layer: &mut PersistenceLayer, date: &Option<String>) -> Result<()> {
    let date = resolve_date(date)?;
    if layer.is_locked(&date) {
        println_colored!(DIM, "  {} is already submitted", date);
        return Ok(());
    }
    let mut entry = layer.entry(&date);
    entry.submitted = true;
    layer.update(&date, entry)?;
    println_colored!(GOLD, "  {} submitted — may it be accepted", date);
    Ok(())
}

pub fn handle_unlock(layer: &mut PersistenceLayer, date: &Option<String>) -> Result<()> {
    let date = resolve_date(date)?;
    if !layer.is_locked(&date) {
        println_colored!(DIM, "  {} is not locked", date);
        return Ok(());
    }
    let mut entry = layer.entry(&date);
    entry.submitted = false;
    layer.update(&date, entry)?;
    println_colored!(AMBER, "  {} unlocked for editing", date);
    Ok(())
}

pub fn handle_clear(layer: &mut PersistenceLayer, date: &Option<String>, yes: bool) -> Result<()> {
    let date = resolve_date(date)?;
    if !layer.entries().contains_key(&date) {
        println_colored!(DIM, "  Nothing recorded for {}", date);
        return Ok(());
    }
    if !yes {
        print!("  Delete the whole record for {}? [y/N] ", date);
        io::stdout().flush()?;
        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        if !matches!(line.trim().to_lowercase().as_str(), "y" | "yes") {
            println!("  Kept.");
            return Ok(());
        }
    }
    layer.clear(&date)?;
    println_colored!(AMBER, "  {} cleared", date);
    Ok(())
}

// ─── Month view ──────────────────────────────────────────────────────────────

fn month_for(config: &AppConfig, date: &Option<String>, offset: i32) -> Result<LunarMonth> {
    let anchor = resolve_date(date)?;
    let mut month = LunarMonth::containing(&anchor, config.hijri.offset_days);
    for _ in 0..offset.abs() {
        month = if offset < 0 { month.prev() } else { month.next() };
    }
    Ok(month)
}

pub fn handle_month(
    layer: &PersistenceLayer,
    config: &AppConfig,
    date: &Option<String>,
    offset: i32,
) -> Result<()> {
    let month = month_for(config, date, offset)?;
    let hijri_offset = config.hijri.offset_days;
    let today = DateKey::today();

    println!();
    println_colored!(
        GOLD,
        "  {} ({})  {} → {}",
        month.title(),
        to_arabic_numerals(month.parts().year),
        month.first(),
        month.last()
    );
    println_colored!(DIM, "  Su Mo Tu We Th Fr Sa");

    // Sunday-first grid; lead with blanks up to the first day's weekday.
    let mut row: Vec<String> = Vec::new();
    let lead = month.first().to_date().weekday().num_days_from_sunday() as usize;
    for _ in 0..lead {
        row.push("  ".to_string());
    }

    for day in month.days() {
        let lunar_day = lunar_parts(day, hijri_offset).day;
        let score = layer.entries().get(day).map(|e| e.score()).unwrap_or(0);
        let color = if *day == today {
            GOLD
        } else if score >= 5 {
            GREEN
        } else if score > 0 {
            AMBER
        } else {
            DIM
        };
        row.push(format!("{}{:>2}\x1b[0m", color, lunar_day));
        if row.len() == 7 {
            println!("  {}", row.join(" "));
            row.clear();
        }
    }
    if !row.is_empty() {
        println!("  {}", row.join(" "));
    }

    println_colored!(DIM, "  {} days — gold: today, green: all habits", month.days().len());
    println!();
    Ok(())
}

// ─── Report ──────────────────────────────────────────────────────────────────

pub fn handle_report(
    layer: &PersistenceLayer,
    config: &AppConfig,
    date: &Option<String>,
    offset: i32,
    from: &Option<String>,
    to: &Option<String>,
) -> Result<()> {
    let (days, title) = match (from, to) {
        (Some(from), Some(to)) => {
            let from: DateKey = from.parse()?;
            let to: DateKey = to.parse()?;
            if from > to {
                anyhow::bail!("--from {} is after --to {}", from, to);
            }
            let title = format!("{} → {}", from, to);
            (date_range(&from, &to), title)
        }
        _ => {
            let month = month_for(config, date, offset)?;
            let title = month.title();
            (month.days().to_vec(), title)
        }
    };
    let report = stats::month_report(layer.entries(), &days);

    println!();
    println_colored!(GOLD, "  Report — {}", title);
    println!();
    println_colored!(
        BOLD,
        "  Submitted days   {:>3}   ({})",
        report.submitted_days,
        to_arabic_numerals(report.submitted_days)
    );
    println_colored!(
        BOLD,
        "  Best streak      {:>3}   ({})",
        report.best_streak,
        to_arabic_numerals(report.best_streak)
    );
    println_colored!(
        BOLD,
        "  Days tracked     {:>3} of {}",
        report.days_tracked,
        report.total_days
    );
    println!();

    for stat in &report.habit_stats {
        println!(
            "  {:<8} {} {:>3}%  ({})",
            stat.habit.display_name(),
            progress_bar(stat.percentage, 100, 12),
            stat.percentage,
            stat.count
        );
    }

    println!();
    if let Some(strongest) = report.strongest() {
        println_colored!(
            GREEN,
            "  Strongest: {} ({}%)",
            strongest.habit.display_name(),
            strongest.percentage
        );
    }
    if let Some(weakest) = report.weakest() {
        println_colored!(
            AMBER,
            "  Needs work: {} ({}%)",
            weakest.habit.display_name(),
            weakest.percentage
        );
    }
    if report.days_tracked == 0 {
        println_colored!(DIM, "  No data recorded in this month yet.");
    }
    println!();
    Ok(())
}

// ─── Config ──────────────────────────────────────────────────────────────────

pub fn handle_config(
    config: &mut AppConfig,
    hijri_offset: Option<i32>,
    endpoint: Option<String>,
    api_key: Option<String>,
    user_id: Option<String>,
) -> Result<()> {
    let changed = hijri_offset.is_some()
        || endpoint.is_some()
        || api_key.is_some()
        || user_id.is_some();

    if let Some(offset) = hijri_offset {
        config.hijri.offset_days = offset;
    }
    if let Some(endpoint) = endpoint {
        config.remote.endpoint = Some(endpoint);
    }
    if let Some(api_key) = api_key {
        config.remote.api_key = Some(api_key);
    }
    if let Some(user_id) = user_id {
        config.remote.user_id = Some(user_id);
    }

    if changed {
        config.save()?;
        println_colored!(GREEN, "  Config saved to {:?}", AppConfig::config_path()?);
    } else {
        println_colored!(GOLD, "  wird configuration");
        println!("  hijri offset: {} day(s)", config.hijri.offset_days);
        let remote = match (
            &config.remote.endpoint,
            &config.remote.api_key,
            &config.remote.user_id,
        ) {
            (Some(e), Some(_), Some(u)) => format!("{} (user {})", e, u),
            (None, None, None) => "not configured (local-only)".to_string(),
            _ => "incomplete — endpoint, api key and user id are all required".to_string(),
        };
        println!("  remote sync:  {}", remote);
    }
    Ok(())
}
