pub mod entry;
pub mod migrate;

pub use entry::{Entry, Habit, PrayerName, Prayers, QURAN_PAGES_MAX};
pub use migrate::migrate;
