use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "wird", version, author, about = "A terminal companion for tracking daily Islamic observances")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show a day's record
    Show {
        /// Day to show (YYYY-MM-DD), default today
        #[arg(long)]
        date: Option<String>,
    },
    /// Toggle a habit for a day (prayer, quran, fasting, qiyam, charity, dhikr)
    Mark {
        /// Habit name
        habit: String,
        /// Turn the habit off instead of on
        #[arg(long)]
        off: bool,
        #[arg(long)]
        date: Option<String>,
    },
    /// Mark a single prayer as prayed
    Pray {
        /// Prayer name (fajr, dhuhr, asr, maghrib, isha)
        prayer: String,
        /// Prayed in congregation
        #[arg(long)]
        jamaa: bool,
        /// Prayed the supererogatory prayer (not recognized after asr)
        #[arg(long)]
        nafila: bool,
        /// Un-mark instead
        #[arg(long)]
        undo: bool,
        #[arg(long)]
        date: Option<String>,
    },
    /// Record Qur'an pages read
    Quran {
        /// Pages read (0-1000); omit to just set the flag
        pages: Option<u32>,
        #[arg(long)]
        date: Option<String>,
    },
    /// Mark morning/evening adhkar or du'aa
    Adhkar {
        /// One of: morning, evening, duaa
        which: String,
        #[arg(long)]
        off: bool,
        #[arg(long)]
        date: Option<String>,
    },
    /// Attach a free-text reflection to a day
    Note {
        text: String,
        #[arg(long)]
        date: Option<String>,
    },
    /// Finalize a day; a submitted day is locked against edits
    Submit {
        #[arg(long)]
        date: Option<String>,
    },
    /// Unlock a previously submitted day
    Unlock {
        #[arg(long)]
        date: Option<String>,
    },
    /// Delete a day's record entirely
    Clear {
        #[arg(long)]
        date: Option<String>,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Hijri month calendar with completion dots
    Month {
        /// Anchor day (YYYY-MM-DD), default today
        #[arg(long)]
        date: Option<String>,
        /// Lunar months to step from the anchor's month (negative = past)
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        offset: i32,
    },
    /// Streaks and per-habit compliance for a lunar month or a date range
    Report {
        #[arg(long)]
        date: Option<String>,
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        offset: i32,
        /// Report over an explicit range instead of a lunar month
        #[arg(long, requires = "to")]
        from: Option<String>,
        #[arg(long, requires = "from")]
        to: Option<String>,
    },
    /// Read or update configuration
    Config {
        /// Hijri day offset for local moon sighting (e.g. -1)
        #[arg(long, allow_hyphen_values = true)]
        hijri_offset: Option<i32>,
        /// PostgREST endpoint for remote sync
        #[arg(long)]
        endpoint: Option<String>,
        #[arg(long)]
        api_key: Option<String>,
        #[arg(long)]
        user_id: Option<String>,
    },
}
