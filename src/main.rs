mod calendar;
mod cli;
mod config;
mod models;
mod stats;
mod store;
mod utils;

use anyhow::{Context, Result};
use clap::Parser;

use cli::args::{Cli, Commands};
use cli::handlers;
use config::AppConfig;
use store::local::{LocalStore, MARKER_WELCOME_SHOWN};
use store::{PersistenceLayer, RemoteStore};

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let mut config = AppConfig::load().context("Loading config")?;

    match cli.command {
        // Config edits do not need the stores at all.
        Commands::Config {
            hijri_offset,
            endpoint,
            api_key,
            user_id,
        } => {
            handlers::handle_config(&mut config, hijri_offset, endpoint, api_key, user_id)?;
        }

        command => {
            let data_dir = AppConfig::ensure_data_dir()?;
            let local = LocalStore::new(data_dir);
            let remote = RemoteStore::from_config(&config.remote);
            if remote.is_none() && config.remote.endpoint.is_some() {
                log::warn!("Incomplete [remote] config; running local-only");
            }

            first_run_hint(&local);

            // The initial load is the only blocking store interaction; every
            // later remote call is fire-and-forget.
            let mut layer = PersistenceLayer::open(local, remote);

            match command {
                Commands::Show { date } => handlers::handle_show(&layer, &config, &date)?,
                Commands::Mark { habit, off, date } => {
                    handlers::handle_mark(&mut layer, &habit, off, &date)?
                }
                Commands::Pray {
                    prayer,
                    jamaa,
                    nafila,
                    undo,
                    date,
                } => handlers::handle_pray(&mut layer, &prayer, jamaa, nafila, undo, &date)?,
                Commands::Quran { pages, date } => {
                    handlers::handle_quran(&mut layer, pages, &date)?
                }
                Commands::Adhkar { which, off, date } => {
                    handlers::handle_adhkar(&mut layer, &which, off, &date)?
                }
                Commands::Note { text, date } => handlers::handle_note(&mut layer, &text, &date)?,
                Commands::Submit { date } => handlers::handle_submit(&mut layer, &date)?,
                Commands::Unlock { date } => handlers::handle_unlock(&mut layer, &date)?,
                Commands::Clear { date, yes } => handlers::handle_clear(&mut layer, &date, yes)?,
                Commands::Month { date, offset } => {
                    handlers::handle_month(&layer, &config, &date, offset)?
                }
                Commands::Report {
                    date,
                    offset,
                    from,
                    to,
                } => handlers::handle_report(&layer, &config, &date, offset, &from, &to)?,
                Commands::Config { .. } => unreachable!(),
            }
        }
    }

    Ok(())
}

/// One-time welcome note; the marker lives beside the entry blob.
fn first_run_hint(local: &LocalStore) {
    if local.marker(MARKER_WELCOME_SHOWN) {
        return;
    }
    eprintln!("Welcome to wird. Try `wird show`, `wird pray fajr`, `wird month`.");
    eprintln!("Add [remote] credentials to the config file to sync across devices.");
    if let Err(e) = local.set_marker(MARKER_WELCOME_SHOWN) {
        log::warn!("Welcome marker not saved: {}", e);
    }
}
