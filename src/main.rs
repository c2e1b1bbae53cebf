mod cli;
mod config;
mod db;
mod engine;
mod error;
mod models;
mod tracker;
mod tui;
mod utils;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;

use cli::args::{Cli, Commands};
use cli::handlers;
use config::AppConfig;
use db::SqliteStore;
use tracker::Tracker;

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = AppConfig::load().context("Loading config")?;
    let db_path = AppConfig::ensure_db_dir()?;
    log::debug!("using database {:?}", db_path);

    // No subcommand → launch TUI
    let Some(command) = cli.command else {
        return tui::app::run(config, &db_path);
    };

    let store = SqliteStore::open(&db_path)?;
    let tracker = Tracker::new(store, config.tracker);
    let today = Local::now().date_naive();

    match command {
        Commands::Today => handlers::handle_today(&tracker, &config, today)?,
        Commands::Toggle { prayer, date } => {
            handlers::handle_toggle(&tracker, &prayer, &date, today)?;
        }
        Commands::Mark { prayer, date, undo } => {
            handlers::handle_mark(&tracker, &prayer, &date, undo, today)?;
        }
        Commands::Week { date, offset } => {
            handlers::handle_week(&tracker, &date, offset, today)?;
        }
        Commands::Month { date, offset } => {
            handlers::handle_month(&tracker, &config, &date, offset, today)?;
        }
        Commands::Stats => handlers::handle_stats(&tracker, &config, today)?,
        Commands::Export { json } => handlers::handle_export(&tracker, json, today)?,
    }

    Ok(())
}
