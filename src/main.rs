//! Binary entry point: resolve configuration, start logging, bring up the
//! place store, load the session's place list, and drive the Ratatui event
//! loop until the user exits.
use anyhow::Context;
use clap::Parser;
use place_keeper::cli::Cli;
use place_keeper::config::AppConfig;
use place_keeper::{logging, run_app, App, Database, PlaceList};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::from_cli(&cli)?;
    logging::init(&config.log_path, config.verbose)?;

    let store = Database::open(&config.db_path)
        .and_then(|db| db.initialize(config.reset_db))
        .context("failed to initialize place database")?;
    let places = PlaceList::load(store).context("failed to load places")?;

    let mut app = App::new(places);
    run_app(&mut app)
}
