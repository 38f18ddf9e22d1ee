use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug, Default)]
#[command(name = "place-keeper")]
#[command(about = "Record, favorite, and search places of interest from the terminal", long_about = None)]
pub struct Cli {
    /// SQLite file holding the places
    #[arg(long, env = "PLACE_KEEPER_DB")]
    pub db: Option<PathBuf>,

    /// Drop and recreate the place table before starting (destroys all places)
    #[arg(long)]
    pub reset_db: bool,

    /// Where to write the application log
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Log debug events (overridden by RUST_LOG)
    #[arg(short, long)]
    pub verbose: bool,
}
