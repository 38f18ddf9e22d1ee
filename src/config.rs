use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use directories::BaseDirs;

use crate::cli::Cli;

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".place-keeper";
/// SQLite file name stored inside the application data directory.
const DB_FILE_NAME: &str = "places.sqlite";
/// Log file name stored next to the database.
const LOG_FILE_NAME: &str = "place-keeper.log";

/// Runtime settings after merging command-line flags with defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub log_path: PathBuf,
    /// Recreate the table at startup, discarding every row.
    pub reset_db: bool,
    pub verbose: bool,
}

impl AppConfig {
    /// Resolve paths against the user's home directory.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let base_dirs = BaseDirs::new().ok_or_else(|| anyhow!("could not locate home directory"))?;
        Ok(Self::with_data_dir(cli, &base_dirs.home_dir().join(DATA_DIR_NAME)))
    }

    /// Resolve paths against an explicit data directory.
    pub fn with_data_dir(cli: &Cli, data_dir: &Path) -> Self {
        Self {
            db_path: cli
                .db
                .clone()
                .unwrap_or_else(|| data_dir.join(DB_FILE_NAME)),
            log_path: cli
                .log_file
                .clone()
                .unwrap_or_else(|| data_dir.join(LOG_FILE_NAME)),
            reset_db: cli.reset_db,
            verbose: cli.verbose,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_live_in_the_data_dir() {
        let config = AppConfig::with_data_dir(&Cli::default(), Path::new("/tmp/pk"));
        assert_eq!(config.db_path, PathBuf::from("/tmp/pk/places.sqlite"));
        assert_eq!(config.log_path, PathBuf::from("/tmp/pk/place-keeper.log"));
        assert!(!config.reset_db);
    }

    #[test]
    fn flags_override_defaults() {
        let cli = Cli {
            db: Some(PathBuf::from("/data/mine.db")),
            reset_db: true,
            log_file: Some(PathBuf::from("/var/log/pk.log")),
            verbose: true,
        };
        let config = AppConfig::with_data_dir(&cli, Path::new("/tmp/pk"));
        assert_eq!(config.db_path, PathBuf::from("/data/mine.db"));
        assert_eq!(config.log_path, PathBuf::from("/var/log/pk.log"));
        assert!(config.reset_db);
        assert!(config.verbose);
    }
}
