//! Resolved runtime configuration.
//!
//! Flags take precedence over environment variables (handled by clap); this
//! module fills in defaults and turns relative paths into absolute ones.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::time::Duration;

use zentask_core::alarm::{validate_scan_interval, ScanIntervalError};
use zentask_core::default_log_level;

use crate::cli::Cli;

const DEFAULT_DATA_DIR: &str = ".zentask";
const LOG_DIR_NAME: &str = "logs";
const MOTIVATION_FILE_NAME: &str = "motivation.json";

#[derive(Debug)]
pub enum ConfigError {
    CurrentDir(std::io::Error),
    ScanInterval(ScanIntervalError),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CurrentDir(err) => write!(f, "cannot resolve current directory: {err}"),
            Self::ScanInterval(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::CurrentDir(err) => Some(err),
            Self::ScanInterval(err) => Some(err),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub log_level: String,
    pub log_dir: PathBuf,
}

impl AppConfig {
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let cwd = std::env::current_dir().map_err(ConfigError::CurrentDir)?;
        Ok(Self::resolve(
            &cwd,
            cli.data_dir.as_deref(),
            cli.log_level.as_deref(),
            cli.log_dir.as_deref(),
        ))
    }

    fn resolve(
        cwd: &Path,
        data_dir: Option<&Path>,
        log_level: Option<&str>,
        log_dir: Option<&Path>,
    ) -> Self {
        let data_dir = absolute(cwd, data_dir.unwrap_or(Path::new(DEFAULT_DATA_DIR)));
        let log_dir = match log_dir {
            Some(dir) => absolute(cwd, dir),
            None => data_dir.join(LOG_DIR_NAME),
        };
        Self {
            data_dir,
            log_level: log_level.unwrap_or(default_log_level()).to_string(),
            log_dir,
        }
    }

    pub fn default_motivation_file(&self) -> PathBuf {
        self.data_dir.join(MOTIVATION_FILE_NAME)
    }
}

/// Settings for the `watch` loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchConfig {
    pub scan_interval: Duration,
    pub quiet: bool,
    pub motivation_file: PathBuf,
}

impl WatchConfig {
    pub fn new(
        scan_interval_secs: u64,
        quiet: bool,
        motivation_file: PathBuf,
    ) -> Result<Self, ConfigError> {
        let scan_interval = validate_scan_interval(Duration::from_secs(scan_interval_secs))
            .map_err(ConfigError::ScanInterval)?;
        Ok(Self {
            scan_interval,
            quiet,
            motivation_file,
        })
    }
}

fn absolute(cwd: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}
