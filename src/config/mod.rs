//! Configuration management
//!
//! Precedence, lowest first: built-in defaults, `--config` TOML file,
//! `ROMSYNC_*` environment variables, command-line arguments.

use super::types::SyncError;
use clap::{ArgAction, Parser};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Default extension of the files that are synced
pub const DEFAULT_SYNC_EXTENSION: &str = ".zip";

/// Default suffix the download manager appends to unfinished files
pub const DEFAULT_IN_PROGRESS_SUFFIX: &str = ".fdmdownload";

/// Default name of the quarantine subdirectory under the destination
pub const DEFAULT_QUARANTINE_DIR: &str = "rmv";

/// Default number of transfers between progress checkpoints
pub const DEFAULT_PROGRESS_INTERVAL: usize = 1000;

/// Pipeline configuration, passed explicitly into [`crate::commands::sync::run`]
#[derive(Debug, Clone)]
pub struct Config {
    /// Reference collection
    pub source: PathBuf,

    /// Local mirror
    pub destination: PathBuf,

    /// Only source files ending with this are synced (e.g. `.zip`)
    pub sync_extension: String,

    /// Marker of files still being downloaded into the source
    pub in_progress_suffix: String,

    /// Name of the quarantine subdirectory inside the destination
    pub quarantine_dir_name: String,

    /// Emit a progress checkpoint every N transfers (0 disables)
    pub progress_interval: usize,

    /// Dry run (show plan, don't execute)
    pub dry_run: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: PathBuf::new(),
            destination: PathBuf::new(),
            sync_extension: DEFAULT_SYNC_EXTENSION.to_string(),
            in_progress_suffix: DEFAULT_IN_PROGRESS_SUFFIX.to_string(),
            quarantine_dir_name: DEFAULT_QUARANTINE_DIR.to_string(),
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
            dry_run: false,
        }
    }
}

impl Config {
    /// Config for the given roots with every other option at its default
    pub fn new(source: impl Into<PathBuf>, destination: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
            ..Self::default()
        }
    }

    /// Absolute path of the quarantine directory
    pub fn quarantine_dir(&self) -> PathBuf {
        self.destination.join(&self.quarantine_dir_name)
    }

    /// Validate configuration
    ///
    /// Root existence is checked by the stages themselves so that a root
    /// vanishing mid-run is reported the same way as a missing one.
    pub fn validate(&self) -> Result<(), SyncError> {
        if self.source.as_os_str().is_empty() {
            return Err(SyncError::Config("Source path is required".to_string()));
        }

        if self.destination.as_os_str().is_empty() {
            return Err(SyncError::Config(
                "Destination path is required".to_string(),
            ));
        }

        if self.source == self.destination {
            return Err(SyncError::Config(
                "Source and destination cannot be the same".to_string(),
            ));
        }

        if self.sync_extension.is_empty() || self.sync_extension == "." {
            return Err(SyncError::Config(
                "Sync extension cannot be empty".to_string(),
            ));
        }

        if self.in_progress_suffix.is_empty() {
            return Err(SyncError::Config(
                "In-progress suffix cannot be empty".to_string(),
            ));
        }

        let name = self.quarantine_dir_name.as_str();
        if name.is_empty()
            || name == "."
            || name == ".."
            || name.contains('/')
            || name.contains(std::path::MAIN_SEPARATOR)
        {
            return Err(SyncError::Config(format!(
                "Invalid quarantine directory name: {:?}",
                name
            )));
        }

        Ok(())
    }
}

/// `zip` and `.zip` both mean `.zip`
pub fn normalize_extension(ext: &str) -> String {
    let ext = ext.trim();
    if ext.is_empty() || ext.starts_with('.') {
        ext.to_string()
    } else {
        format!(".{}", ext)
    }
}

/// Mirror a file collection, quarantining orphaned and superseded files
#[derive(Debug, Parser)]
#[command(name = "romsync", version, about)]
pub struct Cli {
    /// Source directory (reference collection)
    #[arg(env = "ROMSYNC_SOURCE")]
    pub source: Option<PathBuf>,

    /// Destination directory (local mirror)
    #[arg(env = "ROMSYNC_DESTINATION")]
    pub destination: Option<PathBuf>,

    /// TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Extension of the files to sync
    #[arg(short, long, value_name = "EXT")]
    pub extension: Option<String>,

    /// Suffix marking unfinished downloads in the source
    #[arg(long, value_name = "SUFFIX")]
    pub in_progress_suffix: Option<String>,

    /// Name of the quarantine subdirectory in the destination
    #[arg(long, value_name = "NAME")]
    pub quarantine_dir: Option<String>,

    /// Report progress every N transfers (0 disables)
    #[arg(long, value_name = "N")]
    pub progress_interval: Option<usize>,

    /// Show what would change without touching the filesystem
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Print the final report as JSON
    #[arg(long)]
    pub json: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only log warnings and errors; hide the progress bar
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// On-disk configuration; every key is optional
#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub source: Option<PathBuf>,
    pub destination: Option<PathBuf>,
    pub sync_extension: Option<String>,
    pub in_progress_suffix: Option<String>,
    pub quarantine_dir: Option<String>,
    pub progress_interval: Option<usize>,
}

impl FileConfig {
    /// Load a TOML configuration file
    pub fn load(path: &Path) -> Result<Self, SyncError> {
        let content = fs::read_to_string(path).map_err(|e| {
            SyncError::Config(format!("Cannot read config file {}: {}", path.display(), e))
        })?;
        Self::parse(&content)
            .map_err(|e| SyncError::Config(format!("{} in {}", e, path.display())))
    }

    /// Parse TOML text
    pub fn parse(content: &str) -> Result<Self, SyncError> {
        toml::from_str(content)
            .map_err(|e| SyncError::Config(format!("Invalid config file: {}", e)))
    }
}

impl TryFrom<Cli> for Config {
    type Error = SyncError;

    fn try_from(cli: Cli) -> Result<Self, Self::Error> {
        let file = match &cli.config {
            Some(path) => FileConfig::load(path)?,
            None => FileConfig::default(),
        };
        let defaults = Config::default();

        let config = Config {
            source: cli.source.or(file.source).unwrap_or_default(),
            destination: cli.destination.or(file.destination).unwrap_or_default(),
            sync_extension: normalize_extension(
                &cli.extension
                    .or(file.sync_extension)
                    .unwrap_or(defaults.sync_extension),
            ),
            in_progress_suffix: cli
                .in_progress_suffix
                .or(file.in_progress_suffix)
                .unwrap_or(defaults.in_progress_suffix),
            quarantine_dir_name: cli
                .quarantine_dir
                .or(file.quarantine_dir)
                .unwrap_or(defaults.quarantine_dir_name),
            progress_interval: cli
                .progress_interval
                .or(file.progress_interval)
                .unwrap_or(defaults.progress_interval),
            dry_run: cli.dry_run,
        };

        config.validate()?;
        Ok(config)
    }
}
