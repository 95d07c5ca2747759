//! Configuration file handling.
//!
//! The file is TOML:
//!
//! ```toml
//! [client]
//! address = "http://localhost:8080"
//! username = "admin"
//! password = "adminadmin"
//!
//! [cleanup]
//! min_space_gb = 50
//! download_minspace_gb = 100
//! categories_to_check_for_space = ["movies", "tv"]
//! categories_to_check_for_number = ["sb"]
//! max_torrents_for_categories = 40
//! drive_path = "/mnt/downloads"
//!
//! [history]
//! path = "/var/lib/reclaim/ratio_history.json"
//!
//! [seed_rules]
//! tv = "min_seed_time:1209600, min_ratio:1.5"
//!
//! [bonus_rules]
//! tv = "min_weeks:2, time_multipliers:4=1.1|10=1.2"
//!
//! [logging]
//! level = "info"
//! ```
//!
//! All `_gb` values and size thresholds are decimal gigabytes (10^9 bytes),
//! not GiB; values carried over from GiB-based setups shrink by about 7%.

use crate::error::{CliError, Result};
use reclaim_domain::{HistoryPolicy, RuleTables, RuleWarning};
use reclaim_janitor::{CleanupConfig, JanitorConfig, ScoringConfig};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// File name of the ratio history inside the data directory
pub const HISTORY_FILE_NAME: &str = "ratio_history.json";

/// Reclaim configuration file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// qBittorrent connection
    pub client: ClientConfig,

    /// Space targets and count caps
    #[serde(default)]
    pub cleanup: CleanupSection,

    /// Value formula parameters
    #[serde(default)]
    pub scoring: ScoringConfig,

    /// Ratio history file and retention
    #[serde(default)]
    pub history: HistorySection,

    /// Removal thresholds per category
    #[serde(default)]
    pub seed_rules: BTreeMap<String, String>,

    /// Bonus multipliers per category
    #[serde(default)]
    pub bonus_rules: BTreeMap<String, String>,

    /// Log output
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// qBittorrent Web UI connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Web UI base URL
    pub address: String,

    /// Web UI user name
    #[serde(default)]
    pub username: String,

    /// Web UI password
    #[serde(default)]
    pub password: String,
}

/// `[cleanup]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CleanupSection {
    /// Space and count limits
    #[serde(flatten)]
    pub limits: CleanupConfig,

    /// Any path on the download volume; defaults to the working directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drive_path: Option<PathBuf>,
}

/// `[history]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HistorySection {
    /// History file; defaults to the user data directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    /// Retention policy
    #[serde(flatten)]
    pub policy: HistoryPolicy,

    /// Drop histories of torrents the client no longer reports
    #[serde(default)]
    pub prune_missing: bool,
}

/// `[logging]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default level filter when `RUST_LOG` is unset
    #[serde(default = "default_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: default_level() }
    }
}

fn default_level() -> String {
    "info".to_string()
}

impl Config {
    /// Get the default configuration file path.
    pub fn default_path() -> Result<PathBuf> {
        let dir = dirs::config_dir().ok_or_else(|| CliError::Config("Could not find config directory".into()))?;
        Ok(dir.join("reclaim").join("config.toml"))
    }

    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CliError::Config(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        let contents = fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse and validate configuration text.
    pub fn parse(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Check values that parse but make no sense.
    pub fn validate(&self) -> Result<()> {
        if self.client.address.trim().is_empty() {
            return Err(CliError::Config("client address must not be empty".into()));
        }

        self.level()?;
        self.janitor_config(false).validate()?;
        Ok(())
    }

    /// Configured log level.
    pub fn level(&self) -> Result<tracing::Level> {
        self.logging
            .level
            .parse()
            .map_err(|_| CliError::Config(format!("invalid log level '{}'", self.logging.level)))
    }

    /// Janitor settings for one run.
    pub fn janitor_config(&self, dry_run: bool) -> JanitorConfig {
        JanitorConfig {
            cleanup: self.cleanup.limits.clone(),
            scoring: self.scoring,
            history: self.history.policy.clone(),
            prune_missing_history: self.history.prune_missing,
            dry_run,
        }
    }

    /// Build rule tables from `[seed_rules]` and `[bonus_rules]`.
    ///
    /// Malformed entries are skipped and returned as warnings.
    pub fn rule_tables(&self) -> (RuleTables, Vec<RuleWarning>) {
        RuleTables::build(&self.seed_rules, &self.bonus_rules)
    }

    /// Ratio history file path.
    pub fn history_path(&self) -> Result<PathBuf> {
        match &self.history.path {
            Some(path) => Ok(path.clone()),
            None => {
                let dir = dirs::data_dir().ok_or_else(|| CliError::Config("Could not find data directory".into()))?;
                Ok(dir.join("reclaim").join(HISTORY_FILE_NAME))
            }
        }
    }

    /// Path on the download volume used to measure free space.
    pub fn drive_path(&self) -> PathBuf {
        self.cleanup.drive_path.clone().unwrap_or_else(|| PathBuf::from("."))
    }
}
