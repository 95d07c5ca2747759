//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// qBittorrent client error
    #[error("Client error: {0}")]
    Client(#[from] reclaim_qbit::QbitError),

    /// Cleanup or ratio logging error
    #[error(transparent)]
    Janitor(#[from] reclaim_janitor::JanitorError),

    /// Free-space probe error
    #[error("Disk space error: {0}")]
    Disk(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
}
