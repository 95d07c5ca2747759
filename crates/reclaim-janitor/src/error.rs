//! Error types for Janitor operations

use thiserror::Error;

/// Errors that can occur during Janitor operations
#[derive(Error, Debug)]
pub enum JanitorError {
    /// Torrent client error (listing or login)
    #[error("Client error: {0}")]
    Client(String),

    /// History persistence error
    #[error("Storage error: {0}")]
    Store(String),

    /// Free-space probe error
    #[error("Space probe error: {0}")]
    Probe(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
