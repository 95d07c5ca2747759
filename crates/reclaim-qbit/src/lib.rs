//! Reclaim qBittorrent Client
//!
//! Implements the `TorrentClient` trait from `reclaim-domain` against the
//! qBittorrent Web API v2.
//!
//! # Endpoints
//!
//! - `POST /api/v2/auth/login`: form login, answers `Ok.` and sets the `SID` cookie
//! - `GET /api/v2/torrents/info`: JSON array of torrent records
//! - `POST /api/v2/torrents/delete`: remove torrents, optionally with their files
//!
//! # Examples
//!
//! ```no_run
//! use reclaim_domain::traits::TorrentClient;
//! use reclaim_qbit::QbitClient;
//!
//! # async fn example() -> Result<(), reclaim_qbit::QbitError> {
//! let client = QbitClient::new("http://localhost:8080", "admin", "adminadmin")?;
//! client.login().await?;
//! let items = client.list_items().await?;
//! println!("{} torrents", items.len());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod client;
mod record;

pub use client::{QbitClient, API_V2_BASE, DEFAULT_TIMEOUT_SECS};
pub use record::RawTorrent;

use thiserror::Error;

/// Errors that can occur while talking to qBittorrent
#[derive(Error, Debug)]
pub enum QbitError {
    /// Network or HTTP error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Login rejected
    #[error("Login failed: {0}")]
    Auth(String),

    /// Session missing or expired (HTTP 403)
    #[error("Forbidden: session is not authenticated")]
    Forbidden,

    /// Response body could not be decoded
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Torrent record failed validation
    #[error("Invalid torrent record: {0}")]
    InvalidRecord(String),
}

impl From<reqwest::Error> for QbitError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            QbitError::InvalidResponse(e.to_string())
        } else {
            QbitError::Communication(e.to_string())
        }
    }
}
