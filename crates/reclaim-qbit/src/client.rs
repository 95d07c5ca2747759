//! qBittorrent Web API client

use crate::{QbitError, RawTorrent};
use reclaim_domain::traits::TorrentClient;
use reclaim_domain::{Item, ItemId};
use reqwest::StatusCode;
use std::time::Duration;

/// Path prefix of the Web API
pub const API_V2_BASE: &str = "/api/v2";

/// Default timeout for API requests (30 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Client for a qBittorrent Web UI instance
///
/// The session cookie returned by a successful login is kept in the client's
/// cookie store and sent with every later request.
pub struct QbitClient {
    address: String,
    username: String,
    password: String,
    client: reqwest::Client,
}

impl QbitClient {
    /// Create a new client
    ///
    /// # Parameters
    ///
    /// - `address`: Web UI base URL (e.g., "http://localhost:8080")
    /// - `username` / `password`: Web UI credentials
    pub fn new(
        address: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, QbitError> {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            address: address.into().trim_end_matches('/').to_string(),
            username: username.into(),
            password: password.into(),
            client,
        })
    }

    /// Base URL of the Web UI
    pub fn address(&self) -> &str {
        &self.address
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}{}", self.address, API_V2_BASE, endpoint)
    }

    /// Log in and store the session cookie
    ///
    /// # Errors
    ///
    /// Returns [`QbitError::Auth`] if the credentials are rejected, or
    /// [`QbitError::Communication`] if the Web UI cannot be reached.
    pub async fn login(&self) -> Result<(), QbitError> {
        let response = self
            .client
            .post(self.url("/auth/login"))
            .form(&[("username", self.username.as_str()), ("password", self.password.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(QbitError::Auth(format!("HTTP {}", status)));
        }

        let body = response.text().await?;
        if body.trim() != "Ok." {
            return Err(QbitError::Auth(format!("unexpected response '{}'", body.trim())));
        }

        tracing::debug!("Logged in to {}", self.address);
        Ok(())
    }

    /// Fetch the raw torrent listing
    pub async fn fetch_torrents(&self) -> Result<Vec<RawTorrent>, QbitError> {
        let response = self.client.get(self.url("/torrents/info")).send().await?;

        match response.status() {
            StatusCode::FORBIDDEN => Err(QbitError::Forbidden),
            status if !status.is_success() => {
                Err(QbitError::Communication(format!("HTTP {} listing torrents", status)))
            }
            _ => Ok(response.json::<Vec<RawTorrent>>().await?),
        }
    }
}

impl TorrentClient for QbitClient {
    type Error = QbitError;

    /// List torrents, logging in once if the session is missing or expired.
    ///
    /// Records that fail validation are skipped with a warning.
    async fn list_items(&self) -> Result<Vec<Item>, QbitError> {
        let raw = match self.fetch_torrents().await {
            Err(QbitError::Forbidden) => {
                tracing::debug!("Session not authenticated, logging in");
                self.login().await?;
                self.fetch_torrents().await?
            }
            other => other?,
        };

        let total = raw.len();
        let items: Vec<Item> = raw
            .into_iter()
            .filter_map(|record| match Item::try_from(record) {
                Ok(item) => Some(item),
                Err(e) => {
                    tracing::warn!("Skipping torrent: {}", e);
                    None
                }
            })
            .collect();

        tracing::debug!("Fetched {} torrents ({} rejected)", items.len(), total - items.len());
        Ok(items)
    }

    async fn delete_item(&self, id: &ItemId, delete_files: bool) -> Result<(), QbitError> {
        let delete_files = if delete_files { "true" } else { "false" };
        let response = self
            .client
            .post(self.url("/torrents/delete"))
            .form(&[("hashes", id.as_str()), ("deleteFiles", delete_files)])
            .send()
            .await?;

        match response.status() {
            StatusCode::FORBIDDEN => Err(QbitError::Forbidden),
            status if !status.is_success() => {
                Err(QbitError::Communication(format!("HTTP {} deleting {}", status, id)))
            }
            _ => {
                tracing::debug!("Torrent {} successfully removed", id);
                Ok(())
            }
        }
    }
}
