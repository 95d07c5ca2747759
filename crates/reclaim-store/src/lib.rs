//! Reclaim Storage Layer
//!
//! Implements the HistoryStore trait on top of a single JSON file.
//!
//! # Format
//!
//! The ledger is an object keyed by torrent hash, each value an array of
//! daily snapshots, oldest first:
//!
//! ```json
//! {
//!     "8c4f1e...": [
//!         { "date": "2024-03-01", "ratio": 0.42 },
//!         { "date": "2024-03-02", "ratio": 0.57 }
//!     ]
//! }
//! ```
//!
//! # Examples
//!
//! ```no_run
//! use reclaim_domain::traits::HistoryStore;
//! use reclaim_store::JsonHistoryStore;
//!
//! let store = JsonHistoryStore::new("torrent_ratio_log.json");
//! let ledger = store.load();
//! store.save(&ledger).unwrap();
//! ```

#![warn(missing_docs)]

use reclaim_domain::traits::HistoryStore;
use reclaim_domain::RatioLedger;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Filesystem error
    #[error("I/O error on {path}: {source}")]
    Io {
        /// File being accessed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: io::Error,
    },

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// JSON-file implementation of HistoryStore
///
/// The file is read once and written once per run. Writes go to a sibling
/// temporary file which is then renamed over the ledger, so an interrupted
/// save leaves the previous ledger intact.
#[derive(Debug, Clone)]
pub struct JsonHistoryStore {
    path: PathBuf,
}

impl JsonHistoryStore {
    /// Create a store backed by the given file
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Path of the ledger file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the ledger, reporting why it could not be read
    pub fn try_load(&self) -> Result<RatioLedger, StoreError> {
        let contents = fs::read_to_string(&self.path).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })?;
        Ok(serde_json::from_str(&contents)?)
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl HistoryStore for JsonHistoryStore {
    type Error = StoreError;

    fn load(&self) -> RatioLedger {
        match self.try_load() {
            Ok(ledger) => {
                tracing::debug!("Loaded ratio history for {} items from {}", ledger.len(), self.path.display());
                ledger
            }
            Err(StoreError::Io { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
                tracing::debug!("No ratio history at {}, starting empty", self.path.display());
                RatioLedger::new()
            }
            Err(e) => {
                tracing::warn!("Ignoring unreadable ratio history: {}", e);
                RatioLedger::new()
            }
        }
    }

    fn save(&self, ledger: &RatioLedger) -> Result<(), StoreError> {
        let io_err = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let contents = serde_json::to_string_pretty(ledger)?;
        let temp = self.temp_path();
        fs::write(&temp, contents).map_err(io_err)?;
        fs::rename(&temp, &self.path).map_err(io_err)?;

        tracing::debug!("Saved ratio history for {} items to {}", ledger.len(), self.path.display());
        Ok(())
    }
}
