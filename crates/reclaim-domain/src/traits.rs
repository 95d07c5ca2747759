//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the cleanup engine and the
//! outside world. Infrastructure implementations live in other crates.

use crate::{Item, ItemId, RatioLedger};

/// Trait for the torrent client that owns the items
///
/// Implemented by the infrastructure layer (reclaim-qbit)
#[allow(async_fn_in_trait)]
pub trait TorrentClient {
    /// Error type for client operations
    type Error;

    /// Fetch a snapshot of every item the client knows about
    async fn list_items(&self) -> Result<Vec<Item>, Self::Error>;

    /// Remove an item, optionally deleting its data from disk
    async fn delete_item(&self, id: &ItemId, delete_files: bool) -> Result<(), Self::Error>;
}

/// Trait for persisting ratio histories between runs
///
/// Implemented by the infrastructure layer (reclaim-store)
pub trait HistoryStore {
    /// Error type for store operations
    type Error;

    /// Load the ledger; a missing or unreadable ledger loads as empty
    fn load(&self) -> RatioLedger;

    /// Persist the ledger
    fn save(&self, ledger: &RatioLedger) -> Result<(), Self::Error>;
}

/// Trait for measuring free disk space
///
/// Implemented by the application layer (reclaim-cli)
pub trait SpaceProbe {
    /// Error type for probe operations
    type Error;

    /// Free space on the download volume, in GB
    fn free_space_gb(&self) -> Result<f64, Self::Error>;
}
