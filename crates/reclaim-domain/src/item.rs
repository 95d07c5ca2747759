//! Item module - a torrent as seen by the cleanup engine

use serde::{Deserialize, Serialize};
use std::fmt;

/// Seconds in one day
pub const SECONDS_PER_DAY: u64 = 86_400;

/// Seconds in one week
pub const SECONDS_PER_WEEK: u64 = 7 * SECONDS_PER_DAY;

/// Bytes in one (decimal) gigabyte
///
/// Every GB figure uses this unit: item sizes, free space, remaining
/// downloads, `min_space_gb` and `size_multipliers` thresholds. Setups that
/// were tuned in GiB (1024^3 bytes) should scale those values by about 1.074
/// to keep the same limits.
///
/// ```
/// use reclaim_domain::BYTES_PER_GB;
///
/// let gib = 1024f64.powi(3);
/// assert!((gib / BYTES_PER_GB - 1.074).abs() < 1e-3);
/// ```
pub const BYTES_PER_GB: f64 = 1e9;

/// Stable identifier of an item (the torrent info hash)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    /// Create an ItemId from a hash string
    ///
    /// # Examples
    ///
    /// ```
    /// use reclaim_domain::ItemId;
    ///
    /// let id = ItemId::new("8c4f1e");
    /// assert_eq!(id.as_str(), "8c4f1e");
    /// ```
    pub fn new(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }

    /// Get the underlying hash string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Coarse transfer state of an item
///
/// Only the distinction between downloading and everything else matters to
/// the engine: downloading items still consume disk space as they progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ItemState {
    /// Actively downloading
    Downloading,

    /// Complete and sharing (or queued/stalled for upload)
    #[default]
    Seeding,

    /// Paused, checking, errored, or anything else
    Other,
}

impl ItemState {
    /// Get the state name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemState::Downloading => "downloading",
            ItemState::Seeding => "seeding",
            ItemState::Other => "other",
        }
    }

    /// Map a qBittorrent state string onto an ItemState
    pub fn parse(s: &str) -> Self {
        match s {
            "downloading" => ItemState::Downloading,
            "uploading" | "stalledUP" | "queuedUP" | "forcedUP" | "seeding" => ItemState::Seeding,
            _ => ItemState::Other,
        }
    }
}

/// A stored torrent entry
///
/// Snapshots are read from the client once per run and never mutated by the
/// engine.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    /// Unique identifier (info hash)
    pub id: ItemId,

    /// Display name
    pub name: String,

    /// Category as configured in the client; compared case-insensitively
    pub category: String,

    /// Total size in bytes
    pub size_bytes: u64,

    /// Cumulative seconds spent seeding
    pub seeding_time_secs: u64,

    /// Current upload/download ratio
    pub ratio: f64,

    /// Transfer state
    pub state: ItemState,

    /// Download progress in [0.0, 1.0]
    pub progress: f64,
}

impl Item {
    /// Create a completed, seeding item
    pub fn new(
        id: impl Into<ItemId>,
        name: impl Into<String>,
        category: impl Into<String>,
        size_bytes: u64,
        seeding_time_secs: u64,
        ratio: f64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category: category.into(),
            size_bytes,
            seeding_time_secs,
            ratio,
            state: ItemState::Seeding,
            progress: 1.0,
        }
    }

    /// Set the transfer state and progress
    pub fn with_state(mut self, state: ItemState, progress: f64) -> Self {
        self.state = state;
        self.progress = progress;
        self
    }

    /// Case-insensitive category comparison
    pub fn in_category(&self, category: &str) -> bool {
        self.category.to_lowercase() == category.to_lowercase()
    }

    /// Seeding time in (fractional) weeks
    pub fn weeks_seeded(&self) -> f64 {
        self.seeding_time_secs as f64 / SECONDS_PER_WEEK as f64
    }

    /// Seeding time in whole days
    pub fn seed_days(&self) -> u64 {
        self.seeding_time_secs / SECONDS_PER_DAY
    }

    /// Size in gigabytes
    pub fn size_gb(&self) -> f64 {
        self.size_bytes as f64 / BYTES_PER_GB
    }

    /// Gigabytes this item will still write to disk before it completes
    pub fn remaining_download_gb(&self) -> f64 {
        if self.state != ItemState::Downloading {
            return 0.0;
        }
        let remaining = (1.0 - self.progress).clamp(0.0, 1.0);
        self.size_gb() * remaining
    }
}

impl From<String> for ItemId {
    fn from(value: String) -> Self {
        Self(value)
    }
}
