//! Reclaim Janitor
//!
//! Decides which torrents to remove when disk space runs low or a category
//! holds too many items, and records the ratio history those decisions use.
//!
//! # Overview
//!
//! A cleanup run flows through four stages:
//! - **Eligibility**: only items that met their category's seed-time or ratio
//!   threshold may be removed
//! - **Scoring**: each candidate gets a value from its ratio growth per
//!   recorded week, scaled by category bonus multipliers
//! - **Selection**: the space policy evicts the lowest-value items until the
//!   free-space target is met; the count policy trims each capped category
//! - **Execution**: planned items are deleted through the torrent client, or
//!   only reported in dry-run mode
//!
//! Stages one to three are pure functions of the item snapshot, the rule
//! tables and the ratio ledger. Only execution talks to the client.
//!
//! # Usage
//!
//! ```no_run
//! use reclaim_domain::traits::{HistoryStore, SpaceProbe, TorrentClient};
//! use reclaim_domain::RuleTables;
//! use reclaim_janitor::{Janitor, JanitorConfig};
//!
//! # async fn run<C, H, P>(client: C, history: H, probe: P) -> Result<(), Box<dyn std::error::Error>>
//! # where
//! #     C: TorrentClient, C::Error: std::fmt::Display,
//! #     H: HistoryStore,
//! #     P: SpaceProbe, P::Error: std::fmt::Display,
//! # {
//! let mut janitor = Janitor::new(JanitorConfig::default(), RuleTables::default())?;
//!
//! let report = janitor.clean(&client, &history, &probe).await?;
//! println!("Freed {:.2} GB", report.freed_gb());
//! println!("\n{}", janitor.metrics().summary());
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration
//!
//! The Janitor can be configured via TOML:
//!
//! ```toml
//! [cleanup]
//! min_space_gb = 50
//! download_minspace_gb = 100
//! categories_to_check_for_space = ["movies", "tv"]
//! categories_to_check_for_number = ["sb"]
//! max_torrents_for_categories = 40
//! sort_count_removal_by_size = false
//! delete_files = true
//!
//! [scoring]
//! min_ratio_change = 0.3
//! min_weeks_seeded = 3
//!
//! [history]
//! max_entries = 28
//! purge_days = [8, 16, 24]
//! ```

#![warn(missing_docs)]

mod config;
mod eligibility;
mod error;
mod janitor;
mod metrics;
mod score;
mod select;

pub use config::{CleanupConfig, JanitorConfig, ScoringConfig};
pub use eligibility::{filter_eligible, is_eligible};
pub use error::JanitorError;
pub use janitor::{CleanupPlan, Janitor, RankedItem, SpaceStatus};
pub use metrics::{EvictionOutcome, EvictionRecord, JanitorMetrics, RunReport};
pub use score::{base_value, score, ScoreBreakdown, ScoreEngine};
pub use select::{
    eviction_order, rank, select_by_count, select_by_space, Eviction, EvictionCandidate, EvictionPolicy,
};
