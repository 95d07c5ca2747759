//! Reclaim Domain Layer
//!
//! This crate contains the data model shared by every other layer of Reclaim.
//! It stays free of I/O and defines the fundamental concepts, value objects,
//! and trait interfaces that the infrastructure crates implement.
//!
//! ## Key Concepts
//!
//! - **Item**: A torrent known to the client (hash, category, size, seed time, ratio)
//! - **Ratio history**: One ratio snapshot per item per calendar day, bounded in length
//! - **Category rules**: Minimum seed time / ratio an item must reach before removal
//! - **Bonus rules**: Per-category multipliers that protect valuable items from eviction
//!
//! ## Architecture
//!
//! - Pure data and pure functions only
//! - Network and filesystem access live in other crates
//! - Trait definitions for all external interactions

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod history;
pub mod item;
pub mod rules;
pub mod traits;

// Re-exports for convenience
pub use history::{HistoryPolicy, HistoryStats, HistoryUpdate, RatioHistory, RatioLedger, RatioSnapshot};
pub use item::{Item, ItemId, ItemState, BYTES_PER_GB, SECONDS_PER_DAY, SECONDS_PER_WEEK};
pub use rules::{lookup_multiplier, BonusRule, CategoryRule, MultiplierTable, RuleTables, RuleWarning};
