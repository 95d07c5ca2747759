//! Ratio history - a bounded, one-entry-per-day ledger of item ratios
//!
//! Each run of the ratio logger appends today's ratio for every item. The
//! ledger trades resolution for bounded storage: histories are capped at
//! `max_entries`, and the oldest entry is dropped whenever an item crosses a
//! configured seed-day milestone.

use crate::{Item, ItemId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Ratio observed for an item on a calendar day
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatioSnapshot {
    /// Day of the observation
    pub date: NaiveDate,

    /// Ratio at that time
    pub ratio: f64,
}

impl RatioSnapshot {
    /// Create a snapshot
    pub fn new(date: NaiveDate, ratio: f64) -> Self {
        Self { date, ratio }
    }
}

/// Ordered snapshots for one item, oldest first
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RatioHistory(Vec<RatioSnapshot>);

impl RatioHistory {
    /// Create a history from snapshots (assumed oldest first)
    pub fn new(entries: Vec<RatioSnapshot>) -> Self {
        Self(entries)
    }

    /// All snapshots, oldest first
    pub fn entries(&self) -> &[RatioSnapshot] {
        &self.0
    }

    /// Number of recorded days
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if nothing has been recorded
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Oldest surviving snapshot
    pub fn oldest(&self) -> Option<&RatioSnapshot> {
        self.0.first()
    }

    /// Most recent snapshot
    pub fn latest(&self) -> Option<&RatioSnapshot> {
        self.0.last()
    }

    /// Length of the recorded span in weeks, counting one entry per day.
    ///
    /// This is entry-count based, not wall-clock based, so it shrinks when
    /// purging has removed entries.
    pub fn recorded_weeks(&self) -> f64 {
        self.0.len() as f64 / 7.0
    }

    /// Record today's ratio for an item, applying the purge and cap rules.
    ///
    /// Returns true if the history changed.
    fn record(&mut self, snapshot: RatioSnapshot, seed_days: u64, policy: &HistoryPolicy) -> bool {
        let mut changed = false;

        // Dates only move forward; a clock that steps back records nothing.
        let already_recorded = self.latest().is_some_and(|last| last.date >= snapshot.date);
        if !already_recorded {
            self.0.push(snapshot);
            changed = true;

            if policy.purge_days.contains(&seed_days) && self.0.len() > 1 {
                self.0.remove(0);
            }
        }

        if self.0.len() > policy.max_entries {
            let excess = self.0.len() - policy.max_entries;
            self.0.drain(..excess);
            changed = true;
        }

        changed
    }
}

/// Retention policy for ratio histories
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryPolicy {
    /// Maximum snapshots kept per item
    pub max_entries: usize,

    /// Seed-day milestones at which the oldest snapshot is dropped
    pub purge_days: Vec<u64>,
}

impl Default for HistoryPolicy {
    /// Four weeks of daily snapshots, thinned at days 8, 16 and 24
    fn default() -> Self {
        Self {
            max_entries: 28,
            purge_days: vec![8, 16, 24],
        }
    }
}

/// Result of applying one day's observations to a ledger
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryUpdate {
    /// The updated ledger
    pub ledger: RatioLedger,

    /// Items whose history was created or changed
    pub touched: Vec<ItemId>,
}

/// Ratio histories for all known items, keyed by item id
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RatioLedger(BTreeMap<ItemId, RatioHistory>);

impl RatioLedger {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// History for an item, if any has been recorded
    pub fn get(&self, id: &ItemId) -> Option<&RatioHistory> {
        self.0.get(id)
    }

    /// Replace the history for an item
    pub fn insert(&mut self, id: ItemId, history: RatioHistory) {
        self.0.insert(id, history);
    }

    /// Number of items in the ledger
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if the ledger holds no items
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over (id, history) pairs in id order
    pub fn iter(&self) -> impl Iterator<Item = (&ItemId, &RatioHistory)> {
        self.0.iter()
    }

    /// Apply today's ratios for the current item snapshot.
    ///
    /// Items missing from `items` keep their history untouched; removing
    /// them is the caller's decision (see [`RatioLedger::prune`]).
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use reclaim_domain::{HistoryPolicy, Item, RatioLedger};
    ///
    /// let today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
    /// let items = vec![Item::new("h1", "Show", "tv", 1, 0, 0.5)];
    ///
    /// let update = RatioLedger::new().update(&items, &HistoryPolicy::default(), today);
    /// assert_eq!(update.touched.len(), 1);
    /// assert_eq!(update.ledger.get(&"h1".into()).unwrap().len(), 1);
    /// ```
    pub fn update(&self, items: &[Item], policy: &HistoryPolicy, today: NaiveDate) -> HistoryUpdate {
        let mut ledger = self.clone();
        let mut touched = Vec::new();

        for item in items {
            let snapshot = RatioSnapshot::new(today, item.ratio);

            let changed = match ledger.0.get_mut(&item.id) {
                None => {
                    let mut history = RatioHistory::new(vec![snapshot]);
                    history.0.truncate(policy.max_entries);
                    ledger.0.insert(item.id.clone(), history);
                    true
                }
                Some(history) => history.record(snapshot, item.seed_days(), policy),
            };

            if changed {
                touched.push(item.id.clone());
            }
        }

        HistoryUpdate { ledger, touched }
    }

    /// Drop histories for items not in `retain`, returning how many were removed
    pub fn prune(&mut self, retain: &HashSet<ItemId>) -> usize {
        let before = self.0.len();
        self.0.retain(|id, _| retain.contains(id));
        before - self.0.len()
    }
}

/// Summary of how a ledger changed across one update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HistoryStats {
    /// Items in the new ledger
    pub total: usize,

    /// Items present in the new ledger but not the old one
    pub added: usize,

    /// Items present in the old ledger but not the new one
    pub removed: usize,

    /// Items whose history is at the length cap
    pub at_capacity: usize,
}

impl HistoryStats {
    /// Compare two ledgers
    pub fn between(old: &RatioLedger, new: &RatioLedger, max_entries: usize) -> Self {
        let added = new.0.keys().filter(|id| !old.0.contains_key(*id)).count();
        let removed = old.0.keys().filter(|id| !new.0.contains_key(*id)).count();
        let at_capacity = new.0.values().filter(|h| h.len() >= max_entries).count();

        Self {
            total: new.len(),
            added,
            removed,
            at_capacity,
        }
    }
}
