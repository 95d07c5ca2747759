//! Metrics and reports for Janitor operations

use crate::EvictionPolicy;
use reclaim_domain::{Item, ItemId};
use serde::Serialize;
use std::collections::HashMap;

/// Metrics collected across Janitor runs
///
/// Tracks removals per policy, failed deletions and space freed.
#[derive(Debug, Clone, Default)]
pub struct JanitorMetrics {
    /// Items removed per policy
    pub removed: HashMap<EvictionPolicy, usize>,

    /// Deletions the client rejected
    pub failed: usize,

    /// Space freed by successful removals, in GB
    pub freed_gb: f64,

    /// Cleanup runs completed
    pub run_count: usize,

    /// Ratio logging runs completed
    pub ratio_log_count: usize,
}

impl JanitorMetrics {
    /// Create new empty metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a successful removal
    pub fn record_removal(&mut self, policy: EvictionPolicy, size_gb: f64) {
        *self.removed.entry(policy).or_insert(0) += 1;
        self.freed_gb += size_gb;
    }

    /// Record a rejected deletion
    pub fn record_failure(&mut self) {
        self.failed += 1;
    }

    /// Record a cleanup run completion
    pub fn record_run(&mut self) {
        self.run_count += 1;
    }

    /// Record a ratio logging run completion
    pub fn record_ratio_log(&mut self) {
        self.ratio_log_count += 1;
    }

    /// Total items removed across all policies
    pub fn total_removed(&self) -> usize {
        self.removed.values().sum()
    }

    /// Generate a summary report of metrics
    pub fn summary(&self) -> String {
        let mut lines = vec![
            "Janitor Metrics Summary".to_string(),
            "=======================".to_string(),
            format!("Cleanup runs: {}", self.run_count),
            format!("Ratio logs: {}", self.ratio_log_count),
            String::new(),
        ];

        if !self.removed.is_empty() {
            lines.push("Removals by policy:".to_string());
            for policy in [EvictionPolicy::Space, EvictionPolicy::Count] {
                if let Some(count) = self.removed.get(&policy) {
                    lines.push(format!("  {}: {}", policy, count));
                }
            }
            lines.push(format!("  Total: {}", self.total_removed()));
            lines.push(format!("  Freed: {:.2} GB", self.freed_gb));
        }

        if self.failed > 0 {
            lines.push(format!("Failed deletions: {}", self.failed));
        }

        lines.join("\n")
    }
}

/// What happened to one planned eviction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EvictionOutcome {
    /// Deleted from the client
    Removed,

    /// Dry run: would have been deleted
    Planned,

    /// The client rejected the deletion
    Failed,
}

/// One row of a run report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvictionRecord {
    /// Item id
    pub id: ItemId,

    /// Display name
    pub name: String,

    /// Category as reported by the client
    pub category: String,

    /// Size in GB
    pub size_gb: f64,

    /// Seeding time in weeks
    pub weeks_seeded: f64,

    /// Value used for ranking, if the policy ranked by value
    pub value: Option<f64>,

    /// Policy that selected the item
    pub policy: EvictionPolicy,

    /// Result of the deletion
    pub outcome: EvictionOutcome,
}

impl EvictionRecord {
    /// Snapshot an item's report fields
    pub fn new(item: &Item, value: Option<f64>, policy: EvictionPolicy, outcome: EvictionOutcome) -> Self {
        Self {
            id: item.id.clone(),
            name: item.name.clone(),
            category: item.category.clone(),
            size_gb: item.size_gb(),
            weeks_seeded: item.weeks_seeded(),
            value,
            policy,
            outcome,
        }
    }
}

/// Result of one cleanup run
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct RunReport {
    /// Whether the run was a dry run
    pub dry_run: bool,

    /// Free space before the run, in GB
    pub free_gb: f64,

    /// Space still to be written by in-progress downloads, in GB
    pub remaining_download_gb: f64,

    /// Space the run set out to free, in GB
    pub target_gb: f64,

    /// Items eligible for removal
    pub eligible: usize,

    /// Every planned eviction in execution order
    pub records: Vec<EvictionRecord>,
}

impl RunReport {
    /// Records selected by one policy
    pub fn by_policy(&self, policy: EvictionPolicy) -> impl Iterator<Item = &EvictionRecord> {
        self.records.iter().filter(move |r| r.policy == policy)
    }

    /// Number of records with the given outcome
    pub fn count(&self, outcome: EvictionOutcome) -> usize {
        self.records.iter().filter(|r| r.outcome == outcome).count()
    }

    /// Space freed (or that would be freed in a dry run), in GB
    pub fn freed_gb(&self) -> f64 {
        self.records
            .iter()
            .filter(|r| r.outcome != EvictionOutcome::Failed)
            .map(|r| r.size_gb)
            .sum()
    }
}
