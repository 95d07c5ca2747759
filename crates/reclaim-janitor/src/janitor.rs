//! Core Janitor implementation for cleanup runs and ratio logging

use crate::eligibility::{filter_eligible, is_eligible};
use crate::metrics::{EvictionOutcome, EvictionRecord, RunReport};
use crate::score::{ScoreBreakdown, ScoreEngine};
use crate::select::{eviction_order, select_by_count, select_by_space, Eviction, EvictionCandidate};
use crate::{JanitorConfig, JanitorError, JanitorMetrics};
use chrono::NaiveDate;
use reclaim_domain::traits::{HistoryStore, SpaceProbe, TorrentClient};
use reclaim_domain::{HistoryStats, Item, ItemId, RatioLedger, RuleTables};
use std::collections::HashSet;
use std::fmt::Display;

/// Free-space figures behind one run's space target
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SpaceStatus {
    /// Free space on the download volume, in GB
    pub free_gb: f64,

    /// Space still to be written by in-progress downloads, in GB
    pub remaining_download_gb: f64,

    /// Shortfall against `min_space_gb` right now
    pub space_needed_gb: f64,

    /// Shortfall against `download_min_space_gb` once downloads complete
    pub additional_needed_gb: f64,
}

impl SpaceStatus {
    /// Work out both shortfalls
    pub fn new(free_gb: f64, remaining_download_gb: f64, min_space_gb: f64, download_min_space_gb: f64) -> Self {
        Self {
            free_gb,
            remaining_download_gb,
            space_needed_gb: (min_space_gb - free_gb).max(0.0),
            additional_needed_gb: (download_min_space_gb - (free_gb - remaining_download_gb)).max(0.0),
        }
    }

    /// Space the space-driven selector should free
    pub fn target_gb(&self) -> f64 {
        self.space_needed_gb.max(self.additional_needed_gb)
    }
}

/// Evictions decided for one run, before anything is deleted
#[derive(Debug, Clone)]
pub struct CleanupPlan<'a> {
    /// Space figures the plan was built from
    pub status: SpaceStatus,

    /// Number of eligible items
    pub eligible: usize,

    /// Evictions in execution order: space-driven first, then count-driven.
    /// Each item appears at most once.
    pub evictions: Vec<Eviction<'a>>,
}

/// An item's rank in eviction order, with its score factors
#[derive(Debug, Clone, Copy)]
pub struct RankedItem<'a> {
    /// The item
    pub item: &'a Item,

    /// How its value was computed
    pub breakdown: ScoreBreakdown,

    /// Whether its category rule currently allows removal
    pub eligible: bool,
}

/// Janitor service for disk-space reclamation
///
/// Responsible for:
/// - Planning evictions against the space target and category caps
/// - Deleting planned items through the torrent client
/// - Recording daily ratio snapshots
/// - Collecting metrics on cleanup operations
///
/// # Examples
///
/// ```
/// use reclaim_domain::{Item, RatioLedger, RuleTables, SECONDS_PER_WEEK};
/// use reclaim_janitor::{Janitor, JanitorConfig, SpaceStatus};
/// use std::collections::BTreeMap;
///
/// let categories: BTreeMap<String, String> =
///     [("tv".to_string(), "min_ratio:1".to_string())].into_iter().collect();
/// let (rules, _) = RuleTables::build(&categories, &BTreeMap::<String, String>::new());
///
/// let mut config = JanitorConfig::default();
/// config.cleanup.space_categories = vec!["tv".to_string()];
/// let janitor = Janitor::new(config, rules)?;
///
/// let items = vec![
///     Item::new("a", "A", "tv", 8_000_000_000, 10 * SECONDS_PER_WEEK, 1.5),
///     Item::new("b", "B", "tv", 8_000_000_000, 10 * SECONDS_PER_WEEK, 4.0),
/// ];
/// let status = SpaceStatus::new(15.0, 0.0, 20.0, 0.0);
/// let plan = janitor.plan(&items, &RatioLedger::new(), status);
///
/// assert_eq!(plan.evictions.len(), 1);
/// assert_eq!(plan.evictions[0].item.name, "A");
/// # Ok::<(), reclaim_janitor::JanitorError>(())
/// ```
#[derive(Debug)]
pub struct Janitor {
    config: JanitorConfig,
    rules: RuleTables,
    metrics: JanitorMetrics,
}

impl Janitor {
    /// Create a new Janitor, validating the configuration
    pub fn new(config: JanitorConfig, rules: RuleTables) -> Result<Self, JanitorError> {
        config.validate()?;
        Ok(Self {
            config,
            rules,
            metrics: JanitorMetrics::new(),
        })
    }

    /// Active configuration
    pub fn config(&self) -> &JanitorConfig {
        &self.config
    }

    /// Active rule tables
    pub fn rules(&self) -> &RuleTables {
        &self.rules
    }

    /// Get a reference to the current metrics
    pub fn metrics(&self) -> &JanitorMetrics {
        &self.metrics
    }

    /// Space figures for the given snapshot and free space
    pub fn space_status(&self, items: &[Item], free_gb: f64) -> SpaceStatus {
        let remaining: f64 = items.iter().map(Item::remaining_download_gb).sum();
        SpaceStatus::new(
            free_gb,
            remaining,
            self.config.cleanup.min_space_gb,
            self.config.cleanup.download_min_space_gb,
        )
    }

    /// Decide what to evict. Pure: nothing is deleted.
    ///
    /// The space selector runs only when the target is positive. An item
    /// selected by both policies is kept once, under the space policy.
    pub fn plan<'a>(&self, items: &'a [Item], ledger: &RatioLedger, status: SpaceStatus) -> CleanupPlan<'a> {
        let cleanup = &self.config.cleanup;
        let engine = ScoreEngine::new(&self.rules, ledger, self.config.scoring);
        let eligible = filter_eligible(items, &self.rules);

        let target = status.target_gb();
        let by_space = if target > 0.0 {
            tracing::info!(
                "Space target {:.2} GB (free {:.2} GB, downloads pending {:.2} GB)",
                target,
                status.free_gb,
                status.remaining_download_gb
            );
            select_by_space(&eligible, &cleanup.space_categories, target, |item| engine.score(item))
        } else {
            tracing::debug!("Free space {:.2} GB meets both targets", status.free_gb);
            Vec::new()
        };

        let by_count = select_by_count(
            &eligible,
            &cleanup.count_categories,
            cleanup.max_per_category,
            cleanup.sort_count_by_size,
            |item| engine.score(item),
        );

        let mut seen: HashSet<&ItemId> = HashSet::new();
        let mut evictions = Vec::with_capacity(by_space.len() + by_count.len());
        for eviction in by_space.into_iter().chain(by_count) {
            let item: &'a Item = eviction.item;
            if seen.insert(&item.id) {
                evictions.push(eviction);
            } else {
                tracing::debug!("{} already selected, skipping {} selection", item.name, eviction.policy);
            }
        }

        CleanupPlan {
            status,
            eligible: eligible.len(),
            evictions,
        }
    }

    /// Items in eviction order with their score factors
    ///
    /// Ineligible items are included and flagged; `category` narrows the
    /// listing case-insensitively.
    pub fn rank<'a>(&self, items: &'a [Item], ledger: &RatioLedger, category: Option<&str>) -> Vec<RankedItem<'a>> {
        let engine = ScoreEngine::new(&self.rules, ledger, self.config.scoring);

        let mut ranked: Vec<RankedItem<'a>> = items
            .iter()
            .filter(|item| category.is_none_or(|c| item.in_category(c)))
            .map(|item| RankedItem {
                item,
                breakdown: engine.breakdown(item),
                eligible: is_eligible(item, &self.rules),
            })
            .collect();

        ranked.sort_by(|a, b| {
            eviction_order(
                &EvictionCandidate {
                    item: a.item,
                    value: a.breakdown.value,
                },
                &EvictionCandidate {
                    item: b.item,
                    value: b.breakdown.value,
                },
            )
        });
        ranked
    }

    /// Run one cleanup: snapshot, plan, then delete
    ///
    /// Failing to list items or measure free space aborts the run before
    /// anything is deleted. A rejected deletion is logged and counted, and
    /// the remaining evictions still go ahead.
    pub async fn clean<C, H, P>(&mut self, client: &C, history: &H, probe: &P) -> Result<RunReport, JanitorError>
    where
        C: TorrentClient,
        C::Error: Display,
        H: HistoryStore,
        P: SpaceProbe,
        P::Error: Display,
    {
        let items = client
            .list_items()
            .await
            .map_err(|e| JanitorError::Client(e.to_string()))?;
        let free_gb = probe.free_space_gb().map_err(|e| JanitorError::Probe(e.to_string()))?;
        let ledger = history.load();

        let status = self.space_status(&items, free_gb);
        let plan = self.plan(&items, &ledger, status);
        let dry_run = self.config.dry_run;

        tracing::info!(
            "{} items, {} eligible, {} selected for removal",
            items.len(),
            plan.eligible,
            plan.evictions.len()
        );

        let mut records = Vec::with_capacity(plan.evictions.len());
        for eviction in &plan.evictions {
            let item = eviction.item;

            let outcome = if dry_run {
                tracing::info!(
                    "TEST MODE: would remove {} ({}, {:.2} GB, {} policy)",
                    item.name,
                    item.id,
                    item.size_gb(),
                    eviction.policy
                );
                EvictionOutcome::Planned
            } else {
                match client.delete_item(&item.id, self.config.cleanup.delete_files).await {
                    Ok(()) => {
                        tracing::info!(
                            "Removed {} ({}, {:.2} GB, {} policy)",
                            item.name,
                            item.id,
                            item.size_gb(),
                            eviction.policy
                        );
                        self.metrics.record_removal(eviction.policy, item.size_gb());
                        EvictionOutcome::Removed
                    }
                    Err(e) => {
                        tracing::warn!("Failed to remove {} ({}): {}", item.name, item.id, e);
                        self.metrics.record_failure();
                        EvictionOutcome::Failed
                    }
                }
            };

            records.push(EvictionRecord::new(item, eviction.value, eviction.policy, outcome));
        }

        self.metrics.record_run();

        Ok(RunReport {
            dry_run,
            free_gb,
            remaining_download_gb: status.remaining_download_gb,
            target_gb: status.target_gb(),
            eligible: plan.eligible,
            records,
        })
    }

    /// Append today's ratios to the history store
    ///
    /// Histories of items the client no longer reports are kept unless
    /// `prune_missing_history` is set.
    pub async fn log_ratios<C, H>(&mut self, client: &C, history: &H, today: NaiveDate) -> Result<HistoryStats, JanitorError>
    where
        C: TorrentClient,
        C::Error: Display,
        H: HistoryStore,
        H::Error: Display,
    {
        let items = client
            .list_items()
            .await
            .map_err(|e| JanitorError::Client(e.to_string()))?;
        let old = history.load();

        let update = old.update(&items, &self.config.history, today);
        let mut ledger = update.ledger;

        if self.config.prune_missing_history {
            let present: HashSet<ItemId> = items.iter().map(|item| item.id.clone()).collect();
            let pruned = ledger.prune(&present);
            if pruned > 0 {
                tracing::info!("Pruned history of {} items no longer in the client", pruned);
            }
        }

        history.save(&ledger).map_err(|e| JanitorError::Store(e.to_string()))?;

        let stats = HistoryStats::between(&old, &ledger, self.config.history.max_entries);
        tracing::info!(
            "Logged ratios for {} items ({} updated, {} new, {} removed, {} at capacity)",
            stats.total,
            update.touched.len(),
            stats.added,
            stats.removed,
            stats.at_capacity
        );

        self.metrics.record_ratio_log();
        Ok(stats)
    }
}
