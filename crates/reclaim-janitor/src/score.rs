//! Value scoring for eviction ranking
//!
//! An item's value approximates "ratio earned per week of observation",
//! scaled up by its category's bonus rule. Lower value means a stronger
//! eviction candidate. Values are only meaningful relative to each other.

use crate::ScoringConfig;
use reclaim_domain::{BonusRule, Item, RatioHistory, RatioLedger, RuleTables};

/// Ratio growth rate before bonuses
///
/// With history, the growth since the oldest recorded snapshot is divided by
/// the recorded span. Over a short span the growth is floored at
/// `min_ratio_change`, so a freshly added item cannot look worthless just
/// because it has not had time to upload yet. Without history, the lifetime
/// ratio is divided by the weeks seeded, with the same floor for young items.
pub fn base_value(item: &Item, history: &RatioHistory, params: &ScoringConfig) -> f64 {
    let weeks_seeded = item.weeks_seeded();

    match history.oldest() {
        Some(oldest) => {
            let recorded_weeks = history.recorded_weeks();
            let mut delta = item.ratio - oldest.ratio;
            if recorded_weeks <= params.min_weeks_seeded {
                delta = delta.max(params.min_ratio_change);
            }

            if delta != 0.0 && recorded_weeks > 0.0 {
                delta / recorded_weeks
            } else {
                0.0
            }
        }
        None if item.ratio < params.min_ratio_change && weeks_seeded <= params.min_weeks_seeded => {
            if weeks_seeded > 0.0 {
                params.min_ratio_change / weeks_seeded
            } else {
                0.0
            }
        }
        None => {
            if weeks_seeded > 0.0 && item.ratio != 0.0 {
                item.ratio / weeks_seeded
            } else {
                0.0
            }
        }
    }
}

/// Final value of an item: base value times its category bonus
///
/// # Examples
///
/// ```
/// use reclaim_domain::{Item, RatioHistory, SECONDS_PER_WEEK};
/// use reclaim_janitor::{score, ScoringConfig};
///
/// let item = Item::new("h1", "Show", "tv", 0, 2 * SECONDS_PER_WEEK, 0.1);
/// let value = score(&item, &RatioHistory::default(), None, &ScoringConfig::default());
/// assert!((value - 0.15).abs() < 1e-12);
/// ```
pub fn score(item: &Item, history: &RatioHistory, bonus: Option<&BonusRule>, params: &ScoringConfig) -> f64 {
    let multiplier = bonus.map_or(1.0, |rule| rule.multiplier(item.weeks_seeded(), item.size_gb()));
    base_value(item, history, params) * multiplier
}

/// Every factor that went into an item's value
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreBreakdown {
    /// Seeding time in weeks
    pub weeks_seeded: f64,

    /// Span of recorded history in weeks (entries / 7)
    pub recorded_weeks: f64,

    /// Ratio growth rate before bonuses
    pub base_value: f64,

    /// Category bonus multiplier (1.0 if none applies)
    pub bonus_multiplier: f64,

    /// base_value × bonus_multiplier
    pub value: f64,
}

/// Scores items against one run's rule tables and ratio ledger
#[derive(Debug, Clone, Copy)]
pub struct ScoreEngine<'a> {
    rules: &'a RuleTables,
    ledger: &'a RatioLedger,
    params: ScoringConfig,
}

impl<'a> ScoreEngine<'a> {
    /// Create an engine for one run
    pub fn new(rules: &'a RuleTables, ledger: &'a RatioLedger, params: ScoringConfig) -> Self {
        Self { rules, ledger, params }
    }

    /// Value of an item
    pub fn score(&self, item: &Item) -> f64 {
        self.breakdown(item).value
    }

    /// Value of an item with its intermediate factors
    pub fn breakdown(&self, item: &Item) -> ScoreBreakdown {
        let empty = RatioHistory::default();
        let history = self.ledger.get(&item.id).unwrap_or(&empty);

        let weeks_seeded = item.weeks_seeded();
        let base_value = base_value(item, history, &self.params);
        let bonus_multiplier = self
            .rules
            .bonus_rule(&item.category)
            .map_or(1.0, |rule| rule.multiplier(weeks_seeded, item.size_gb()));

        let breakdown = ScoreBreakdown {
            weeks_seeded,
            recorded_weeks: history.recorded_weeks(),
            base_value,
            bonus_multiplier,
            value: base_value * bonus_multiplier,
        };

        tracing::trace!(
            "{}: base {:.4} x bonus {:.3} = {:.4}",
            item.name,
            breakdown.base_value,
            breakdown.bonus_multiplier,
            breakdown.value
        );
        breakdown
    }
}
