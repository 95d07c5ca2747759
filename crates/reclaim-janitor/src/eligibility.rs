//! Eligibility filter
//!
//! Only items that satisfied their category's seed-time or ratio threshold
//! may be removed.

use reclaim_domain::{Item, RuleTables};

/// True if the item may be considered for removal
pub fn is_eligible(item: &Item, rules: &RuleTables) -> bool {
    rules
        .category_rule(&item.category)
        .is_some_and(|rule| rule.is_satisfied(item.seeding_time_secs, item.ratio))
}

/// Items that may be removed, in input order
///
/// Items in categories without a rule are never eligible.
pub fn filter_eligible<'a>(items: &'a [Item], rules: &RuleTables) -> Vec<&'a Item> {
    let eligible: Vec<&Item> = items
        .iter()
        .filter(|item| {
            if rules.category_rule(&item.category).is_none() {
                tracing::debug!("No seed rule for category '{}', keeping {}", item.category, item.name);
                return false;
            }
            is_eligible(item, rules)
        })
        .collect();

    tracing::debug!("{} of {} items eligible for removal", eligible.len(), items.len());
    eligible
}
