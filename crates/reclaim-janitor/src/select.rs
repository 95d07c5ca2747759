//! Eviction selectors
//!
//! Two independent policies pick items to remove from the eligible set:
//!
//! - **Space**: evict the lowest-value items in the watched categories until
//!   enough space has been freed.
//! - **Count**: keep at most N items per watched category, evicting the rest.
//!
//! Selectors are pure. They never touch the client and never deduplicate
//! against each other; that is the caller's job.

use reclaim_domain::Item;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashSet;

/// An item paired with its value for one run
#[derive(Debug, Clone, Copy)]
pub struct EvictionCandidate<'a> {
    /// The scored item
    pub item: &'a Item,

    /// Its value (lower is evicted first)
    pub value: f64,
}

/// Eviction order: ascending value, then longest seeding, then largest, then
/// name.
///
/// Among equally valuable items the one that has seeded longest goes first,
/// and after that the one that frees the most space. The name tiebreak makes
/// the order total so selection never depends on input order.
pub fn eviction_order(a: &EvictionCandidate<'_>, b: &EvictionCandidate<'_>) -> Ordering {
    a.value
        .total_cmp(&b.value)
        .then_with(|| b.item.seeding_time_secs.cmp(&a.item.seeding_time_secs))
        .then_with(|| b.item.size_bytes.cmp(&a.item.size_bytes))
        .then_with(|| a.item.name.cmp(&b.item.name))
}

/// Score items and sort them into eviction order
pub fn rank<'a, I, F>(items: I, score_fn: F) -> Vec<EvictionCandidate<'a>>
where
    I: IntoIterator<Item = &'a Item>,
    F: Fn(&Item) -> f64,
{
    let mut candidates: Vec<EvictionCandidate<'a>> = items
        .into_iter()
        .map(|item| EvictionCandidate {
            item,
            value: score_fn(item),
        })
        .collect();

    candidates.sort_by(eviction_order);
    candidates
}

/// Which policy selected an item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvictionPolicy {
    /// Freed to meet the free-space target
    Space,

    /// Over its category's count cap
    Count,
}

impl EvictionPolicy {
    /// Lowercase policy name
    pub fn as_str(&self) -> &'static str {
        match self {
            EvictionPolicy::Space => "space",
            EvictionPolicy::Count => "count",
        }
    }
}

impl std::fmt::Display for EvictionPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One selected item
#[derive(Debug, Clone, Copy)]
pub struct Eviction<'a> {
    /// The item to remove
    pub item: &'a Item,

    /// Its value, if the policy ranked by value
    pub value: Option<f64>,

    /// The policy that selected it
    pub policy: EvictionPolicy,
}

fn in_watched(item: &Item, watched: &[String]) -> bool {
    watched.iter().any(|category| item.in_category(category))
}

/// Select the lowest-value items in `watched` until their combined size
/// reaches `space_needed_gb`.
///
/// Selection stops as soon as the target is met, so the size selected before
/// the last pick is always below the target. A target of zero or less selects
/// nothing. If every candidate together is too small, all are selected.
pub fn select_by_space<'a, F>(
    eligible: &[&'a Item],
    watched: &[String],
    space_needed_gb: f64,
    score_fn: F,
) -> Vec<Eviction<'a>>
where
    F: Fn(&Item) -> f64,
{
    if space_needed_gb.is_nan() || space_needed_gb <= 0.0 {
        return Vec::new();
    }

    let candidates = rank(eligible.iter().copied().filter(|item| in_watched(item, watched)), score_fn);

    let mut freed_gb = 0.0;
    let mut selected = Vec::new();
    for candidate in candidates {
        if freed_gb >= space_needed_gb {
            break;
        }
        freed_gb += candidate.item.size_gb();
        selected.push(Eviction {
            item: candidate.item,
            value: Some(candidate.value),
            policy: EvictionPolicy::Space,
        });
    }

    if freed_gb < space_needed_gb {
        tracing::warn!(
            "Watched categories hold {:.2} GB of eligible items, short of the {:.2} GB target",
            freed_gb,
            space_needed_gb
        );
    }

    selected
}

/// Enforce `max_per_category` on every watched category.
///
/// With `sort_by_size`, items are kept largest first and the smallest excess
/// is evicted (listed largest to smallest). Otherwise the lowest-value excess
/// is evicted in eviction order. Watched categories are matched
/// case-insensitively and a category listed twice is processed once.
pub fn select_by_count<'a, F>(
    eligible: &[&'a Item],
    watched: &[String],
    max_per_category: usize,
    sort_by_size: bool,
    score_fn: F,
) -> Vec<Eviction<'a>>
where
    F: Fn(&Item) -> f64,
{
    let mut seen = HashSet::new();
    let mut selected = Vec::new();

    for category in watched {
        if !seen.insert(category.to_lowercase()) {
            continue;
        }

        let members: Vec<&'a Item> = eligible.iter().copied().filter(|item| item.in_category(category)).collect();
        if members.len() <= max_per_category {
            tracing::debug!(
                "Category '{}' holds {} of {} allowed items",
                category,
                members.len(),
                max_per_category
            );
            continue;
        }

        let excess = members.len() - max_per_category;
        tracing::debug!("Category '{}' is {} items over its cap", category, excess);

        if sort_by_size {
            let mut by_size = members;
            by_size.sort_by(|a, b| b.size_bytes.cmp(&a.size_bytes));
            selected.extend(by_size[max_per_category..].iter().map(|&item| Eviction {
                item,
                value: None,
                policy: EvictionPolicy::Count,
            }));
        } else {
            selected.extend(rank(members, &score_fn).into_iter().take(excess).map(|c| Eviction {
                item: c.item,
                value: Some(c.value),
                policy: EvictionPolicy::Count,
            }));
        }
    }

    selected
}

#[cfg(test)]
mod tests {
    use super::*;
    use reclaim_domain::SECONDS_PER_WEEK;

    const GB: u64 = 1_000_000_000;

    fn item(id: &str, category: &str, size_gb: u64, weeks: u64, ratio: f64) -> Item {
        Item::new(id, id, category, size_gb * GB, weeks * SECONDS_PER_WEEK, ratio)
    }

    fn by_ratio(item: &Item) -> f64 {
        item.ratio
    }

    fn ids(evictions: &[Eviction<'_>]) -> Vec<String> {
        evictions.iter().map(|e| e.item.id.to_string()).collect()
    }

    fn watched(categories: &[&str]) -> Vec<String> {
        categories.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_eviction_order_tiebreaks() {
        let old = item("old", "tv", 1, 10, 0.0);
        let young = item("young", "tv", 1, 2, 0.0);
        let big = item("big", "tv", 5, 2, 0.0);
        let cheap = item("cheap", "tv", 1, 2, 0.0);

        let candidate = |item, value| EvictionCandidate { item, value };

        // Value first
        assert_eq!(eviction_order(&candidate(&old, 0.5), &candidate(&young, 0.1)), Ordering::Greater);
        // Longer seeding first
        assert_eq!(eviction_order(&candidate(&old, 0.1), &candidate(&young, 0.1)), Ordering::Less);
        // Larger first
        assert_eq!(eviction_order(&candidate(&big, 0.1), &candidate(&young, 0.1)), Ordering::Less);
        // Name last
        assert_eq!(eviction_order(&candidate(&cheap, 0.1), &candidate(&young, 0.1)), Ordering::Less);
        assert_eq!(eviction_order(&candidate(&young, 0.1), &candidate(&young, 0.1)), Ordering::Equal);
    }

    #[test]
    fn test_space_selects_lowest_value_until_target() {
        let items = [
            item("a", "tv", 10, 1, 0.1),
            item("b", "tv", 10, 1, 0.2),
            item("c", "tv", 10, 1, 0.3),
        ];
        let eligible: Vec<&Item> = items.iter().collect();

        let selected = select_by_space(&eligible, &watched(&["tv"]), 15.0, by_ratio);
        assert_eq!(ids(&selected), vec!["a", "b"]);
        assert!(selected.iter().all(|e| e.policy == EvictionPolicy::Space));
        assert_eq!(selected[0].value, Some(0.1));
    }

    #[test]
    fn test_space_stops_on_exact_target() {
        let items = [item("a", "tv", 10, 1, 0.1), item("b", "tv", 10, 1, 0.2)];
        let eligible: Vec<&Item> = items.iter().collect();

        let selected = select_by_space(&eligible, &watched(&["tv"]), 10.0, by_ratio);
        assert_eq!(ids(&selected), vec!["a"]);
    }

    #[test]
    fn test_space_non_positive_target_selects_nothing() {
        let items = [item("a", "tv", 10, 1, 0.1)];
        let eligible: Vec<&Item> = items.iter().collect();

        assert!(select_by_space(&eligible, &watched(&["tv"]), 0.0, by_ratio).is_empty());
        assert!(select_by_space(&eligible, &watched(&["tv"]), -5.0, by_ratio).is_empty());
    }

    #[test]
    fn test_space_ignores_unwatched_categories() {
        let items = [
            item("a", "movies", 50, 1, 0.0),
            item("b", "TV", 5, 1, 0.5),
            item("c", "tv", 5, 1, 0.4),
        ];
        let eligible: Vec<&Item> = items.iter().collect();

        let selected = select_by_space(&eligible, &watched(&["tv"]), 100.0, by_ratio);
        assert_eq!(ids(&selected), vec!["c", "b"], "short target takes everything watched");
    }

    #[test]
    fn test_space_equal_values_prefer_older_items() {
        let items = [item("young", "tv", 10, 1, 0.0), item("old", "tv", 10, 9, 0.0)];
        let eligible: Vec<&Item> = items.iter().collect();

        let selected = select_by_space(&eligible, &watched(&["tv"]), 5.0, |_| 0.2);
        assert_eq!(ids(&selected), vec!["old"]);
    }

    #[test]
    fn test_count_by_size_evicts_smallest() {
        let items = [
            item("s1", "sb", 1, 1, 0.0),
            item("s5", "sb", 5, 1, 0.0),
            item("s3", "sb", 3, 1, 0.0),
            item("s2", "sb", 2, 1, 0.0),
        ];
        let eligible: Vec<&Item> = items.iter().collect();

        let selected = select_by_count(&eligible, &watched(&["sb"]), 2, true, |_| panic!("not scored"));
        assert_eq!(ids(&selected), vec!["s2", "s1"]);
        assert!(selected.iter().all(|e| e.value.is_none() && e.policy == EvictionPolicy::Count));
    }

    #[test]
    fn test_count_by_score_evicts_lowest_value() {
        let items = [
            item("a", "sb", 1, 1, 0.9),
            item("b", "sb", 1, 1, 0.1),
            item("c", "sb", 1, 1, 0.5),
        ];
        let eligible: Vec<&Item> = items.iter().collect();

        let selected = select_by_count(&eligible, &watched(&["sb"]), 1, false, by_ratio);
        assert_eq!(ids(&selected), vec!["b", "c"]);
        assert_eq!(selected[1].value, Some(0.5));
    }

    #[test]
    fn test_count_within_cap_selects_nothing() {
        let items = [item("a", "sb", 1, 1, 0.9), item("b", "sb", 1, 1, 0.1)];
        let eligible: Vec<&Item> = items.iter().collect();

        assert!(select_by_count(&eligible, &watched(&["sb"]), 2, false, by_ratio).is_empty());
    }

    #[test]
    fn test_count_handles_categories_independently() {
        let items = [
            item("a1", "a", 1, 1, 0.1),
            item("a2", "a", 1, 1, 0.2),
            item("b1", "b", 1, 1, 0.3),
            item("b2", "B", 1, 1, 0.4),
            item("b3", "b", 1, 1, 0.5),
        ];
        let eligible: Vec<&Item> = items.iter().collect();

        let selected = select_by_count(&eligible, &watched(&["a", "b", "B"]), 1, false, by_ratio);
        assert_eq!(ids(&selected), vec!["a1", "b1", "b2"]);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn arb_items() -> impl Strategy<Value = Vec<Item>> {
            prop::collection::vec((0u64..50, 0u64..20, 0.0f64..5.0, 0usize..3), 0..30).prop_map(|specs| {
                specs
                    .into_iter()
                    .enumerate()
                    .map(|(i, (size, weeks, ratio, cat))| {
                        item(&format!("t{}", i), ["a", "b", "c"][cat], size, weeks, ratio)
                    })
                    .collect()
            })
        }

        proptest! {
            #[test]
            fn space_selection_never_overshoots(items in arb_items(), target in 0.0f64..200.0) {
                let eligible: Vec<&Item> = items.iter().collect();
                let selected = select_by_space(&eligible, &watched(&["a", "b"]), target, by_ratio);

                let sizes: Vec<f64> = selected.iter().map(|e| e.item.size_gb()).collect();
                if let Some((_, before_last)) = sizes.split_last() {
                    prop_assert!(before_last.iter().sum::<f64>() < target);
                }

                let values: Vec<f64> = selected.iter().filter_map(|e| e.value).collect();
                prop_assert!(values.windows(2).all(|w| w[0] <= w[1]));
            }

            #[test]
            fn count_selection_is_exact_and_dominated(
                items in arb_items(),
                max in 0usize..10,
                by_size in any::<bool>(),
            ) {
                let eligible: Vec<&Item> = items.iter().collect();
                let selected = select_by_count(&eligible, &watched(&["a"]), max, by_size, by_ratio);

                let members: Vec<&Item> = items.iter().filter(|i| i.category == "a").collect();
                prop_assert_eq!(selected.len(), members.len().saturating_sub(max));

                let removed: HashSet<&str> = selected.iter().map(|e| e.item.id.as_str()).collect();
                for kept in members.iter().filter(|i| !removed.contains(i.id.as_str())) {
                    for gone in selected.iter().map(|e| e.item) {
                        if by_size {
                            prop_assert!(kept.size_bytes >= gone.size_bytes);
                        } else {
                            prop_assert!(kept.ratio >= gone.ratio);
                        }
                    }
                }
            }
        }
    }
}
