//! Rule tables - category thresholds and bonus multipliers
//!
//! Both tables are built once from raw `"key:value, key:value"` strings keyed
//! by category, then treated as immutable for the rest of the run. A
//! malformed entry only disqualifies its own category; the problem is
//! reported as a [`RuleWarning`] and the remaining categories still load.
//!
//! Multiplier tables are written as `threshold=multiplier` pairs separated by
//! `|`:
//!
//! ```text
//! SB = "min_weeks:1, time_multipliers:2=1.05|4=1.125|10=1.6, size_multipliers:4=1.1|10=1.2"
//! ```

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;

/// Removal thresholds for one category
///
/// An item becomes removable once it meets either threshold. An absent
/// threshold never counts as met.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CategoryRule {
    /// Minimum seeding time in seconds
    pub min_seed_time: Option<u64>,

    /// Minimum ratio
    pub min_ratio: Option<f64>,
}

impl CategoryRule {
    /// True if the item has seeded long enough or shared enough
    pub fn is_satisfied(&self, seeding_time_secs: u64, ratio: f64) -> bool {
        let seed_time_met = self.min_seed_time.is_some_and(|min| seeding_time_secs >= min);
        let ratio_met = self.min_ratio.is_some_and(|min| ratio >= min);
        seed_time_met || ratio_met
    }
}

/// Step function over ascending `(threshold, multiplier)` pairs
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MultiplierTable(Vec<(f64, f64)>);

impl MultiplierTable {
    /// Build a table, sorting pairs by threshold
    pub fn new(mut pairs: Vec<(f64, f64)>) -> Self {
        pairs.sort_by(|a, b| a.0.total_cmp(&b.0));
        Self(pairs)
    }

    /// Pairs in ascending threshold order
    pub fn pairs(&self) -> &[(f64, f64)] {
        &self.0
    }

    /// Multiplier for `value`; see [`lookup_multiplier`]
    pub fn lookup(&self, value: f64) -> f64 {
        lookup_multiplier(value, &self.0)
    }
}

/// Multiplier of the highest threshold that is `<= value`, or `1.0`.
///
/// `pairs` must be sorted by ascending threshold. A value exactly equal to a
/// threshold uses that threshold's multiplier.
///
/// # Examples
///
/// ```
/// use reclaim_domain::lookup_multiplier;
///
/// let table = [(4.0, 1.1), (10.0, 1.2), (20.0, 1.3)];
/// assert_eq!(lookup_multiplier(15.0, &table), 1.2);
/// assert_eq!(lookup_multiplier(20.0, &table), 1.3);
/// assert_eq!(lookup_multiplier(3.0, &table), 1.0);
/// assert_eq!(lookup_multiplier(3.0, &[]), 1.0);
/// ```
pub fn lookup_multiplier(value: f64, pairs: &[(f64, f64)]) -> f64 {
    pairs
        .iter()
        .rev()
        .find(|(threshold, _)| *threshold <= value)
        .map(|(_, multiplier)| *multiplier)
        .unwrap_or(1.0)
}

/// Category-specific multipliers that raise an item's value
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BonusRule {
    /// Bonus only applies once an item has seeded longer than this many weeks
    pub min_weeks: Option<f64>,

    /// Multipliers keyed by weeks seeded
    pub time_multipliers: Option<MultiplierTable>,

    /// Multipliers keyed by size in GB
    pub size_multipliers: Option<MultiplierTable>,

    /// Weeks seeded at which the extra multiplier kicks in
    pub extra_multiplier_weeks: Option<f64>,

    /// Flat extra multiplier for long-seeded items
    pub extra_multiplier_value: Option<f64>,
}

impl BonusRule {
    fn is_empty(&self) -> bool {
        self == &BonusRule::default()
    }

    /// Combined multiplier for an item of the given age and size.
    ///
    /// Returns `1.0` when the item has not passed `min_weeks`.
    pub fn multiplier(&self, weeks_seeded: f64, size_gb: f64) -> f64 {
        if self.min_weeks.is_some_and(|min| weeks_seeded <= min) {
            return 1.0;
        }

        let time = self.time_multipliers.as_ref().map_or(1.0, |t| t.lookup(weeks_seeded));
        let size = self.size_multipliers.as_ref().map_or(1.0, |t| t.lookup(size_gb));
        let extra = match (self.extra_multiplier_weeks, self.extra_multiplier_value) {
            (Some(weeks), Some(value)) if weeks_seeded >= weeks => value,
            _ => 1.0,
        };

        time * size * extra
    }
}

/// A category skipped while building rule tables
#[derive(Debug, Clone, PartialEq)]
pub struct RuleWarning {
    /// Category as written in the configuration
    pub category: String,

    /// What was wrong with it
    pub reason: String,
}

impl fmt::Display for RuleWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "skipping rules for category '{}': {}", self.category, self.reason)
    }
}

/// Immutable rule tables for one run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleTables {
    /// Removal thresholds keyed by lower-cased category
    pub categories: HashMap<String, CategoryRule>,

    /// Bonus rules keyed by category exactly as configured
    pub bonuses: HashMap<String, BonusRule>,
}

impl RuleTables {
    /// Build both tables, collecting warnings for skipped categories
    pub fn build<'a, C, B>(category_rules: C, bonus_rules: B) -> (Self, Vec<RuleWarning>)
    where
        C: IntoIterator<Item = (&'a String, &'a String)>,
        B: IntoIterator<Item = (&'a String, &'a String)>,
    {
        let (categories, mut warnings) = build_category_rules(category_rules);
        let (bonuses, bonus_warnings) = build_bonus_rules(bonus_rules);
        warnings.extend(bonus_warnings);

        (Self { categories, bonuses }, warnings)
    }

    /// Removal rule for a category (case-insensitive)
    pub fn category_rule(&self, category: &str) -> Option<&CategoryRule> {
        self.categories.get(&category.to_lowercase())
    }

    /// Bonus rule for a category (exact match)
    pub fn bonus_rule(&self, category: &str) -> Option<&BonusRule> {
        self.bonuses.get(category)
    }
}

/// Parse per-category removal thresholds.
///
/// Recognised keys are `min_seed_time` (seconds) and `min_ratio`; other keys
/// are ignored. Category names are lower-cased; when two names differ only
/// by case, the first one seen wins and the other is reported.
pub fn build_category_rules<'a, I>(raw: I) -> (HashMap<String, CategoryRule>, Vec<RuleWarning>)
where
    I: IntoIterator<Item = (&'a String, &'a String)>,
{
    let mut rules = HashMap::new();
    let mut warnings = Vec::new();

    for (category, spec) in raw {
        match parse_category_rule(spec) {
            Ok(rule) => match rules.entry(category.to_lowercase()) {
                Entry::Vacant(slot) => {
                    slot.insert(rule);
                }
                Entry::Occupied(slot) => warnings.push(RuleWarning {
                    category: category.clone(),
                    reason: format!("duplicates the rule for '{}' (names are case-insensitive)", slot.key()),
                }),
            },
            Err(reason) => warnings.push(RuleWarning {
                category: category.clone(),
                reason,
            }),
        }
    }

    (rules, warnings)
}

/// Parse per-category bonus multipliers.
///
/// Categories without any recognised key are left out of the table.
pub fn build_bonus_rules<'a, I>(raw: I) -> (HashMap<String, BonusRule>, Vec<RuleWarning>)
where
    I: IntoIterator<Item = (&'a String, &'a String)>,
{
    let mut rules = HashMap::new();
    let mut warnings = Vec::new();

    for (category, spec) in raw {
        match parse_bonus_rule(spec) {
            Ok(rule) if rule.is_empty() => {}
            Ok(rule) => {
                rules.insert(category.clone(), rule);
            }
            Err(reason) => warnings.push(RuleWarning {
                category: category.clone(),
                reason,
            }),
        }
    }

    (rules, warnings)
}

fn parse_category_rule(spec: &str) -> Result<CategoryRule, String> {
    let mut rule = CategoryRule::default();

    for (key, value) in fragments(spec)? {
        match key.as_str() {
            "min_seed_time" => {
                let seconds = parse_non_negative(&key, value)?;
                rule.min_seed_time = Some(seconds as u64);
            }
            "min_ratio" => rule.min_ratio = Some(parse_non_negative(&key, value)?),
            _ => {}
        }
    }

    Ok(rule)
}

fn parse_bonus_rule(spec: &str) -> Result<BonusRule, String> {
    let mut rule = BonusRule::default();

    for (key, value) in fragments(spec)? {
        match key.as_str() {
            "min_weeks" => rule.min_weeks = Some(parse_number(&key, value)?),
            "time_multipliers" => rule.time_multipliers = Some(parse_table(&key, value)?),
            "size_multipliers" => rule.size_multipliers = Some(parse_table(&key, value)?),
            "extra_multiplier_weeks" => rule.extra_multiplier_weeks = Some(parse_number(&key, value)?),
            "extra_multiplier_value" => rule.extra_multiplier_value = Some(parse_number(&key, value)?),
            _ => {}
        }
    }

    Ok(rule)
}

/// Split `"a:1, b:2"` into lower-cased keys and raw values
fn fragments(spec: &str) -> Result<Vec<(String, &str)>, String> {
    spec.split(',')
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty())
        .map(|fragment| {
            fragment
                .split_once(':')
                .map(|(key, value)| (key.trim().to_lowercase(), value.trim()))
                .ok_or_else(|| format!("expected 'key:value', found '{}'", fragment))
        })
        .collect()
}

fn parse_number(key: &str, value: &str) -> Result<f64, String> {
    value
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .ok_or_else(|| format!("invalid number '{}' for '{}'", value, key))
}

fn parse_non_negative(key: &str, value: &str) -> Result<f64, String> {
    let n = parse_number(key, value)?;
    if n < 0.0 {
        return Err(format!("'{}' must not be negative, found {}", key, value));
    }
    Ok(n)
}

fn parse_table(key: &str, value: &str) -> Result<MultiplierTable, String> {
    let pairs = value
        .split('|')
        .map(str::trim)
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (threshold, multiplier) = pair
                .split_once('=')
                .ok_or_else(|| format!("expected 'threshold=multiplier' in '{}', found '{}'", key, pair))?;
            Ok((parse_number(key, threshold.trim())?, parse_number(key, multiplier.trim())?))
        })
        .collect::<Result<Vec<_>, String>>()?;

    Ok(MultiplierTable::new(pairs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn raw(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_lookup_multiplier_step_function() {
        let table = [(4.0, 1.1), (10.0, 1.2), (20.0, 1.3)];
        assert_eq!(lookup_multiplier(15.0, &table), 1.2);
        assert_eq!(lookup_multiplier(20.0, &table), 1.3);
        assert_eq!(lookup_multiplier(25.0, &table), 1.3);
        assert_eq!(lookup_multiplier(4.0, &table), 1.1);
        assert_eq!(lookup_multiplier(3.0, &table), 1.0);
    }

    #[test]
    fn test_lookup_multiplier_empty_table() {
        assert_eq!(lookup_multiplier(0.0, &[]), 1.0);
        assert_eq!(lookup_multiplier(1e9, &[]), 1.0);
        assert_eq!(MultiplierTable::default().lookup(5.0), 1.0);
    }

    #[test]
    fn test_multiplier_table_sorts_pairs() {
        let table = MultiplierTable::new(vec![(20.0, 1.3), (4.0, 1.1), (10.0, 1.2)]);
        assert_eq!(table.pairs(), &[(4.0, 1.1), (10.0, 1.2), (20.0, 1.3)]);
        assert_eq!(table.lookup(12.0), 1.2);
    }

    #[test]
    fn test_category_rules_parse() {
        let (rules, warnings) = build_category_rules(&raw(&[
            ("Movies", "min_seed_time:1209600, min_ratio:2.0"),
            ("tv", "min_ratio: 1.5, colour: blue"),
        ]));

        assert!(warnings.is_empty());
        assert_eq!(
            rules.get("movies"),
            Some(&CategoryRule {
                min_seed_time: Some(1_209_600),
                min_ratio: Some(2.0),
            })
        );
        assert_eq!(
            rules.get("tv"),
            Some(&CategoryRule {
                min_seed_time: None,
                min_ratio: Some(1.5),
            })
        );
    }

    #[test]
    fn test_case_colliding_categories_warn() {
        let (rules, warnings) = build_category_rules(&raw(&[("TV", "min_ratio:5"), ("tv", "min_seed_time:60")]));

        assert_eq!(rules.len(), 1);
        assert_eq!(
            rules.get("tv"),
            Some(&CategoryRule {
                min_seed_time: None,
                min_ratio: Some(5.0),
            })
        );
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].category, "tv");
        assert!(warnings[0].reason.contains("case-insensitive"));
    }

    #[test]
    fn test_malformed_category_is_skipped() {
        let (rules, warnings) = build_category_rules(&raw(&[
            ("movies", "min_seed_time:lots"),
            ("tv", "min_ratio:1.0"),
            ("music", "min_ratio 1.0"),
        ]));

        assert_eq!(rules.len(), 1);
        assert!(rules.contains_key("tv"));
        assert_eq!(warnings.len(), 2);
        assert!(warnings.iter().any(|w| w.category == "movies"));
        assert!(warnings.iter().any(|w| w.category == "music"));
    }

    #[test]
    fn test_category_rule_satisfaction() {
        let rule = CategoryRule {
            min_seed_time: Some(100),
            min_ratio: None,
        };
        assert!(rule.is_satisfied(100, 0.0));
        assert!(!rule.is_satisfied(99, 50.0));

        let rule = CategoryRule {
            min_seed_time: None,
            min_ratio: Some(1.0),
        };
        assert!(rule.is_satisfied(0, 1.0));
        assert!(!rule.is_satisfied(u64::MAX, 0.99));

        assert!(!CategoryRule::default().is_satisfied(u64::MAX, f64::MAX));
    }

    #[test]
    fn test_bonus_rules_parse() {
        let (rules, warnings) = build_bonus_rules(&raw(&[(
            "SB",
            "min_weeks:1, time_multipliers:4=1.5|2=1.05, size_multipliers:10=1.2, \
             extra_multiplier_weeks:4, extra_multiplier_value:1.2",
        )]));

        assert!(warnings.is_empty());
        let rule = rules.get("SB").unwrap();
        assert_eq!(rule.min_weeks, Some(1.0));
        assert_eq!(rule.time_multipliers.as_ref().unwrap().pairs(), &[(2.0, 1.05), (4.0, 1.5)]);
        assert_eq!(rule.size_multipliers.as_ref().unwrap().pairs(), &[(10.0, 1.2)]);
        assert_eq!(rule.extra_multiplier_weeks, Some(4.0));
        assert_eq!(rule.extra_multiplier_value, Some(1.2));
        assert!(rules.get("sb").is_none());
    }

    #[test]
    fn test_bonus_rule_without_known_keys_is_dropped() {
        let (rules, warnings) = build_bonus_rules(&raw(&[("tv", "sparkle:3"), ("empty", "")]));
        assert!(rules.is_empty());
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_bad_multiplier_pair_skips_category() {
        let (rules, warnings) = build_bonus_rules(&raw(&[
            ("SB", "time_multipliers:4=1.5|oops"),
            ("HD", "min_weeks:2"),
        ]));
        assert_eq!(rules.len(), 1);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].category, "SB");
        assert!(warnings[0].to_string().contains("SB"));
    }

    #[test]
    fn test_bonus_multiplier_scenario() {
        let rule = BonusRule {
            min_weeks: Some(1.0),
            time_multipliers: Some(MultiplierTable::new(vec![(4.0, 1.5)])),
            size_multipliers: Some(MultiplierTable::default()),
            extra_multiplier_weeks: Some(10.0),
            extra_multiplier_value: Some(1.2),
        };
        assert_eq!(rule.multiplier(5.0, 123.0), 1.5);
        assert!((rule.multiplier(10.0, 0.0) - 1.8).abs() < 1e-12);
        assert_eq!(rule.multiplier(1.0, 0.0), 1.0);
        assert_eq!(rule.multiplier(0.5, 0.0), 1.0);
    }

    #[test]
    fn test_bonus_without_min_weeks_always_applies() {
        let rule = BonusRule {
            size_multipliers: Some(MultiplierTable::new(vec![(4.0, 1.1)])),
            ..Default::default()
        };
        assert_eq!(rule.multiplier(0.0, 5.0), 1.1);
    }

    #[test]
    fn test_rule_tables_lookup() {
        let categories = raw(&[("Movies", "min_ratio:1")]);
        let bonuses = raw(&[("SB", "min_weeks:1")]);
        let (tables, warnings) = RuleTables::build(&categories, &bonuses);

        assert!(warnings.is_empty());
        assert!(tables.category_rule("MOVIES").is_some());
        assert!(tables.bonus_rule("SB").is_some());
        assert!(tables.bonus_rule("sb").is_none());
    }
}
