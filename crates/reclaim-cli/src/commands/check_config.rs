//! Check-config command implementation.

use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use std::path::Path;

/// Execute the check-config command.
///
/// Loading already rejected invalid values; this reports what the rule
/// tables ended up holding and which entries were skipped.
pub fn execute_check_config(path: &Path, config: &Config, formatter: &Formatter) -> Result<()> {
    println!("{}", formatter.success(&format!("Configuration loaded from {}", path.display())));

    let (rules, warnings) = config.rule_tables();
    for line in summary(config, rules.categories.len(), rules.bonuses.len()) {
        println!("{}", formatter.info(&line));
    }

    for warning in &warnings {
        println!("{}", formatter.warning(&format!("Skipped rule: {}", warning)));
    }

    let unruled: Vec<&String> = config
        .cleanup
        .limits
        .space_categories
        .iter()
        .chain(&config.cleanup.limits.count_categories)
        .filter(|c| rules.category_rule(c).is_none())
        .collect();
    for category in unruled {
        println!(
            "{}",
            formatter.warning(&format!("Category '{}' has no seed rule; nothing in it will be removed", category))
        );
    }

    Ok(())
}

fn summary(config: &Config, seed_rules: usize, bonus_rules: usize) -> Vec<String> {
    let cleanup = &config.cleanup.limits;
    vec![
        format!("Client: {}", config.client.address),
        format!(
            "Free space target: {} GB now, {} GB after downloads",
            cleanup.min_space_gb, cleanup.download_min_space_gb
        ),
        format!("Space categories: {}", cleanup.space_categories.join(", ")),
        format!(
            "Count categories: {} (max {} each)",
            cleanup.count_categories.join(", "),
            cleanup.max_per_category
        ),
        format!("Seed rules: {}, bonus rules: {}", seed_rules, bonus_rules),
    ]
}
