//! Command implementations.

pub mod check_config;
pub mod clean;
pub mod log_ratios;
pub mod rank;

pub use self::check_config::execute_check_config;
pub use self::clean::execute_clean;
pub use self::log_ratios::execute_log_ratios;
pub use self::rank::execute_rank;

use crate::config::Config;
use crate::error::Result;
use reclaim_domain::RuleWarning;
use reclaim_janitor::Janitor;
use reclaim_qbit::QbitClient;
use reclaim_store::JsonHistoryStore;

/// Build the janitor for a run, logging skipped rule entries.
pub(crate) fn janitor(config: &Config, dry_run: bool) -> Result<(Janitor, Vec<RuleWarning>)> {
    let (rules, warnings) = config.rule_tables();
    for warning in &warnings {
        tracing::warn!("Skipping rule: {}", warning);
    }
    Ok((Janitor::new(config.janitor_config(dry_run), rules)?, warnings))
}

/// Connect to the configured qBittorrent instance.
pub(crate) fn client(config: &Config) -> Result<QbitClient> {
    Ok(QbitClient::new(
        &config.client.address,
        &config.client.username,
        &config.client.password,
    )?)
}

/// Open the configured history file.
pub(crate) fn history(config: &Config) -> Result<JsonHistoryStore> {
    Ok(JsonHistoryStore::new(config.history_path()?))
}
