//! Rank command implementation.

use crate::cli::RankArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use reclaim_domain::traits::{HistoryStore, TorrentClient};

/// Execute the rank command.
pub async fn execute_rank(args: RankArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let (janitor, _) = super::janitor(config, true)?;
    let client = super::client(config)?;
    let history = super::history(config)?;

    let items = client.list_items().await?;
    let ledger = history.load();

    let mut ranked = janitor.rank(&items, &ledger, args.category.as_deref());
    if !args.all {
        ranked.retain(|r| r.eligible);
    }
    if let Some(limit) = args.limit {
        ranked.truncate(limit);
    }

    println!("{}", formatter.format_ranking(&ranked)?);
    Ok(())
}
