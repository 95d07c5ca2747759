//! Log-ratios command implementation.

use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;

/// Execute the log-ratios command.
pub async fn execute_log_ratios(config: &Config, formatter: &Formatter) -> Result<()> {
    let (mut janitor, _) = super::janitor(config, false)?;
    let client = super::client(config)?;
    let history = super::history(config)?;

    let today = chrono::Local::now().date_naive();
    let stats = match janitor.log_ratios(&client, &history, today).await {
        Ok(stats) => stats,
        Err(e) => {
            tracing::error!("Ratio logging aborted: {}", e);
            return Err(e.into());
        }
    };

    println!("{}", formatter.format_stats(&stats)?);
    Ok(())
}
