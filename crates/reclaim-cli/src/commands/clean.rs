//! Clean command implementation.

use crate::cli::CleanArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use crate::space::DiskSpaceProbe;

/// Execute the clean command.
pub async fn execute_clean(args: CleanArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let (mut janitor, _) = super::janitor(config, args.test)?;
    let client = super::client(config)?;
    let history = super::history(config)?;
    let probe = DiskSpaceProbe::new(config.drive_path());

    if args.test {
        tracing::info!("TEST MODE: no torrents will be deleted");
    }

    let report = match janitor.clean(&client, &history, &probe).await {
        Ok(report) => report,
        Err(e) => {
            tracing::error!("Cleanup aborted: {}", e);
            return Err(e.into());
        }
    };

    println!("{}", formatter.format_report(&report)?);
    tracing::debug!("\n{}", janitor.metrics().summary());
    Ok(())
}
