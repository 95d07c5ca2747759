//! Output formatting for the CLI.

use crate::error::Result;
use colored::*;
use reclaim_domain::HistoryStats;
use reclaim_janitor::{EvictionOutcome, EvictionPolicy, RankedItem, RunReport};
use tabled::{
    builder::Builder,
    settings::{object::Columns, object::Rows, Alignment, Modify, Style},
};

/// Longest torrent name shown before truncation
pub const MAX_NAME_LENGTH: usize = 69;

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
    /// Quiet (minimal) format
    Quiet,
}

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self { format, color_enabled }
    }

    /// Format the result of a cleanup run.
    pub fn format_report(&self, report: &RunReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
            OutputFormat::Table => Ok(self.format_report_table(report)),
            OutputFormat::Quiet => Ok(report
                .records
                .iter()
                .filter(|r| r.outcome != EvictionOutcome::Failed)
                .map(|r| r.id.to_string())
                .collect::<Vec<_>>()
                .join("\n")),
        }
    }

    fn format_report_table(&self, report: &RunReport) -> String {
        let mut header = format!(
            "Free: {:.2} GB, DLremain: {:.1} GB, Diskneed: {:.0} GB",
            report.free_gb, report.remaining_download_gb, report.target_gb
        );
        if report.dry_run {
            header = format!("TEST MODE: {}", header);
        }
        let mut lines = vec![self.colorize(&header, "cyan")];

        if report.records.is_empty() {
            lines.push(self.info("No torrents to remove based on current rules."));
            return lines.join("\n");
        }

        let mut builder = Builder::default();
        builder.push_record(["Name", "Category", "Size", "Seeded", "Score", "Policy", "Result"]);

        for record in &report.records {
            let score = record.value.map_or_else(|| "-".to_string(), |v| format!("{:.3} R/W", v));
            builder.push_record([
                truncate_name(&record.name, MAX_NAME_LENGTH),
                record.category.clone(),
                format!("{:.2} GB", record.size_gb),
                format!("{:.1} Weeks", record.weeks_seeded),
                score,
                record.policy.to_string(),
                self.outcome(record.outcome),
            ]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()))
            .with(Modify::new(Columns::new(2..5)).with(Alignment::right()));
        lines.push(table.to_string());

        let verb = if report.dry_run { "Would remove" } else { "Removed" };
        let done = report.records.len() - report.count(EvictionOutcome::Failed);
        lines.push(self.success(&format!("{} {} torrent(s), {:.2} GB", verb, done, report.freed_gb())));

        let per_policy: Vec<String> = [EvictionPolicy::Space, EvictionPolicy::Count]
            .into_iter()
            .map(|policy| {
                let n = report
                    .by_policy(policy)
                    .filter(|r| r.outcome != EvictionOutcome::Failed)
                    .count();
                format!("{} {}", policy, n)
            })
            .collect();
        lines.push(self.info(&format!("By policy: {}", per_policy.join(", "))));

        let failed = report.count(EvictionOutcome::Failed);
        if failed > 0 {
            lines.push(self.error(&format!("{} deletion(s) failed", failed)));
        }

        lines.join("\n")
    }

    /// Format torrents in eviction order.
    pub fn format_ranking(&self, ranked: &[RankedItem<'_>]) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let rows: Vec<serde_json::Value> = ranked
                    .iter()
                    .map(|r| {
                        serde_json::json!({
                            "id": r.item.id,
                            "name": r.item.name,
                            "category": r.item.category,
                            "size_gb": r.item.size_gb(),
                            "ratio": r.item.ratio,
                            "weeks_seeded": r.breakdown.weeks_seeded,
                            "recorded_weeks": r.breakdown.recorded_weeks,
                            "base_value": r.breakdown.base_value,
                            "bonus_multiplier": r.breakdown.bonus_multiplier,
                            "value": r.breakdown.value,
                            "eligible": r.eligible
                        })
                    })
                    .collect();
                Ok(serde_json::to_string_pretty(&rows)?)
            }
            OutputFormat::Table => Ok(self.format_ranking_table(ranked)),
            OutputFormat::Quiet => Ok(ranked.iter().map(|r| r.item.id.to_string()).collect::<Vec<_>>().join("\n")),
        }
    }

    fn format_ranking_table(&self, ranked: &[RankedItem<'_>]) -> String {
        if ranked.is_empty() {
            return self.colorize("No torrents found.", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record(["#", "Name", "Category", "Size", "Ratio", "Seeded", "History", "Base", "Bonus", "Score", "Eligible"]);

        for (position, r) in ranked.iter().enumerate() {
            builder.push_record([
                (position + 1).to_string(),
                truncate_name(&r.item.name, MAX_NAME_LENGTH),
                r.item.category.clone(),
                format!("{:.2} GB", r.item.size_gb()),
                format!("{:.2}", r.item.ratio),
                format!("{:.1} w", r.breakdown.weeks_seeded),
                format!("{:.1} w", r.breakdown.recorded_weeks),
                format!("{:.3}", r.breakdown.base_value),
                format!("x{:.2}", r.breakdown.bonus_multiplier),
                format!("{:.3} R/W", r.breakdown.value),
                if r.eligible { "yes".to_string() } else { "no".to_string() },
            ]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        table.to_string()
    }

    /// Format the result of a ratio logging run.
    pub fn format_stats(&self, stats: &HistoryStats) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&serde_json::json!({
                "total": stats.total,
                "added": stats.added,
                "removed": stats.removed,
                "at_capacity": stats.at_capacity
            }))?),
            OutputFormat::Table => Ok(self.success(&format!(
                "Logged ratios for {} torrent(s): {} new, {} removed, {} at capacity",
                stats.total, stats.added, stats.removed, stats.at_capacity
            ))),
            OutputFormat::Quiet => Ok(stats.total.to_string()),
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    fn outcome(&self, outcome: EvictionOutcome) -> String {
        match outcome {
            EvictionOutcome::Removed => self.colorize("removed", "green"),
            EvictionOutcome::Planned => self.colorize("planned", "cyan"),
            EvictionOutcome::Failed => self.colorize("failed", "red"),
        }
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            _ => text.to_string(),
        }
    }
}

/// Shorten a name to `max` characters, marking the cut with "...".
pub fn truncate_name(name: &str, max: usize) -> String {
    if name.chars().count() <= max {
        return name.to_string();
    }
    let kept: String = name.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", kept)
}

#[cfg(test)]
mod tests {
    use super::*;
    use reclaim_domain::{Item, RatioLedger, RuleTables, SECONDS_PER_WEEK};
    use reclaim_janitor::{EvictionRecord, Janitor, JanitorConfig};
    use std::collections::BTreeMap;

    fn report(dry_run: bool) -> RunReport {
        let a = Item::new("aaa111", "Some.Show.S01E01.1080p", "tv", 4_500_000_000, 3 * SECONDS_PER_WEEK, 0.4);
        let b = Item::new("bbb222", "Another.Release", "sb", 1_000_000_000, SECONDS_PER_WEEK, 2.0);
        RunReport {
            dry_run,
            free_gb: 12.5,
            remaining_download_gb: 3.21,
            target_gb: 7.6,
            eligible: 5,
            records: vec![
                EvictionRecord::new(&a, Some(0.1234), EvictionPolicy::Space, EvictionOutcome::Removed),
                EvictionRecord::new(&b, None, EvictionPolicy::Count, EvictionOutcome::Failed),
            ],
        }
    }

    #[test]
    fn test_truncate_name() {
        assert_eq!(truncate_name("short", 69), "short");
        let long = "x".repeat(80);
        let cut = truncate_name(&long, 69);
        assert_eq!(cut.chars().count(), 69);
        assert!(cut.ends_with("..."));
        assert_eq!(truncate_name(&"é".repeat(70), 69).chars().count(), 69);
    }

    #[test]
    fn test_report_table() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_report(&report(false)).unwrap();

        assert!(output.starts_with("Free: 12.50 GB, DLremain: 3.2 GB, Diskneed: 8 GB"));
        assert!(output.contains("Some.Show.S01E01.1080p"));
        assert!(output.contains("4.50 GB"));
        assert!(output.contains("3.0 Weeks"));
        assert!(output.contains("0.123 R/W"));
        assert!(output.contains("Removed 1 torrent(s), 4.50 GB"));
        assert!(output.contains("By policy: space 1, count 0"));
        assert!(output.contains("1 deletion(s) failed"));
    }

    #[test]
    fn test_report_test_mode() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let mut report = report(true);
        report.records.truncate(1);
        report.records[0].outcome = EvictionOutcome::Planned;

        let output = formatter.format_report(&report).unwrap();
        assert!(output.starts_with("TEST MODE: "));
        assert!(output.contains("Would remove 1 torrent(s)"));
    }

    #[test]
    fn test_empty_report() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_report(&RunReport::default()).unwrap();
        assert!(output.contains("No torrents to remove"));
    }

    #[test]
    fn test_report_json_and_quiet() {
        let json = Formatter::new(OutputFormat::Json, false).format_report(&report(false)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["records"][0]["id"], "aaa111");
        assert_eq!(value["records"][1]["policy"], "count");
        assert_eq!(value["records"][1]["outcome"], "failed");

        let quiet = Formatter::new(OutputFormat::Quiet, false).format_report(&report(false)).unwrap();
        assert_eq!(quiet, "aaa111");
    }

    #[test]
    fn test_ranking_formats() {
        let categories: BTreeMap<String, String> =
            [("tv".to_string(), "min_ratio:1".to_string())].into_iter().collect();
        let (rules, _) = RuleTables::build(&categories, &BTreeMap::<String, String>::new());
        let janitor = Janitor::new(JanitorConfig::default(), rules).unwrap();
        let items = vec![
            Item::new("h1", "First", "tv", 2_000_000_000, 10 * SECONDS_PER_WEEK, 2.0),
            Item::new("h2", "Second", "tv", 2_000_000_000, 10 * SECONDS_PER_WEEK, 0.5),
        ];
        let ranked = janitor.rank(&items, &RatioLedger::new(), None);

        let table = Formatter::new(OutputFormat::Table, false).format_ranking(&ranked).unwrap();
        assert!(table.contains("Second"));
        assert!(table.contains("0.050 R/W"));

        let json = Formatter::new(OutputFormat::Json, false).format_ranking(&ranked).unwrap();
        let rows: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(rows[0]["id"], "h2");
        assert_eq!(rows[0]["eligible"], false);
        assert_eq!(rows[1]["eligible"], true);

        let empty = Formatter::new(OutputFormat::Table, false).format_ranking(&[]).unwrap();
        assert!(empty.contains("No torrents found"));
    }

    #[test]
    fn test_stats_message() {
        let stats = HistoryStats {
            total: 10,
            added: 2,
            removed: 1,
            at_capacity: 3,
        };
        let output = Formatter::new(OutputFormat::Table, false).format_stats(&stats).unwrap();
        assert!(output.contains("10 torrent(s): 2 new, 1 removed, 3 at capacity"));
    }
}
