//! Configuration for Janitor operations
//!
//! Defines the space targets, watched categories, count caps and scoring
//! parameters for a cleanup run.

use crate::JanitorError;
use reclaim_domain::HistoryPolicy;
use serde::{Deserialize, Serialize};

/// Space and count limits for a cleanup run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanupConfig {
    /// Free space (GB) the download volume should keep
    pub min_space_gb: f64,

    /// Free space (GB) that must remain once active downloads complete
    #[serde(alias = "download_minspace_gb")]
    pub download_min_space_gb: f64,

    /// Categories eligible for space-driven removal
    #[serde(rename = "categories_to_check_for_space")]
    pub space_categories: Vec<String>,

    /// Categories subject to the per-category count cap
    #[serde(rename = "categories_to_check_for_number")]
    pub count_categories: Vec<String>,

    /// Maximum items kept per count-capped category
    #[serde(rename = "max_torrents_for_categories")]
    pub max_per_category: usize,

    /// Evict the smallest items first under the count cap instead of the
    /// lowest-value ones
    #[serde(rename = "sort_count_removal_by_size")]
    pub sort_count_by_size: bool,

    /// Delete item data from disk along with the torrent
    pub delete_files: bool,
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self {
            min_space_gb: 20.0,
            download_min_space_gb: 20.0,
            space_categories: Vec::new(),
            count_categories: Vec::new(),
            max_per_category: 100,
            sort_count_by_size: false,
            delete_files: true,
        }
    }
}

/// Parameters of the value formula
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Floor applied to ratio growth over a short observation window
    pub min_ratio_change: f64,

    /// Observation window (weeks) below which the floor applies
    pub min_weeks_seeded: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            min_ratio_change: 0.3,
            min_weeks_seeded: 3.0,
        }
    }
}

/// Configuration for the Janitor service
///
/// # Examples
///
/// ```
/// use reclaim_janitor::JanitorConfig;
///
/// let config = JanitorConfig::default();
/// assert_eq!(config.scoring.min_ratio_change, 0.3);
/// assert_eq!(config.history.max_entries, 28);
/// assert!(!config.dry_run);
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct JanitorConfig {
    /// Space and count limits
    #[serde(default)]
    pub cleanup: CleanupConfig,

    /// Value formula parameters
    #[serde(default)]
    pub scoring: ScoringConfig,

    /// Ratio history retention
    #[serde(default)]
    pub history: HistoryPolicy,

    /// Drop histories of items the client no longer reports
    #[serde(default)]
    pub prune_missing_history: bool,

    /// Dry-run mode: plan and report, but delete nothing
    #[serde(default)]
    pub dry_run: bool,
}

impl JanitorConfig {
    /// Check value ranges
    pub fn validate(&self) -> Result<(), JanitorError> {
        let non_negative = |name: &str, value: f64| {
            if value.is_finite() && value >= 0.0 {
                Ok(())
            } else {
                Err(JanitorError::Config(format!("{} must be a non-negative number, got {}", name, value)))
            }
        };

        non_negative("min_space_gb", self.cleanup.min_space_gb)?;
        non_negative("download_min_space_gb", self.cleanup.download_min_space_gb)?;
        non_negative("min_ratio_change", self.scoring.min_ratio_change)?;
        non_negative("min_weeks_seeded", self.scoring.min_weeks_seeded)?;

        if self.history.max_entries == 0 {
            return Err(JanitorError::Config("history max_entries must be at least 1".to_string()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = JanitorConfig::default();
        assert_eq!(config.cleanup.min_space_gb, 20.0);
        assert_eq!(config.cleanup.max_per_category, 100);
        assert!(config.cleanup.delete_files);
        assert!(!config.cleanup.sort_count_by_size);
        assert_eq!(config.scoring.min_weeks_seeded, 3.0);
        assert_eq!(config.history.purge_days, vec![8, 16, 24]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = JanitorConfig::default();
        config.scoring.min_ratio_change = -1.0;
        assert!(matches!(config.validate(), Err(JanitorError::Config(_))));

        let mut config = JanitorConfig::default();
        config.cleanup.min_space_gb = f64::NAN;
        assert!(config.validate().is_err());

        let mut config = JanitorConfig::default();
        config.history.max_entries = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_cleanup_field_names() {
        let json = r#"{
            "min_space_gb": 50,
            "download_minspace_gb": 100,
            "categories_to_check_for_space": ["movies", "tv"],
            "categories_to_check_for_number": ["sb"],
            "max_torrents_for_categories": 40,
            "sort_count_removal_by_size": true
        }"#;
        let cleanup: CleanupConfig = serde_json::from_str(json).unwrap();

        assert_eq!(cleanup.min_space_gb, 50.0);
        assert_eq!(cleanup.download_min_space_gb, 100.0);
        assert_eq!(cleanup.space_categories, vec!["movies", "tv"]);
        assert_eq!(cleanup.count_categories, vec!["sb"]);
        assert_eq!(cleanup.max_per_category, 40);
        assert!(cleanup.sort_count_by_size);
        assert!(cleanup.delete_files, "unset fields keep their defaults");
    }

    #[test]
    fn test_serde_roundtrip() {
        let config = JanitorConfig {
            dry_run: true,
            ..Default::default()
        };
        let serialized = serde_json::to_string(&config).unwrap();
        let deserialized: JanitorConfig = serde_json::from_str(&serialized).unwrap();
        assert_eq!(config, deserialized);
    }
}
