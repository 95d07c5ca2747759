//! Torrent records as returned by `/api/v2/torrents/info`

use crate::QbitError;
use reclaim_domain::{Item, ItemId, ItemState};
use serde::Deserialize;

/// A torrent record exactly as qBittorrent reports it
///
/// Every field is optional so a single odd record cannot fail the whole
/// listing; validation happens in the conversion to [`Item`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTorrent {
    /// Info hash
    pub hash: Option<String>,
    /// Display name
    pub name: Option<String>,
    /// Category (empty string when unset)
    pub category: Option<String>,
    /// Size of the selected files in bytes
    pub size: Option<i64>,
    /// Seconds spent seeding
    pub seeding_time: Option<i64>,
    /// Share ratio
    pub ratio: Option<f64>,
    /// Transfer state, e.g. `downloading` or `stalledUP`
    pub state: Option<String>,
    /// Progress in [0, 1]
    pub progress: Option<f64>,
}

impl TryFrom<RawTorrent> for Item {
    type Error = QbitError;

    fn try_from(raw: RawTorrent) -> Result<Self, Self::Error> {
        let hash = raw
            .hash
            .filter(|h| !h.trim().is_empty())
            .ok_or_else(|| QbitError::InvalidRecord("missing hash".to_string()))?;

        let non_negative = |field: &str, value: Option<i64>| -> Result<u64, QbitError> {
            let value = value.unwrap_or(0);
            u64::try_from(value)
                .map_err(|_| QbitError::InvalidRecord(format!("{} has negative {}: {}", hash, field, value)))
        };
        let size_bytes = non_negative("size", raw.size)?;
        let seeding_time_secs = non_negative("seeding_time", raw.seeding_time)?;

        let ratio = raw.ratio.unwrap_or(0.0);
        if !ratio.is_finite() || ratio < 0.0 {
            return Err(QbitError::InvalidRecord(format!("{} has invalid ratio: {}", hash, ratio)));
        }

        let state = raw.state.as_deref().map(ItemState::parse).unwrap_or(ItemState::Other);
        let progress = raw.progress.filter(|p| p.is_finite()).unwrap_or(0.0).clamp(0.0, 1.0);

        Ok(Item {
            id: ItemId::new(hash.clone()),
            name: raw.name.unwrap_or_else(|| hash.clone()),
            category: raw.category.unwrap_or_default(),
            size_bytes,
            seeding_time_secs,
            ratio,
            state,
            progress,
        })
    }
}
