//! Derivation pipeline: filter, group by sector, bucket each tile.
//!
//! Everything here is a pure function over an immutable record list. The
//! presentation layer holds the only mutable reference and recomputes the
//! whole snapshot whenever the list or a selection changes.

use serde::Serialize;

use crate::buckets::{color_bucket, size_bucket, text_contrast, ColorBucket, SizeBucket, TextContrast};
use crate::types::{SizeMetric, StockRecord, ViewMode};

/// One sector's slice of the grid, in input order.
#[derive(Debug, Clone, Serialize)]
pub struct SectorGroup {
    pub sector: String,
    pub records: Vec<StockRecord>,
}

/// Partition records by sector. Group order is first-appearance order of each
/// sector in the input; within a group, record order matches input order.
pub fn group_by_sector(records: &[StockRecord]) -> Vec<SectorGroup> {
    let mut groups: Vec<SectorGroup> = Vec::new();
    for record in records {
        match groups.iter_mut().find(|g| g.sector == record.sector) {
            Some(group) => group.records.push(record.clone()),
            None => groups.push(SectorGroup {
                sector: record.sector.clone(),
                records: vec![record.clone()],
            }),
        }
    }
    groups
}

/// Case-insensitive substring match against name OR symbol. An empty query
/// is the identity.
pub fn filter_records(records: &[StockRecord], query: &str) -> Vec<StockRecord> {
    if query.is_empty() {
        return records.to_vec();
    }
    let needle = query.to_lowercase();
    records
        .iter()
        .filter(|r| {
            r.name.to_lowercase().contains(&needle)
                || r.symbol.to_lowercase().contains(&needle)
        })
        .cloned()
        .collect()
}

/// A record joined with its derived visual attributes.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tile {
    #[serde(flatten)]
    pub record: StockRecord,
    pub color: ColorBucket,
    pub contrast: TextContrast,
    pub size: SizeBucket,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectorTiles {
    pub sector: String,
    pub tiles: Vec<Tile>,
}

/// The fully derived view handed to a renderer: filtered, grouped, and
/// bucketed, stamped with the selections it was computed from.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatmapSnapshot {
    pub generated_at_ms: i64,
    pub view_mode: ViewMode,
    pub size_metric: SizeMetric,
    pub query: String,
    pub total_records: usize,
    pub visible_records: usize,
    pub groups: Vec<SectorTiles>,
}

/// Recompute the whole grid from the current list and selections.
pub fn build_snapshot(
    records: &[StockRecord],
    view_mode: ViewMode,
    size_metric: SizeMetric,
    query: &str,
) -> HeatmapSnapshot {
    let visible = filter_records(records, query);
    let groups = group_by_sector(&visible)
        .into_iter()
        .map(|group| SectorTiles {
            sector: group.sector,
            tiles: group
                .records
                .into_iter()
                .map(|record| Tile {
                    color: color_bucket(record.change_percent),
                    contrast: text_contrast(record.change_percent),
                    size: size_bucket(&record, size_metric),
                    record,
                })
                .collect(),
        })
        .collect();

    HeatmapSnapshot {
        generated_at_ms: chrono::Utc::now().timestamp_millis(),
        view_mode,
        size_metric,
        query: query.to_string(),
        total_records: records.len(),
        visible_records: visible.len(),
        groups,
    }
}
