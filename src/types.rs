use serde::{Deserialize, Serialize};

use crate::error::{HeatmapError, Result};

// ── Records (one instrument snapshot each) ──

/// A single traded-instrument snapshot. Records are immutable values:
/// a refresh replaces the whole list, fields are never mutated in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockRecord {
    pub symbol: String,
    pub name: String,
    pub sector: String,
    pub change_percent: f64,
    /// Market capitalization in billions.
    pub market_cap: f64,
    pub price: f64,
    /// Traded units. Missing volume is treated as zero where it is consumed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<u64>,
}

impl StockRecord {
    /// Ingestion validation: every required field present and sane.
    /// Missing `volume` is deliberately NOT an error.
    pub fn validate(&self) -> Result<()> {
        let fail = |field: &str| {
            Err(HeatmapError::Validation {
                symbol: self.symbol.clone(),
                field: field.to_string(),
            })
        };
        if self.symbol.trim().is_empty() {
            return fail("symbol");
        }
        if self.name.trim().is_empty() {
            return fail("name");
        }
        if self.sector.trim().is_empty() {
            return fail("sector");
        }
        if !self.change_percent.is_finite() {
            return fail("changePercent");
        }
        if !(self.market_cap > 0.0) {
            return fail("marketCap");
        }
        if !(self.price > 0.0) {
            return fail("price");
        }
        Ok(())
    }
}

// ── Menu selections ──

/// Time-period label shown in the controls. Purely a label selector in this
/// scope: no historical data loads behind it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    Daily,
    Weekly,
    Monthly,
    Ytd,
}

impl ViewMode {
    pub const ALL: &'static [ViewMode] =
        &[ViewMode::Daily, ViewMode::Weekly, ViewMode::Monthly, ViewMode::Ytd];

    pub fn id(&self) -> &'static str {
        match self {
            ViewMode::Daily => "daily",
            ViewMode::Weekly => "weekly",
            ViewMode::Monthly => "monthly",
            ViewMode::Ytd => "ytd",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ViewMode::Daily => "Daily",
            ViewMode::Weekly => "Weekly",
            ViewMode::Monthly => "Monthly",
            ViewMode::Ytd => "YTD",
        }
    }

    /// Accepts a menu id; any id outside the closed set is rejected.
    pub fn parse(id: &str) -> Result<ViewMode> {
        Self::ALL
            .iter()
            .copied()
            .find(|m| m.id() == id)
            .ok_or_else(|| HeatmapError::InvalidOption {
                menu: "view mode",
                id: id.to_string(),
            })
    }

    pub fn next(&self) -> ViewMode {
        match self {
            ViewMode::Daily => ViewMode::Weekly,
            ViewMode::Weekly => ViewMode::Monthly,
            ViewMode::Monthly => ViewMode::Ytd,
            ViewMode::Ytd => ViewMode::Daily,
        }
    }
}

/// Which numeric field drives visual tile size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SizeMetric {
    MarketCap,
    Volume,
}

impl SizeMetric {
    pub const ALL: &'static [SizeMetric] = &[SizeMetric::MarketCap, SizeMetric::Volume];

    pub fn id(&self) -> &'static str {
        match self {
            SizeMetric::MarketCap => "marketCap",
            SizeMetric::Volume => "volume",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SizeMetric::MarketCap => "Market Cap",
            SizeMetric::Volume => "Volume",
        }
    }

    pub fn parse(id: &str) -> Result<SizeMetric> {
        Self::ALL
            .iter()
            .copied()
            .find(|m| m.id() == id)
            .ok_or_else(|| HeatmapError::InvalidOption {
                menu: "size metric",
                id: id.to_string(),
            })
    }

    pub fn next(&self) -> SizeMetric {
        match self {
            SizeMetric::MarketCap => SizeMetric::Volume,
            SizeMetric::Volume => SizeMetric::MarketCap,
        }
    }
}

/// Display pair used to populate a selectable menu.
#[derive(Debug, Clone, Serialize)]
pub struct MenuOption {
    pub id: &'static str,
    pub label: &'static str,
}

pub fn view_mode_options() -> Vec<MenuOption> {
    ViewMode::ALL
        .iter()
        .map(|m| MenuOption { id: m.id(), label: m.label() })
        .collect()
}

pub fn size_metric_options() -> Vec<MenuOption> {
    SizeMetric::ALL
        .iter()
        .map(|m| MenuOption { id: m.id(), label: m.label() })
        .collect()
}
