//! Pure mapping from continuous record values to discrete visual buckets.
//!
//! Both functions are total over validated (finite) input: every value maps
//! to exactly one bucket, no error case.

use serde::Serialize;

use crate::types::{SizeMetric, StockRecord};

/// Tile size breakpoints. Fixed configuration constants: tile sizes are not
/// proportional across arbitrary datasets, and a true area-proportional
/// treemap would need a relative scaling function instead.
pub const SIZE_LARGE_BREAK: f64 = 2000.0;
pub const SIZE_MEDIUM_BREAK: f64 = 1000.0;

/// Nine ordered performance buckets. Boundaries belong to the lower-magnitude
/// bucket: exactly +3.0 lands in `Gain2to3` and exactly -3.0 in `Loss2to3`,
/// never the outermost tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ColorBucket {
    GainOver3,
    Gain2to3,
    Gain1to2,
    Gain0to1,
    Flat,
    Loss0to1,
    Loss1to2,
    Loss2to3,
    LossOver3,
}

impl ColorBucket {
    pub fn label(&self) -> &'static str {
        match self {
            ColorBucket::GainOver3 => ">3%",
            ColorBucket::Gain2to3 => "2% to 3%",
            ColorBucket::Gain1to2 => "1% to 2%",
            ColorBucket::Gain0to1 => "0% to 1%",
            ColorBucket::Flat => "0%",
            ColorBucket::Loss0to1 => "-1% to 0%",
            ColorBucket::Loss1to2 => "-2% to -1%",
            ColorBucket::Loss2to3 => "-3% to -2%",
            ColorBucket::LossOver3 => "<-3%",
        }
    }
}

pub fn color_bucket(change_percent: f64) -> ColorBucket {
    if change_percent > 3.0 {
        ColorBucket::GainOver3
    } else if change_percent > 2.0 {
        ColorBucket::Gain2to3
    } else if change_percent > 1.0 {
        ColorBucket::Gain1to2
    } else if change_percent > 0.0 {
        ColorBucket::Gain0to1
    } else if change_percent == 0.0 {
        ColorBucket::Flat
    } else if change_percent > -1.0 {
        ColorBucket::Loss0to1
    } else if change_percent > -2.0 {
        ColorBucket::Loss1to2
    } else if change_percent >= -3.0 {
        ColorBucket::Loss2to3
    } else {
        ColorBucket::LossOver3
    }
}

/// Tile text is drawn light on the saturated backgrounds and dark on the
/// pale ones near zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TextContrast {
    Light,
    Dark,
}

pub fn text_contrast(change_percent: f64) -> TextContrast {
    if change_percent.abs() > 1.0 {
        TextContrast::Light
    } else {
        TextContrast::Dark
    }
}

/// Three ordered tile-size tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SizeBucket {
    Large,
    Medium,
    Small,
}

impl SizeBucket {
    pub fn label(&self) -> &'static str {
        match self {
            SizeBucket::Large => "large",
            SizeBucket::Medium => "medium",
            SizeBucket::Small => "small",
        }
    }
}

pub fn size_bucket(record: &StockRecord, metric: SizeMetric) -> SizeBucket {
    let value = match metric {
        SizeMetric::MarketCap => record.market_cap,
        SizeMetric::Volume => record.volume.unwrap_or(0) as f64,
    };
    if value > SIZE_LARGE_BREAK {
        SizeBucket::Large
    } else if value > SIZE_MEDIUM_BREAK {
        SizeBucket::Medium
    } else {
        SizeBucket::Small
    }
}
