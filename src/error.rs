use thiserror::Error;

#[derive(Error, Debug)]
pub enum HeatmapError {
    /// A menu selection outside the closed option set.
    #[error("invalid {menu} option: {id:?}")]
    InvalidOption { menu: &'static str, id: String },

    /// A record rejected at ingestion because a required field is missing
    /// or malformed.
    #[error("invalid record {symbol:?}: bad field {field:?}")]
    Validation { symbol: String, field: String },

    /// A record source failed to reach its upstream.
    #[error("network error: {0}")]
    Network(String),

    /// A record source received data it could not decode.
    #[error("parse error: {0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, HeatmapError>;
