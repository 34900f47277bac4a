pub mod app;
pub mod buckets;
pub mod error;
pub mod feed;
pub mod tui;
pub mod types;
pub mod view;
