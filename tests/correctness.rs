//! Correctness tests for the derivation pipeline + edge cases.
//!
//! Buckets, grouping, filtering, refresh, ingestion validation, and the
//! refresh state machine, asserted against exact expected values.

use std::time::Duration;

use nifty_heatmap::app::App;
use nifty_heatmap::buckets::{
    color_bucket, size_bucket, text_contrast, ColorBucket, SizeBucket, TextContrast,
};
use nifty_heatmap::error::HeatmapError;
use nifty_heatmap::feed::{self, MockFeed, RecordSource};
use nifty_heatmap::types::{SizeMetric, StockRecord, ViewMode};
use nifty_heatmap::view::{build_snapshot, filter_records, group_by_sector};

fn record(symbol: &str, name: &str, sector: &str, change: f64) -> StockRecord {
    StockRecord {
        symbol: symbol.to_string(),
        name: name.to_string(),
        sector: sector.to_string(),
        change_percent: change,
        market_cap: 1500.0,
        price: 100.0,
        volume: Some(500),
    }
}

// ── Color buckets: fixed breakpoints, boundaries to the lower-magnitude bucket ──

#[test]
fn test_color_bucket_breakpoints() {
    assert_eq!(color_bucket(3.01), ColorBucket::GainOver3);
    assert_eq!(color_bucket(3.0), ColorBucket::Gain2to3, "exactly 3.0 is not >3");
    assert_eq!(color_bucket(2.5), ColorBucket::Gain2to3);
    assert_eq!(color_bucket(2.0), ColorBucket::Gain1to2, "exactly 2.0 is not >2");
    assert_eq!(color_bucket(1.5), ColorBucket::Gain1to2);
    assert_eq!(color_bucket(1.0), ColorBucket::Gain0to1, "exactly 1.0 is not >1");
    assert_eq!(color_bucket(0.01), ColorBucket::Gain0to1);
    assert_eq!(color_bucket(0.0), ColorBucket::Flat);
    assert_eq!(color_bucket(-0.5), ColorBucket::Loss0to1);
    assert_eq!(color_bucket(-1.0), ColorBucket::Loss1to2, "exactly -1.0 is not >-1");
    assert_eq!(color_bucket(-1.5), ColorBucket::Loss1to2);
    assert_eq!(color_bucket(-2.0), ColorBucket::Loss2to3, "exactly -2.0 is not >-2");
    assert_eq!(color_bucket(-3.0), ColorBucket::Loss2to3, "exactly -3.0 is not <-3");
    assert_eq!(color_bucket(-3.01), ColorBucket::LossOver3);
}

#[test]
fn test_color_bucket_deterministic() {
    for change in [-7.3, -3.0, -0.42, 0.0, 0.99, 2.41, 8.8] {
        assert_eq!(color_bucket(change), color_bucket(change));
    }
}

#[test]
fn test_text_contrast_threshold() {
    assert_eq!(text_contrast(1.5), TextContrast::Light);
    assert_eq!(text_contrast(-1.5), TextContrast::Light);
    assert_eq!(text_contrast(1.0), TextContrast::Dark, "exactly 1.0 is not |c|>1");
    assert_eq!(text_contrast(-1.0), TextContrast::Dark);
    assert_eq!(text_contrast(0.0), TextContrast::Dark);
}

// ── Size buckets: fixed breakpoints, metric selection, absent volume = 0 ──

#[test]
fn test_size_bucket_market_cap() {
    let mut r = record("A", "A Corp", "IT", 0.0);

    r.market_cap = 2500.0;
    assert_eq!(size_bucket(&r, SizeMetric::MarketCap), SizeBucket::Large);
    r.market_cap = 2000.0;
    assert_eq!(size_bucket(&r, SizeMetric::MarketCap), SizeBucket::Medium, "exactly 2000 is not >2000");
    r.market_cap = 1200.0;
    assert_eq!(size_bucket(&r, SizeMetric::MarketCap), SizeBucket::Medium);
    r.market_cap = 1000.0;
    assert_eq!(size_bucket(&r, SizeMetric::MarketCap), SizeBucket::Small, "exactly 1000 is not >1000");
    r.market_cap = 300.0;
    assert_eq!(size_bucket(&r, SizeMetric::MarketCap), SizeBucket::Small);
}

#[test]
fn test_size_bucket_volume_and_missing_volume() {
    let mut r = record("A", "A Corp", "IT", 0.0);

    r.volume = Some(3000);
    assert_eq!(size_bucket(&r, SizeMetric::Volume), SizeBucket::Large);
    r.volume = Some(1500);
    assert_eq!(size_bucket(&r, SizeMetric::Volume), SizeBucket::Medium);
    // Missing volume silently counts as zero — smallest tier, no error.
    r.volume = None;
    assert_eq!(size_bucket(&r, SizeMetric::Volume), SizeBucket::Small);
    // The metric selects which field is read: market_cap still drives Large.
    r.market_cap = 9000.0;
    assert_eq!(size_bucket(&r, SizeMetric::MarketCap), SizeBucket::Large);
}

// ── Grouping: first-seen sector order, stable intra-group order ──

#[test]
fn test_group_by_sector_order() {
    let records = vec![
        record("A", "Alpha", "IT", 1.0),
        record("B", "Beta", "Energy", 2.0),
        record("C", "Gamma", "IT", 3.0),
    ];

    let groups = group_by_sector(&records);
    let sectors: Vec<&str> = groups.iter().map(|g| g.sector.as_str()).collect();
    assert_eq!(sectors, vec!["IT", "Energy"], "sector order is first appearance");

    let it_symbols: Vec<&str> = groups[0].records.iter().map(|r| r.symbol.as_str()).collect();
    assert_eq!(it_symbols, vec!["A", "C"], "intra-group order matches input order");
    assert_eq!(groups[1].records.len(), 1);
    assert_eq!(groups[1].records[0].symbol, "B");
}

#[test]
fn test_group_by_sector_empty() {
    assert!(group_by_sector(&[]).is_empty());
}

// ── Filtering: identity on empty query, case-insensitive, idempotent ──

#[test]
fn test_filter_empty_query_is_identity() {
    let records = vec![
        record("TCS.NS", "Tata Consultancy Services", "IT", -0.87),
        record("RELIANCE.NS", "Reliance Industries", "Energy", 2.41),
    ];
    let filtered = filter_records(&records, "");
    assert_eq!(filtered, records, "empty query returns the input unchanged");
}

#[test]
fn test_filter_case_insensitive_symbol_match() {
    let records = vec![
        record("TCS.NS", "Tata Consultancy Services", "IT", -0.87),
        record("INFY.NS", "Infosys", "IT", -1.41),
    ];
    for query in ["tcs", "TCS", "Tcs"] {
        let filtered = filter_records(&records, query);
        assert_eq!(filtered.len(), 1, "query {query:?} should match exactly TCS.NS");
        assert_eq!(filtered[0].symbol, "TCS.NS");
    }
}

#[test]
fn test_filter_matches_name_or_symbol() {
    let records = vec![
        record("HDFCBANK.NS", "HDFC Bank", "Financial Services", 0.24),
        record("SBIN.NS", "State Bank of India", "Financial Services", 1.54),
        record("INFY.NS", "Infosys", "IT", -1.41),
    ];
    // "bank" matches HDFC Bank by name and State Bank of India by name.
    let filtered = filter_records(&records, "bank");
    let symbols: Vec<&str> = filtered.iter().map(|r| r.symbol.as_str()).collect();
    assert_eq!(symbols, vec!["HDFCBANK.NS", "SBIN.NS"], "order preserved");
}

#[test]
fn test_filter_idempotent() {
    let records = vec![
        record("TCS.NS", "Tata Consultancy Services", "IT", -0.87),
        record("TITAN.NS", "Titan Company", "Consumer Goods", -1.07),
        record("RELIANCE.NS", "Reliance Industries", "Energy", 2.41),
    ];
    let once = filter_records(&records, "t");
    let twice = filter_records(&once, "t");
    assert_eq!(once, twice, "filtering its own output with the same query is a fixed point");
}

#[test]
fn test_filter_does_not_mutate_input() {
    let records = vec![record("TCS.NS", "Tata Consultancy Services", "IT", -0.87)];
    let before = records.clone();
    let _ = filter_records(&records, "zzz");
    assert_eq!(records, before);
}

// ── Refresh: snapshot replacement, bounded perturbation, 2-decimal rounding ──

#[test]
fn test_refresh_preserves_shape() {
    let mut source = MockFeed::new();
    let records = source.fetch().unwrap();
    let refreshed = feed::refresh(&records);

    assert_eq!(refreshed.len(), records.len());
    for (old, new) in records.iter().zip(&refreshed) {
        assert_eq!(new.symbol, old.symbol, "symbol set and order preserved");
        assert_eq!(new.name, old.name);
        assert_eq!(new.sector, old.sector);
        assert_eq!(new.market_cap, old.market_cap);
        assert_eq!(new.price, old.price);
        assert_eq!(new.volume, old.volume);
    }
}

#[test]
fn test_refresh_delta_bounded_and_rounded() {
    let mut source = MockFeed::new();
    let records = source.fetch().unwrap();

    // Run several rounds: the delta bound and rounding must hold every time.
    let mut current = records;
    for _ in 0..10 {
        let next = feed::refresh(&current);
        for (old, new) in current.iter().zip(&next) {
            let delta = new.change_percent - old.change_percent;
            assert!(
                delta.abs() <= 1.0 + 1e-9,
                "{}: delta {delta} outside [-1, +1]",
                new.symbol
            );
            let cents = new.change_percent * 100.0;
            assert!(
                (cents - cents.round()).abs() < 1e-6,
                "{}: {} not rounded to 2 decimals",
                new.symbol,
                new.change_percent
            );
        }
        current = next;
    }
}

// ── Ingestion validation: reject malformed records, tolerate missing volume ──

#[test]
fn test_validation_rejects_malformed_records() {
    let good = record("TCS.NS", "Tata Consultancy Services", "IT", -0.87);
    assert!(good.validate().is_ok());

    let mut no_symbol = good.clone();
    no_symbol.symbol = "  ".to_string();
    assert!(matches!(
        no_symbol.validate(),
        Err(HeatmapError::Validation { ref field, .. }) if field == "symbol"
    ));

    let mut bad_cap = good.clone();
    bad_cap.market_cap = 0.0;
    assert!(matches!(
        bad_cap.validate(),
        Err(HeatmapError::Validation { ref field, .. }) if field == "marketCap"
    ));

    let mut nan_change = good.clone();
    nan_change.change_percent = f64::NAN;
    assert!(matches!(
        nan_change.validate(),
        Err(HeatmapError::Validation { ref field, .. }) if field == "changePercent"
    ));

    let mut bad_price = good.clone();
    bad_price.price = -1.0;
    assert!(matches!(
        bad_price.validate(),
        Err(HeatmapError::Validation { ref field, .. }) if field == "price"
    ));

    let mut no_volume = good;
    no_volume.volume = None;
    assert!(no_volume.validate().is_ok(), "missing volume is not an error");
}

#[test]
fn test_mock_feed_is_valid_and_unique() {
    let mut source = MockFeed::new();
    let records = source.fetch().unwrap();
    assert_eq!(records.len(), 50);

    let mut symbols: Vec<&str> = records.iter().map(|r| r.symbol.as_str()).collect();
    symbols.sort_unstable();
    symbols.dedup();
    assert_eq!(symbols.len(), 50, "symbols are unique within the universe");
}

// ── Menu options: closed enumerations, unknown ids rejected ──

#[test]
fn test_option_parsing() {
    assert_eq!(ViewMode::parse("daily").unwrap(), ViewMode::Daily);
    assert_eq!(ViewMode::parse("ytd").unwrap(), ViewMode::Ytd);
    assert!(matches!(
        ViewMode::parse("hourly"),
        Err(HeatmapError::InvalidOption { menu: "view mode", .. })
    ));

    assert_eq!(SizeMetric::parse("marketCap").unwrap(), SizeMetric::MarketCap);
    assert_eq!(SizeMetric::parse("volume").unwrap(), SizeMetric::Volume);
    assert!(matches!(
        SizeMetric::parse("price"),
        Err(HeatmapError::InvalidOption { menu: "size metric", .. })
    ));
}

#[test]
fn test_option_tables_round_trip() {
    // Every menu option id must name a member of its closed enumeration.
    for option in nifty_heatmap::types::view_mode_options() {
        let mode = ViewMode::parse(option.id).unwrap();
        assert_eq!(mode.label(), option.label);
    }
    for option in nifty_heatmap::types::size_metric_options() {
        let metric = SizeMetric::parse(option.id).unwrap();
        assert_eq!(metric.label(), option.label);
    }
}

// ── Refresh state machine: single in-flight refresh, requests ignored while loading ──

#[test]
fn test_refresh_reentrancy_ignored() {
    let mut source = MockFeed::new();
    let mut app = App::new(&mut source, Duration::from_secs(60)).unwrap();

    assert!(!app.is_loading());
    assert!(app.request_refresh(), "first request starts a refresh");
    assert!(app.is_loading());
    assert!(!app.request_refresh(), "second request while in flight is ignored");
    assert_eq!(app.refreshes, 0, "nothing applied before the latency elapses");
}

#[test]
fn test_refresh_completes_after_latency() {
    let mut source = MockFeed::new();
    let mut app = App::new(&mut source, Duration::ZERO).unwrap();
    let before: Vec<f64> = app.records().iter().map(|r| r.change_percent).collect();

    assert!(app.request_refresh());
    app.tick();

    assert!(!app.is_loading());
    assert_eq!(app.refreshes, 1);
    assert_eq!(app.records().len(), before.len());
    for (old, new) in before.iter().zip(app.records()) {
        assert!((new.change_percent - old).abs() <= 1.0 + 1e-9);
    }
    assert!(app.request_refresh(), "idle again after completion");
}

// ── Snapshot derivation: filter → group → bucket composition ──

#[test]
fn test_snapshot_composition() {
    let records = vec![
        record("A", "Alpha Steel", "Metals", 3.0),
        record("B", "Beta Power", "Energy", -0.5),
        record("C", "Gamma Steel", "Metals", 0.0),
    ];

    let snapshot = build_snapshot(&records, ViewMode::Weekly, SizeMetric::Volume, "steel");

    assert_eq!(snapshot.view_mode, ViewMode::Weekly);
    assert_eq!(snapshot.size_metric, SizeMetric::Volume);
    assert_eq!(snapshot.total_records, 3);
    assert_eq!(snapshot.visible_records, 2, "only the two Steel names match");
    assert_eq!(snapshot.groups.len(), 1);
    assert_eq!(snapshot.groups[0].sector, "Metals");

    let tiles = &snapshot.groups[0].tiles;
    assert_eq!(tiles[0].record.symbol, "A");
    assert_eq!(tiles[0].color, ColorBucket::Gain2to3, "3.0 lands in (2,3]");
    assert_eq!(tiles[1].color, ColorBucket::Flat);
    // volume 500 with the Volume metric → smallest tier
    assert_eq!(tiles[0].size, SizeBucket::Small);
}

#[test]
fn test_snapshot_serializes() {
    let records = vec![record("A", "Alpha", "IT", 1.2)];
    let snapshot = build_snapshot(&records, ViewMode::Daily, SizeMetric::MarketCap, "");
    let json = serde_json::to_string(&snapshot).unwrap();
    assert!(json.contains("\"changePercent\":1.2"));
    assert!(json.contains("\"viewMode\":\"daily\""));
    assert!(json.contains("\"sizeMetric\":\"marketCap\""));
}
