use clap::Parser;

use nifty_heatmap::feed::{self, MockFeed, RecordSource};
use nifty_heatmap::tui;
use nifty_heatmap::types::{SizeMetric, ViewMode};
use nifty_heatmap::view::build_snapshot;

#[derive(Parser)]
#[command(name = "nifty-heatmap", about = "Sector heatmap of Nifty 50 stock performance")]
struct Cli {
    /// Run mode: tui or headless
    #[arg(long, default_value = "tui")]
    mode: String,

    /// Simulated refresh latency in milliseconds
    #[arg(long, default_value = "1000")]
    latency_ms: u64,

    /// Run duration in seconds (0 = infinite, tui mode only)
    #[arg(long, default_value = "0")]
    duration: u64,

    /// View mode menu id: daily, weekly, monthly, or ytd
    #[arg(long, default_value = "daily")]
    view: String,

    /// Size metric menu id: marketCap or volume
    #[arg(long, default_value = "marketCap")]
    size_by: String,

    /// Search query applied before printing (headless mode only)
    #[arg(long, default_value = "")]
    search: String,

    /// Apply N simulated refreshes before printing (headless mode only)
    #[arg(long, default_value = "0")]
    refreshes: u32,

    /// Emit the derived snapshot as JSON (headless mode only)
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.mode.as_str() {
        "tui" => tui::run(cli.latency_ms, cli.duration).await?,
        "headless" => run_headless(&cli)?,
        other => eprintln!("Unknown mode: {other}. Use --mode tui|headless"),
    }

    Ok(())
}

fn run_headless(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let view_mode = ViewMode::parse(&cli.view)?;
    let size_metric = SizeMetric::parse(&cli.size_by)?;

    let mut source = MockFeed::new();
    let mut records = source.fetch()?;
    for _ in 0..cli.refreshes {
        records = feed::refresh(&records);
    }

    let snapshot = build_snapshot(&records, view_mode, size_metric, &cli.search);

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    println!("=== Nifty 50 Heatmap (headless) ===");
    println!(
        "View: {}  Size by: {}  Search: {:?}  Stocks: {}/{}",
        snapshot.view_mode.label(),
        snapshot.size_metric.label(),
        snapshot.query,
        snapshot.visible_records,
        snapshot.total_records,
    );
    println!();

    for group in &snapshot.groups {
        println!("{} ({} stocks)", group.sector, group.tiles.len());
        for tile in &group.tiles {
            println!(
                "  {:<14} {:<28} {:>+7.2}%  {:>10}  {:<10}  {}",
                tile.record.symbol,
                tile.record.name,
                tile.record.change_percent,
                format!("{:.0}B", tile.record.market_cap),
                tile.size.label(),
                tile.color.label(),
            );
        }
        println!();
    }

    Ok(())
}
