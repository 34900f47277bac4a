use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Terminal;

use crate::app::App;
use crate::buckets::{ColorBucket, SizeBucket, TextContrast};
use crate::feed::MockFeed;
use crate::types::{size_metric_options, view_mode_options};
use crate::view::Tile;

// Tailwind palette of the original dashboard, green-700 down to red-700.
fn bucket_bg(bucket: ColorBucket) -> Color {
    match bucket {
        ColorBucket::GainOver3 => Color::Rgb(21, 128, 61),
        ColorBucket::Gain2to3 => Color::Rgb(22, 163, 74),
        ColorBucket::Gain1to2 => Color::Rgb(34, 197, 94),
        ColorBucket::Gain0to1 => Color::Rgb(74, 222, 128),
        ColorBucket::Flat => Color::Rgb(156, 163, 175),
        ColorBucket::Loss0to1 => Color::Rgb(248, 113, 113),
        ColorBucket::Loss1to2 => Color::Rgb(239, 68, 68),
        ColorBucket::Loss2to3 => Color::Rgb(220, 38, 38),
        ColorBucket::LossOver3 => Color::Rgb(185, 28, 28),
    }
}

fn contrast_fg(contrast: TextContrast) -> Color {
    match contrast {
        TextContrast::Light => Color::White,
        TextContrast::Dark => Color::Black,
    }
}

fn tile_width(size: SizeBucket) -> usize {
    match size {
        SizeBucket::Large => 26,
        SizeBucket::Medium => 20,
        SizeBucket::Small => 15,
    }
}

pub async fn run(latency_ms: u64, duration: u64) -> Result<(), Box<dyn std::error::Error>> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, latency_ms, duration).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    latency_ms: u64,
    duration: u64,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut feed = MockFeed::new();
    let mut app = App::new(&mut feed, Duration::from_millis(latency_ms))?;
    let mut grid_scroll: usize = 0;

    let run_duration = if duration == 0 {
        Duration::from_secs(3600)
    } else {
        Duration::from_secs(duration)
    };
    let start = Instant::now();

    while !app.should_quit && start.elapsed() < run_duration {
        app.tick();
        terminal.draw(|f| draw(f, &app, grid_scroll))?;

        if event::poll(Duration::from_millis(150))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    handle_key(&mut app, &mut grid_scroll, key.code);
                }
            }
        }
    }

    Ok(())
}

fn handle_key(app: &mut App, grid_scroll: &mut usize, code: KeyCode) {
    if app.editing_query {
        match code {
            KeyCode::Esc | KeyCode::Enter => app.editing_query = false,
            KeyCode::Backspace => app.pop_query_char(),
            KeyCode::Char(c) => app.push_query_char(c),
            _ => {}
        }
        return;
    }

    match code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Char('r') => {
            app.request_refresh();
        }
        KeyCode::Char('v') => app.cycle_view_mode(),
        KeyCode::Char('s') => app.cycle_size_metric(),
        KeyCode::Char('/') => app.editing_query = true,
        KeyCode::Char('c') => app.clear_query(),
        KeyCode::Left | KeyCode::Up => app.move_selection(-1),
        KeyCode::Right | KeyCode::Down => app.move_selection(1),
        KeyCode::PageUp => *grid_scroll = grid_scroll.saturating_sub(3),
        KeyCode::PageDown => *grid_scroll = grid_scroll.saturating_add(3),
        _ => {}
    }
}

fn draw(f: &mut ratatui::Frame, app: &App, grid_scroll: usize) {
    let size = f.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // header
            Constraint::Length(3), // controls + search
            Constraint::Length(1), // legend
            Constraint::Min(8),    // heatmap grid
            Constraint::Length(6), // selected tile detail
            Constraint::Length(1), // footer
        ])
        .split(size);

    draw_header(f, app, chunks[0]);
    draw_controls(f, app, chunks[1]);
    draw_legend(f, chunks[2]);
    draw_grid(f, app, chunks[3], grid_scroll);
    draw_detail(f, app, chunks[4]);
    draw_footer(f, chunks[5]);
}

fn draw_header(f: &mut ratatui::Frame, app: &App, area: Rect) {
    let updated = app
        .last_updated
        .map(|t| t.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "-".to_string());

    let mut header = vec![
        Span::styled(
            " Nifty 50 Heatmap ",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::raw(" | "),
        Span::styled(
            format!("Stocks: {}/{}", app.visible_len(), app.records().len()),
            Style::default().fg(Color::Green),
        ),
        Span::raw(" | "),
        Span::styled(format!("Refreshes: {}", app.refreshes), Style::default().fg(Color::Yellow)),
        Span::raw(" | "),
        Span::raw(format!("Last updated: {}", updated)),
    ];
    if app.is_loading() {
        header.push(Span::raw(" | "));
        header.push(Span::styled(
            "Loading...",
            Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
        ));
    } else if let Some(status) = app.status() {
        header.push(Span::raw(" | "));
        header.push(Span::styled(status, Style::default().fg(Color::Magenta)));
    }

    let p = Paragraph::new(Line::from(header)).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Visualize the performance of India's 50 largest companies "),
    );
    f.render_widget(p, area);
}

fn draw_controls(f: &mut ratatui::Frame, app: &App, area: Rect) {
    let query_style = if app.editing_query {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    };
    let cursor = if app.editing_query { "_" } else { "" };

    let mut controls = vec![Span::styled("View: ", Style::default().fg(Color::DarkGray))];
    for option in view_mode_options() {
        let style = if option.id == app.view_mode.id() {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        controls.push(Span::styled(format!("[{}] ", option.label), style));
    }
    controls.push(Span::raw("  "));
    controls.push(Span::styled("Size by: ", Style::default().fg(Color::DarkGray)));
    for option in size_metric_options() {
        let style = if option.id == app.size_metric.id() {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        controls.push(Span::styled(format!("[{}] ", option.label), style));
    }
    controls.push(Span::raw("  "));
    controls.push(Span::styled("Search: ", Style::default().fg(Color::DarkGray)));
    controls.push(Span::styled(format!("{}{}", app.query, cursor), query_style));

    let p = Paragraph::new(Line::from(controls))
        .block(Block::default().borders(Borders::ALL).title(" Controls "));
    f.render_widget(p, area);
}

fn draw_legend(f: &mut ratatui::Frame, area: Rect) {
    let buckets = [
        ColorBucket::LossOver3,
        ColorBucket::Loss2to3,
        ColorBucket::Loss1to2,
        ColorBucket::Loss0to1,
        ColorBucket::Flat,
        ColorBucket::Gain0to1,
        ColorBucket::Gain1to2,
        ColorBucket::Gain2to3,
        ColorBucket::GainOver3,
    ];
    let mut spans = vec![Span::raw(" ")];
    for bucket in buckets {
        spans.push(Span::styled("  ", Style::default().bg(bucket_bg(bucket))));
        spans.push(Span::raw(format!(" {}  ", bucket.label())));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_grid(f: &mut ratatui::Frame, app: &App, area: Rect, grid_scroll: usize) {
    let snapshot = app.snapshot();
    let inner_width = area.width.saturating_sub(2) as usize;

    let mut lines: Vec<Line> = Vec::new();
    let mut tile_index = 0usize;

    for group in &snapshot.groups {
        lines.push(Line::from(Span::styled(
            group.sector.clone(),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )));

        let mut row: Vec<Span> = Vec::new();
        let mut row_width = 0usize;
        for tile in &group.tiles {
            let width = tile_width(tile.size);
            if row_width + width + 1 > inner_width && !row.is_empty() {
                lines.push(Line::from(std::mem::take(&mut row)));
                row_width = 0;
            }
            row.push(tile_span(tile, width, tile_index == app.selected));
            row.push(Span::raw(" "));
            row_width += width + 1;
            tile_index += 1;
        }
        if !row.is_empty() {
            lines.push(Line::from(row));
        }
        lines.push(Line::from(""));
    }

    if lines.is_empty() {
        lines.push(Line::from(Span::styled(
            "No stocks match the current search.",
            Style::default().fg(Color::DarkGray),
        )));
    }

    let visible: Vec<Line> = lines.into_iter().skip(grid_scroll).collect();
    let p = Paragraph::new(visible).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" Heatmap ({} sectors) ", snapshot.groups.len())),
    );
    f.render_widget(p, area);
}

fn tile_span(tile: &Tile, width: usize, selected: bool) -> Span<'static> {
    let short = tile.record.symbol.trim_end_matches(".NS");
    let text = format!(" {} {:+.2}% ", short, tile.record.change_percent);
    let mut padded = format!("{:<width$}", text, width = width);
    padded.truncate(width);

    let mut style = Style::default()
        .bg(bucket_bg(tile.color))
        .fg(contrast_fg(tile.contrast));
    if selected {
        style = style.add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
    }
    Span::styled(padded, style)
}

fn draw_detail(f: &mut ratatui::Frame, app: &App, area: Rect) {
    let snapshot = app.snapshot();
    let selected: Option<&Tile> = snapshot
        .groups
        .iter()
        .flat_map(|g| g.tiles.iter())
        .nth(app.selected);

    let lines = match selected {
        Some(tile) => {
            let volume = tile
                .record
                .volume
                .map(|v| v.to_string())
                .unwrap_or_else(|| "n/a".to_string());
            vec![
                Line::from(vec![
                    Span::styled(
                        tile.record.name.clone(),
                        Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
                    ),
                    Span::raw("  "),
                    Span::styled(tile.record.symbol.clone(), Style::default().fg(Color::DarkGray)),
                    Span::raw("  "),
                    Span::raw(tile.record.sector.clone()),
                ]),
                Line::from(vec![
                    Span::raw(format!("Price: \u{20b9}{:.2}   ", tile.record.price)),
                    Span::styled(
                        format!("{:+.2}%", tile.record.change_percent),
                        Style::default().fg(bucket_bg(tile.color)),
                    ),
                    Span::raw(format!(
                        "   Mcap: {:.0}B   Volume: {}",
                        tile.record.market_cap, volume
                    )),
                ]),
                Line::from(vec![Span::styled(
                    format!("Bucket: {}   Tile: {}", tile.color.label(), tile.size.label()),
                    Style::default().fg(Color::DarkGray),
                )]),
            ]
        }
        None => vec![Line::from(Span::styled(
            "Nothing selected",
            Style::default().fg(Color::DarkGray),
        ))],
    };

    let p = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" Selected "));
    f.render_widget(p, area);
}

fn draw_footer(f: &mut ratatui::Frame, area: Rect) {
    let footer = Line::from(vec![
        Span::styled(
            " Data source: Yahoo Finance (to be integrated) ",
            Style::default().fg(Color::DarkGray),
        ),
        Span::raw(" | "),
        Span::styled(
            "q=quit  r=refresh  v=view  s=size  /=search  c=clear  arrows=select",
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    f.render_widget(Paragraph::new(footer), area);
}
