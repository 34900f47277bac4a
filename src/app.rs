//! Dashboard state: the single owner of the current record list and the
//! current selections. Derived views are recomputed from scratch through
//! the pure functions in [`crate::view`]; the record list is only ever
//! replaced wholesale, never edited in place.

use std::time::{Duration, Instant};

use chrono::{DateTime, Local};

use crate::error::Result;
use crate::feed::{self, RecordSource};
use crate::types::{SizeMetric, StockRecord, ViewMode};
use crate::view::{build_snapshot, filter_records, HeatmapSnapshot};

const STATUS_TTL: Duration = Duration::from_secs(3);

/// Refresh lifecycle: idle, or one in-flight simulated fetch. There is no
/// failure branch; the perturbation cannot fail.
#[derive(Debug, Clone, Copy)]
enum RefreshState {
    Idle,
    Loading { started: Instant },
}

pub struct App {
    records: Vec<StockRecord>,
    pub query: String,
    pub view_mode: ViewMode,
    pub size_metric: SizeMetric,
    pub selected: usize,
    pub editing_query: bool,
    pub should_quit: bool,
    refresh: RefreshState,
    refresh_latency: Duration,
    pub refreshes: u64,
    pub last_updated: Option<DateTime<Local>>,
    status: Option<(String, Instant)>,
}

impl App {
    pub fn new(source: &mut dyn RecordSource, refresh_latency: Duration) -> Result<Self> {
        let records = source.fetch()?;
        Ok(Self {
            records,
            query: String::new(),
            view_mode: ViewMode::Daily,
            size_metric: SizeMetric::MarketCap,
            selected: 0,
            editing_query: false,
            should_quit: false,
            refresh: RefreshState::Idle,
            refresh_latency,
            refreshes: 0,
            last_updated: Some(Local::now()),
            status: None,
        })
    }

    pub fn records(&self) -> &[StockRecord] {
        &self.records
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.refresh, RefreshState::Loading { .. })
    }

    /// Start a simulated refresh. A request while one is already in flight
    /// is ignored, matching the disabled refresh control in the UI.
    pub fn request_refresh(&mut self) -> bool {
        if self.is_loading() {
            return false;
        }
        self.refresh = RefreshState::Loading { started: Instant::now() };
        true
    }

    /// Advance the refresh state machine. When the simulated latency has
    /// elapsed, the perturbed list replaces the current one atomically and
    /// the state returns to idle.
    pub fn tick(&mut self) {
        if let RefreshState::Loading { started } = self.refresh {
            if started.elapsed() >= self.refresh_latency {
                self.records = feed::refresh(&self.records);
                self.refresh = RefreshState::Idle;
                self.refreshes += 1;
                self.last_updated = Some(Local::now());
                self.set_status("Data refreshed");
                self.clamp_selection();
            }
        }
    }

    /// Accept a view-mode menu id. Ids outside the closed set are rejected.
    pub fn set_view_mode(&mut self, id: &str) -> Result<()> {
        self.view_mode = ViewMode::parse(id)?;
        Ok(())
    }

    /// Accept a size-metric menu id. Ids outside the closed set are rejected.
    pub fn set_size_metric(&mut self, id: &str) -> Result<()> {
        self.size_metric = SizeMetric::parse(id)?;
        Ok(())
    }

    pub fn cycle_view_mode(&mut self) {
        self.view_mode = self.view_mode.next();
    }

    pub fn cycle_size_metric(&mut self) {
        self.size_metric = self.size_metric.next();
    }

    pub fn push_query_char(&mut self, c: char) {
        self.query.push(c);
        self.clamp_selection();
    }

    pub fn pop_query_char(&mut self) {
        self.query.pop();
        self.clamp_selection();
    }

    pub fn clear_query(&mut self) {
        self.query.clear();
        self.clamp_selection();
    }

    pub fn visible_len(&self) -> usize {
        filter_records(&self.records, &self.query).len()
    }

    pub fn move_selection(&mut self, delta: isize) {
        let len = self.visible_len();
        if len == 0 {
            self.selected = 0;
            return;
        }
        let next = self.selected as isize + delta;
        self.selected = next.clamp(0, len as isize - 1) as usize;
    }

    fn clamp_selection(&mut self) {
        let len = self.visible_len();
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }

    fn set_status(&mut self, message: &str) {
        self.status = Some((message.to_string(), Instant::now()));
    }

    /// Transient toast, visible for a few seconds after a refresh.
    pub fn status(&self) -> Option<&str> {
        match &self.status {
            Some((message, at)) if at.elapsed() < STATUS_TTL => Some(message),
            _ => None,
        }
    }

    /// Full derived view for the current list and selections.
    pub fn snapshot(&self) -> HeatmapSnapshot {
        build_snapshot(&self.records, self.view_mode, self.size_metric, &self.query)
    }
}
