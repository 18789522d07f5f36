//! Poll scheduler: the state machine between the terminal shell and the store.
//!
//! All state changes go through [`PollScheduler::handle`], which consumes one
//! [`Event`] and returns the [`Action`]s the shell must perform. The
//! scheduler itself never does I/O, so it can be driven from tests with a
//! scripted source.

use std::time::Duration;

use chrono::{DateTime, Local};
use tracing::{debug, info, warn};

use crate::delta::DeltaMode;
use crate::filter::FilterSpec;
use crate::layout::{self, LabelMode, Layout, LayoutOptions};
use crate::source::{Snapshot, SourceError};
use crate::storage::{MetricSeries, SeriesStore};

/// Terminal rows not available to table body rows: header bar, status line,
/// two block borders and the column header row.
pub const CHROME_ROWS: u16 = 5;

/// Connection status shown in the header bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// No fetch has completed yet.
    Connecting,
    /// The last applied fetch succeeded.
    Connected,
    /// The last applied fetch failed; the next tick retries.
    ErrorRetrying,
}

impl ConnectionState {
    pub fn name(self) -> &'static str {
        match self {
            ConnectionState::Connecting => "CONNECTING",
            ConnectionState::Connected => "CONNECTED",
            ConnectionState::ErrorRetrying => "RETRYING",
        }
    }
}

/// User commands, already decoded from key presses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    TogglePause,
    CycleDelta,
    ToggleLabels,
    ScrollUp(usize),
    ScrollDown(usize),
    ScrollHome,
    ScrollEnd,
    ToggleHelp,
    Quit,
}

/// Inputs to the scheduler.
#[derive(Debug)]
pub enum Event {
    /// Poll interval elapsed.
    Tick,
    FetchSucceeded(Snapshot),
    FetchFailed(SourceError),
    UserInput(Command),
    Resize { width: u16, height: u16 },
}

/// Side effects requested from the shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Start one fetch in the background and report it as an [`Event`].
    StartFetch,
    Render,
    Quit,
}

/// Fetch bookkeeping shown in the status line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchCounters {
    pub succeeded: u64,
    pub failed: u64,
    /// Results dropped because they arrived while paused.
    pub discarded: u64,
}

/// Owns the series store and every piece of view state.
#[derive(Debug)]
pub struct PollScheduler {
    store: SeriesStore,
    filter: FilterSpec,
    interval: Duration,
    delta_mode: DeltaMode,
    label_mode: LabelMode,
    state: ConnectionState,
    paused: bool,
    last_error: Option<SourceError>,
    counters: FetchCounters,
    last_update: Option<DateTime<Local>>,
    scroll: usize,
    show_help: bool,
    width: u16,
    height: u16,
}

impl PollScheduler {
    /// Creates a scheduler keeping `history` samples per series.
    pub fn new(history: usize, interval: Duration, filter: FilterSpec) -> Self {
        Self {
            store: SeriesStore::new(history),
            filter,
            interval,
            delta_mode: DeltaMode::default(),
            label_mode: LabelMode::default(),
            state: ConnectionState::Connecting,
            paused: false,
            last_error: None,
            counters: FetchCounters::default(),
            last_update: None,
            scroll: 0,
            show_help: false,
            width: 0,
            height: 0,
        }
    }

    pub fn with_delta_mode(mut self, mode: DeltaMode) -> Self {
        self.delta_mode = mode;
        self
    }

    pub fn with_label_mode(mut self, mode: LabelMode) -> Self {
        self.label_mode = mode;
        self
    }

    /// Actions to run before the first event: fetch immediately instead of
    /// waiting one interval.
    pub fn start(&self) -> Vec<Action> {
        info!(
            history = self.store.capacity(),
            interval_ms = self.interval.as_millis() as u64,
            delta = %self.delta_mode,
            "scheduler started"
        );
        vec![Action::StartFetch, Action::Render]
    }

    /// Single transition function.
    pub fn handle(&mut self, event: Event) -> Vec<Action> {
        match event {
            Event::Tick => {
                if self.paused {
                    vec![Action::Render]
                } else {
                    vec![Action::StartFetch, Action::Render]
                }
            }
            Event::FetchSucceeded(snapshot) => {
                if self.paused {
                    self.counters.discarded += 1;
                    debug!(samples = snapshot.len(), "discarded snapshot while paused");
                    return Vec::new();
                }
                let stats = self.store.update(snapshot);
                debug!(
                    observed = stats.observed,
                    created = stats.created,
                    missing = stats.missing,
                    series = self.store.len(),
                    "applied snapshot"
                );
                if self.state != ConnectionState::Connected {
                    info!("connected");
                }
                self.state = ConnectionState::Connected;
                self.last_error = None;
                self.counters.succeeded += 1;
                self.last_update = Some(Local::now());
                self.clamp_scroll();
                vec![Action::Render]
            }
            Event::FetchFailed(error) => {
                if self.paused {
                    self.counters.discarded += 1;
                    debug!(%error, "discarded fetch error while paused");
                    return Vec::new();
                }
                warn!(%error, "fetch failed");
                self.state = ConnectionState::ErrorRetrying;
                self.last_error = Some(error);
                self.counters.failed += 1;
                vec![Action::Render]
            }
            Event::UserInput(command) => self.handle_command(command),
            Event::Resize { width, height } => {
                self.width = width;
                self.height = height;
                self.clamp_scroll();
                vec![Action::Render]
            }
        }
    }

    fn handle_command(&mut self, command: Command) -> Vec<Action> {
        match command {
            Command::Quit => return vec![Action::Quit],
            Command::TogglePause => {
                self.paused = !self.paused;
                info!(paused = self.paused, "pause toggled");
            }
            Command::CycleDelta => {
                self.delta_mode = self.delta_mode.next_mode();
                debug!(mode = %self.delta_mode, "delta mode changed");
            }
            Command::ToggleLabels => self.label_mode = self.label_mode.toggle(),
            Command::ScrollUp(n) => self.scroll = self.scroll.saturating_sub(n),
            Command::ScrollDown(n) => {
                self.scroll = self.scroll.saturating_add(n);
                self.clamp_scroll();
            }
            Command::ScrollHome => self.scroll = 0,
            Command::ScrollEnd => self.scroll = self.max_scroll(),
            Command::ToggleHelp => self.show_help = !self.show_help,
        }
        vec![Action::Render]
    }

    /// Series passing the filter, in ascending signature order.
    pub fn visible_series(&self) -> impl Iterator<Item = (&str, &MetricSeries)> {
        self.store.iter().filter(|(_, s)| self.filter.matches(s))
    }

    pub fn visible_count(&self) -> usize {
        self.visible_series().count()
    }

    /// Builds the table for a content area `width` columns wide.
    pub fn layout(&self, width: u16) -> Layout {
        let opts = LayoutOptions {
            history: self.store.capacity(),
            interval: self.interval,
            width,
            label_mode: self.label_mode,
            delta_mode: self.delta_mode,
        };
        layout::build(self.visible_series(), &opts)
    }

    /// Body rows that fit on screen at the last known terminal height.
    pub fn page_rows(&self) -> usize {
        usize::from(self.height.saturating_sub(CHROME_ROWS))
    }

    fn max_scroll(&self) -> usize {
        self.visible_count().saturating_sub(self.page_rows())
    }

    fn clamp_scroll(&mut self) {
        self.scroll = self.scroll.min(self.max_scroll());
    }

    pub fn store(&self) -> &SeriesStore {
        &self.store
    }

    pub fn filter(&self) -> &FilterSpec {
        &self.filter
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn delta_mode(&self) -> DeltaMode {
        self.delta_mode
    }

    pub fn label_mode(&self) -> LabelMode {
        self.label_mode
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.state
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn last_error(&self) -> Option<&SourceError> {
        self.last_error.as_ref()
    }

    pub fn counters(&self) -> FetchCounters {
        self.counters
    }

    pub fn last_update(&self) -> Option<DateTime<Local>> {
        self.last_update
    }

    /// Index of the first body row shown.
    pub fn scroll(&self) -> usize {
        self.scroll
    }

    pub fn show_help(&self) -> bool {
        self.show_help
    }
}
