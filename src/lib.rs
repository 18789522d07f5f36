//! promtab - terminal viewer for Prometheus metrics endpoints.
//!
//! Polls one exposition endpoint on a fixed interval, keeps a short history
//! for every series and shows it as a table that fits the terminal width:
//! - `source` fetches and parses snapshots;
//! - `storage` keeps the bounded per-series history;
//! - `filter`, `delta` and `layout` turn the history into a table;
//! - `scheduler` is the event-driven state machine;
//! - `tui` is the terminal shell around it.

pub mod config;
pub mod delta;
pub mod filter;
pub mod fmt;
pub mod layout;
pub mod scheduler;
pub mod source;
pub mod storage;
pub mod tui;
