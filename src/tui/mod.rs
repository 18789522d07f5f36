//! Terminal User Interface for promtab.
//!
//! The shell around [`crate::scheduler::PollScheduler`]: it owns the
//! terminal, turns key presses into commands, runs fetches on worker threads
//! and draws whatever the scheduler says should be on screen.

mod app;
mod event;
mod input;
mod render;
mod style;
mod widgets;

pub use app::App;
