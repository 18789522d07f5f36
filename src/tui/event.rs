//! Event handling for TUI.
//!
//! Terminal input, timer ticks and fetch completions all arrive on one
//! channel. Input and ticks each have their own thread so that the tick
//! cadence does not depend on how often keys are pressed.

use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind};

use crate::source::{Snapshot, SourceError};

/// How long the input thread blocks in `poll` before checking the channel.
const INPUT_POLL: Duration = Duration::from_millis(250);

/// Application events.
#[derive(Debug)]
pub enum Event {
    /// Poll interval elapsed.
    Tick,
    /// Keyboard input.
    Key(KeyEvent),
    /// Terminal resize (width, height).
    Resize(u16, u16),
    /// A background fetch finished.
    Fetched(Result<Snapshot, SourceError>),
}

/// Owns the event channel and its producer threads.
pub struct EventHandler {
    rx: Receiver<Event>,
    tx: Sender<Event>,
}

impl EventHandler {
    /// Starts the input thread and a ticker firing every `tick_rate`.
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::channel();

        let input_tx = tx.clone();
        thread::spawn(move || {
            loop {
                if event::poll(INPUT_POLL).unwrap_or(false)
                    && let Ok(evt) = event::read()
                {
                    let event = match evt {
                        CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => {
                            Event::Key(key)
                        }
                        CrosstermEvent::Resize(w, h) => Event::Resize(w, h),
                        _ => continue,
                    };
                    if input_tx.send(event).is_err() {
                        break;
                    }
                }
            }
        });

        let tick_tx = tx.clone();
        thread::spawn(move || {
            loop {
                thread::sleep(tick_rate);
                if tick_tx.send(Event::Tick).is_err() {
                    break;
                }
            }
        });

        Self { rx, tx }
    }

    /// Sender for fetch workers.
    pub fn sender(&self) -> Sender<Event> {
        self.tx.clone()
    }

    /// Receives the next event, blocking until one is available.
    pub fn next(&self) -> Result<Event, mpsc::RecvError> {
        self.rx.recv()
    }
}
