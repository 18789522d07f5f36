//! Main TUI application.

use std::io;
use std::sync::Arc;
use std::sync::mpsc::Sender;
use std::thread;

use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing::{debug, info};

use crate::scheduler::{self, Action, PollScheduler};
use crate::source::MetricsSource;

use super::event::{Event, EventHandler};
use super::input::handle_key;
use super::render::render;

/// Main TUI application.
pub struct App {
    source: Arc<dyn MetricsSource>,
    scheduler: PollScheduler,
    endpoint: String,
}

impl App {
    /// Creates a new App polling `source`.
    pub fn new(source: Arc<dyn MetricsSource>, scheduler: PollScheduler) -> Self {
        let endpoint = source.describe();
        Self {
            source,
            scheduler,
            endpoint,
        }
    }

    /// Runs the TUI application until the user quits.
    pub fn run(mut self) -> io::Result<()> {
        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.event_loop(&mut terminal);

        // Restore terminal even if the loop failed
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> io::Result<()> {
        let events = EventHandler::new(self.scheduler.interval());
        let fetch_tx = events.sender();

        if let Ok(size) = terminal.size() {
            self.scheduler.handle(scheduler::Event::Resize {
                width: size.width,
                height: size.height,
            });
        }

        let mut pending = self.scheduler.start();
        loop {
            let mut redraw = false;
            for action in pending.drain(..) {
                match action {
                    Action::StartFetch => self.spawn_fetch(&fetch_tx),
                    Action::Render => redraw = true,
                    Action::Quit => {
                        info!("quit requested");
                        return Ok(());
                    }
                }
            }
            if redraw {
                terminal.draw(|frame| render(frame, &self.scheduler, &self.endpoint))?;
            }

            let event = match events.next() {
                Ok(event) => event,
                Err(_) => return Ok(()),
            };
            pending = match event {
                Event::Tick => self.scheduler.handle(scheduler::Event::Tick),
                Event::Key(key) => match handle_key(
                    key,
                    self.scheduler.show_help(),
                    self.scheduler.page_rows(),
                ) {
                    Some(command) => self.scheduler.handle(scheduler::Event::UserInput(command)),
                    None => Vec::new(),
                },
                Event::Resize(width, height) => self
                    .scheduler
                    .handle(scheduler::Event::Resize { width, height }),
                Event::Fetched(Ok(snapshot)) => self
                    .scheduler
                    .handle(scheduler::Event::FetchSucceeded(snapshot)),
                Event::Fetched(Err(error)) => {
                    self.scheduler.handle(scheduler::Event::FetchFailed(error))
                }
            };
        }
    }

    /// Runs one fetch on a worker thread; the result comes back as an event.
    fn spawn_fetch(&self, tx: &Sender<Event>) {
        let source = Arc::clone(&self.source);
        let tx = tx.clone();
        debug!("starting fetch");
        thread::spawn(move || {
            let result = source.fetch();
            // The loop may already be gone on shutdown.
            let _ = tx.send(Event::Fetched(result));
        });
    }
}
