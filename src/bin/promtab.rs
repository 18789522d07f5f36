//! promtab - Interactive TUI viewer for a Prometheus metrics endpoint.
//!
//! Usage:
//!   promtab -u http://localhost:9100/metrics
//!   promtab -u http://host:8080/metrics -i 2s -n 20 --deltas next
//!   promtab -u http://host/metrics --filter-metric '^http_' --filter-label 'code=~5..'
//!   promtab --demo                  # simulated endpoint, no network

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;
#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use std::fs::File;
use std::io;
use std::path::Path;
use std::sync::{Arc, Mutex};

use clap::Parser;
use tracing::{Level, info};
use tracing_subscriber::EnvFilter;

use promtab::config::{Config, Endpoint};
use promtab::source::{DemoSource, HttpSource, MetricsSource};
use promtab::tui::App;

/// Installs a file logger. The terminal belongs to the TUI, so without a log
/// file nothing is logged.
fn init_logging(path: Option<&Path>, verbose: u8, quiet: bool) -> io::Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let level = if quiet {
        Level::ERROR
    } else {
        match verbose {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    let mut filter = EnvFilter::from_default_env();
    if let Ok(directive) = format!("promtab={}", level).parse() {
        filter = filter.add_directive(directive);
    }

    let file = File::create(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

fn main() {
    let config = Config::parse();

    let validated = match config.validate() {
        Ok(v) => v,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = init_logging(config.log_file.as_deref(), config.verbose, config.quiet) {
        eprintln!("Error opening log file: {}", e);
        std::process::exit(1);
    }

    info!("promtab {} starting", env!("CARGO_PKG_VERSION"));
    info!(
        "Config: endpoint={:?}, interval={:?}, history={}, timeout={:?}",
        validated.endpoint, config.interval, config.history, config.timeout
    );

    let source: Arc<dyn MetricsSource> = match &validated.endpoint {
        Endpoint::Demo => Arc::new(DemoSource::new()),
        Endpoint::Http(url) => match HttpSource::new(url, config.timeout) {
            Ok(s) => Arc::new(s),
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        },
    };

    let scheduler = config.scheduler(validated.filter);
    if let Err(e) = App::new(source, scheduler).run() {
        eprintln!("Error running TUI: {}", e);
        std::process::exit(1);
    }
}
