//! Command-line configuration.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::delta::DeltaMode;
use crate::filter::{FilterError, FilterSpec};
use crate::layout::LabelMode;
use crate::scheduler::PollScheduler;

/// Poll a Prometheus endpoint and show recent history in a table.
#[derive(Parser, Debug, Clone)]
#[command(name = "promtab", about = "Terminal viewer for Prometheus metrics", version)]
pub struct Config {
    /// Metrics endpoint to poll (http:// or https://).
    #[arg(short, long, value_name = "URL")]
    pub url: Option<String>,

    /// Poll a built-in simulated service instead of a URL.
    #[arg(long, conflicts_with = "url")]
    pub demo: bool,

    /// Poll interval, e.g. `5s`, `500ms`, `1m`.
    #[arg(short, long, default_value = "5s", value_parser = humantime::parse_duration)]
    pub interval: Duration,

    /// Number of samples kept per series.
    #[arg(short = 'n', long, default_value_t = 10)]
    pub history: usize,

    /// Regex matched against metric names (unanchored).
    #[arg(long, default_value = "", value_name = "REGEX")]
    pub filter_metric: String,

    /// Label filter: `key=value`, `key=~regex`, or a regex matched against
    /// every label value.
    #[arg(long, default_value = "", value_name = "PATTERN")]
    pub filter_label: String,

    /// Initial delta mode.
    #[arg(long, value_enum, default_value_t = DeltaMode::Off)]
    pub deltas: DeltaMode,

    /// Start with deltas shown; same as `--deltas next`.
    #[arg(long, conflicts_with = "deltas")]
    pub show_deltas: bool,

    /// Show label pairs next to metric names.
    #[arg(long)]
    pub show_labels: bool,

    /// HTTP request timeout.
    #[arg(long, default_value = "10s", value_parser = humantime::parse_duration)]
    pub timeout: Duration,

    /// Write logs to this file. Nothing is logged without it.
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors.
    #[arg(short, long)]
    pub quiet: bool,
}

/// Where snapshots come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    Http(String),
    Demo,
}

/// Settings that passed validation.
#[derive(Debug, Clone)]
pub struct Validated {
    pub endpoint: Endpoint,
    pub filter: FilterSpec,
}

impl Config {
    /// Checks every setting and compiles the filters.
    pub fn validate(&self) -> Result<Validated, ConfigError> {
        let endpoint = if self.demo {
            Endpoint::Demo
        } else {
            let url = match self.url.as_deref().map(str::trim) {
                None | Some("") => return Err(ConfigError::MissingUrl),
                Some(u) => u,
            };
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::InvalidUrl(url.to_string()));
            }
            Endpoint::Http(url.to_string())
        };
        if self.interval.is_zero() {
            return Err(ConfigError::ZeroInterval);
        }
        if self.history == 0 {
            return Err(ConfigError::ZeroHistory);
        }
        if self.timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }
        let filter = FilterSpec::new(&self.filter_metric, &self.filter_label)?;
        Ok(Validated { endpoint, filter })
    }

    pub fn initial_delta_mode(&self) -> DeltaMode {
        if self.show_deltas {
            DeltaMode::Next
        } else {
            self.deltas
        }
    }

    pub fn initial_label_mode(&self) -> LabelMode {
        LabelMode::from_flag(self.show_labels)
    }

    /// Builds the scheduler for these settings.
    pub fn scheduler(&self, filter: FilterSpec) -> PollScheduler {
        PollScheduler::new(self.history, self.interval, filter)
            .with_delta_mode(self.initial_delta_mode())
            .with_label_mode(self.initial_label_mode())
    }
}

/// Invalid configuration. Fatal at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("--url is required (or --demo)")]
    MissingUrl,
    #[error("invalid url {0:?}: must start with http:// or https://")]
    InvalidUrl(String),
    #[error("--interval must be greater than zero")]
    ZeroInterval,
    #[error("--history must be at least 1")]
    ZeroHistory,
    #[error("--timeout must be greater than zero")]
    ZeroTimeout,
    #[error(transparent)]
    Filter(#[from] FilterError),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Config {
        let mut argv = vec!["promtab"];
        argv.extend_from_slice(args);
        Config::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_defaults() {
        let c = parse(&["--url", "http://localhost:9100/metrics"]);
        assert_eq!(c.interval, Duration::from_secs(5));
        assert_eq!(c.history, 10);
        assert_eq!(c.timeout, Duration::from_secs(10));
        assert_eq!(c.initial_delta_mode(), DeltaMode::Off);
        assert_eq!(c.initial_label_mode(), LabelMode::Hidden);
        assert!(c.log_file.is_none());

        let v = c.validate().unwrap();
        assert_eq!(
            v.endpoint,
            Endpoint::Http("http://localhost:9100/metrics".to_string())
        );
        assert!(v.filter.is_empty());
    }

    #[test]
    fn test_humantime_durations() {
        let c = parse(&["-u", "http://x", "-i", "250ms", "--timeout", "1m"]);
        assert_eq!(c.interval, Duration::from_millis(250));
        assert_eq!(c.timeout, Duration::from_secs(60));
        assert!(Config::try_parse_from(["promtab", "-i", "soon"]).is_err());
    }

    #[test]
    fn test_missing_url() {
        assert!(matches!(parse(&[]).validate(), Err(ConfigError::MissingUrl)));
        assert!(matches!(
            parse(&["--url", "  "]).validate(),
            Err(ConfigError::MissingUrl)
        ));
    }

    #[test]
    fn test_demo_needs_no_url() {
        let v = parse(&["--demo"]).validate().unwrap();
        assert_eq!(v.endpoint, Endpoint::Demo);
        assert!(Config::try_parse_from(["promtab", "--demo", "-u", "http://x"]).is_err());
    }

    #[test]
    fn test_invalid_url() {
        assert!(matches!(
            parse(&["--url", "localhost:9100"]).validate(),
            Err(ConfigError::InvalidUrl(_))
        ));
        assert!(parse(&["--url", "https://host/metrics"]).validate().is_ok());
    }

    #[test]
    fn test_zero_values_rejected() {
        assert!(matches!(
            parse(&["-u", "http://x", "-i", "0s"]).validate(),
            Err(ConfigError::ZeroInterval)
        ));
        assert!(matches!(
            parse(&["-u", "http://x", "-n", "0"]).validate(),
            Err(ConfigError::ZeroHistory)
        ));
        assert!(matches!(
            parse(&["-u", "http://x", "--timeout", "0s"]).validate(),
            Err(ConfigError::ZeroTimeout)
        ));
    }

    #[test]
    fn test_bad_filters_are_fatal() {
        assert!(matches!(
            parse(&["-u", "http://x", "--filter-metric", "("]).validate(),
            Err(ConfigError::Filter(FilterError::Name(_)))
        ));
        assert!(matches!(
            parse(&["-u", "http://x", "--filter-label", "env=~["]).validate(),
            Err(ConfigError::Filter(FilterError::Label(_)))
        ));
    }

    #[test]
    fn test_view_modes() {
        let c = parse(&["-u", "http://x", "--deltas", "view", "--show-labels"]);
        assert_eq!(c.initial_delta_mode(), DeltaMode::View);
        assert_eq!(c.initial_label_mode(), LabelMode::Shown);

        let c = parse(&["-u", "http://x", "--show-deltas"]);
        assert_eq!(c.initial_delta_mode(), DeltaMode::Next);

        let sched = c.scheduler(FilterSpec::default());
        assert_eq!(sched.delta_mode(), DeltaMode::Next);
        assert_eq!(sched.store().capacity(), 10);
    }
}
