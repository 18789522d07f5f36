//! Built-in demo endpoint.
//!
//! Simulates a small web service: request counters that only grow, gauges
//! that wander, one series that comes and goes, plus a histogram and a
//! summary family. Every fetch renders exposition text and runs it through
//! the regular parser, so `--demo` exercises the same path as a real scrape.

use std::collections::BTreeMap;
use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{MetricsSource, Snapshot, SourceError, parse_exposition};

const METHODS: &[&str] = &["get", "post"];
const ENDPOINTS: &[&str] = &["/api/orders", "/api/users", "/health"];
const CODES: &[&str] = &["200", "500"];
const BUCKETS: &[f64] = &[0.05, 0.1, 0.25, 0.5, 1.0];

/// Ticks per on/off period of `batch_job_running`.
const BATCH_PERIOD: u64 = 6;

#[derive(Debug)]
struct DemoState {
    rng: StdRng,
    tick: u64,
    requests: BTreeMap<(&'static str, &'static str, &'static str), f64>,
    connections: BTreeMap<&'static str, f64>,
    memory_bytes: f64,
    /// Cumulative counts per bucket in `BUCKETS`, then `+Inf`.
    latency_buckets: Vec<f64>,
    latency_sum: f64,
    rpc_sum: f64,
    rpc_count: f64,
}

impl DemoState {
    fn new(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut requests = BTreeMap::new();
        for &method in METHODS {
            for &endpoint in ENDPOINTS {
                for &code in CODES {
                    let start = if code == "200" {
                        rng.random_range(0..5000u32)
                    } else {
                        rng.random_range(0..100u32)
                    };
                    requests.insert((method, endpoint, code), f64::from(start));
                }
            }
        }
        let connections = ENDPOINTS
            .iter()
            .map(|&e| (e, f64::from(rng.random_range(0..10u32))))
            .collect();
        Self {
            rng,
            tick: 0,
            requests,
            connections,
            memory_bytes: 512.0 * 1024.0 * 1024.0,
            latency_buckets: vec![0.0; BUCKETS.len() + 1],
            latency_sum: 0.0,
            rpc_sum: 0.0,
            rpc_count: 0.0,
        }
    }

    fn advance(&mut self) {
        self.tick += 1;

        for _ in 0..self.rng.random_range(1..=5) {
            let method = METHODS[self.rng.random_range(0..METHODS.len())];
            let endpoint = ENDPOINTS[self.rng.random_range(0..ENDPOINTS.len())];
            let code = if self.rng.random_bool(0.9) { "200" } else { "500" };
            if let Some(count) = self.requests.get_mut(&(method, endpoint, code)) {
                *count += 1.0;
            }

            let duration: f64 = self.rng.random::<f64>() * 1.2;
            for (i, le) in BUCKETS.iter().enumerate() {
                if duration <= *le {
                    self.latency_buckets[i] += 1.0;
                }
            }
            if let Some(inf) = self.latency_buckets.last_mut() {
                *inf += 1.0;
            }
            self.latency_sum += duration;
        }

        for value in self.connections.values_mut() {
            let change = f64::from(self.rng.random_range(-2..=2i32));
            *value = (*value + change).max(0.0);
        }

        let change = (self.rng.random::<f64>() - 0.5) * 10.0 * 1024.0 * 1024.0;
        self.memory_bytes = (self.memory_bytes + change).max(64.0 * 1024.0 * 1024.0);

        self.rpc_sum += 5000.0 + (self.rng.random::<f64>() - 0.5) * 1000.0;
        self.rpc_count += 1.0;
    }

    fn render(&self) -> String {
        let mut out = String::new();

        out.push_str("# HELP http_requests_total The total number of HTTP requests.\n");
        out.push_str("# TYPE http_requests_total counter\n");
        for ((method, endpoint, code), value) in &self.requests {
            out.push_str(&format!(
                "http_requests_total{{method=\"{}\",endpoint=\"{}\",code=\"{}\"}} {}\n",
                method, endpoint, code, value
            ));
        }

        out.push_str("# TYPE http_connections_active gauge\n");
        for (endpoint, value) in &self.connections {
            out.push_str(&format!(
                "http_connections_active{{endpoint=\"{}\"}} {}\n",
                endpoint, value
            ));
        }

        out.push_str("# TYPE memory_usage_bytes gauge\n");
        out.push_str(&format!("memory_usage_bytes {}\n", self.memory_bytes.round()));

        let phase = (self.tick % 120) as f64 / 20.0;
        out.push_str("# TYPE bandwidth_usage_mbps gauge\n");
        out.push_str(&format!(
            "bandwidth_usage_mbps{{direction=\"inbound\"}} {:.3}\n",
            10.0 + 15.0 * phase.sin()
        ));
        out.push_str(&format!(
            "bandwidth_usage_mbps{{direction=\"outbound\"}} {:.3}\n",
            20.0 + 20.0 * phase.sin()
        ));

        if self.tick % BATCH_PERIOD < BATCH_PERIOD / 2 {
            out.push_str("# TYPE batch_job_running gauge\n");
            out.push_str("batch_job_running{job=\"reindex\"} 1\n");
        }

        out.push_str("# TYPE http_request_duration_seconds histogram\n");
        for (le, count) in BUCKETS.iter().zip(&self.latency_buckets) {
            out.push_str(&format!(
                "http_request_duration_seconds_bucket{{le=\"{}\"}} {}\n",
                le, count
            ));
        }
        let total = self.latency_buckets.last().copied().unwrap_or(0.0);
        out.push_str(&format!(
            "http_request_duration_seconds_bucket{{le=\"+Inf\"}} {}\n",
            total
        ));
        out.push_str(&format!(
            "http_request_duration_seconds_sum {}\n",
            self.latency_sum
        ));
        out.push_str(&format!("http_request_duration_seconds_count {}\n", total));

        out.push_str("# TYPE rpc_duration_seconds summary\n");
        out.push_str("rpc_duration_seconds{quantile=\"0.5\"} 4773\n");
        out.push_str("rpc_duration_seconds{quantile=\"0.99\"} 76656\n");
        out.push_str(&format!("rpc_duration_seconds_sum {}\n", self.rpc_sum));
        out.push_str(&format!("rpc_duration_seconds_count {}\n", self.rpc_count));

        out
    }
}

/// In-process stand-in for a real endpoint.
#[derive(Debug)]
pub struct DemoSource {
    state: Mutex<DemoState>,
}

impl DemoSource {
    /// Seeds the simulation from the thread RNG.
    pub fn new() -> Self {
        Self::with_seed(rand::random())
    }

    /// Reproducible simulation.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            state: Mutex::new(DemoState::new(seed)),
        }
    }
}

impl Default for DemoSource {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsSource for DemoSource {
    fn fetch(&self) -> Result<Snapshot, SourceError> {
        let text = {
            let mut state = self
                .state
                .lock()
                .map_err(|_| SourceError::Http("demo state lock poisoned".to_string()))?;
            state.advance();
            state.render()
        };
        Ok(parse_exposition(&text)?)
    }

    fn describe(&self) -> String {
        "demo".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value(snapshot: &Snapshot, name: &str, pairs: &[(&str, &str)]) -> Option<f64> {
        snapshot
            .iter()
            .find(|o| {
                o.name == name
                    && pairs
                        .iter()
                        .all(|(k, v)| o.labels.get(*k).map(String::as_str) == Some(*v))
            })
            .map(|o| o.value)
    }

    #[test]
    fn test_demo_output_parses() {
        let source = DemoSource::with_seed(7);
        let snapshot = source.fetch().unwrap();
        let requests = snapshot
            .iter()
            .filter(|o| o.name == "http_requests_total")
            .count();
        assert_eq!(requests, METHODS.len() * ENDPOINTS.len() * CODES.len());
        assert!(value(&snapshot, "memory_usage_bytes", &[]).is_some());
        assert_eq!(source.describe(), "demo");
    }

    #[test]
    fn test_histogram_and_summary_are_skipped() {
        let snapshot = DemoSource::with_seed(1).fetch().unwrap();
        assert!(
            snapshot
                .iter()
                .all(|o| !o.name.starts_with("http_request_duration_seconds")
                    && !o.name.starts_with("rpc_duration_seconds"))
        );
    }

    #[test]
    fn test_counters_never_decrease() {
        let source = DemoSource::with_seed(42);
        let mut previous = source.fetch().unwrap();
        for _ in 0..20 {
            let current = source.fetch().unwrap();
            for obs in previous.iter().filter(|o| o.name == "http_requests_total") {
                let labels: Vec<(&str, &str)> = obs
                    .labels
                    .iter()
                    .map(|(k, v)| (k.as_str(), v.as_str()))
                    .collect();
                let now = value(&current, "http_requests_total", &labels).unwrap();
                assert!(now >= obs.value);
            }
            previous = current;
        }
    }

    #[test]
    fn test_batch_job_comes_and_goes() {
        let source = DemoSource::with_seed(3);
        let present: Vec<bool> = (0..BATCH_PERIOD * 2)
            .map(|_| {
                let snapshot = source.fetch().unwrap();
                value(&snapshot, "batch_job_running", &[("job", "reindex")]).is_some()
            })
            .collect();
        assert!(present.iter().any(|p| *p));
        assert!(present.iter().any(|p| !*p));
    }

    #[test]
    fn test_same_seed_same_values() {
        let a = DemoSource::with_seed(99).fetch().unwrap();
        let b = DemoSource::with_seed(99).fetch().unwrap();
        assert_eq!(a, b);
    }
}
