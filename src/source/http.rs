//! HTTP source that scrapes a `/metrics` endpoint.

use std::time::Duration;

use reqwest::blocking::Client;

use super::{MetricsSource, Snapshot, SourceError, parse_exposition};

/// Default transport timeout for a single scrape.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Scrapes a Prometheus text endpoint with a blocking client.
///
/// Each fetch runs on its own worker thread, so blocking here never stalls
/// the event loop. `Client` is internally reference counted and cheap to
/// share.
#[derive(Debug, Clone)]
pub struct HttpSource {
    url: String,
    client: Client,
}

impl HttpSource {
    /// Creates a source for `url` with the given request timeout.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, SourceError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("promtab/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| SourceError::Http(e.to_string()))?;
        Ok(Self {
            url: url.into(),
            client,
        })
    }
}

impl MetricsSource for HttpSource {
    fn fetch(&self) -> Result<Snapshot, SourceError> {
        let response = self
            .client
            .get(&self.url)
            .header(reqwest::header::ACCEPT, "text/plain;version=0.0.4")
            .send()
            .map_err(|e| SourceError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                status: status.as_u16(),
                url: self.url.clone(),
            });
        }

        let body = response
            .text()
            .map_err(|e| SourceError::Http(e.to_string()))?;
        Ok(parse_exposition(&body)?)
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}
