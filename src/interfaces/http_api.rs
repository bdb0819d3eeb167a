use std::time::Duration;

use thiserror::Error;
use ureq::tls::{TlsConfig, TlsProvider};
use url::Url;

use crate::constants::defaults;

#[derive(Error, Debug)]
pub enum CollectorError {
    #[error("request to collector failed: {0}")]
    Request(#[source] ureq::Error),
    #[error("collector answered with HTTP {status}")]
    Status { status: u16 },
    #[error("could not read collector response: {0}")]
    ReadBody(#[source] ureq::Error),
}

/// HTTP client for the telemetry collector.
///
/// Holds its own agent, so the timeout and credential travel with the value
/// rather than living in process-wide state.
#[derive(Clone)]
pub struct CollectorClient {
    agent: ureq::Agent,
    report_url: Url,
    api_key: String,
}

impl CollectorClient {
    pub fn new(base_url: &Url, api_key: impl Into<String>, timeout: Duration) -> Self {
        let agent = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .tls_config(
                TlsConfig::builder()
                    .provider(TlsProvider::NativeTls)
                    .build(),
            )
            .build()
            .into();

        CollectorClient {
            agent,
            report_url: report_url(base_url),
            api_key: api_key.into(),
        }
    }

    pub fn report_url(&self) -> &Url {
        &self.report_url
    }

    /// POST a serialized report; only HTTP 200 counts as delivered.
    /// Returns the response body on success.
    pub fn send_report(&self, body: &[u8]) -> Result<String, CollectorError> {
        log::debug!("POST {} ({} bytes)", self.report_url, body.len());

        let mut response = self
            .agent
            .post(self.report_url.as_str())
            .header("Content-Type", "application/json")
            .header("x-api-key", &self.api_key)
            .send(body)
            .map_err(CollectorError::Request)?;

        let status = response.status().as_u16();
        if status != 200 {
            return Err(CollectorError::Status { status });
        }

        response
            .body_mut()
            .read_to_string()
            .map_err(CollectorError::ReadBody)
    }
}

/// Report endpoint below the collector base URL, keeping any base path
fn report_url(base_url: &Url) -> Url {
    let mut url = base_url.clone();
    let path = format!(
        "{}{}",
        base_url.path().trim_end_matches('/'),
        defaults::REPORT_PATH
    );
    url.set_path(&path);
    url
}
