// # HTTP Health Probe
//
// This crate provides an HTTP-based health probe for the failover system.
//
// ## Behavior
//
// - One GET request against the instance's base address per probe
// - Bounded by a fixed timeout (5 seconds by default)
// - Only `200 OK` counts as healthy; the response body is ignored
// - No retries, no backoff (selection is owned by `AvailabilityProber`)

use async_trait::async_trait;
use failover_core::config::ProbeConfig;
use failover_core::traits::{HealthOutcome, HealthProbe};
use failover_core::{Error, Result};
use std::time::Duration;

/// Default upper bound for a single probe
const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// HTTP GET health probe
#[derive(Debug, Clone)]
pub struct HttpHealthProbe {
    /// HTTP client (timeout configured at build time)
    client: reqwest::Client,

    /// Per-request timeout
    timeout: Duration,
}

impl HttpHealthProbe {
    /// Create a probe with the default 5 second timeout
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_PROBE_TIMEOUT)
    }

    /// Create a probe from configuration
    pub fn from_config(config: &ProbeConfig) -> Result<Self> {
        config.validate()?;
        Self::with_timeout(Duration::from_secs(config.timeout_secs))
    }

    /// Create a probe with a custom timeout
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::http(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, timeout })
    }

    /// Configured per-request timeout
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[async_trait]
impl HealthProbe for HttpHealthProbe {
    async fn probe(&self, endpoint: &str) -> HealthOutcome {
        let response = match self.client.get(endpoint).send().await {
            Ok(response) => response,
            Err(e) => {
                let error = if e.is_timeout() {
                    format!("timed out after {:?}", self.timeout)
                } else {
                    e.to_string()
                };
                return HealthOutcome::Failed { error };
            }
        };

        let status = response.status();
        if status == reqwest::StatusCode::OK {
            HealthOutcome::Reachable {
                status: status.as_u16(),
            }
        } else {
            HealthOutcome::Responded {
                status: status.as_u16(),
            }
        }
    }

    fn probe_name(&self) -> &'static str {
        "http"
    }
}
