// # Health Probe Trait
//
// Defines the interface for checking whether an instance endpoint is
// reachable.
//
// ## Implementations
//
// - HTTP GET with a bounded timeout: `failover-probe-http` crate
//
// ## Usage
//
// ```rust,ignore
// use failover_core::HealthProbe;
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let probe = /* HealthProbe implementation */;
//
//     if probe.probe("http://10.0.0.5:11434").await.is_reachable() {
//         println!("instance is up");
//     }
//
//     Ok(())
// }
// ```

use async_trait::async_trait;

/// Result of probing one endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthOutcome {
    /// Endpoint answered with a success status
    Reachable {
        /// HTTP status code
        status: u16,
    },
    /// Endpoint answered, but not with a success status
    Responded {
        /// HTTP status code
        status: u16,
    },
    /// Endpoint could not be reached (connect error, timeout, ...)
    Failed {
        /// Transport error message
        error: String,
    },
}

impl HealthOutcome {
    /// Whether the endpoint should be selected
    pub fn is_reachable(&self) -> bool {
        matches!(self, HealthOutcome::Reachable { .. })
    }

    /// Convert an unhealthy outcome into the matching error
    ///
    /// Returns `None` for [`HealthOutcome::Reachable`].
    pub fn into_error(self, endpoint: &str) -> Option<crate::Error> {
        match self {
            HealthOutcome::Reachable { .. } => None,
            HealthOutcome::Responded { status } => Some(crate::Error::ProbeStatus {
                endpoint: endpoint.to_string(),
                status,
            }),
            HealthOutcome::Failed { error } => Some(crate::Error::ProbeTransport {
                endpoint: endpoint.to_string(),
                message: error,
            }),
        }
    }
}

/// Trait for health probe implementations
///
/// A probe performs exactly one bounded attempt per call. It must not retry,
/// back off, or remember results between calls; ordering and selection are
/// owned by [`crate::AvailabilityProber`].
///
/// Transport failures are reported as [`HealthOutcome::Failed`] rather than
/// as an `Err`, so a failing instance never aborts the selection loop.
#[async_trait]
pub trait HealthProbe: Send + Sync {
    /// Probe a single endpoint once
    async fn probe(&self, endpoint: &str) -> HealthOutcome;

    /// Get the probe name (for logging/debugging)
    fn probe_name(&self) -> &'static str;
}
