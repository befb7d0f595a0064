//! Availability prober
//!
//! Walks the configured instances in priority order and selects the first
//! one whose health probe succeeds.
//!
//! ## Selection Rules
//!
//! - One probe per endpoint, no retries
//! - First reachable endpoint wins; later endpoints are never probed
//! - Exhausting the list yields `None`, which is not an error

use crate::traits::{HealthOutcome, HealthProbe};
use tracing::{error, info};

/// Sequential first-success selector over a list of endpoints
pub struct AvailabilityProber {
    /// Probe used for every endpoint
    probe: Box<dyn HealthProbe>,
}

impl AvailabilityProber {
    /// Create a new prober
    pub fn new(probe: Box<dyn HealthProbe>) -> Self {
        Self { probe }
    }

    /// Select the first reachable endpoint
    ///
    /// # Returns
    ///
    /// - `Some(endpoint)`: The first endpoint that answered with a success status
    /// - `None`: Every endpoint failed, or the list was empty
    pub async fn select_available(&self, endpoints: &[String]) -> Option<String> {
        self.select_with(endpoints, |_, _| {}).await
    }

    /// Select the first reachable endpoint, reporting every probe outcome
    ///
    /// `on_outcome` is called once per probed endpoint, in probe order.
    pub async fn select_with<F>(&self, endpoints: &[String], mut on_outcome: F) -> Option<String>
    where
        F: FnMut(&str, &HealthOutcome),
    {
        let probe = self.probe.probe_name();

        for endpoint in endpoints {
            let outcome = self.probe.probe(endpoint).await;

            match &outcome {
                HealthOutcome::Reachable { status } => {
                    info!(url = %endpoint, probe, status, "instance is available");
                }
                HealthOutcome::Responded { status } => {
                    info!(url = %endpoint, probe, status, "instance health check failed");
                }
                HealthOutcome::Failed { error } => {
                    error!(url = %endpoint, probe, error = %error, "health check failed");
                }
            }

            on_outcome(endpoint, &outcome);

            if outcome.is_reachable() {
                return Some(endpoint.clone());
            }
        }

        None
    }
}
