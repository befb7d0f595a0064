//! Core failover engine
//!
//! The FailoverEngine is responsible for:
//! - Selecting the first healthy instance via the AvailabilityProber
//! - Repointing the configured record via the RecordReplacer
//! - Reporting progress as engine events
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐  instances   ┌──────────────────────┐
//! │ FailoverConfig│────────────►│ AvailabilityProber   │──► HealthProbe
//! └──────────────┘              └──────────────────────┘
//!                                          │ selected endpoint
//!                                          ▼
//!                               ┌──────────────────────┐
//!                               │ RecordReplacer       │──► AddressResolver
//!                               └──────────────────────┘──► DnsProvider
//! ```
//!
//! ## Run Flow
//!
//! 1. Probe instances in configuration order, stop at the first success
//! 2. No success → `Error::NoAvailableInstance`, no provider request
//! 3. Resolve the selected endpoint, delete then create the record
//! 4. Return a `RunReport`
//!
//! The engine runs the pipeline once per call; scheduling is left to
//! whatever invokes the process.

use crate::config::FailoverConfig;
use crate::error::{Error, Result};
use crate::prober::AvailabilityProber;
use crate::replacer::{DeleteStatus, RecordReplacer, ReplaceReport};
use crate::traits::{AddressResolver, DnsProvider, HealthOutcome, HealthProbe};
use std::net::IpAddr;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

/// Events emitted by the FailoverEngine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// Run started
    Started {
        instances_count: usize,
    },

    /// Instance answered with a success status
    ProbeSucceeded {
        endpoint: String,
    },

    /// Instance was skipped
    ProbeFailed {
        endpoint: String,
        reason: String,
    },

    /// Instance chosen as the record target
    InstanceSelected {
        endpoint: String,
    },

    /// Delete step finished (successfully or not)
    RecordDeleted {
        record_name: String,
        ip: IpAddr,
        outcome: DeleteStatus,
    },

    /// Record now points at the selected instance
    RecordCreated {
        record_name: String,
        ip: IpAddr,
    },

    /// Run ended with a fatal error
    RunFailed {
        error: String,
    },
}

/// Summary of a successful run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// Endpoint the record now points at
    pub selected: String,
    /// Details of the record replacement
    pub replacement: ReplaceReport,
}

/// Core failover engine
///
/// Owns both pipeline stages and the configuration they run against.
/// All work happens sequentially on the calling task.
pub struct FailoverEngine {
    /// First-success instance selector
    prober: AvailabilityProber,

    /// Record repointing
    replacer: RecordReplacer,

    /// Instance endpoints in priority order
    instances: Vec<String>,

    /// Record to repoint
    record_name: String,

    /// Event sender for external monitoring
    event_tx: mpsc::Sender<EngineEvent>,
}

impl FailoverEngine {
    /// Create a new failover engine
    ///
    /// # Parameters
    ///
    /// - `probe`: Health probe implementation
    /// - `resolver`: Address resolver implementation
    /// - `provider`: DNS provider implementation
    /// - `config`: Failover configuration
    ///
    /// # Returns
    ///
    /// A tuple of (engine, event_receiver) where event_receiver yields engine events
    pub fn new(
        probe: Box<dyn HealthProbe>,
        resolver: Box<dyn AddressResolver>,
        provider: Box<dyn DnsProvider>,
        config: FailoverConfig,
    ) -> Result<(Self, mpsc::Receiver<EngineEvent>)> {
        config.validate()?;

        let (tx, rx) = mpsc::channel(config.engine.event_channel_capacity);

        let engine = Self {
            prober: AvailabilityProber::new(probe),
            replacer: RecordReplacer::new(provider, resolver, &config.replacer),
            instances: config.instances,
            record_name: config.record_name,
            event_tx: tx,
        };

        Ok((engine, rx))
    }

    /// Run the failover pipeline once
    ///
    /// # Returns
    ///
    /// - `Ok(RunReport)`: The record points at the first healthy instance
    /// - `Err(Error)`: A fatal condition; see [`Error::is_fatal`]
    pub async fn run_once(&self) -> Result<RunReport> {
        self.emit_event(EngineEvent::Started {
            instances_count: self.instances.len(),
        });

        let result = self.run_pipeline().await;

        if let Err(e) = &result {
            error!(error = %e, "failover run failed");
            self.emit_event(EngineEvent::RunFailed {
                error: e.to_string(),
            });
        }

        result
    }

    async fn run_pipeline(&self) -> Result<RunReport> {
        let selected = self
            .prober
            .select_with(&self.instances, |endpoint, outcome| {
                self.emit_event(probe_event(endpoint, outcome));
            })
            .await
            .ok_or(Error::NoAvailableInstance)?;

        info!(url = %selected, provider = self.replacer.provider_name(), "selected instance");
        self.emit_event(EngineEvent::InstanceSelected {
            endpoint: selected.clone(),
        });

        let replacement = self
            .replacer
            .replace_record_with(&selected, &self.record_name, |ip, outcome| {
                self.emit_event(EngineEvent::RecordDeleted {
                    record_name: self.record_name.clone(),
                    ip,
                    outcome: outcome.clone(),
                });
            })
            .await?;

        self.emit_event(EngineEvent::RecordCreated {
            record_name: replacement.record_name.clone(),
            ip: replacement.ip,
        });

        Ok(RunReport {
            selected,
            replacement,
        })
    }

    /// Emit an engine event
    fn emit_event(&self, event: EngineEvent) {
        if self.event_tx.try_send(event).is_err() {
            warn!("Event channel full or closed, dropping event");
        }
    }
}

fn probe_event(endpoint: &str, outcome: &HealthOutcome) -> EngineEvent {
    match outcome.clone().into_error(endpoint) {
        None => EngineEvent::ProbeSucceeded {
            endpoint: endpoint.to_string(),
        },
        Some(e) => EngineEvent::ProbeFailed {
            endpoint: endpoint.to_string(),
            reason: e.to_string(),
        },
    }
}
