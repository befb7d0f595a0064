//! Test doubles and common utilities for pipeline contract tests
//!
//! Every double records its calls so tests can assert ordering and counts
//! without any network access.

#![allow(dead_code)]

use failover_core::config::{FailoverConfig, ProviderConfig};
use failover_core::error::{Error, Result};
use failover_core::traits::{AddressResolver, DeleteOutcome, DnsProvider, HealthOutcome, HealthProbe};
use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// A probe that answers from a fixed table and records probe order
pub struct ScriptedProbe {
    outcomes: HashMap<String, HealthOutcome>,
    probed: Arc<Mutex<Vec<String>>>,
}

impl ScriptedProbe {
    pub fn new(outcomes: &[(&str, HealthOutcome)]) -> Self {
        Self {
            outcomes: outcomes
                .iter()
                .map(|(endpoint, outcome)| (endpoint.to_string(), outcome.clone()))
                .collect(),
            probed: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Handle to the list of probed endpoints, in order
    pub fn probed(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.probed)
    }
}

#[async_trait::async_trait]
impl HealthProbe for ScriptedProbe {
    async fn probe(&self, endpoint: &str) -> HealthOutcome {
        self.probed.lock().unwrap().push(endpoint.to_string());
        self.outcomes
            .get(endpoint)
            .cloned()
            .unwrap_or(HealthOutcome::Failed {
                error: "connection refused".to_string(),
            })
    }

    fn probe_name(&self) -> &'static str {
        "scripted"
    }
}

/// A resolver that answers from a fixed table and counts lookups
pub struct StaticResolver {
    hosts: HashMap<String, Vec<IpAddr>>,
    lookups: Arc<AtomicUsize>,
}

impl StaticResolver {
    pub fn new(hosts: &[(&str, Vec<IpAddr>)]) -> Self {
        Self {
            hosts: hosts
                .iter()
                .map(|(host, ips)| (host.to_string(), ips.clone()))
                .collect(),
            lookups: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Handle to the lookup counter
    pub fn lookups(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.lookups)
    }
}

#[async_trait::async_trait]
impl AddressResolver for StaticResolver {
    async fn lookup(&self, host: &str) -> Result<Vec<IpAddr>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.hosts
            .get(host)
            .cloned()
            .ok_or_else(|| Error::resolution(format!("no such host: {}", host)))
    }
}

/// A resolver that never answers
pub struct HangingResolver;

#[async_trait::async_trait]
impl AddressResolver for HangingResolver {
    async fn lookup(&self, _host: &str) -> Result<Vec<IpAddr>> {
        std::future::pending().await
    }
}

/// A provider request as seen by [`RecordingProvider`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderCall {
    Delete { record_name: String, ip: IpAddr },
    Add { record_name: String, ip: IpAddr },
}

/// How [`RecordingProvider`] answers delete requests
#[derive(Debug, Clone, Copy)]
pub enum DeleteBehavior {
    Remove,
    NotFound,
    Fail,
}

/// A mock DnsProvider that records every call in order
pub struct RecordingProvider {
    calls: Arc<Mutex<Vec<ProviderCall>>>,
    delete: DeleteBehavior,
    fail_add: bool,
}

impl RecordingProvider {
    pub fn new() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            delete: DeleteBehavior::Remove,
            fail_add: false,
        }
    }

    pub fn with_delete(mut self, delete: DeleteBehavior) -> Self {
        self.delete = delete;
        self
    }

    pub fn failing_add(mut self) -> Self {
        self.fail_add = true;
        self
    }

    /// Handle to the recorded calls
    pub fn calls(&self) -> Arc<Mutex<Vec<ProviderCall>>> {
        Arc::clone(&self.calls)
    }
}

#[async_trait::async_trait]
impl DnsProvider for RecordingProvider {
    async fn delete_record(&self, record_name: &str, ip: IpAddr) -> Result<DeleteOutcome> {
        self.calls.lock().unwrap().push(ProviderCall::Delete {
            record_name: record_name.to_string(),
            ip,
        });

        match self.delete {
            DeleteBehavior::Remove => Ok(DeleteOutcome::Removed),
            DeleteBehavior::NotFound => Ok(DeleteOutcome::NotFound),
            DeleteBehavior::Fail => Err(Error::provider("recording", "connection reset")),
        }
    }

    async fn add_record(&self, record_name: &str, ip: IpAddr) -> Result<()> {
        self.calls.lock().unwrap().push(ProviderCall::Add {
            record_name: record_name.to_string(),
            ip,
        });

        if self.fail_add {
            return Err(Error::provider("recording", "status 500"));
        }
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "recording"
    }
}

/// Helper to create a minimal FailoverConfig for testing
pub fn minimal_config(record_name: &str, instances: &[&str]) -> FailoverConfig {
    FailoverConfig::new(record_name, ProviderConfig::pihole("pi.hole", "test-key"))
        .with_instances(instances.iter().copied())
}

pub fn ip(s: &str) -> IpAddr {
    s.parse().unwrap()
}
