//! DNS record replacer
//!
//! Repoints a custom DNS record at the selected endpoint's address.
//!
//! ## Flow
//!
//! ```text
//! Idle → Parsing → Resolving → Deleting → Creating → Done
//!           │           │                     │
//!           └───────────┴──► Failed ◄─────────┘
//! ```
//!
//! The provider has no update primitive, so replacement is a delete followed
//! by an add. A failed delete is logged and recorded in the report, and the
//! add is attempted regardless. Only a failed add ends the operation after
//! provider requests have started; the record may then be absent until the
//! next run.

use crate::config::ReplacerConfig;
use crate::error::{Error, Result};
use crate::traits::{AddressResolver, DeleteOutcome, DnsProvider};
use std::fmt;
use std::net::IpAddr;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::{Host, Url};

/// How the delete step ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteStatus {
    /// A stale record was removed
    Removed,
    /// No matching record existed
    NotFound,
    /// The delete request failed; creation went ahead anyway
    Failed {
        /// Error reported by the provider
        error: String,
    },
}

impl From<DeleteOutcome> for DeleteStatus {
    fn from(outcome: DeleteOutcome) -> Self {
        match outcome {
            DeleteOutcome::Removed => DeleteStatus::Removed,
            DeleteOutcome::NotFound => DeleteStatus::NotFound,
        }
    }
}

impl fmt::Display for DeleteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeleteStatus::Removed => write!(f, "removed"),
            DeleteStatus::NotFound => write!(f, "not found"),
            DeleteStatus::Failed { error } => write!(f, "failed: {}", error),
        }
    }
}

/// Summary of a successful replacement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplaceReport {
    /// Record that now points at `ip`
    pub record_name: String,
    /// Address the record was bound to
    pub ip: IpAddr,
    /// Outcome of the preceding delete
    pub delete: DeleteStatus,
}

/// Delete-then-create replacement of a single custom DNS record
pub struct RecordReplacer {
    /// Provider holding the record (credentials are bound inside it)
    provider: Box<dyn DnsProvider>,

    /// Resolver for endpoint hosts that are not IP literals
    resolver: Box<dyn AddressResolver>,

    /// Upper bound for one lookup
    resolve_timeout: Duration,
}

impl RecordReplacer {
    /// Create a new replacer
    pub fn new(
        provider: Box<dyn DnsProvider>,
        resolver: Box<dyn AddressResolver>,
        config: &ReplacerConfig,
    ) -> Self {
        Self {
            provider,
            resolver,
            resolve_timeout: Duration::from_secs(config.resolve_timeout_secs),
        }
    }

    /// Name of the underlying provider
    pub fn provider_name(&self) -> &'static str {
        self.provider.provider_name()
    }

    /// Point `record_name` at the address of `endpoint`
    ///
    /// Issues exactly one delete and then exactly one add against the
    /// provider, unless the endpoint cannot be resolved, in which case no
    /// provider request is made.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidEndpoint`]: `endpoint` is not a URL with a host
    /// - [`Error::Resolution`]: the host did not resolve to any address
    /// - [`Error::CreateRequest`]: the provider did not create the record
    pub async fn replace_record(&self, endpoint: &str, record_name: &str) -> Result<ReplaceReport> {
        self.replace_record_with(endpoint, record_name, |_, _| {}).await
    }

    /// Like [`replace_record`](Self::replace_record), calling `on_delete`
    /// with the delete outcome before the add is attempted
    ///
    /// The callback runs whenever a delete request was issued, including
    /// runs whose add later fails.
    pub async fn replace_record_with<F>(
        &self,
        endpoint: &str,
        record_name: &str,
        mut on_delete: F,
    ) -> Result<ReplaceReport>
    where
        F: FnMut(IpAddr, &DeleteStatus),
    {
        let ip = self.resolve_endpoint(endpoint).await?;

        let delete = match self.provider.delete_record(record_name, ip).await {
            Ok(outcome) => {
                debug!(domain = record_name, %ip, %outcome, "existing DNS record deleted");
                DeleteStatus::from(outcome)
            }
            Err(e) => {
                let e = Error::delete_request(e.to_string());
                warn!(domain = record_name, %ip, error = %e, "continuing without delete");
                DeleteStatus::Failed {
                    error: e.to_string(),
                }
            }
        };
        on_delete(ip, &delete);

        self.provider
            .add_record(record_name, ip)
            .await
            .map_err(|e| Error::create_request(e.to_string()))?;

        info!(ip = %ip, domain = record_name, "DNS record created successfully");

        Ok(ReplaceReport {
            record_name: record_name.to_string(),
            ip,
            delete,
        })
    }

    /// Resolve the address the record should point at
    ///
    /// IP literals are used as-is; names go through the resolver and the
    /// first returned address is taken.
    pub async fn resolve_endpoint(&self, endpoint: &str) -> Result<IpAddr> {
        let host = parse_endpoint_host(endpoint)?;

        let name = match host {
            Host::Ipv4(ip) => return Ok(IpAddr::V4(ip)),
            Host::Ipv6(ip) => return Ok(IpAddr::V6(ip)),
            Host::Domain(name) => name,
        };

        // Non-special schemes leave IPv4 literals as opaque hosts
        if let Ok(ip) = name.parse::<IpAddr>() {
            return Ok(ip);
        }

        let ips = tokio::time::timeout(self.resolve_timeout, self.resolver.lookup(&name))
            .await
            .map_err(|_| {
                Error::resolution(format!(
                    "lookup of {} timed out after {:?}",
                    name, self.resolve_timeout
                ))
            })?
            .map_err(|e| match e {
                Error::Resolution(_) => e,
                other => Error::resolution(other.to_string()),
            })?;

        let ip = ips
            .first()
            .copied()
            .ok_or_else(|| Error::resolution(format!("no addresses found for {}", name)))?;

        debug!(host = %name, %ip, candidates = ips.len(), "resolved instance host");
        Ok(ip)
    }
}

/// Extract the host component of an instance endpoint
pub fn parse_endpoint_host(endpoint: &str) -> Result<Host<String>> {
    let url = Url::parse(endpoint)
        .map_err(|e| Error::invalid_endpoint(format!("{}: {}", endpoint, e)))?;

    match url.host() {
        Some(Host::Domain("")) | None => Err(Error::invalid_endpoint(format!(
            "{}: missing host",
            endpoint
        ))),
        Some(host) => Ok(host.to_owned()),
    }
}
