// # DNS Provider Trait
//
// Defines the interface for mutating custom DNS records via a provider's
// control API.
//
// ## Implementations
//
// - Pi-hole: `failover-provider-pihole` crate
//
// ## Usage
//
// ```rust,ignore
// use failover_core::DnsProvider;
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let provider = /* DnsProvider implementation */;
//     let ip = std::net::IpAddr::from([192, 168, 1, 20]);
//
//     provider.delete_record("ollama.lan", ip).await?;
//     provider.add_record("ollama.lan", ip).await?;
//
//     Ok(())
// }
// ```

use async_trait::async_trait;
use std::fmt;
use std::net::IpAddr;

/// Result of a delete request the provider accepted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// A matching record existed and was removed
    Removed,
    /// The provider reported that no matching record exists
    NotFound,
}

impl fmt::Display for DeleteOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeleteOutcome::Removed => write!(f, "removed"),
            DeleteOutcome::NotFound => write!(f, "not found"),
        }
    }
}

/// Trait for DNS provider implementations
///
/// The provider offers no native update primitive, so a record is replaced
/// by [`crate::RecordReplacer`] as delete followed by add.
///
/// # Constraints
///
/// - One HTTP request per call; no retry or backoff
/// - No state kept between calls
/// - Credentials never appear in logs or error messages
///
/// A missing record must be reported as `Ok(DeleteOutcome::NotFound)`, and
/// only real failures (transport, rejected request) as `Err`.
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// Delete the custom record `record_name` pointing at `ip`
    async fn delete_record(
        &self,
        record_name: &str,
        ip: IpAddr,
    ) -> Result<DeleteOutcome, crate::Error>;

    /// Create the custom record `record_name` pointing at `ip`
    async fn add_record(&self, record_name: &str, ip: IpAddr) -> Result<(), crate::Error>;

    /// Get the provider name (for logging/debugging)
    fn provider_name(&self) -> &'static str;
}

/// Helper trait for constructing DNS providers from configuration
pub trait DnsProviderFactory: Send + Sync {
    /// Create a DnsProvider instance from configuration
    fn create(
        &self,
        config: &crate::config::ProviderConfig,
    ) -> Result<Box<dyn DnsProvider>, crate::Error>;
}
