// # Pi-hole DNS Provider
//
// This crate provides a Pi-hole custom DNS provider for the failover system.
//
// ## Behavior
//
// - One HTTP request per call (delete or add), never retried here
// - Explicit request timeout (10 seconds by default)
// - Specific error messages for HTTP status codes (401/403, 404, 429, 5xx)
// - Dry-run mode logs the intended request instead of sending it
// - "Record does not exist" on delete is reported as `DeleteOutcome::NotFound`
//
// ## Security Requirements
//
// - API key NEVER appears in logs, error messages or `Debug` output
//
// ## API Reference
//
// Pi-hole admin API, custom DNS records:
//
// ```http
// POST /admin/api.php?customdns&action=delete&domain=<name>&ip=<ip>&auth=<key>
// POST /admin/api.php?customdns&action=add&domain=<name>&ip=<ip>&auth=<key>
// ```
//
// Responses are JSON of the form `{"success": bool, "message": string}` when
// the request reached the custom DNS handler.

use async_trait::async_trait;
use failover_core::config::ProviderConfig;
use failover_core::traits::{DeleteOutcome, DnsProvider, DnsProviderFactory};
use failover_core::{Error, Result};
use reqwest::Url;
use serde::Deserialize;
use std::net::IpAddr;
use std::time::Duration;

/// Admin API path on the Pi-hole host
const PIHOLE_API_PATH: &str = "/admin/api.php";

/// Default HTTP timeout for API requests (10 seconds)
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Provider name used in logs and errors
const PROVIDER_NAME: &str = "pihole";

/// Action understood by the custom DNS endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CustomDnsAction {
    Delete,
    Add,
}

impl CustomDnsAction {
    fn as_str(self) -> &'static str {
        match self {
            CustomDnsAction::Delete => "delete",
            CustomDnsAction::Add => "add",
        }
    }
}

/// Body returned by the custom DNS endpoint
#[derive(Debug, Deserialize)]
struct CustomDnsResponse {
    success: bool,
    #[serde(default)]
    message: String,
}

impl CustomDnsResponse {
    fn is_missing_record(&self) -> bool {
        self.message.to_lowercase().contains("does not exist")
    }
}

/// Pi-hole custom DNS provider
///
/// # Dry-Run Mode
///
/// When `dry_run` is true, the provider logs the request it would have sent
/// (with the API key redacted) and reports success without contacting
/// Pi-hole. Deletes report `NotFound` since nothing was removed.
pub struct PiholeProvider {
    /// Pi-hole host, optionally with port
    hostname: String,

    /// Pi-hole API key
    /// ⚠️ NEVER log this value
    api_key: String,

    /// `http://<hostname>/admin/api.php`
    base_url: Url,

    /// HTTP client for API requests
    client: reqwest::Client,

    /// Dry-run mode: log mutations instead of sending them
    dry_run: bool,
}

// Custom Debug implementation that hides the API key
impl std::fmt::Debug for PiholeProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PiholeProvider")
            .field("hostname", &self.hostname)
            .field("api_key", &"<REDACTED>")
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

impl PiholeProvider {
    /// Create a new Pi-hole provider
    ///
    /// # Parameters
    ///
    /// - `hostname`: Pi-hole host, optionally with port (no scheme)
    /// - `api_key`: Pi-hole API key (the `WEBPASSWORD` hash)
    /// - `timeout`: Per-request timeout
    /// - `dry_run`: If true, log mutations without sending them
    pub fn new(
        hostname: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
        dry_run: bool,
    ) -> Result<Self> {
        let hostname = hostname.into();
        let api_key = api_key.into();

        if api_key.is_empty() {
            return Err(Error::config("Pi-hole API key cannot be empty"));
        }

        let base_url = Url::parse(&format!("http://{}{}", hostname, PIHOLE_API_PATH))
            .map_err(|e| Error::config(format!("Invalid Pi-hole hostname {}: {}", hostname, e)))?;

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::http(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            hostname,
            api_key,
            base_url,
            client,
            dry_run,
        })
    }

    /// Create a new Pi-hole provider (live mode, default timeout)
    pub fn new_live(hostname: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        Self::new(hostname, api_key, DEFAULT_HTTP_TIMEOUT, false)
    }

    /// Create a new Pi-hole provider (dry-run mode, default timeout)
    pub fn new_dry_run(hostname: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        Self::new(hostname, api_key, DEFAULT_HTTP_TIMEOUT, true)
    }

    /// Build the request URL for a custom DNS action
    fn action_url(&self, action: CustomDnsAction, record_name: &str, ip: IpAddr) -> Url {
        let mut url = self.base_url.clone();
        url.set_query(Some("customdns"));
        url.query_pairs_mut()
            .append_pair("action", action.as_str())
            .append_pair("domain", record_name)
            .append_pair("ip", &ip.to_string())
            .append_pair("auth", &self.api_key);
        url
    }

    /// Same URL as [`Self::action_url`] with the key masked, for logs
    fn redacted_url(&self, action: CustomDnsAction, record_name: &str, ip: IpAddr) -> String {
        format!(
            "{}?customdns&action={}&domain={}&ip={}&auth=<REDACTED>",
            self.base_url,
            action.as_str(),
            record_name,
            ip
        )
    }

    /// Send one custom DNS request
    ///
    /// # Returns
    ///
    /// - `Ok(Some(body))`: Request accepted and the body was a custom DNS response
    /// - `Ok(None)`: Request accepted, body absent or in another shape
    /// - `Err(Error)`: Transport failure or non-success status
    async fn send(
        &self,
        action: CustomDnsAction,
        record_name: &str,
        ip: IpAddr,
    ) -> Result<Option<CustomDnsResponse>> {
        let response = self
            .client
            .post(self.action_url(action, record_name, ip))
            .send()
            .await
            // without_url keeps the API key out of the message
            .map_err(|e| {
                Error::provider(
                    PROVIDER_NAME,
                    format!("HTTP request failed: {}", e.without_url()),
                )
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());

            return match status.as_u16() {
                401 | 403 => Err(Error::provider(
                    PROVIDER_NAME,
                    format!("Authentication failed: Invalid API key. Status: {}", status),
                )),
                404 => Err(Error::provider(
                    PROVIDER_NAME,
                    format!(
                        "Admin API not found at {}. Is {} a Pi-hole? Status: {}",
                        PIHOLE_API_PATH, self.hostname, status
                    ),
                )),
                429 => Err(Error::provider(
                    PROVIDER_NAME,
                    format!("Rate limit exceeded. Status: {}", status),
                )),
                500..=599 => Err(Error::provider(
                    PROVIDER_NAME,
                    format!("Pi-hole server error (transient): {} - {}", status, error_text),
                )),
                _ => Err(Error::provider(
                    PROVIDER_NAME,
                    format!("Custom DNS {} failed: {} - {}", action.as_str(), status, error_text),
                )),
            };
        }

        let body = response.text().await.unwrap_or_default();
        let parsed = serde_json::from_str::<CustomDnsResponse>(&body).ok();
        if parsed.is_none() {
            tracing::debug!(
                "Pi-hole {} response is not a custom DNS result; judging by status only",
                action.as_str()
            );
        }
        Ok(parsed)
    }
}

#[async_trait]
impl DnsProvider for PiholeProvider {
    async fn delete_record(&self, record_name: &str, ip: IpAddr) -> Result<DeleteOutcome> {
        if self.dry_run {
            tracing::info!(
                "[DRY-RUN] Would send POST {}",
                self.redacted_url(CustomDnsAction::Delete, record_name, ip)
            );
            // Nothing was removed
            return Ok(DeleteOutcome::NotFound);
        }

        tracing::debug!("Deleting Pi-hole custom DNS record: {} -> {}", record_name, ip);

        match self.send(CustomDnsAction::Delete, record_name, ip).await? {
            Some(body) if !body.success && body.is_missing_record() => Ok(DeleteOutcome::NotFound),
            Some(body) if !body.success => Err(Error::provider(
                PROVIDER_NAME,
                format!("Delete rejected: {}", body.message),
            )),
            _ => Ok(DeleteOutcome::Removed),
        }
    }

    async fn add_record(&self, record_name: &str, ip: IpAddr) -> Result<()> {
        if self.dry_run {
            tracing::info!(
                "[DRY-RUN] Would send POST {}",
                self.redacted_url(CustomDnsAction::Add, record_name, ip)
            );
            return Ok(());
        }

        tracing::debug!("Adding Pi-hole custom DNS record: {} -> {}", record_name, ip);

        match self.send(CustomDnsAction::Add, record_name, ip).await? {
            Some(body) if !body.success => Err(Error::provider(
                PROVIDER_NAME,
                format!("Add rejected: {}", body.message),
            )),
            _ => Ok(()),
        }
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER_NAME
    }
}

/// Factory for creating Pi-hole providers
pub struct PiholeFactory;

impl DnsProviderFactory for PiholeFactory {
    fn create(&self, config: &ProviderConfig) -> Result<Box<dyn DnsProvider>> {
        match config {
            ProviderConfig::Pihole {
                hostname,
                api_key,
                timeout_secs,
                dry_run,
            } => {
                config.validate()?;

                if *dry_run {
                    tracing::warn!("Pi-hole provider running in DRY-RUN mode - no changes will be made");
                }

                Ok(Box::new(PiholeProvider::new(
                    hostname.clone(),
                    api_key.clone(),
                    Duration::from_secs(*timeout_secs),
                    *dry_run,
                )?))
            }
            _ => Err(Error::config("Invalid config for Pi-hole provider")),
        }
    }
}

/// Register the Pi-hole provider with a registry
///
/// # Example
///
/// ```rust
/// use failover_core::ProviderRegistry;
///
/// let registry = ProviderRegistry::new();
/// failover_provider_pihole::register(&registry);
/// assert!(registry.has_provider("pihole"));
/// ```
pub fn register(registry: &failover_core::ProviderRegistry) {
    registry.register_provider(PROVIDER_NAME, Box::new(PiholeFactory));
}
