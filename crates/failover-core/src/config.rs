//! Configuration types for the failover system
//!
//! This module defines all configuration structures used throughout the crate.
//! Components receive these values explicitly at construction; nothing reads
//! configuration from global state.

use serde::{Deserialize, Serialize};

/// Main failover configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailoverConfig {
    /// Instance endpoints in priority order (first listed is most preferred)
    #[serde(default)]
    pub instances: Vec<String>,

    /// DNS record name to repoint (e.g., "ollama.lan")
    pub record_name: String,

    /// DNS provider configuration
    pub provider: ProviderConfig,

    /// Health probe settings
    #[serde(default)]
    pub probe: ProbeConfig,

    /// Record replacer settings
    #[serde(default)]
    pub replacer: ReplacerConfig,

    /// Optional engine settings
    #[serde(default)]
    pub engine: EngineConfig,
}

impl FailoverConfig {
    /// Create a new configuration for a record with defaults for everything else
    pub fn new(record_name: impl Into<String>, provider: ProviderConfig) -> Self {
        Self {
            instances: Vec::new(),
            record_name: record_name.into(),
            provider,
            probe: ProbeConfig::default(),
            replacer: ReplacerConfig::default(),
            engine: EngineConfig::default(),
        }
    }

    /// Set the instance endpoints
    pub fn with_instances<I, S>(mut self, instances: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.instances = instances.into_iter().map(Into::into).collect();
        self
    }

    /// Validate the configuration
    ///
    /// An empty instance list is accepted here; it surfaces at run time as
    /// [`crate::Error::NoAvailableInstance`].
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.record_name.trim().is_empty() {
            return Err(crate::Error::config("No record name configured"));
        }

        self.provider.validate()?;
        self.probe.validate()?;
        self.replacer.validate()?;

        if self.engine.event_channel_capacity == 0 {
            return Err(crate::Error::config("Event channel capacity must be > 0"));
        }

        Ok(())
    }
}

/// DNS provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProviderConfig {
    /// Pi-hole custom DNS provider
    Pihole {
        /// Pi-hole host, optionally with port (e.g., "pi.hole" or "10.0.0.2:8080")
        hostname: String,
        /// Pi-hole API key
        api_key: String,
        /// Request timeout in seconds
        #[serde(default = "default_provider_timeout_secs")]
        timeout_secs: u64,
        /// Log intended mutations instead of sending them
        #[serde(default)]
        dry_run: bool,
    },

    /// Custom provider
    Custom {
        /// Factory name to use
        factory: String,
        /// Custom configuration data
        config: serde_json::Value,
    },
}

impl ProviderConfig {
    /// Create a live Pi-hole configuration with the default timeout
    pub fn pihole(hostname: impl Into<String>, api_key: impl Into<String>) -> Self {
        ProviderConfig::Pihole {
            hostname: hostname.into(),
            api_key: api_key.into(),
            timeout_secs: default_provider_timeout_secs(),
            dry_run: false,
        }
    }

    /// Validate the provider configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        match self {
            ProviderConfig::Pihole {
                hostname,
                api_key,
                timeout_secs,
                ..
            } => {
                if hostname.trim().is_empty() {
                    return Err(crate::Error::config("Pi-hole hostname cannot be empty"));
                }
                if hostname.contains('/') {
                    return Err(crate::Error::config(
                        "Pi-hole hostname must be a host or host:port, not a URL",
                    ));
                }
                if api_key.is_empty() {
                    return Err(crate::Error::config("Pi-hole API key cannot be empty"));
                }
                if *timeout_secs == 0 {
                    return Err(crate::Error::config("Provider timeout must be > 0"));
                }
                Ok(())
            }
            ProviderConfig::Custom { factory, config } => {
                if factory.is_empty() {
                    return Err(crate::Error::config(
                        "Custom provider factory cannot be empty",
                    ));
                }
                if config.is_null() {
                    return Err(crate::Error::config(
                        "Custom provider config cannot be null",
                    ));
                }
                Ok(())
            }
        }
    }

    /// Get the provider type name
    pub fn type_name(&self) -> &str {
        match self {
            ProviderConfig::Pihole { .. } => "pihole",
            ProviderConfig::Custom { factory, .. } => factory,
        }
    }
}

/// Health probe configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeConfig {
    /// Upper bound for one reachability request (in seconds)
    #[serde(default = "default_probe_timeout_secs")]
    pub timeout_secs: u64,
}

impl ProbeConfig {
    /// Validate the probe configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.timeout_secs == 0 {
            return Err(crate::Error::config("Probe timeout must be > 0"));
        }
        Ok(())
    }
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_probe_timeout_secs(),
        }
    }
}

/// Record replacer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplacerConfig {
    /// Upper bound for resolving the selected endpoint's host (in seconds)
    #[serde(default = "default_resolve_timeout_secs")]
    pub resolve_timeout_secs: u64,
}

impl ReplacerConfig {
    /// Validate the replacer configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.resolve_timeout_secs == 0 {
            return Err(crate::Error::config("Resolve timeout must be > 0"));
        }
        Ok(())
    }
}

impl Default for ReplacerConfig {
    fn default() -> Self {
        Self {
            resolve_timeout_secs: default_resolve_timeout_secs(),
        }
    }
}

/// Engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Capacity of the internal event channel
    ///
    /// When full, new events are dropped (with a warning log).
    #[serde(default = "default_event_channel_capacity")]
    pub event_channel_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            event_channel_capacity: default_event_channel_capacity(),
        }
    }
}

fn default_probe_timeout_secs() -> u64 {
    5
}

fn default_resolve_timeout_secs() -> u64 {
    5
}

fn default_provider_timeout_secs() -> u64 {
    10
}

fn default_event_channel_capacity() -> usize {
    64
}
