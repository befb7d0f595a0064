// # failoverd - one-shot DNS failover runner
//
// The failoverd binary is a thin integration layer. It is responsible for:
// 1. Reading configuration from environment variables
// 2. Initializing logging and the runtime
// 3. Registering providers and building the probe and resolver
// 4. Running the failover engine once and mapping the outcome to an exit code
//
// All failover logic lives in failover-core. Scheduling (cron, systemd
// timers, Kubernetes CronJobs) is left to the caller.
//
// ## Configuration
//
// ### Instances
// - `INSTANCE_URLS`: Comma-separated instance endpoints, most preferred first
//
// ### Record
// - `OLLAMA_RECORD`: DNS record to repoint (e.g., ollama.lan)
//
// ### DNS Provider
// - `PIHOLE_HOSTNAME`: Pi-hole host, optionally with port
// - `PIHOLE_API_KEY`: Pi-hole API key
// - `FAILOVER_MODE`: Set to `dry-run` to log provider mutations instead of sending them
//
// ### Timeouts
// - `FAILOVER_PROBE_TIMEOUT_SECS`: Health probe bound (default 5)
// - `FAILOVER_PROVIDER_TIMEOUT_SECS`: Provider request bound (default 10)
// - `FAILOVER_RESOLVE_TIMEOUT_SECS`: Name resolution bound (default 5)
//
// ### Logging
// - `FAILOVER_LOG_LEVEL`: trace, debug, info, warn, error (default info)
//
// ## Example
//
// ```bash
// export INSTANCE_URLS=http://10.0.0.5:11434,http://gpu-box.local:11434
// export OLLAMA_RECORD=ollama.lan
// export PIHOLE_HOSTNAME=pi.hole
// export PIHOLE_API_KEY=your_key
//
// failoverd
// ```

use anyhow::{Context, Result};
use failover_core::config::{FailoverConfig, ProbeConfig, ProviderConfig, ReplacerConfig};
use failover_core::{Error, FailoverEngine, ProviderRegistry, SystemResolver};
use failover_probe_http::HttpHealthProbe;
use std::env;
use std::process::ExitCode;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

/// Exit codes for different termination scenarios
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FailoverExitCode {
    /// Record repointed at a healthy instance
    Success = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Run failed after an instance was selected
    RuntimeError = 2,
    /// No configured instance passed its health check
    NoAvailableInstance = 3,
}

impl From<FailoverExitCode> for ExitCode {
    fn from(code: FailoverExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

impl From<&Error> for FailoverExitCode {
    fn from(err: &Error) -> Self {
        match err {
            Error::NoAvailableInstance => FailoverExitCode::NoAvailableInstance,
            Error::Config(_) => FailoverExitCode::ConfigError,
            _ => FailoverExitCode::RuntimeError,
        }
    }
}

/// Application configuration
struct Config {
    instances: Vec<String>,
    record_name: String,
    pihole_hostname: String,
    pihole_api_key: String,
    dry_run: bool,
    probe_timeout_secs: u64,
    provider_timeout_secs: u64,
    resolve_timeout_secs: u64,
    log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secs = |key: &str, default: u64| -> Result<u64> {
            match lookup(key) {
                Some(value) => value
                    .trim()
                    .parse()
                    .with_context(|| format!("{} must be a whole number of seconds", key)),
                None => Ok(default),
            }
        };

        Ok(Self {
            instances: parse_instances(&lookup("INSTANCE_URLS").unwrap_or_default()),
            record_name: lookup("OLLAMA_RECORD").unwrap_or_default().trim().to_string(),
            pihole_hostname: lookup("PIHOLE_HOSTNAME").unwrap_or_default().trim().to_string(),
            pihole_api_key: lookup("PIHOLE_API_KEY").unwrap_or_default(),
            dry_run: lookup("FAILOVER_MODE")
                .unwrap_or_default()
                .eq_ignore_ascii_case("dry-run"),
            probe_timeout_secs: secs("FAILOVER_PROBE_TIMEOUT_SECS", 5)?,
            provider_timeout_secs: secs("FAILOVER_PROVIDER_TIMEOUT_SECS", 10)?,
            resolve_timeout_secs: secs("FAILOVER_RESOLVE_TIMEOUT_SECS", 5)?,
            log_level: lookup("FAILOVER_LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        })
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        if self.record_name.is_empty() {
            anyhow::bail!(
                "OLLAMA_RECORD is required. \
                Set it via: export OLLAMA_RECORD=ollama.lan"
            );
        }

        if self.pihole_hostname.is_empty() {
            anyhow::bail!(
                "PIHOLE_HOSTNAME is required. \
                Set it via: export PIHOLE_HOSTNAME=pi.hole"
            );
        }

        if self.pihole_api_key.is_empty() {
            anyhow::bail!("PIHOLE_API_KEY is required");
        }

        match self.log_level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!(
                "FAILOVER_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            ),
        }

        self.to_failover_config().validate()?;

        Ok(())
    }

    /// Map onto the core configuration
    fn to_failover_config(&self) -> FailoverConfig {
        let mut config = FailoverConfig::new(
            self.record_name.clone(),
            ProviderConfig::Pihole {
                hostname: self.pihole_hostname.clone(),
                api_key: self.pihole_api_key.clone(),
                timeout_secs: self.provider_timeout_secs,
                dry_run: self.dry_run,
            },
        )
        .with_instances(self.instances.iter().cloned());

        config.probe = ProbeConfig {
            timeout_secs: self.probe_timeout_secs,
        };
        config.replacer = ReplacerConfig {
            resolve_timeout_secs: self.resolve_timeout_secs,
        };
        config
    }

    fn tracing_level(&self) -> Level {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        }
    }
}

/// Split a comma-separated instance list, dropping blank entries
fn parse_instances(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn main() -> ExitCode {
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {:#}", e);
            return FailoverExitCode::ConfigError.into();
        }
    };

    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {:#}", e);
        return FailoverExitCode::ConfigError.into();
    }

    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.tracing_level())
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return FailoverExitCode::ConfigError.into();
    }

    info!(
        instances = config.instances.len(),
        record = %config.record_name,
        dry_run = config.dry_run,
        "Starting failoverd"
    );

    // Probing and provider calls are strictly sequential
    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return FailoverExitCode::RuntimeError.into();
        }
    };

    let code = rt.block_on(run(config));
    info!("Exiting");
    code.into()
}

/// Build the engine and run the pipeline once
async fn run(config: Config) -> FailoverExitCode {
    let failover_config = config.to_failover_config();

    let registry = ProviderRegistry::new();

    #[cfg(feature = "pihole")]
    {
        info!("Registering Pi-hole provider");
        failover_provider_pihole::register(&registry);
    }

    let provider = match registry.create_provider(&failover_config.provider) {
        Ok(provider) => provider,
        Err(e) => {
            error!("Failed to create DNS provider: {}", e);
            return FailoverExitCode::ConfigError;
        }
    };

    let probe = match HttpHealthProbe::from_config(&failover_config.probe) {
        Ok(probe) => probe,
        Err(e) => {
            error!("Failed to create health probe: {}", e);
            return FailoverExitCode::ConfigError;
        }
    };

    let (engine, _events) = match FailoverEngine::new(
        Box::new(probe),
        Box::new(SystemResolver::new()),
        provider,
        failover_config,
    ) {
        Ok(parts) => parts,
        Err(e) => {
            error!("Failed to create failover engine: {}", e);
            return FailoverExitCode::ConfigError;
        }
    };

    match engine.run_once().await {
        Ok(report) => {
            info!(
                url = %report.selected,
                ip = %report.replacement.ip,
                domain = %report.replacement.record_name,
                previous_record = %report.replacement.delete,
                "Failover complete"
            );
            FailoverExitCode::Success
        }
        Err(e) => {
            match &e {
                Error::NoAvailableInstance => error!("no available instances found"),
                Error::CreateRequest(_) => error!(error = %e, "failed to create DNS record"),
                _ => error!(error = %e, "failover run failed"),
            }
            FailoverExitCode::from(&e)
        }
    }
}
