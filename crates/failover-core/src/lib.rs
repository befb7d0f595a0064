// # failover-core
//
// Core library for DNS-based instance failover.
//
// ## Architecture Overview
//
// This library provides the decision and mutation pipeline:
// - **HealthProbe**: Trait for a single bounded reachability check
// - **AddressResolver**: Trait for turning an endpoint host into IP addresses
// - **DnsProvider**: Trait for deleting and creating custom DNS records
// - **AvailabilityProber**: First-success selection over a priority-ordered list
// - **RecordReplacer**: Resolve, delete, then create a single record
// - **FailoverEngine**: Runs both stages once and reports the outcome
// - **ProviderRegistry**: Plugin-based registry for DNS providers
//
// ## Design Principles
//
// 1. **Sequential**: One probe at a time, delete strictly before create
// 2. **Single attempt**: No retries at any layer; a re-run is the retry
// 3. **Explicit configuration**: Components receive their settings at construction
// 4. **Bounded I/O**: Every outbound call has a timeout
// 5. **Library-First**: All core functionality can be used as a library

pub mod traits;
pub mod prober;
pub mod replacer;
pub mod engine;
pub mod registry;
pub mod config;
pub mod error;

// Re-export core types for convenience
pub use traits::{
    AddressResolver, DeleteOutcome, DnsProvider, DnsProviderFactory, HealthOutcome, HealthProbe,
    SystemResolver,
};
pub use prober::AvailabilityProber;
pub use replacer::{DeleteStatus, RecordReplacer, ReplaceReport};
pub use engine::{EngineEvent, FailoverEngine, RunReport};
pub use registry::ProviderRegistry;
pub use config::{EngineConfig, FailoverConfig, ProbeConfig, ProviderConfig, ReplacerConfig};
pub use error::{Error, Result};
