//! Core traits for the failover system
//!
//! This module defines the abstract interfaces that all implementations must follow.
//!
//! - [`HealthProbe`]: Check whether an instance endpoint is reachable
//! - [`AddressResolver`]: Resolve an endpoint host to IP addresses
//! - [`DnsProvider`]: Delete and create custom DNS records via provider APIs

pub mod health_probe;
pub mod address_resolver;
pub mod dns_provider;

pub use health_probe::{HealthProbe, HealthOutcome};
pub use address_resolver::{AddressResolver, SystemResolver};
pub use dns_provider::{DnsProvider, DeleteOutcome, DnsProviderFactory};
