// # Address Resolver Trait
//
// Defines the interface for turning a host name into IP addresses.
//
// ## Implementations
//
// - `SystemResolver`: the operating system resolver via `tokio::net::lookup_host`
// - Test doubles in `tests/common`

use async_trait::async_trait;
use std::net::IpAddr;

/// Trait for host name resolution
///
/// Implementations return every address the lookup produced, in the order
/// the underlying resolver returned them. Callers pick the first one.
#[async_trait]
pub trait AddressResolver: Send + Sync {
    /// Resolve a host name
    ///
    /// # Returns
    ///
    /// - `Ok(Vec<IpAddr>)`: All addresses, possibly empty
    /// - `Err(Error)`: If the lookup itself failed
    async fn lookup(&self, host: &str) -> Result<Vec<IpAddr>, crate::Error>;
}

/// Resolver backed by the system's `getaddrinfo`
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemResolver;

impl SystemResolver {
    /// Create a new system resolver
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl AddressResolver for SystemResolver {
    async fn lookup(&self, host: &str) -> Result<Vec<IpAddr>, crate::Error> {
        let addrs = tokio::net::lookup_host((host, 0))
            .await
            .map_err(|e| crate::Error::resolution(format!("{}: {}", host, e)))?;

        let mut ips: Vec<IpAddr> = Vec::new();
        for addr in addrs {
            // getaddrinfo repeats addresses once per socket type
            if !ips.contains(&addr.ip()) {
                ips.push(addr.ip());
            }
        }
        Ok(ips)
    }
}
