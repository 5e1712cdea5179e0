//! Scan target resolution.
//!
//! A target is either an IP literal (IPv4 or IPv6) or a hostname that is
//! resolved through DNS. Only the first resolved address is scanned.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;
use tokio::net::lookup_host;
use tracing::debug;
use trust_dns_resolver::TokioAsyncResolver;

/// A scan target that has been resolved to an IP address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScanTarget {
    /// The original input (hostname or IP string).
    pub original: String,
    /// The resolved IP address.
    pub ip: IpAddr,
}

impl ScanTarget {
    pub fn new(original: impl Into<String>, ip: IpAddr) -> Self {
        Self {
            original: original.into(),
            ip,
        }
    }

    /// Resolve a hostname or IP address string.
    ///
    /// IP literals never touch the resolver. Hostnames are looked up with the
    /// system resolver configuration (`/etc/resolv.conf` nameservers and
    /// search domains, hosts file first).
    pub async fn resolve(target: &str) -> Result<Self, TargetError> {
        let target = target.trim();
        if target.is_empty() {
            return Err(TargetError::Empty);
        }

        if let Ok(ip) = target.parse::<IpAddr>() {
            return Ok(Self::new(target, ip));
        }

        // Bracketed IPv6 literals, as typed in URLs.
        if let Some(inner) = target.strip_prefix('[').and_then(|t| t.strip_suffix(']')) {
            if let Ok(ip) = inner.parse::<IpAddr>() {
                return Ok(Self::new(target, ip));
            }
        }

        let resolver = match TokioAsyncResolver::tokio_from_system_conf() {
            Ok(resolver) => resolver,
            Err(e) => {
                debug!(
                    host = %target,
                    "system resolver config unavailable ({}), using getaddrinfo",
                    e
                );
                return Self::resolve_with_os(target).await;
            }
        };

        let response = resolver
            .lookup_ip(target)
            .await
            .map_err(|e| TargetError::ResolutionFailed(target.to_string(), e.to_string()))?;

        response
            .iter()
            .next()
            .map(|ip| Self::new(target, ip))
            .ok_or_else(|| TargetError::NoAddressesFound(target.to_string()))
    }

    /// Resolve through the operating system's `getaddrinfo`.
    async fn resolve_with_os(target: &str) -> Result<Self, TargetError> {
        let mut addrs = lookup_host((target, 0))
            .await
            .map_err(|e| TargetError::ResolutionFailed(target.to_string(), e.to_string()))?;

        addrs
            .next()
            .map(|addr| Self::new(target, addr.ip()))
            .ok_or_else(|| TargetError::NoAddressesFound(target.to_string()))
    }
}

impl fmt::Display for ScanTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.original == self.ip.to_string() {
            write!(f, "{}", self.ip)
        } else {
            write!(f, "{} ({})", self.original, self.ip)
        }
    }
}

/// Error type for target resolution.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TargetError {
    #[error("empty target")]
    Empty,
    #[error("failed to resolve hostname '{0}': {1}")]
    ResolutionFailed(String, String),
    #[error("no IP addresses found for hostname '{0}'")]
    NoAddressesFound(String),
}
