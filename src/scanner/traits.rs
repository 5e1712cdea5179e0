//! Prober trait abstraction.
//!
//! The engine only knows how to schedule probes; what a probe does is behind
//! this trait, which keeps the scheduling logic testable without a network.

use crate::error::ScanError;
use crate::types::Port;
use async_trait::async_trait;
use serde::Serialize;
use std::fmt;
use std::net::IpAddr;
use std::time::Duration;

/// Outcome of probing a single port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProbeResult {
    pub port: Port,
    pub open: bool,
}

impl fmt::Display for ProbeResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = if self.open { "open" } else { "closed" };
        write!(f, "{}/tcp {}", self.port, state)
    }
}

/// Configuration for a scan operation.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Target hostname or IP address, as given by the caller.
    pub target: String,
    /// Per-probe connect timeout.
    pub timeout: Duration,
    /// Maximum number of probes in flight at once.
    pub concurrency: usize,
}

impl ScanConfig {
    /// Default per-probe timeout (0.6 s).
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(600);
    /// Default worker pool size.
    pub const DEFAULT_CONCURRENCY: usize = 150;
    /// Smallest accepted worker pool size.
    pub const MIN_CONCURRENCY: usize = 1;
    /// Largest accepted worker pool size.
    pub const MAX_CONCURRENCY: usize = 2000;

    /// Create a new scan configuration with default timeout and concurrency.
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            timeout: Self::DEFAULT_TIMEOUT,
            concurrency: Self::DEFAULT_CONCURRENCY,
        }
    }

    /// Set the timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the timeout from fractional seconds. Non-finite or negative values
    /// become zero and are rejected by [`ScanConfig::validate`].
    pub fn with_timeout_secs(mut self, secs: f64) -> Self {
        self.timeout = Duration::try_from_secs_f64(secs).unwrap_or(Duration::ZERO);
        self
    }

    /// Set the concurrency limit.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Check the bounds on concurrency and timeout.
    pub fn validate(&self) -> Result<(), ScanError> {
        validate_concurrency(self.concurrency)?;
        if self.timeout.is_zero() {
            return Err(ScanError::InvalidTimeout);
        }
        Ok(())
    }
}

pub(crate) fn validate_concurrency(concurrency: usize) -> Result<(), ScanError> {
    if (ScanConfig::MIN_CONCURRENCY..=ScanConfig::MAX_CONCURRENCY).contains(&concurrency) {
        Ok(())
    } else {
        Err(ScanError::InvalidConcurrency {
            value: i64::try_from(concurrency).unwrap_or(i64::MAX),
            min: ScanConfig::MIN_CONCURRENCY,
            max: ScanConfig::MAX_CONCURRENCY,
        })
    }
}

/// Trait for single-port probe implementations.
///
/// Implementations must absorb per-port transport failures (refused, timed
/// out, reset, unreachable) into `Ok(false)`. An `Err` is reserved for
/// target-level failures that make every further probe pointless, and aborts
/// the whole scan.
#[async_trait]
pub trait Prober: Send + Sync {
    /// Probe one port. `Ok(true)` means the port accepted a connection.
    async fn probe(&self, port: Port) -> Result<bool, ScanError>;

    /// Get the target IP address.
    fn target(&self) -> IpAddr;

    /// Get the configured timeout.
    fn timeout(&self) -> Duration;
}
