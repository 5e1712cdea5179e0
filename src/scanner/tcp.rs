//! TCP connect prober.
//!
//! Performs a full TCP handshake through the operating system's socket API.
//! No elevated privileges are needed.

use crate::error::ScanError;
use crate::scanner::traits::Prober;
use crate::types::Port;
use async_trait::async_trait;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::trace;

/// Probes ports on a single, already-resolved address.
pub struct TcpConnectProber {
    target: IpAddr,
    timeout: Duration,
}

impl TcpConnectProber {
    /// Create a new TCP connect prober.
    ///
    /// # Arguments
    /// * `target` - Target IP address to probe
    /// * `timeout` - Connection timeout per port
    pub fn new(target: IpAddr, timeout: Duration) -> Self {
        Self { target, timeout }
    }
}

#[async_trait]
impl Prober for TcpConnectProber {
    async fn probe(&self, port: Port) -> Result<bool, ScanError> {
        let addr = SocketAddr::new(self.target, port.as_u16());

        match timeout(self.timeout, TcpStream::connect(addr)).await {
            Ok(Ok(stream)) => {
                drop(stream);
                Ok(true)
            }
            Ok(Err(e)) => {
                trace!(%addr, kind = ?e.kind(), "connect failed: {}", e);
                Ok(false)
            }
            Err(_) => {
                trace!(%addr, "connect timed out");
                Ok(false)
            }
        }
    }

    fn target(&self) -> IpAddr {
        self.target
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;
    use tokio::net::TcpListener;

    #[test]
    fn test_prober_creation() {
        let prober = TcpConnectProber::new(IpAddr::V4(Ipv4Addr::LOCALHOST), Duration::from_secs(1));
        assert_eq!(prober.target(), IpAddr::V4(Ipv4Addr::LOCALHOST));
        assert_eq!(prober.timeout(), Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_probe_open_port() {
        let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).await.unwrap();
        let port = Port::new(listener.local_addr().unwrap().port()).unwrap();

        let prober = TcpConnectProber::new(IpAddr::V4(Ipv4Addr::LOCALHOST), Duration::from_secs(1));
        assert!(prober.probe(port).await.unwrap());
    }

    #[tokio::test]
    async fn test_probe_closed_port_is_not_an_error() {
        // Bind then drop to get a port that is very likely free.
        let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).await.unwrap();
        let port = Port::new(listener.local_addr().unwrap().port()).unwrap();
        drop(listener);

        let prober =
            TcpConnectProber::new(IpAddr::V4(Ipv4Addr::LOCALHOST), Duration::from_millis(200));
        assert!(!prober.probe(port).await.unwrap());
    }
}
