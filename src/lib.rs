//! # portprobe - A bounded-concurrency TCP port scanner
//!
//! portprobe checks which TCP ports on a host accept connections. Only scan
//! systems you own or have explicit permission to test.
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use portprobe::scanner::{scan, ScanConfig};
//! use portprobe::types::PortSet;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), portprobe::ScanError> {
//!     let ports: PortSet = "22,80,443".parse()?;
//!     let config = ScanConfig::new("127.0.0.1")
//!         .with_timeout(Duration::from_millis(500))
//!         .with_concurrency(100);
//!
//!     let outcome = scan(&config, &ports).await?;
//!     println!("open: {:?} in {:.2}s", outcome.open_ports, outcome.elapsed_secs());
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`types`] - `Port`, `PortSet` parsing, and target resolution
//! - [`scanner`] - The concurrent scan engine and the `Prober` trait
//! - [`config`] - Settings file with defaults
//! - [`cli`] - Command-line arguments
//! - [`output`] - Plain and JSON reports
//! - [`error`] - Error types

pub mod cli;
pub mod config;
pub mod error;
pub mod output;
pub mod scanner;
pub mod types;

// Re-export commonly used types
pub use error::ScanError;
pub use scanner::{scan, ProbeResult, Prober, ScanConfig, ScanOutcome};
pub use types::{Port, PortError, PortSet, ScanTarget};
