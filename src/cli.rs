//! Command-line interface definitions for portprobe.
//!
//! Uses `clap` derive macros for declarative argument parsing. Flags left
//! unset fall back to [`AppSettings`].

use crate::config::AppSettings;
use crate::error::{ScanError, ScanResult};
use crate::scanner::ScanConfig;
use crate::types::PortSet;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// TCP port scanner. Only scan systems you own or have explicit permission to test.
#[derive(Parser, Debug)]
#[command(name = "portprobe")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "TCP port scanner (permission-only)", long_about = None)]
pub struct Args {
    /// Target hostname or IP address
    #[arg(value_name = "TARGET")]
    pub target: String,

    /// Port range (e.g. 1-1024) or comma list (e.g. 22,80,443) [default: 1-1024]
    #[arg(short, long, env = "PORTPROBE_PORTS")]
    pub ports: Option<String>,

    /// Socket timeout in seconds [default: 0.6]
    #[arg(short, long, allow_negative_numbers = true)]
    pub timeout: Option<f64>,

    /// Maximum number of concurrent probes, 1-2000 [default: 150]
    #[arg(short, long, allow_negative_numbers = true)]
    pub concurrency: Option<i64>,

    /// Output format for results
    #[arg(short, long, value_enum, default_value = "plain")]
    pub output: OutputFormat,

    /// Show scanning progress and debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress live open-port lines and the header
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to a settings file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable plain text
    #[default]
    Plain,
    /// JSON structured output
    Json,
}

impl Args {
    /// Whether verbose output is on, either by flag or by settings.
    pub fn is_verbose(&self, settings: &AppSettings) -> bool {
        self.verbose || settings.verbose
    }

    /// Build a validated scan configuration and port set.
    pub fn scan_plan(&self, settings: &AppSettings) -> ScanResult<(ScanConfig, PortSet)> {
        let spec = self.ports.as_deref().unwrap_or(&settings.default_ports);
        let ports = PortSet::parse(spec)?;

        let concurrency = match self.concurrency {
            Some(value) => usize::try_from(value).map_err(|_| ScanError::InvalidConcurrency {
                value,
                min: ScanConfig::MIN_CONCURRENCY,
                max: ScanConfig::MAX_CONCURRENCY,
            })?,
            None => settings.default_concurrency,
        };

        let config = ScanConfig::new(&self.target)
            .with_timeout_secs(self.timeout.unwrap_or(settings.default_timeout_secs))
            .with_concurrency(concurrency);
        config.validate()?;

        Ok((config, ports))
    }
}
