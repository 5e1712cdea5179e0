//! Scanner module - the concurrent scan engine.
//!
//! Every port in a [`PortSet`] gets exactly one probe. Probes run as tokio
//! tasks gated by a semaphore, so at most `concurrency` are in flight while
//! the rest wait for a permit. Results are drained from a `JoinSet` in
//! completion order and only sorted once everything has finished.

pub mod tcp;
pub mod traits;

use crate::error::{ScanError, ScanResult};
use crate::types::{Port, PortSet, ScanTarget};
use serde::{Serialize, Serializer};
use std::fmt;
use std::net::IpAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinSet;
use tracing::{debug, warn};

pub use tcp::TcpConnectProber;
pub use traits::{ProbeResult, Prober, ScanConfig};

/// Lifecycle of a single scan invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanPhase {
    Idle,
    Validating,
    Dispatching,
    AwaitingCompletion,
    /// Reached only through a fatal target error.
    Aborted,
    Aggregating,
    Done,
}

impl fmt::Display for ScanPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Validating => write!(f, "validating"),
            Self::Dispatching => write!(f, "dispatching"),
            Self::AwaitingCompletion => write!(f, "awaiting-completion"),
            Self::Aborted => write!(f, "aborted"),
            Self::Aggregating => write!(f, "aggregating"),
            Self::Done => write!(f, "done"),
        }
    }
}

/// Aggregated result of running probes over a port set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeReport {
    /// Number of probes that produced a result.
    pub probed: usize,
    /// Ports that accepted a connection, ascending.
    pub open_ports: Vec<Port>,
    /// Wall time from first dispatch to last completion.
    pub elapsed: Duration,
}

/// Complete scan results.
#[derive(Debug, Clone, Serialize)]
pub struct ScanOutcome {
    pub target: String,
    pub ip_address: IpAddr,
    pub ports_scanned: usize,
    pub open_ports: Vec<Port>,
    #[serde(rename = "elapsed_secs", serialize_with = "serialize_secs")]
    pub elapsed: Duration,
}

impl ScanOutcome {
    fn new(target: ScanTarget, report: ProbeReport) -> Self {
        Self {
            target: target.original,
            ip_address: target.ip,
            ports_scanned: report.probed,
            open_ports: report.open_ports,
            elapsed: report.elapsed,
        }
    }

    /// Elapsed scan time in fractional seconds.
    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }
}

fn serialize_secs<S: Serializer>(elapsed: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(elapsed.as_secs_f64())
}

/// Scan `ports` on the configured target with TCP connect probes.
pub async fn scan(config: &ScanConfig, ports: &PortSet) -> ScanResult<ScanOutcome> {
    scan_with_events(config, ports, None).await
}

/// Like [`scan`], but every probe result is also sent to `events` as soon as
/// it is known. Events arrive in completion order, not port order. The
/// sender is dropped when the scan ends, closing the channel.
pub async fn scan_with_events(
    config: &ScanConfig,
    ports: &PortSet,
    events: Option<mpsc::UnboundedSender<ProbeResult>>,
) -> ScanResult<ScanOutcome> {
    debug!(
        phase = %ScanPhase::Idle,
        host = %config.target,
        ports = ports.len(),
        "scan requested"
    );
    debug!(phase = %ScanPhase::Validating, "validating scan");
    config.validate()?;

    let target = ScanTarget::resolve(&config.target).await.map_err(|e| {
        warn!(phase = %ScanPhase::Aborted, host = %config.target, "{}", e);
        ScanError::TargetUnresolvable(e)
    })?;
    debug!(host = %target, "target resolved");

    let prober = Arc::new(TcpConnectProber::new(target.ip, config.timeout));
    let report = run_probes(prober, ports, config.concurrency, events).await?;

    Ok(ScanOutcome::new(target, report))
}

/// Run one probe per port with at most `concurrency` in flight.
///
/// The first `Err` returned by the prober aborts the run: no queued probe
/// starts after it, in-flight probes are cancelled, and collected results are
/// discarded.
pub async fn run_probes<P>(
    prober: Arc<P>,
    ports: &PortSet,
    concurrency: usize,
    events: Option<mpsc::UnboundedSender<ProbeResult>>,
) -> ScanResult<ProbeReport>
where
    P: Prober + 'static,
{
    traits::validate_concurrency(concurrency)?;

    let semaphore = Arc::new(Semaphore::new(concurrency));
    let mut tasks = JoinSet::new();

    debug!(
        phase = %ScanPhase::Dispatching,
        host = %prober.target(),
        timeout_ms = prober.timeout().as_millis() as u64,
        ports = ports.len(),
        concurrency,
        "dispatching probes"
    );
    let start = Instant::now();

    for port in ports {
        let semaphore = Arc::clone(&semaphore);
        let prober = Arc::clone(&prober);

        tasks.spawn(async move {
            // A closed semaphore means the scan was aborted.
            let _permit = semaphore.acquire_owned().await.ok()?;
            Some(prober.probe(port).await.map(|open| ProbeResult { port, open }))
        });
    }

    debug!(phase = %ScanPhase::AwaitingCompletion, "waiting for probes");
    let mut open_ports = Vec::new();
    let mut probed = 0usize;

    while let Some(joined) = tasks.join_next().await {
        let outcome = match joined {
            Ok(Some(outcome)) => outcome,
            Ok(None) => continue,
            Err(e) => {
                semaphore.close();
                tasks.abort_all();
                return Err(ScanError::TaskFailed(e.to_string()));
            }
        };

        match outcome {
            Ok(result) => {
                probed += 1;
                if result.open {
                    open_ports.push(result.port);
                }
                if let Some(tx) = &events {
                    // A dropped receiver only means nobody is listening.
                    let _ = tx.send(result);
                }
            }
            Err(e) => {
                warn!(phase = %ScanPhase::Aborted, completed = probed, "aborting scan: {}", e);
                semaphore.close();
                tasks.abort_all();
                return Err(e);
            }
        }
    }

    let elapsed = start.elapsed();

    debug!(phase = %ScanPhase::Aggregating, probed, "aggregating results");
    open_ports.sort_unstable();

    debug!(
        phase = %ScanPhase::Done,
        open = open_ports.len(),
        elapsed_ms = elapsed.as_millis() as u64,
        "scan finished"
    );

    Ok(ProbeReport {
        probed,
        open_ports,
        elapsed,
    })
}
