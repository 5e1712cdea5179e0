//! Output formatting module.
//!
//! Renders the scan header, live open-port lines, a progress bar in verbose
//! mode, and the final report as plain text or JSON.

use crate::cli::OutputFormat;
use crate::scanner::{ProbeResult, ScanConfig, ScanOutcome};
use crate::types::PortSet;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Format and print scan results according to the specified format.
pub fn print_results(outcome: &ScanOutcome, format: OutputFormat) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match format {
        OutputFormat::Plain => write_plain(&mut out, outcome),
        OutputFormat::Json => write_json(&mut out, outcome),
    }
}

/// Write the final report in human-readable plain text format.
pub fn write_plain<W: Write>(out: &mut W, outcome: &ScanOutcome) -> io::Result<()> {
    writeln!(out)?;
    if outcome.open_ports.is_empty() {
        writeln!(out, "{}", style("No open ports found.").dim())?;
    } else {
        let ports: Vec<String> = outcome.open_ports.iter().map(|p| p.to_string()).collect();
        writeln!(
            out,
            "{} {}",
            style("Open ports:").bold(),
            style(ports.join(", ")).green().bold()
        )?;
    }
    writeln!(
        out,
        "Scan completed in {:.2}s ({} ports probed on {})",
        outcome.elapsed_secs(),
        outcome.ports_scanned,
        outcome.ip_address
    )?;
    Ok(())
}

/// Write the final report as pretty-printed JSON.
pub fn write_json<W: Write>(out: &mut W, outcome: &ScanOutcome) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, outcome).map_err(io::Error::other)?;
    writeln!(out)
}

/// Print the scan header before scanning begins.
pub fn print_scan_header(config: &ScanConfig, ports: &PortSet) {
    println!(
        "{}",
        style("Only scan systems you own or have explicit permission to test.").yellow()
    );
    println!("Target:  {}", style(&config.target).white().bold());
    println!(
        "Ports:   {} ({} to {}, {} total)",
        summarize(ports),
        ports.first(),
        ports.last(),
        ports.len()
    );
    println!("Timeout: {}s", config.timeout.as_secs_f64());
    println!();
}

/// Print a live line for a port found open.
pub fn print_open(result: &ProbeResult) {
    println!("[+] {} open", style(result.port).green().bold());
}

/// Create a progress bar sized to the port set.
pub fn progress_bar(total: usize) -> ProgressBar {
    let pb = ProgressBar::new(total as u64);
    if let Ok(bar_style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
    {
        pb.set_style(bar_style.progress_chars("=>-"));
    }
    pb
}

/// Drain live probe results until the sender side is dropped.
///
/// Each result advances the progress bar if there is one. Open ports are
/// printed above the bar, or as plain lines when `live` is set. The task
/// resolves to the number of open results seen.
pub fn spawn_reporter(
    mut events: mpsc::UnboundedReceiver<ProbeResult>,
    progress: Option<ProgressBar>,
    live: bool,
) -> JoinHandle<usize> {
    tokio::spawn(async move {
        let mut open = 0;
        while let Some(result) = events.recv().await {
            if result.open {
                open += 1;
            }
            if let Some(pb) = &progress {
                pb.inc(1);
                if result.open {
                    pb.println(format!("[+] {} open", result.port));
                }
            } else if live && result.open {
                print_open(&result);
            }
        }
        open
    })
}

/// Print an error message.
pub fn print_error(msg: &str) {
    eprintln!("{} {}", style("Error:").red().bold(), msg);
}

fn summarize(ports: &PortSet) -> String {
    const SHOWN: usize = 8;
    if ports.len() <= SHOWN {
        ports.to_string()
    } else {
        let head: Vec<String> = ports.iter().take(SHOWN).map(|p| p.to_string()).collect();
        format!("{},...", head.join(","))
    }
}
