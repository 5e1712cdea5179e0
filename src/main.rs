use anyhow::Result;
use clap::Parser;
use portprobe::cli::{Args, OutputFormat};
use portprobe::config::AppSettings;
use portprobe::{output, scanner, ProbeResult};
use std::process::ExitCode;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::print_error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<()> {
    let settings = match &args.config {
        Some(path) => AppSettings::load_from(path)?,
        None => AppSettings::load()?,
    };
    let verbose = args.is_verbose(&settings);
    init_tracing(verbose);

    let (config, ports) = args.scan_plan(&settings)?;
    let plain = args.output == OutputFormat::Plain;
    let live = plain && !args.quiet;

    if live {
        output::print_scan_header(&config, &ports);
    }

    let progress = (verbose && plain).then(|| output::progress_bar(ports.len()));
    let (tx, rx) = mpsc::unbounded_channel::<ProbeResult>();
    let reporter = output::spawn_reporter(rx, progress.clone(), live);

    let outcome = scanner::scan_with_events(&config, &ports, Some(tx)).await;
    // The sender is gone once the scan returns, so the reporter drains and exits.
    reporter.await?;

    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    output::print_results(&outcome?, args.output)?;
    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "portprobe=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
