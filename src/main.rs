use std::path::PathBuf;
use std::sync::atomic::Ordering;
use std::time::Instant;

use port_scan_rs::config::{ScanConfig, DEFAULT_HOST, DEFAULT_TIMEOUT_MS};
use port_scan_rs::scanner::{self, ScanProgress, DEFAULT_CONCURRENCY};
use port_scan_rs::types::ScanReport;
use port_scan_rs::{logging, report, ScanRange};

use ::time::{format_description::well_known, OffsetDateTime};
use anyhow::{Context, Result};
use clap::Parser;
use tracing::warn;

/// port-scan-rs — concurrent TCP port scanner with banner-based service detection.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "port-scan-rs",
    version,
    about = "Concurrent TCP port scanner with banner-based service and version detection.",
    long_about = None
)]
struct Cli {
    /// Hostname or IP literal to scan.
    #[arg(default_value = DEFAULT_HOST)]
    host: String,

    /// Inclusive port range (e.g., 1-1024) or a single port.
    #[arg(long, default_value = "1-1024")]
    ports: ScanRange,

    /// Max port pipelines (and therefore sockets) in flight at once.
    #[arg(long, default_value_t = DEFAULT_CONCURRENCY)]
    concurrency: usize,

    /// Connect and banner read timeout in milliseconds.
    #[arg(long = "timeout-ms", default_value_t = DEFAULT_TIMEOUT_MS)]
    timeout_ms: u64,

    /// Also list closed ports.
    #[arg(long = "show-closed", default_value_t = false)]
    show_closed: bool,

    /// Write the scan report as pretty JSON to this path (optional).
    #[arg(long)]
    output: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn config(&self) -> ScanConfig {
        ScanConfig {
            host: self.host.clone(),
            range: self.ports,
            timeout_ms: self.timeout_ms,
            concurrency: self.concurrency,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose)?;

    let config = cli.config();
    config.validate().context("invalid scan configuration")?;

    println!(
        "Scanning {} ports {} (timeout {} ms, concurrency {})",
        config.host, config.range, config.timeout_ms, config.concurrency
    );

    let started_at = OffsetDateTime::now_utc()
        .format(&well_known::Rfc3339)
        .unwrap_or_else(|_| String::from("1970-01-01T00:00:00Z"));
    let start = Instant::now();
    let progress = ScanProgress::new();

    let results = if cli.show_closed {
        scanner::scan_all_with_progress(
            &config.host,
            config.range,
            config.timeout(),
            config.concurrency,
            progress.clone(),
        )
        .await?
    } else {
        scanner::scan_with_progress(
            &config.host,
            config.range,
            config.timeout(),
            config.concurrency,
            progress.clone(),
        )
        .await?
    };
    let elapsed = start.elapsed();

    let open_count = progress.open_count.load(Ordering::Relaxed);
    let scanned_total = progress.scanned_done.load(Ordering::Relaxed);

    println!("\nScan completed in {:.2?}", elapsed);
    println!("Found {} open ports (scanned: {})\n", open_count, scanned_total);
    if !results.is_empty() {
        print!("{}", report::render_table(&results));
    }

    if let Some(path) = cli.output.as_deref() {
        let summary = ScanReport {
            host: config.host.clone(),
            start_port: config.range.start(),
            end_port: config.range.end(),
            timeout_ms: config.timeout_ms,
            concurrency: config.concurrency,
            started_at,
            elapsed_ms: elapsed.as_millis() as u64,
            scanned_total,
            open_count,
            results,
        };
        match report::write_report_json(path, &summary) {
            Ok(()) => println!("Wrote JSON report to {}", path.display()),
            Err(e) => warn!(error = %e, "failed to write JSON report"),
        }
    }

    Ok(())
}
