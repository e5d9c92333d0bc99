use crate::banner::collect_banner;
use crate::classify::classify;
use crate::error::{Result, ScanError};
use crate::ports::ScanRange;
use crate::probe::probe_target;
use crate::types::{ScanResult, ScanTarget, UNKNOWN};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, info};

/// Default cap on simultaneously running port pipelines.
pub const DEFAULT_CONCURRENCY: usize = 100;

/// Larger limits are clamped down to this.
pub const MAX_CONCURRENCY: usize = 5_000;

/// Scan every port in `range` on `host` and return the open ones, in no particular order.
///
/// - At most `concurrency` ports are in flight at once. A slot is held for the
///   whole pipeline (probe, banner, classification), so it bounds open sockets.
/// - Every connect and read is bounded by `timeout`.
/// - Individual port failures never abort the scan; only invalid input does.
pub async fn scan(
    host: &str,
    range: ScanRange,
    timeout: Duration,
    concurrency: usize,
) -> Result<Vec<ScanResult>> {
    scan_internal(host, range, timeout, concurrency, None, true).await
}

/// Same as [`scan`] but returns one record per port, closed ones included.
pub async fn scan_all(
    host: &str,
    range: ScanRange,
    timeout: Duration,
    concurrency: usize,
) -> Result<Vec<ScanResult>> {
    scan_internal(host, range, timeout, concurrency, None, false).await
}

/// Variant of [`scan`] that publishes live counters into `progress`.
pub async fn scan_with_progress(
    host: &str,
    range: ScanRange,
    timeout: Duration,
    concurrency: usize,
    progress: ScanProgress,
) -> Result<Vec<ScanResult>> {
    scan_internal(host, range, timeout, concurrency, Some(progress), true).await
}

/// Variant of [`scan_all`] that publishes live counters into `progress`.
pub async fn scan_all_with_progress(
    host: &str,
    range: ScanRange,
    timeout: Duration,
    concurrency: usize,
    progress: ScanProgress,
) -> Result<Vec<ScanResult>> {
    scan_internal(host, range, timeout, concurrency, Some(progress), false).await
}

/// Counters updated by workers while a scan runs. Cheap to clone; clones share state.
#[derive(Clone, Debug, Default)]
pub struct ScanProgress {
    pub scanned_done: Arc<AtomicU64>,
    pub open_count: Arc<AtomicU64>,
    pub in_flight: Arc<AtomicU64>,
    /// Highest `in_flight` value observed so far.
    pub peak_in_flight: Arc<AtomicU64>,
}

impl ScanProgress {
    pub fn new() -> Self {
        Self::default()
    }

    fn enter(&self) {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);
    }

    fn leave(&self, open: bool) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        if open {
            self.open_count.fetch_add(1, Ordering::Relaxed);
        }
        self.scanned_done.fetch_add(1, Ordering::Relaxed);
    }
}

/// Reject anything that would make the scan meaningless before dispatching a task.
pub fn validate_input(host: &str, concurrency: usize) -> Result<()> {
    if host.trim().is_empty() {
        return Err(ScanError::EmptyHost);
    }
    if concurrency == 0 {
        return Err(ScanError::ZeroConcurrency);
    }
    Ok(())
}

async fn scan_internal(
    host: &str,
    range: ScanRange,
    timeout: Duration,
    concurrency: usize,
    progress_opt: Option<ScanProgress>,
    open_only: bool,
) -> Result<Vec<ScanResult>> {
    validate_input(host, concurrency)?;
    let concurrency = concurrency.min(MAX_CONCURRENCY);

    info!(
        host,
        range = %range,
        timeout_ms = timeout.as_millis() as u64,
        concurrency,
        "starting scan"
    );

    let progress = progress_opt.unwrap_or_default();
    let host: Arc<str> = Arc::from(host.trim());
    let sem = Arc::new(Semaphore::new(concurrency));
    let mut set = JoinSet::new();

    for port in range.ports() {
        // Admission gate: wait for a free slot before spawning the next port.
        let permit = sem
            .clone()
            .acquire_owned()
            .await
            .expect("semaphore in scope");
        let target = ScanTarget::new(&*host, port, timeout);
        let progress = progress.clone();

        set.spawn(async move {
            let _permit = permit; // keep permit until the whole pipeline is done
            progress.enter();
            let result = scan_port(&target).await;
            progress.leave(result.open);
            result
        });
    }

    let mut results = Vec::with_capacity(range.len());
    while let Some(joined) = set.join_next().await {
        match joined {
            Ok(result) => results.push(result),
            Err(e) => error!(error = %e, "port task failed"),
        }
    }

    let open = results.iter().filter(|r| r.open).count();
    info!(scanned = results.len(), open, "scan finished");

    if open_only {
        results.retain(|r| r.open);
    }
    Ok(results)
}

/// Run the full per-port pipeline: probe, then banner and classification if open.
pub async fn scan_port(target: &ScanTarget) -> ScanResult {
    let latency = match probe_target(target).await {
        Ok(latency) => latency,
        Err(failure) => {
            debug!(port = target.port, ?failure, "closed");
            return ScanResult::closed(target.port, failure);
        }
    };

    let banner = collect_banner(&target.host, target.port, target.timeout).await;
    let (service, version) = match banner.as_deref() {
        Some(b) => classify(target.port, b),
        None => (UNKNOWN.to_string(), UNKNOWN.to_string()),
    };
    debug!(
        port = target.port,
        latency_ms = latency.as_millis() as u64,
        service = %service,
        version = %version,
        has_banner = banner.is_some(),
        "open"
    );

    ScanResult::open(
        target.port,
        latency,
        banner.unwrap_or_default(),
        service,
        version,
    )
}
