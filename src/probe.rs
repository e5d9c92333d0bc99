use crate::types::{ProbeFailure, ScanTarget};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::{self, Instant};

/// Attempt one TCP connect and report whether the port accepted it.
///
/// Every failure (refusal, timeout, unreachable route, DNS) is reported as closed.
pub async fn probe(host: &str, port: u16, timeout: Duration) -> bool {
    probe_target(&ScanTarget::new(host, port, timeout))
        .await
        .is_ok()
}

/// Like [`probe`] but keeps the connect latency and the failure kind.
///
/// The socket is closed as soon as the connect completes; no data is exchanged.
pub async fn probe_target(target: &ScanTarget) -> Result<Duration, ProbeFailure> {
    let start = Instant::now();
    let stream = connect(&target.host, target.port, target.timeout).await?;
    let latency = start.elapsed();
    drop(stream);
    Ok(latency)
}

/// Connect with `timeout` bounding the whole attempt, name resolution included.
pub(crate) async fn connect(
    host: &str,
    port: u16,
    timeout: Duration,
) -> Result<TcpStream, ProbeFailure> {
    match time::timeout(timeout, TcpStream::connect((host, port))).await {
        Ok(Ok(stream)) => Ok(stream),
        Ok(Err(e)) => Err(ProbeFailure::from_io(&e)),
        Err(_elapsed) => Err(ProbeFailure::Timeout),
    }
}
