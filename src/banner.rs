use crate::probe::connect;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::time::{self, Instant};
use tracing::trace;

/// Request sent to web ports, which usually wait for the client to speak first.
pub const HTTP_TRIGGER: &[u8] = b"HEAD / HTTP/1.0\r\n\r\n";

/// Upper bound on how much we read while looking for the first line.
const MAX_BANNER_BYTES: u64 = 4096;

/// Payload to send right after connecting, if the service on `port` will not greet unprompted.
pub fn trigger_for(port: u16) -> Option<&'static [u8]> {
    match port {
        80 | 443 | 8080 => Some(HTTP_TRIGGER),
        _ => None,
    }
}

/// Open a fresh connection and read the first line the service sends.
///
/// Returns `None` when no line arrives before the deadline or any step fails.
pub async fn collect_banner(host: &str, port: u16, timeout: Duration) -> Option<String> {
    read_first_line(host, port, timeout, trigger_for(port)).await
}

/// Connect, optionally send `trigger`, then read one terminated line before the deadline.
pub(crate) async fn read_first_line(
    host: &str,
    port: u16,
    timeout: Duration,
    trigger: Option<&[u8]>,
) -> Option<String> {
    let stream = connect(host, port, timeout).await.ok()?;
    let deadline = Instant::now() + timeout;
    let (reader, mut writer) = stream.into_split();

    if let Some(payload) = trigger {
        match time::timeout_at(deadline, writer.write_all(payload)).await {
            Ok(Ok(())) => {}
            _ => {
                trace!(host, port, "trigger write failed");
                return None;
            }
        }
    }

    let mut buf = Vec::with_capacity(256);
    let mut reader = BufReader::new(reader.take(MAX_BANNER_BYTES));
    let n = match time::timeout_at(deadline, reader.read_until(b'\n', &mut buf)).await {
        Ok(Ok(n)) => n,
        Ok(Err(e)) => {
            trace!(host, port, error = %e, "banner read failed");
            return None;
        }
        Err(_) => {
            trace!(host, port, "banner read timed out");
            return None;
        }
    };

    // EOF or the byte cap before a terminator counts as no banner.
    if n == 0 || buf.last() != Some(&b'\n') {
        return None;
    }

    let line = String::from_utf8_lossy(&buf).trim().to_string();
    if line.is_empty() {
        None
    } else {
        Some(line)
    }
}
