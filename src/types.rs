use serde::{Deserialize, Serialize};
use std::io;
use std::time::Duration;

/// Sentinel used for service and version when nothing could be identified.
pub const UNKNOWN: &str = "Unknown";

/// One probe's input: where to connect and how long to wait.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanTarget {
    pub host: String,
    pub port: u16,
    pub timeout: Duration,
}

impl ScanTarget {
    pub fn new(host: impl Into<String>, port: u16, timeout: Duration) -> Self {
        Self {
            host: host.into(),
            port,
            timeout,
        }
    }
}

/// Why a connect attempt did not produce an open socket.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ProbeFailure {
    Timeout,
    Refused,
    Reset,
    /// DNS failure, no route, host down, or anything else the OS reports.
    Unreachable,
}

impl ProbeFailure {
    pub fn from_io(err: &io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => ProbeFailure::Timeout,
            io::ErrorKind::ConnectionRefused => ProbeFailure::Refused,
            io::ErrorKind::ConnectionReset | io::ErrorKind::ConnectionAborted => {
                ProbeFailure::Reset
            }
            _ => ProbeFailure::Unreachable,
        }
    }
}

/// Outcome of scanning a single port.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ScanResult {
    pub port: u16,
    pub open: bool,
    pub service: String,
    pub version: String,
    pub banner: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<ProbeFailure>,
}

impl ScanResult {
    /// A closed port carries defaults only.
    pub fn closed(port: u16, failure: ProbeFailure) -> Self {
        Self {
            port,
            open: false,
            service: UNKNOWN.to_string(),
            version: UNKNOWN.to_string(),
            banner: String::new(),
            latency_ms: None,
            failure: Some(failure),
        }
    }

    pub fn open(
        port: u16,
        latency: Duration,
        banner: String,
        service: String,
        version: String,
    ) -> Self {
        Self {
            port,
            open: true,
            service,
            version,
            banner,
            latency_ms: Some(latency.as_millis() as u64),
            failure: None,
        }
    }
}

/// Summary of a whole scan, as written to the JSON output.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ScanReport {
    pub host: String,
    pub start_port: u16,
    pub end_port: u16,
    pub timeout_ms: u64,
    pub concurrency: usize,
    pub started_at: String,
    pub elapsed_ms: u64,
    pub scanned_total: u64,
    pub open_count: u64,
    pub results: Vec<ScanResult>,
}
