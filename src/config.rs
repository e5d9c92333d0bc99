use crate::error::Result;
use crate::ports::ScanRange;
use crate::scanner::{validate_input, DEFAULT_CONCURRENCY};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_TIMEOUT_MS: u64 = 800;

/// Everything a caller needs to decide before starting a scan.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ScanConfig {
    pub host: String,
    pub range: ScanRange,
    pub timeout_ms: u64,
    pub concurrency: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            range: ScanRange::default(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

impl ScanConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn validate(&self) -> Result<()> {
        validate_input(&self.host, self.concurrency)
    }
}
