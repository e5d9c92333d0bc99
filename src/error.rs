use thiserror::Error;

/// Result alias for scan operations.
pub type Result<T> = std::result::Result<T, ScanError>;

/// Input errors that reject a scan before any port is probed.
///
/// Network failures never show up here: an unreachable or silent port is a
/// data value on its `ScanResult`, not an error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScanError {
    #[error("host must not be empty")]
    EmptyHost,

    #[error("port out of range: {0} (expected 1-65535)")]
    InvalidPort(u32),

    #[error("invalid range {start}-{end} (start > end)")]
    InvertedRange { start: u16, end: u16 },

    #[error("invalid port range: {0}")]
    InvalidRange(String),

    #[error("concurrency limit must be at least 1")]
    ZeroConcurrency,
}
