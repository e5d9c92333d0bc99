//! Library crate for port-scan-rs: concurrent TCP port scanning with banner-based service detection.
pub mod banner;
pub mod classify;
pub mod config;
pub mod error;
pub mod logging;
pub mod ports;
pub mod probe;
pub mod report;
pub mod scanner;
pub mod types;

pub use error::ScanError;
pub use ports::ScanRange;
pub use scanner::{scan, scan_all};
pub use types::{ScanResult, ScanTarget};
