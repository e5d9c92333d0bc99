use crate::error::{Result, ScanError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

/// Inclusive TCP port interval `[start, end]`, always non-empty and within 1..=65535.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(try_from = "RawRange")]
pub struct ScanRange {
    start: u16,
    end: u16,
}

#[derive(Deserialize)]
struct RawRange {
    start: u16,
    end: u16,
}

impl TryFrom<RawRange> for ScanRange {
    type Error = ScanError;

    fn try_from(raw: RawRange) -> Result<Self> {
        ScanRange::new(raw.start, raw.end)
    }
}

impl ScanRange {
    pub fn new(start: u16, end: u16) -> Result<Self> {
        if start == 0 {
            return Err(ScanError::InvalidPort(0));
        }
        if start > end {
            return Err(ScanError::InvertedRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn single(port: u16) -> Result<Self> {
        Self::new(port, port)
    }

    pub fn start(&self) -> u16 {
        self.start
    }

    pub fn end(&self) -> u16 {
        self.end
    }

    /// Number of ports in the range; never zero.
    pub fn len(&self) -> usize {
        usize::from(self.end - self.start) + 1
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn ports(&self) -> RangeInclusive<u16> {
        self.start..=self.end
    }
}

impl Default for ScanRange {
    fn default() -> Self {
        Self {
            start: 1,
            end: 1024,
        }
    }
}

impl fmt::Display for ScanRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

/// Parses `"80"` or `"1-1024"`; surrounding whitespace is ignored.
impl FromStr for ScanRange {
    type Err = ScanError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ScanError::InvalidRange("empty".into()));
        }
        match s.split_once('-') {
            Some((a, b)) => ScanRange::new(parse_port_str(a.trim())?, parse_port_str(b.trim())?),
            None => ScanRange::single(parse_port_str(s)?),
        }
    }
}

fn parse_port_str(s: &str) -> Result<u16> {
    let val: u32 = s
        .parse::<u32>()
        .map_err(|e| ScanError::InvalidRange(format!("{s:?}: {e}")))?;
    if val == 0 || val > 65535 {
        return Err(ScanError::InvalidPort(val));
    }
    Ok(val as u16)
}
