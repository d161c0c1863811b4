//! Recorded EAR traces (JSON lines)
//!
//! One sample per line:
//! `{"timestamp_ms": 1200, "ear": 0.31}`. A `null` or missing `ear` means no
//! face was found on that frame. Blank lines and `#` comments are skipped.

use std::io::BufRead;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use dms::DrowsinessResult;

/// One recorded frame
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TraceSample {
    pub timestamp_ms: u64,
    #[serde(default)]
    pub ear: Option<f64>,
    #[serde(default)]
    pub brightness: Option<f64>,
}

/// One output line: the sample time plus the monitor's verdict
#[derive(Debug, Serialize)]
pub struct ReplayLine<'a> {
    pub timestamp_ms: u64,
    #[serde(flatten)]
    pub result: &'a DrowsinessResult,
}

/// Parse one trace line; `Ok(None)` for blanks and comments
pub fn parse_line(line: &str) -> Result<Option<TraceSample>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let sample = serde_json::from_str(line)?;
    Ok(Some(sample))
}

/// Read every sample, failing on the first malformed line
pub fn read_trace(reader: impl BufRead) -> Result<Vec<TraceSample>> {
    let mut samples = Vec::new();
    for (number, line) in reader.lines().enumerate() {
        let line = line.context("failed to read trace")?;
        if let Some(sample) = parse_line(&line).with_context(|| format!("line {}", number + 1))? {
            samples.push(sample);
        }
    }
    Ok(samples)
}
