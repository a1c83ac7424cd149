//! Recorded sensor traces.
//!
//! A trace is JSONL: one `{"t": <ns>, "rotation": <deg>, "values": [..]}`
//! object per line. Blank lines and `#` comments are skipped.

use serde::{Deserialize, Serialize};

use crate::sample::{RawSensorSample, ScreenRotation};

/// One recorded sample with the rotation it was taken under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceRecord {
    /// Monotonic nanoseconds since the trace started.
    #[serde(rename = "t")]
    pub timestamp_ns: u64,

    #[serde(default)]
    pub rotation: ScreenRotation,

    pub values: RawSensorSample,
}

/// A trace line that failed to parse.
#[derive(Debug, thiserror::Error)]
#[error("trace line {line}: {source}")]
pub struct TraceError {
    /// 1-based line number in the input.
    pub line: usize,
    #[source]
    pub source: serde_json::Error,
}

impl TraceRecord {
    pub fn new(timestamp_ns: u64, rotation: ScreenRotation, values: RawSensorSample) -> Self {
        Self {
            timestamp_ns,
            rotation,
            values,
        }
    }

    /// Timestamp as fractional seconds since the trace started.
    pub fn timestamp_secs(&self) -> f64 {
        self.timestamp_ns as f64 / 1_000_000_000.0
    }

    /// Serialize as a single JSONL line (no trailing newline).
    pub fn to_line(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Parse a trace from JSONL content.
pub fn parse_trace(jsonl: &str) -> Result<Vec<TraceRecord>, TraceError> {
    jsonl
        .lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .map(|(line, content)| {
            serde_json::from_str(content).map_err(|source| TraceError { line, source })
        })
        .collect()
}
