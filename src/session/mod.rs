pub mod codec;
pub mod storage;

use serde::Serialize;
use std::collections::BTreeMap;
use strum::{Display, EnumIter, IntoEnumIterator};

pub const SESSION_VERSION: u32 = 1;
pub const DEFAULT_INTERVAL_MS: u64 = 500;

/// One `(timestamp, value)` observation of a metric. Timestamps are wall-clock
/// milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Sample {
    pub timestamp: i64,
    pub value: f64,
}

impl Sample {
    pub fn new(timestamp: i64, value: f64) -> Self {
        Self { timestamp, value }
    }
}

/// User annotation pinned to a point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Mark {
    pub timestamp: i64,
    pub label: String,
}

impl Mark {
    pub fn new(timestamp: i64, label: impl Into<String>) -> Self {
        Self {
            timestamp,
            label: label.into(),
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, EnumIter, Display,
)]
pub enum SeriesKind {
    #[serde(rename = "wasmMemoryBytes")]
    #[strum(to_string = "Memory")]
    MemoryBytes,
    #[serde(rename = "jsHeapUsedBytes")]
    #[strum(to_string = "Heap")]
    HeapBytes,
    #[serde(rename = "longTaskMs")]
    #[strum(to_string = "Long tasks")]
    LongTaskMs,
    #[serde(rename = "fpsEstimate")]
    #[strum(to_string = "FPS")]
    FpsEstimate,
}

impl SeriesKind {
    /// Key used for this series in the session text format.
    pub fn key(&self) -> &'static str {
        match self {
            SeriesKind::MemoryBytes => "wasmMemoryBytes",
            SeriesKind::HeapBytes => "jsHeapUsedBytes",
            SeriesKind::LongTaskMs => "longTaskMs",
            SeriesKind::FpsEstimate => "fpsEstimate",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            SeriesKind::MemoryBytes | SeriesKind::HeapBytes => "bytes",
            SeriesKind::LongTaskMs => "ms",
            SeriesKind::FpsEstimate => "fps",
        }
    }

    pub fn all() -> Vec<SeriesKind> {
        SeriesKind::iter().collect()
    }
}

/// A detached capture of every series plus marks and metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub version: u32,
    pub started_at: i64,
    pub interval_ms: u64,
    pub series: BTreeMap<SeriesKind, Vec<Sample>>,
    pub marks: Vec<Mark>,
}

impl Session {
    pub fn series(&self, kind: SeriesKind) -> &[Sample] {
        self.series.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn total_samples(&self) -> usize {
        self.series.values().map(Vec::len).sum()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self {
            version: SESSION_VERSION,
            started_at: 0,
            interval_ms: DEFAULT_INTERVAL_MS,
            series: SeriesKind::iter().map(|kind| (kind, Vec::new())).collect(),
            marks: Vec::new(),
        }
    }
}
