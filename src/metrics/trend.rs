//! Advisory anomaly detection over the tail window of a series.
//!
//! Both detectors are pure and never fail: a series that is empty or too short
//! for its window simply reports no alert.

use crate::metrics::window::tail_window;
use crate::session::{Mark, Sample, SeriesKind, Session};
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

pub const DEFAULT_MIN_POINTS: usize = 5;
/// Bytes per second.
pub const DEFAULT_SLOPE_THRESHOLD_PER_SEC: f64 = 10_000.0;
pub const DEFAULT_SPIKE_FRACTION: f64 = 0.2;

/// True when the least-squares slope of the tail window, in value units per
/// second, reaches `slope_threshold_per_sec`.
pub fn upward_trend(
    series: &[Sample],
    window_ms: i64,
    min_points: usize,
    slope_threshold_per_sec: f64,
) -> bool {
    let Some(tail) = gated_tail(series, window_ms, min_points) else {
        return false;
    };
    linear_slope(tail) * 1000.0 >= slope_threshold_per_sec
}

/// True when the newest value in the tail window is at least
/// `mean * (1 + spike_fraction)`.
pub fn sudden_spike(
    series: &[Sample],
    window_ms: i64,
    min_points: usize,
    spike_fraction: f64,
) -> bool {
    let Some(tail) = gated_tail(series, window_ms, min_points) else {
        return false;
    };
    let Some(last) = tail.last() else {
        return false;
    };
    let mean = tail.iter().map(|s| s.value).sum::<f64>() / tail.len() as f64;
    last.value >= mean * (1.0 + spike_fraction)
}

fn gated_tail(series: &[Sample], window_ms: i64, min_points: usize) -> Option<&[Sample]> {
    if series.is_empty() || series.len() < min_points {
        return None;
    }
    let tail = tail_window(series, window_ms);
    if tail.len() < min_points {
        return None;
    }
    Some(tail)
}

/// Ordinary least-squares slope with timestamps (ms) as x. Zero when every
/// sample shares one timestamp.
fn linear_slope(points: &[Sample]) -> f64 {
    if points.is_empty() {
        return 0.0;
    }
    let n = points.len() as f64;
    let mean_x = points.iter().map(|p| p.timestamp as f64).sum::<f64>() / n;
    let mean_y = points.iter().map(|p| p.value).sum::<f64>() / n;

    let (num, den) = points.iter().fold((0.0, 0.0), |(num, den), p| {
        let dx = p.timestamp as f64 - mean_x;
        (num + dx * (p.value - mean_y), den + dx * dx)
    });

    if den == 0.0 {
        0.0
    } else {
        num / den
    }
}

/// Caller-tunable detector thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendConfig {
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,

    #[serde(default = "default_min_points")]
    pub min_points: usize,

    #[serde(default = "default_slope_threshold")]
    pub slope_threshold_per_sec: f64,

    #[serde(default = "default_spike_fraction")]
    pub spike_fraction: f64,
}

impl Default for TrendConfig {
    fn default() -> Self {
        Self {
            window_secs: default_window_secs(),
            min_points: default_min_points(),
            slope_threshold_per_sec: default_slope_threshold(),
            spike_fraction: default_spike_fraction(),
        }
    }
}

fn default_window_secs() -> u64 {
    30
}

fn default_min_points() -> usize {
    DEFAULT_MIN_POINTS
}

fn default_slope_threshold() -> f64 {
    200_000.0
}

fn default_spike_fraction() -> f64 {
    DEFAULT_SPIKE_FRACTION
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeriesAlerts {
    pub upward_trend: bool,
    pub sudden_spike: bool,
}

impl SeriesAlerts {
    pub fn any(&self) -> bool {
        self.upward_trend || self.sudden_spike
    }
}

impl TrendConfig {
    pub fn window_ms(&self) -> i64 {
        (self.window_secs as i64).saturating_mul(1000)
    }

    pub fn evaluate(&self, series: &[Sample]) -> SeriesAlerts {
        self.evaluate_window(series, self.window_ms())
    }

    /// Same thresholds over an explicit window, for views that zoom.
    pub fn evaluate_window(&self, series: &[Sample], window_ms: i64) -> SeriesAlerts {
        SeriesAlerts {
            upward_trend: upward_trend(
                series,
                window_ms,
                self.min_points,
                self.slope_threshold_per_sec,
            ),
            sudden_spike: sudden_spike(series, window_ms, self.min_points, self.spike_fraction),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SeriesReport {
    pub kind: SeriesKind,
    pub unit: &'static str,
    pub points: usize,
    pub last_value: Option<f64>,
    pub alerts: SeriesAlerts,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionReport {
    pub version: u32,
    pub started_at: i64,
    pub interval_ms: u64,
    pub window_secs: u64,
    pub series: Vec<SeriesReport>,
    pub marks: Vec<Mark>,
}

pub fn analyze_session(session: &Session, config: &TrendConfig) -> SessionReport {
    let series = SeriesKind::iter()
        .map(|kind| {
            let samples = session.series(kind);
            SeriesReport {
                kind,
                unit: kind.unit(),
                points: samples.len(),
                last_value: samples.last().map(|s| s.value),
                alerts: config.evaluate(samples),
            }
        })
        .collect();

    SessionReport {
        version: session.version,
        started_at: session.started_at,
        interval_ms: session.interval_ms,
        window_secs: config.window_secs,
        series,
        marks: session.marks.clone(),
    }
}

impl SessionReport {
    pub fn to_json(&self) -> crate::error::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl std::fmt::Display for SessionReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "session v{} started {} every {} ms, {}s window",
            self.version, self.started_at, self.interval_ms, self.window_secs
        )?;
        for series in &self.series {
            let last = series
                .last_value
                .map(|v| format!("{:.1} {}", v, series.unit))
                .unwrap_or_else(|| "-".to_string());
            let alerts = match (series.alerts.upward_trend, series.alerts.sudden_spike) {
                (true, true) => "upward trend, sudden spike",
                (true, false) => "upward trend",
                (false, true) => "sudden spike",
                (false, false) => "ok",
            };
            writeln!(
                f,
                "  {:<11} {:>6} points  last {:<18} {}",
                series.kind.to_string(),
                series.points,
                last,
                alerts
            )?;
        }
        write!(f, "  {} marks", self.marks.len())
    }
}
