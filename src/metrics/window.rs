//! Time-window slicing over a series ordered oldest first.

use crate::session::Sample;

pub const MIN_WINDOW_SECS: u64 = 5;
pub const MAX_WINDOW_SECS: u64 = 600;
pub const MIN_INTERVAL_MS: u64 = 100;
pub const MAX_INTERVAL_MS: u64 = 2000;

pub fn clamp_window_secs(secs: u64) -> u64 {
    secs.clamp(MIN_WINDOW_SECS, MAX_WINDOW_SECS)
}

pub fn clamp_interval_ms(ms: u64) -> u64 {
    ms.clamp(MIN_INTERVAL_MS, MAX_INTERVAL_MS)
}

/// Suffix of `series` whose timestamps are within `window_ms` of the newest
/// sample.
pub fn tail_window(series: &[Sample], window_ms: i64) -> &[Sample] {
    let Some(last) = series.last() else {
        return series;
    };
    let start = last.timestamp.saturating_sub(window_ms);
    let idx = series
        .iter()
        .position(|s| s.timestamp >= start)
        .unwrap_or(0);
    &series[idx..]
}

/// The part of `series` visible in a chart that spans `window_ms` and ends
/// `pan_offset_ms` before the newest sample. Both ends are clamped to the
/// first sample so panning past the start pins the view there.
pub fn window_slice(series: &[Sample], window_ms: i64, pan_offset_ms: i64) -> &[Sample] {
    let (Some(first), Some(last)) = (series.first(), series.last()) else {
        return series;
    };

    let end = last
        .timestamp
        .saturating_sub(pan_offset_ms.max(0))
        .max(first.timestamp);
    let start = end.saturating_sub(window_ms).max(first.timestamp);

    let start_idx = series
        .iter()
        .position(|s| s.timestamp >= start)
        .unwrap_or(0);
    let end_idx = series
        .iter()
        .rposition(|s| s.timestamp <= end)
        .unwrap_or(series.len() - 1);

    if start_idx > end_idx {
        return &series[0..0];
    }
    &series[start_idx..=end_idx]
}

/// Interleaves two series by timestamp. Ties keep `a` before `b`.
pub fn merge_series(a: &[Sample], b: &[Sample]) -> Vec<Sample> {
    let mut merged: Vec<Sample> = a.iter().chain(b.iter()).copied().collect();
    merged.sort_by_key(|s| s.timestamp);
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn series(ts: &[i64]) -> Vec<Sample> {
        ts.iter().map(|&t| Sample::new(t, t as f64)).collect()
    }

    fn stamps(samples: &[Sample]) -> Vec<i64> {
        samples.iter().map(|s| s.timestamp).collect()
    }

    #[test]
    fn test_tail_window() {
        let data = series(&[0, 1000, 2000, 3000, 4000]);
        assert_eq!(stamps(tail_window(&data, 2000)), vec![2000, 3000, 4000]);
        assert_eq!(stamps(tail_window(&data, 0)), vec![4000]);
        assert_eq!(stamps(tail_window(&data, 60_000)).len(), 5);
        assert!(tail_window(&[], 1000).is_empty());
    }

    #[test]
    fn test_window_slice_without_pan_matches_tail() {
        let data = series(&[0, 1000, 2000, 3000, 4000]);
        assert_eq!(stamps(window_slice(&data, 2000, 0)), vec![2000, 3000, 4000]);
    }

    #[test]
    fn test_window_slice_with_pan() {
        let data = series(&[0, 1000, 2000, 3000, 4000, 5000]);
        assert_eq!(
            stamps(window_slice(&data, 2000, 2000)),
            vec![1000, 2000, 3000]
        );
    }

    #[test]
    fn test_window_slice_pan_past_start_pins_to_first() {
        let data = series(&[1000, 2000, 3000]);
        assert_eq!(stamps(window_slice(&data, 5000, 60_000)), vec![1000]);
    }

    #[test]
    fn test_merge_series_sorts_by_time() {
        let a = series(&[1, 4, 6]);
        let b = series(&[2, 3, 5]);
        assert_eq!(stamps(&merge_series(&a, &b)), vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_clamps() {
        assert_eq!(clamp_window_secs(1), 5);
        assert_eq!(clamp_window_secs(9000), 600);
        assert_eq!(clamp_interval_ms(10), 100);
        assert_eq!(clamp_interval_ms(500), 500);
        assert_eq!(clamp_interval_ms(10_000), 2000);
    }
}
