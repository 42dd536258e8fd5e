pub mod fps;
pub mod long_tasks;
pub mod marks;
pub mod memory;

use crate::session::Sample;

pub const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Chart points in seconds since `origin`, with values divided by `scale`.
///
/// Replayed sessions keep their sample order, so any timestamp may sit on
/// either side of `origin`; the offset is taken in floating point.
pub fn chart_points(samples: &[Sample], origin: i64, scale: f64) -> Vec<(f64, f64)> {
    samples
        .iter()
        .map(|s| {
            let offset_ms = s.timestamp as f64 - origin as f64;
            (offset_ms / 1000.0, s.value / scale)
        })
        .collect()
}

/// `[min, max]` over the point values, padded so a flat line stays visible.
pub fn value_bounds(points: &[(f64, f64)]) -> [f64; 2] {
    let (min, max) = points
        .iter()
        .map(|&(_, y)| y)
        .filter(|y| y.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), y| {
            (lo.min(y), hi.max(y))
        });

    if !min.is_finite() || !max.is_finite() {
        return [0.0, 1.0];
    }
    let pad = ((max - min) * 0.1).max(1e-9).max(max.abs() * 0.01);
    [min - pad, max + pad]
}

pub fn time_bounds(points: &[(f64, f64)]) -> [f64; 2] {
    let end = points
        .iter()
        .map(|&(x, _)| x)
        .filter(|x| x.is_finite())
        .fold(0.0_f64, f64::max);
    [0.0, end.max(1.0)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chart_points_are_relative_seconds() {
        let samples = vec![Sample::new(10_000, BYTES_PER_MB), Sample::new(12_500, 0.0)];
        let points = chart_points(&samples, 10_000, BYTES_PER_MB);
        assert_eq!(points, vec![(0.0, 1.0), (2.5, 0.0)]);
    }

    #[test]
    fn test_chart_points_survive_out_of_order_extremes() {
        use crate::metrics::window::{merge_series, window_slice};
        use crate::session::{codec, SeriesKind};

        let session = codec::import(
            r#"{"version":1,"series":{"wasmMemoryBytes":[[0,1.0],[-9223372036854775808,1.0],[10,1.0]]},"marks":[]}"#,
        )
        .unwrap();
        let memory = window_slice(session.series(SeriesKind::MemoryBytes), 30_000, 0);
        assert_eq!(memory.len(), 3);

        let combined = merge_series(memory, &[]);
        let origin = combined[0].timestamp;
        assert_eq!(origin, i64::MIN);

        let points = chart_points(memory, origin, BYTES_PER_MB);
        assert_eq!(points.len(), 3);
        assert!(points.iter().all(|&(x, _)| x.is_finite() && x >= 0.0));

        let reversed = chart_points(&[Sample::new(i64::MIN, 0.0)], i64::MAX, 1.0);
        assert!(reversed[0].0 < 0.0);
    }

    #[test]
    fn test_bounds_for_flat_and_empty_data() {
        assert_eq!(value_bounds(&[]), [0.0, 1.0]);

        let [lo, hi] = value_bounds(&[(0.0, 60.0), (1.0, 60.0)]);
        assert!(lo < 60.0 && hi > 60.0);

        assert_eq!(time_bounds(&[]), [0.0, 1.0]);
        assert_eq!(time_bounds(&[(0.0, 1.0), (30.0, 2.0)]), [0.0, 30.0]);
    }
}
