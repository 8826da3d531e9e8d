//! Trapezoidal integration primitives
//!
//! Standalone functions for integrating a sampled concentration-time curve on raw
//! `&[f64]` slices. They are used by [`ConcentrationCurve`](crate::data::ConcentrationCurve)
//! and by the exposure metrics.
//!
//! All functions here are pure math on sorted time points. Segments whose width is
//! not positive contribute nothing.
//!
//! # Example
//!
//! ```rust
//! use vancopk::data::auc::{auc, auc_interval, interpolate_linear};
//!
//! let times = [0.0, 1.0, 2.0, 4.0, 8.0];
//! let concs = [0.0, 10.0, 8.0, 4.0, 2.0];
//!
//! let total = auc(&times, &concs);
//! let partial = auc_interval(&times, &concs, 1.0, 4.0);
//! let c_at_3 = interpolate_linear(&times, &concs, 3.0);
//! assert!((partial - 21.0).abs() < 1e-10);
//! assert!((c_at_3 - 6.0).abs() < 1e-10);
//! assert!(total > partial);
//! ```

/// Linear trapezoidal area of a single segment
#[inline]
pub fn auc_segment(t1: f64, c1: f64, t2: f64, c2: f64) -> f64 {
    let dt = t2 - t1;
    if dt <= 0.0 {
        return 0.0;
    }
    (c1 + c2) / 2.0 * dt
}

/// Area under the curve from the first to the last time point
///
/// # Panics
/// Panics if `times.len() != values.len()`.
pub fn auc(times: &[f64], values: &[f64]) -> f64 {
    assert_eq!(
        times.len(),
        values.len(),
        "times and values must have equal length"
    );

    times
        .windows(2)
        .zip(values.windows(2))
        .map(|(t, c)| auc_segment(t[0], c[0], t[1], c[1]))
        .sum()
}

/// Area under the curve between `start` and `end`
///
/// Segments that straddle a boundary are cut at the boundary, with the
/// concentration there obtained by linear interpolation, so partial first and
/// last segments still count.
///
/// # Example
/// ```rust
/// use vancopk::data::auc::auc_interval;
///
/// let times = [0.0, 1.0, 2.0];
/// let concs = [0.0, 10.0, 10.0];
/// // 0.5..1.0 under the rising edge: (5 + 10) / 2 * 0.5 = 3.75, then 10 * 0.5
/// let partial = auc_interval(&times, &concs, 0.5, 1.5);
/// assert!((partial - 8.75).abs() < 1e-10);
/// ```
pub fn auc_interval(times: &[f64], values: &[f64], start: f64, end: f64) -> f64 {
    assert_eq!(
        times.len(),
        values.len(),
        "times and values must have equal length"
    );

    if end <= start {
        return 0.0;
    }

    times
        .windows(2)
        .zip(values.windows(2))
        .filter_map(|(t, c)| {
            let lo = t[0].max(start);
            let hi = t[1].min(end);
            (hi > lo).then(|| {
                let at = |x| along_segment(t[0], c[0], t[1], c[1], x);
                auc_segment(lo, at(lo), hi, at(hi))
            })
        })
        .sum()
}

/// Value at `x` on the straight line through two samples, held flat outside them
fn along_segment(t1: f64, c1: f64, t2: f64, c2: f64, x: f64) -> f64 {
    if x <= t1 || t2 - t1 <= 0.0 {
        c1
    } else if x >= t2 {
        c2
    } else {
        c1 + (c2 - c1) * (x - t1) / (t2 - t1)
    }
}

/// Linear interpolation of a value at a given time
///
/// Clamps to the first or last value if `time` is outside the data range.
///
/// ```rust
/// use vancopk::data::auc::interpolate_linear;
///
/// let times = [0.0, 2.0, 4.0];
/// let values = [0.0, 10.0, 6.0];
/// assert!((interpolate_linear(&times, &values, 1.0) - 5.0).abs() < 1e-10);
/// assert!((interpolate_linear(&times, &values, 9.0) - 6.0).abs() < 1e-10);
/// ```
pub fn interpolate_linear(times: &[f64], values: &[f64], time: f64) -> f64 {
    assert_eq!(
        times.len(),
        values.len(),
        "times and values must have equal length"
    );

    match times.partition_point(|&t| t < time) {
        _ if times.is_empty() => 0.0,
        0 => values[0],
        n if n == times.len() => values[n - 1],
        i => along_segment(times[i - 1], values[i - 1], times[i], values[i], time),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn segment_is_mean_height_times_width() {
        assert_relative_eq!(auc_segment(0.0, 10.0, 1.0, 8.0), 9.0);
        assert_relative_eq!(auc_segment(1.0, 10.0, 1.0, 8.0), 0.0);
    }

    #[test]
    fn full_profile() {
        let times = [0.0, 1.0, 2.0, 4.0, 8.0];
        let concs = [10.0, 8.0, 6.0, 4.0, 2.0];
        // 9 + 7 + 10 + 12
        assert_relative_eq!(auc(&times, &concs), 38.0, epsilon = 1e-10);
    }

    #[test]
    fn single_point_has_no_area() {
        assert_relative_eq!(auc(&[1.0], &[5.0]), 0.0);
        assert_relative_eq!(auc_interval(&[1.0], &[5.0], 0.0, 2.0), 0.0);
    }

    #[test]
    fn interval_matching_sample_points() {
        let times = [0.0, 1.0, 2.0, 4.0, 8.0];
        let concs = [0.0, 10.0, 8.0, 4.0, 2.0];
        assert_relative_eq!(auc_interval(&times, &concs, 1.0, 4.0), 21.0, epsilon = 1e-10);
    }

    #[test]
    fn interval_interpolates_both_boundaries() {
        let times = [0.0, 2.0, 4.0];
        let concs = [0.0, 10.0, 10.0];
        // [1, 3]: (5 + 10) / 2 * 1 + 10 * 1 = 17.5
        assert_relative_eq!(auc_interval(&times, &concs, 1.0, 3.0), 17.5, epsilon = 1e-10);
    }

    #[test]
    fn interval_inside_one_segment() {
        let times = [0.0, 10.0];
        let concs = [10.0, 0.0];
        // [2, 4]: c(2) = 8, c(4) = 6 -> 14
        assert_relative_eq!(auc_interval(&times, &concs, 2.0, 4.0), 14.0, epsilon = 1e-10);
    }

    #[test]
    fn reversed_interval_is_zero() {
        let times = [0.0, 1.0, 2.0];
        let concs = [1.0, 1.0, 1.0];
        assert_relative_eq!(auc_interval(&times, &concs, 2.0, 1.0), 0.0);
    }

    #[test]
    fn repeated_time_does_not_divide_by_zero() {
        let times = [0.0, 1.0, 1.0, 2.0];
        let concs = [0.0, 4.0, 6.0, 6.0];
        assert_relative_eq!(interpolate_linear(&times, &concs, 1.0), 4.0);
        assert_relative_eq!(auc_interval(&times, &concs, 0.0, 2.0), 8.0, epsilon = 1e-12);
    }

    #[test]
    fn interpolation_clamps_outside_range() {
        let times = [1.0, 2.0];
        let values = [4.0, 8.0];
        assert_relative_eq!(interpolate_linear(&times, &values, 0.0), 4.0);
        assert_relative_eq!(interpolate_linear(&times, &values, 1.5), 6.0);
        assert_relative_eq!(interpolate_linear(&times, &values, 3.0), 8.0);
        assert_relative_eq!(interpolate_linear(&[], &[], 3.0), 0.0);
    }
}
