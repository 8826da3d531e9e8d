use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::data::auc;
use crate::error::VancoError;

/// A single sample of a concentration-time curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeConcentrationPoint {
    /// Time (h)
    pub time: f64,
    /// Concentration (mg/L)
    pub concentration: f64,
}

impl TimeConcentrationPoint {
    pub fn new(time: f64, concentration: f64) -> Self {
        TimeConcentrationPoint {
            time,
            concentration,
        }
    }
}

/// A sampled concentration-time curve with strictly increasing times
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConcentrationCurve {
    points: Vec<TimeConcentrationPoint>,
}

impl ConcentrationCurve {
    /// Wrap already ordered points
    pub fn new(points: Vec<TimeConcentrationPoint>) -> Self {
        debug_assert!(
            points.windows(2).all(|w| w[0].time < w[1].time),
            "curve times must be strictly increasing"
        );
        ConcentrationCurve { points }
    }

    pub fn points(&self) -> &[TimeConcentrationPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn times(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.time).collect()
    }

    pub fn concentrations(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.concentration).collect()
    }

    /// Time of the last sample, or `None` for an empty curve
    pub fn last_time(&self) -> Option<f64> {
        self.points.last().map(|p| p.time)
    }

    /// Linearly interpolated concentration at `time`
    pub fn interpolate(&self, time: f64) -> f64 {
        auc::interpolate_linear(&self.times(), &self.concentrations(), time)
    }

    /// Samples whose time falls in `[start, end)`
    pub fn window(&self, start: f64, end: f64) -> impl Iterator<Item = &TimeConcentrationPoint> {
        self.points
            .iter()
            .filter(move |p| p.time >= start && p.time < end)
    }

    /// Write the curve as `time,concentration` CSV rows with a header
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), VancoError> {
        let mut wtr = csv::Writer::from_writer(writer);
        for point in &self.points {
            wtr.serialize(point)?;
        }
        wtr.flush()?;
        Ok(())
    }
}

impl From<Vec<TimeConcentrationPoint>> for ConcentrationCurve {
    fn from(points: Vec<TimeConcentrationPoint>) -> Self {
        ConcentrationCurve::new(points)
    }
}

impl FromIterator<TimeConcentrationPoint> for ConcentrationCurve {
    fn from_iter<I: IntoIterator<Item = TimeConcentrationPoint>>(iter: I) -> Self {
        ConcentrationCurve::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn ramp() -> ConcentrationCurve {
        (0..5)
            .map(|i| TimeConcentrationPoint::new(i as f64, 2.0 * i as f64))
            .collect()
    }

    #[test]
    fn accessors() {
        let curve = ramp();
        assert_eq!(curve.len(), 5);
        assert_eq!(curve.last_time(), Some(4.0));
        assert_eq!(curve.times(), vec![0.0, 1.0, 2.0, 3.0, 4.0]);
        assert_relative_eq!(curve.interpolate(2.5), 5.0);
        assert_eq!(ConcentrationCurve::default().last_time(), None);
    }

    #[test]
    fn window_is_half_open() {
        let curve = ramp();
        let times: Vec<f64> = curve.window(1.0, 3.0).map(|p| p.time).collect();
        assert_eq!(times, vec![1.0, 2.0]);
    }

    #[test]
    fn csv_has_header_and_rows() {
        let mut buffer = Vec::new();
        ramp().write_csv(&mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("time,concentration"));
        assert_eq!(lines.next(), Some("0.0,0.0"));
        assert_eq!(text.lines().count(), 6);
    }

    #[test]
    fn serializes_as_plain_array() {
        let curve: ConcentrationCurve = vec![TimeConcentrationPoint::new(0.5, 1.5)].into();
        let json = serde_json::to_string(&curve).unwrap();
        assert_eq!(json, r#"[{"time":0.5,"concentration":1.5}]"#);
    }
}
