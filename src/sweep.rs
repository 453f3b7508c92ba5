//! Percentage-change sweep ranges

use serde::{Deserialize, Serialize};

use crate::CpeError;

/// Values are snapped to this resolution so `start + i * step` lands on round numbers.
const SNAP: f64 = 1.0e9;

/// Largest number of points a single sweep axis may expand to.
pub const MAX_SWEEP_POINTS: usize = 10_000;

/// Inclusive range of fractional changes, e.g. -0.25..=0.25 in 0.05 steps
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SweepRange {
    pub start: f64,
    pub end: f64,
    pub step: f64,
}

impl SweepRange {
    pub fn new(start: f64, end: f64, step: f64) -> Self {
        Self { start, end, step }
    }

    pub fn validate(&self) -> Result<(), CpeError> {
        if !self.start.is_finite() || !self.end.is_finite() || !self.step.is_finite() {
            return Err(CpeError::InvalidSweep(
                "start, end and step must be finite".to_string(),
            ));
        }

        if self.step <= 0.0 {
            return Err(CpeError::InvalidSweep(
                "step must be greater than zero".to_string(),
            ));
        }

        if self.end < self.start {
            return Err(CpeError::InvalidSweep(
                "end must be greater than or equal to start".to_string(),
            ));
        }

        let count = self.point_count();
        if !count.is_finite() || count > MAX_SWEEP_POINTS as f64 {
            return Err(CpeError::InvalidSweep(format!(
                "range expands to {count} points, more than the limit of {MAX_SWEEP_POINTS}"
            )));
        }

        Ok(())
    }

    /// Number of points, counting both ends.
    pub fn len(&self) -> usize {
        if self.validate().is_err() {
            return 0;
        }

        self.point_count() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn values(&self) -> Vec<f64> {
        (0..self.len())
            .map(|idx| snap(self.start + self.step * idx as f64))
            .collect()
    }

    pub fn labels(&self) -> Vec<String> {
        self.values().into_iter().map(percent_label).collect()
    }

    fn point_count(&self) -> f64 {
        // Tolerate `end` sitting a rounding error short of the last step.
        ((self.end - self.start) / self.step + 1.0e-9).floor() + 1.0
    }
}

impl Default for SweepRange {
    fn default() -> Self {
        Self {
            start: -0.25,
            end: 0.25,
            step: 0.05,
        }
    }
}

fn snap(value: f64) -> f64 {
    let snapped = (value * SNAP).round() / SNAP;
    // Avoid "-0%" labels.
    if snapped == 0.0 {
        0.0
    } else {
        snapped
    }
}

/// Render a fractional change as a percentage label: `-0.25` -> `"-25%"`, `0.025` -> `"2.5%"`.
pub fn percent_label(fraction: f64) -> String {
    let pct = ((fraction * 100.0) * 1.0e6).round() / 1.0e6;
    if pct == 0.0 {
        return "0%".to_string();
    }

    if pct.fract() == 0.0 {
        format!("{}%", pct as i64)
    } else {
        format!("{pct}%")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_range_has_eleven_points() {
        let range = SweepRange::default();
        assert_eq!(range.len(), 11);

        let values = range.values();
        assert_eq!(values[0], -0.25);
        assert_eq!(values[5], 0.0);
        assert_eq!(values[10], 0.25);
    }

    #[test]
    fn test_default_labels() {
        let labels = SweepRange::default().labels();
        assert_eq!(
            labels,
            vec!["-25%", "-20%", "-15%", "-10%", "-5%", "0%", "5%", "10%", "15%", "20%", "25%"]
        );
    }

    #[test]
    fn test_single_point_range() {
        let range = SweepRange::new(0.1, 0.1, 0.05);
        assert_eq!(range.values(), vec![0.1]);
    }

    #[test]
    fn test_fractional_percent_label() {
        assert_eq!(percent_label(0.025), "2.5%");
        assert_eq!(percent_label(-0.125), "-12.5%");
        assert_eq!(percent_label(-1.0e-17), "0%");
    }

    #[test]
    fn test_invalid_ranges() {
        assert!(SweepRange::new(0.0, 1.0, 0.0).validate().is_err());
        assert!(SweepRange::new(0.5, -0.5, 0.1).validate().is_err());
        assert!(SweepRange::new(f64::NAN, 0.5, 0.1).validate().is_err());
        assert!(SweepRange::new(0.5, -0.5, 0.1).is_empty());
    }

    #[test]
    fn test_rejects_unbounded_point_count() {
        let huge = SweepRange::new(0.0, 1.0e300, 1.0e-300);
        assert!(matches!(huge.validate(), Err(CpeError::InvalidSweep(_))));
        assert_eq!(huge.len(), 0);

        let dense = SweepRange::new(0.0, 1.0, 1.0e-9);
        assert!(matches!(dense.validate(), Err(CpeError::InvalidSweep(_))));
        assert!(dense.values().is_empty());
    }

    #[test]
    fn test_point_limit_is_inclusive() {
        let range = SweepRange::new(0.0, (MAX_SWEEP_POINTS - 1) as f64, 1.0);
        assert!(range.validate().is_ok());
        assert_eq!(range.len(), MAX_SWEEP_POINTS);
        assert!(SweepRange::new(0.0, MAX_SWEEP_POINTS as f64, 1.0).validate().is_err());
    }
}
