//! Sensitivity grid builder
//!
//! Contribution profit over the Cartesian product of revenue changes (rows)
//! and marketing spend changes (columns), in millions rounded to two
//! decimals. Every cell is computed independently from the baseline.

use serde::{Deserialize, Serialize};

use crate::params::BaselineParams;
use crate::profit::contribution_profit;
use crate::sweep::{percent_label, SweepRange};
use crate::CpeError;

const MILLION: f64 = 1_000_000.0;

/// Contribution profit ($M) indexed by revenue change and marketing change
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivityGrid {
    /// Revenue changes as fractions, one per row
    pub revenue_changes: Vec<f64>,
    /// Marketing spend changes as fractions, one per column
    pub marketing_changes: Vec<f64>,
    /// Row-major cells, `cells[row][col]`
    pub cells: Vec<Vec<f64>>,
}

impl SensitivityGrid {
    /// (rows, columns)
    pub fn shape(&self) -> (usize, usize) {
        (self.revenue_changes.len(), self.marketing_changes.len())
    }

    pub fn row_labels(&self) -> Vec<String> {
        self.revenue_changes.iter().copied().map(percent_label).collect()
    }

    pub fn column_labels(&self) -> Vec<String> {
        self.marketing_changes.iter().copied().map(percent_label).collect()
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<f64> {
        self.cells.get(row).and_then(|r| r.get(col)).copied()
    }

    /// Cell for an exact pair of changes, if both are on the grid.
    pub fn lookup(&self, revenue_change: f64, marketing_change: f64) -> Option<f64> {
        let row = position(&self.revenue_changes, revenue_change)?;
        let col = position(&self.marketing_changes, marketing_change)?;
        self.cell(row, col)
    }

    pub fn rows(&self) -> impl Iterator<Item = (String, &[f64])> + '_ {
        self.revenue_changes
            .iter()
            .zip(self.cells.iter())
            .map(|(&rc, row)| (percent_label(rc), row.as_slice()))
    }

    /// Smallest and largest cell, for keying a color scale
    pub fn value_range(&self) -> Option<(f64, f64)> {
        self.cells.iter().flatten().copied().fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
    }
}

fn position(values: &[f64], target: f64) -> Option<usize> {
    values.iter().position(|&v| (v - target).abs() < 1.0e-9)
}

/// Round to `decimals` places, correctly rounded from the exact binary value.
pub fn round_to(value: f64, decimals: usize) -> f64 {
    let rounded = format!("{value:.decimals$}").parse::<f64>().unwrap_or(value);
    // Normalize "-0.00" to 0.0.
    rounded + 0.0
}

/// Build the grid for explicit lists of revenue and marketing changes.
pub fn build_grid(
    params: BaselineParams,
    revenue_changes: &[f64],
    marketing_changes: &[f64],
) -> Result<SensitivityGrid, CpeError> {
    params.validate()?;
    validate_changes("revenue", revenue_changes, |rc| rc > -1.0)?;
    validate_changes("marketing", marketing_changes, |mc| mc >= -1.0)?;

    let cogs_pct = params.cogs_pct();
    let cells = revenue_changes
        .iter()
        .map(|&rc| {
            let new_revenue = params.revenue * (1.0 + rc);
            marketing_changes
                .iter()
                .map(|&mc| {
                    let new_marketing = params.marketing_spend * (1.0 + mc);
                    let cp = contribution_profit(
                        new_revenue,
                        new_marketing,
                        cogs_pct,
                        params.other_costs_pct,
                    );
                    round_to(cp / MILLION, 2)
                })
                .collect()
        })
        .collect();

    Ok(SensitivityGrid {
        revenue_changes: revenue_changes.to_vec(),
        marketing_changes: marketing_changes.to_vec(),
        cells,
    })
}

/// Build the grid from two sweep ranges.
pub fn build_grid_from_ranges(
    params: BaselineParams,
    revenue_range: &SweepRange,
    marketing_range: &SweepRange,
) -> Result<SensitivityGrid, CpeError> {
    revenue_range.validate()?;
    marketing_range.validate()?;
    build_grid(params, &revenue_range.values(), &marketing_range.values())
}

/// Build the default 11x11 grid (-25%..=+25% in 5% steps on both axes).
pub fn build_default_grid(params: BaselineParams) -> Result<SensitivityGrid, CpeError> {
    let range = SweepRange::default();
    build_grid_from_ranges(params, &range, &range)
}

fn validate_changes(
    axis: &str,
    changes: &[f64],
    in_domain: impl Fn(f64) -> bool,
) -> Result<(), CpeError> {
    if changes.is_empty() {
        return Err(CpeError::InvalidSweep(format!(
            "{axis} changes must not be empty"
        )));
    }

    for &change in changes {
        if !change.is_finite() {
            return Err(CpeError::InvalidSweep(format!(
                "{axis} change {change} is not finite"
            )));
        }
        if !in_domain(change) {
            return Err(CpeError::InvalidSweep(format!(
                "{axis} change {change} would leave {axis} out of range"
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn test_default_grid_shape_and_labels() {
        let grid = build_default_grid(BaselineParams::default()).unwrap();
        assert_eq!(grid.shape(), (11, 11));
        assert_eq!(grid.row_labels().first().map(String::as_str), Some("-25%"));
        assert_eq!(grid.column_labels().last().map(String::as_str), Some("25%"));
    }

    #[test]
    fn test_center_cell_is_baseline() {
        let params = BaselineParams::default();
        let grid = build_default_grid(params).unwrap();
        let expected = round_to(params.baseline_profit() / MILLION, 2);
        assert_eq!(grid.cell(5, 5), Some(expected));
        assert_eq!(grid.lookup(0.0, 0.0), Some(0.1));
    }

    #[test]
    fn test_reference_corners() {
        let grid = build_default_grid(BaselineParams::default()).unwrap();
        // baseline revenue, -25% marketing: 750k - 487.5k = 262.5k
        assert_relative_eq!(grid.cell(5, 0).unwrap(), 0.26);
        // +25% revenue, -25% marketing: 6.25M * 0.15 - 487.5k = 450k
        assert_relative_eq!(grid.cell(10, 0).unwrap(), 0.45);
        // -25% revenue, +25% marketing: 562.5k - 812.5k = -250k
        assert_relative_eq!(grid.cell(0, 10).unwrap(), -0.25);
    }

    #[test]
    fn test_rows_follow_revenue_changes() {
        let grid = build_grid(BaselineParams::default(), &[0.0, 0.2], &[0.0]).unwrap();
        let rows: Vec<_> = grid.rows().map(|(label, row)| (label, row.to_vec())).collect();
        assert_eq!(rows[0].0, "0%");
        assert_eq!(rows[1].0, "20%");
        // 6M * 0.15 - 650k = 250k
        assert_relative_eq!(rows[1].1[0], 0.25);
    }

    #[test]
    fn test_value_range() {
        let grid = build_default_grid(BaselineParams::default()).unwrap();
        let (lo, hi) = grid.value_range().unwrap();
        assert_relative_eq!(lo, -0.25);
        assert_relative_eq!(hi, 0.45);
    }

    #[test]
    fn test_rejects_empty_and_out_of_domain_changes() {
        let params = BaselineParams::default();
        assert!(matches!(
            build_grid(params, &[], &[0.0]),
            Err(CpeError::InvalidSweep(_))
        ));
        assert!(matches!(
            build_grid(params, &[-1.0], &[0.0]),
            Err(CpeError::InvalidSweep(_))
        ));
        assert!(matches!(
            build_grid(params, &[0.0], &[f64::NAN]),
            Err(CpeError::InvalidSweep(_))
        ));
        // Cutting marketing to zero is allowed.
        assert!(build_grid(params, &[0.0], &[-1.0]).is_ok());
    }

    #[test]
    fn test_rejects_invalid_params_like_elasticity() {
        let params = BaselineParams::new(5_000_000.0, 650_000.0, 1.2, 0.30);
        let grid_err = build_default_grid(params).unwrap_err();
        let elasticity_err = crate::compute_elasticities(params, crate::DEFAULT_DELTA).unwrap_err();
        assert_eq!(grid_err, elasticity_err);
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(1.234_567, 2), 1.23);
        assert_eq!(round_to(0.126, 2), 0.13);
        // 2.675 and 0.015 are stored just below the tie.
        assert_eq!(round_to(2.675, 2), 2.67);
        assert_eq!(round_to(0.015, 2), 0.01);
        assert!(round_to(-0.001, 2).is_sign_positive());
    }

    #[test]
    fn test_cells_round_from_binary_value() {
        let grid = build_default_grid(BaselineParams::default()).unwrap();
        // -20% revenue, -10% marketing: 600k - 585k = 15k
        assert_eq!(grid.cell(1, 3), Some(0.01));
        assert_eq!(grid.cell(2, 6), Some(-0.04));
        assert_eq!(grid.cell(2, 10), Some(-0.17));
        assert_eq!(grid.cell(3, 1), Some(0.15));
        assert_eq!(grid.cell(3, 9), Some(-0.10));
    }

    proptest! {
        #[test]
        fn profit_is_monotone_in_revenue_change(
            revenue in 1.0e4f64..1.0e9,
            marketing_ratio in 0.0f64..1.0,
            margin in 0.05f64..=1.0,
            other_share in 0.0f64..0.95,
        ) {
            // Keep cogs + other < 1 so revenue growth retains a positive margin.
            let other = margin * other_share;
            let params = BaselineParams::new(revenue, revenue * marketing_ratio, margin, other);
            let grid = build_default_grid(params).unwrap();
            let (rows, cols) = grid.shape();

            for col in 0..cols {
                for row in 1..rows {
                    prop_assert!(grid.cells[row][col] >= grid.cells[row - 1][col]);
                }
            }
        }

        #[test]
        fn center_cell_matches_baseline(
            revenue in 1.0e4f64..1.0e9,
            marketing_ratio in 0.0f64..1.0,
            margin in 0.0f64..=1.0,
            other in 0.0f64..=1.0,
        ) {
            let params = BaselineParams::new(revenue, revenue * marketing_ratio, margin, other);
            let grid = build_default_grid(params).unwrap();
            let expected = round_to(params.baseline_profit() / MILLION, 2);
            prop_assert_eq!(grid.lookup(0.0, 0.0), Some(expected));
        }
    }
}
