//! CPE - Contribution Profit Elasticity
//!
//! Closed-form contribution profit analysis over a small set of baseline
//! business figures: point elasticities with respect to revenue and marketing
//! spend, and a revenue/marketing sensitivity grid.

pub mod elasticity;
pub mod grid;
pub mod params;
pub mod profit;
pub mod sweep;

use thiserror::Error;

// Re-export main types
pub use elasticity::{compute_elasticities, validate_delta, ElasticityResult, DEFAULT_DELTA};
pub use grid::{build_default_grid, build_grid, build_grid_from_ranges, SensitivityGrid};
pub use params::BaselineParams;
pub use profit::contribution_profit;
pub use sweep::{percent_label, SweepRange, MAX_SWEEP_POINTS};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CpeError {
    #[error("invalid {name} = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },
    #[error("elasticity is undefined when baseline contribution profit is {baseline_profit}")]
    UndefinedElasticity { baseline_profit: f64 },
    #[error("invalid sweep: {0}")]
    InvalidSweep(String),
}
