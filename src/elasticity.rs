//! Elasticity calculator
//!
//! Point elasticities of contribution profit from a one-sided finite
//! difference: each input is bumped up by `delta` on its own while the other
//! is held at baseline.

use serde::{Deserialize, Serialize};

use crate::params::BaselineParams;
use crate::profit::contribution_profit;
use crate::CpeError;

/// Finite-difference step used when no other perturbation size is given (1%)
pub const DEFAULT_DELTA: f64 = 0.01;

/// Elasticities of contribution profit, in display order
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ElasticityResult {
    #[serde(rename = "Revenue Elasticity")]
    pub revenue: f64,
    #[serde(rename = "Marketing Spend Elasticity")]
    pub marketing_spend: f64,
}

impl ElasticityResult {
    pub const REVENUE_LABEL: &'static str = "Revenue Elasticity";
    pub const MARKETING_LABEL: &'static str = "Marketing Spend Elasticity";

    /// Labeled entries in insertion order
    pub fn entries(&self) -> [(&'static str, f64); 2] {
        [
            (Self::REVENUE_LABEL, self.revenue),
            (Self::MARKETING_LABEL, self.marketing_spend),
        ]
    }
}

/// Compute revenue and marketing spend elasticities at the given baseline.
///
/// Fails with [`CpeError::UndefinedElasticity`] when the baseline contribution
/// profit is zero. Profits close to zero are accepted; the elasticities then
/// grow like `1 / CP0`.
pub fn compute_elasticities(
    params: BaselineParams,
    delta: f64,
) -> Result<ElasticityResult, CpeError> {
    params.validate()?;
    validate_delta(delta)?;

    let cogs_pct = params.cogs_pct();
    let baseline_cp = params.baseline_profit();
    if baseline_cp == 0.0 {
        return Err(CpeError::UndefinedElasticity {
            baseline_profit: baseline_cp,
        });
    }

    let revenue_up = params.revenue * (1.0 + delta);
    let cp_revenue_up = contribution_profit(
        revenue_up,
        params.marketing_spend,
        cogs_pct,
        params.other_costs_pct,
    );

    let marketing_up = params.marketing_spend * (1.0 + delta);
    let cp_marketing_up =
        contribution_profit(params.revenue, marketing_up, cogs_pct, params.other_costs_pct);

    let result = ElasticityResult {
        revenue: relative_change_per_step(cp_revenue_up, baseline_cp, delta),
        marketing_spend: relative_change_per_step(cp_marketing_up, baseline_cp, delta),
    };

    if !result.revenue.is_finite() || !result.marketing_spend.is_finite() {
        return Err(CpeError::UndefinedElasticity {
            baseline_profit: baseline_cp,
        });
    }

    Ok(result)
}

fn relative_change_per_step(perturbed: f64, baseline: f64, delta: f64) -> f64 {
    ((perturbed - baseline) / baseline) / delta
}

/// Reject a perturbation step that is not a finite positive fraction.
pub fn validate_delta(delta: f64) -> Result<(), CpeError> {
    if delta.is_finite() && delta > 0.0 {
        return Ok(());
    }

    Err(CpeError::InvalidParameter {
        name: "delta",
        value: delta,
        reason: "must be a finite fraction greater than zero",
    })
}
