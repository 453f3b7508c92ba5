//! Baseline parameters
//!
//! The scalar business figures every computation starts from.

use serde::{Deserialize, Serialize};

use crate::profit::contribution_profit;
use crate::CpeError;

/// Baseline figures shared by the elasticity calculator and the grid builder
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BaselineParams {
    /// Baseline revenue (currency, > 0)
    pub revenue: f64,
    /// Baseline marketing spend (currency, >= 0)
    pub marketing_spend: f64,
    /// Product margin as a fraction of revenue, in [0, 1]
    pub product_margin: f64,
    /// Other costs as a fraction of revenue, in [0, 1]
    pub other_costs_pct: f64,
}

impl BaselineParams {
    /// Create new baseline parameters
    pub fn new(
        revenue: f64,
        marketing_spend: f64,
        product_margin: f64,
        other_costs_pct: f64,
    ) -> Self {
        Self {
            revenue,
            marketing_spend,
            product_margin,
            other_costs_pct,
        }
    }

    /// Default figures: 5M revenue, 650k marketing, 45% margin, 30% other costs
    pub fn default_params() -> Self {
        Self {
            revenue: 5_000_000.0,
            marketing_spend: 650_000.0,
            product_margin: 0.45,
            other_costs_pct: 0.30,
        }
    }

    /// Cost of goods sold as a fraction of revenue (1 - margin)
    pub fn cogs_pct(&self) -> f64 {
        1.0 - self.product_margin
    }

    /// Contribution profit at the unperturbed baseline
    pub fn baseline_profit(&self) -> f64 {
        contribution_profit(
            self.revenue,
            self.marketing_spend,
            self.cogs_pct(),
            self.other_costs_pct,
        )
    }

    /// Reject inputs that have no meaningful contribution profit.
    pub fn validate(&self) -> Result<(), CpeError> {
        ensure_finite("revenue", self.revenue)?;
        ensure_finite("marketing_spend", self.marketing_spend)?;
        ensure_finite("product_margin", self.product_margin)?;
        ensure_finite("other_costs_pct", self.other_costs_pct)?;

        if self.revenue <= 0.0 {
            return Err(CpeError::InvalidParameter {
                name: "revenue",
                value: self.revenue,
                reason: "must be greater than zero",
            });
        }

        if self.marketing_spend < 0.0 {
            return Err(CpeError::InvalidParameter {
                name: "marketing_spend",
                value: self.marketing_spend,
                reason: "must not be negative",
            });
        }

        ensure_fraction("product_margin", self.product_margin)?;
        ensure_fraction("other_costs_pct", self.other_costs_pct)?;

        Ok(())
    }
}

impl Default for BaselineParams {
    fn default() -> Self {
        Self::default_params()
    }
}

fn ensure_finite(name: &'static str, value: f64) -> Result<(), CpeError> {
    if value.is_finite() {
        return Ok(());
    }

    Err(CpeError::InvalidParameter {
        name,
        value,
        reason: "must be finite",
    })
}

fn ensure_fraction(name: &'static str, value: f64) -> Result<(), CpeError> {
    if (0.0..=1.0).contains(&value) {
        return Ok(());
    }

    Err(CpeError::InvalidParameter {
        name,
        value,
        reason: "must be a fraction in [0, 1]",
    })
}
