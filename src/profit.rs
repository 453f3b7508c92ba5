//! Contribution profit

/// Revenue net of COGS, other costs, and marketing spend.
///
/// Both cost fractions are applied to the `revenue` passed in, so a perturbed
/// revenue carries its own perturbed costs.
pub fn contribution_profit(
    revenue: f64,
    marketing_spend: f64,
    cogs_pct: f64,
    other_costs_pct: f64,
) -> f64 {
    revenue - revenue * cogs_pct - revenue * other_costs_pct - marketing_spend
}
