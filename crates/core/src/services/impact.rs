use serde::{Deserialize, Serialize};

use crate::models::chart::ProjectionPoint;

use super::projection::{grow, month_offset, stitched_change_percent, ProjectionInput};

/// Run the base projection and a parallel "ghost" projection that starts
/// with `impact_amount` added today.
///
/// Both percent series are relative to the base `present_value`, so the gap
/// between the two lines is the effect of the lump sum. Returns `None` when
/// there is no lump sum (`0`) or it is not a finite number.
pub fn simulate_impact(input: &ProjectionInput, impact_amount: f64) -> Option<Vec<ProjectionPoint>> {
    if impact_amount == 0.0 || !impact_amount.is_finite() {
        return None;
    }

    let mut base = input.present_value;
    let mut ghost = input.present_value + impact_amount;

    let points = (1..=input.horizon_months)
        .map(|month| {
            base = grow(base, input.monthly_rate, input.monthly_contribution);
            ghost = grow(ghost, input.monthly_rate, input.monthly_contribution);
            ProjectionPoint {
                date: month_offset(input.anchor_date, month),
                projected_value: base,
                projected_change_percent: stitched_change_percent(input, base),
                impact_value: Some(ghost),
                impact_change_percent: Some(stitched_change_percent(input, ghost)),
            }
        })
        .collect();

    Some(points)
}

/// What spending `amount` today costs in forgone growth.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OpportunityCost {
    pub amount: f64,
    pub annual_rate_percent: f64,
    pub years: u32,

    /// `amount * (1 + rate)^years`, compounded annually
    pub future_value: f64,

    /// `future_value - amount`; negative for negative rates
    pub profit: f64,
}

/// Annually compounded future value of a one-time amount.
pub fn opportunity_cost(amount: f64, annual_rate_percent: f64, years: u32) -> OpportunityCost {
    let exponent = i32::try_from(years).unwrap_or(i32::MAX);
    let future_value = amount * (1.0 + annual_rate_percent / 100.0).powi(exponent);
    OpportunityCost {
        amount,
        annual_rate_percent,
        years,
        future_value,
        profit: future_value - amount,
    }
}
