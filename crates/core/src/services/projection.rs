use chrono::{Months, NaiveDate};

use crate::models::chart::{ProjectionPoint, ProjectionSummary};
use crate::models::scenario::VisionSettings;

/// Inputs of a forward projection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectionInput {
    /// Portfolio value today, in currency units
    pub present_value: f64,

    /// Return of the historical curve at its last point, in percent.
    /// Projected percentages continue from here.
    pub historical_return_percent: f64,

    /// Added after growth at the end of every month
    pub monthly_contribution: f64,

    pub monthly_rate: f64,

    pub horizon_months: u32,

    /// Day of the last historical point; month 1 is one calendar month later
    pub anchor_date: NaiveDate,
}

impl ProjectionInput {
    pub fn from_vision(
        vision: &VisionSettings,
        present_value: f64,
        historical_return_percent: f64,
        anchor_date: NaiveDate,
    ) -> Self {
        Self {
            present_value,
            historical_return_percent,
            monthly_contribution: vision.monthly_contribution,
            monthly_rate: vision.monthly_rate(),
            horizon_months: vision.horizon_months(),
            anchor_date,
        }
    }
}

/// One month of ordinary-annuity compounding: growth first, then the
/// contribution.
pub(crate) fn grow(value: f64, monthly_rate: f64, monthly_contribution: f64) -> f64 {
    value * (1.0 + monthly_rate) + monthly_contribution
}

/// Percent return at `value`, stitched onto the historical curve.
///
/// A zero present value has no meaningful growth ratio; the ratio is taken
/// as 1 so the curve stays flat at the historical return.
pub(crate) fn stitched_change_percent(input: &ProjectionInput, value: f64) -> f64 {
    let ratio = if input.present_value == 0.0 {
        1.0
    } else {
        value / input.present_value
    };
    let pct = input.historical_return_percent + (ratio - 1.0) * 100.0;
    if pct.is_finite() {
        pct
    } else {
        input.historical_return_percent
    }
}

/// Date of projected month `months` after the anchor.
///
/// Each month is offset from the anchor itself, so a 31st anchor clamps to
/// the end of shorter months without drifting.
pub fn month_offset(anchor: NaiveDate, months: u32) -> NaiveDate {
    anchor
        .checked_add_months(Months::new(months))
        .unwrap_or(NaiveDate::MAX)
}

/// Project the portfolio forward one point per month for the horizon.
pub fn project(input: &ProjectionInput) -> Vec<ProjectionPoint> {
    let mut value = input.present_value;
    (1..=input.horizon_months)
        .map(|month| {
            value = grow(value, input.monthly_rate, input.monthly_contribution);
            ProjectionPoint {
                date: month_offset(input.anchor_date, month),
                projected_value: value,
                projected_change_percent: stitched_change_percent(input, value),
                impact_value: None,
                impact_change_percent: None,
            }
        })
        .collect()
}

/// Headline numbers for the last projected month.
pub fn summarize(input: &ProjectionInput, points: &[ProjectionPoint]) -> ProjectionSummary {
    let end_value = points
        .last()
        .map(|p| p.projected_value)
        .unwrap_or(input.present_value);
    let total_contributed = input.monthly_contribution * points.len() as f64;
    let impact_end_value = points.last().and_then(|p| p.impact_value);

    ProjectionSummary {
        present_value: input.present_value,
        monthly_rate: input.monthly_rate,
        horizon_months: input.horizon_months,
        end_value,
        total_contributed,
        growth: end_value - input.present_value - total_contributed,
        impact_end_value,
        impact_effect: impact_end_value.map(|v| v - end_value),
    }
}
