use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// Allowed projection horizon, in years.
pub const MIN_VISION_YEARS: u32 = 1;
pub const MAX_VISION_YEARS: u32 = 30;

/// Allowed range for a user-entered annual rate, in percent.
pub const MIN_CUSTOM_RATE_PERCENT: f64 = -50.0;
pub const MAX_CUSTOM_RATE_PERCENT: f64 = 100.0;

/// Market scenario driving a Vision Mode projection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scenario {
    /// 3 % a year
    Bear,
    /// 10 % a year
    Expected,
    /// 15 % a year
    Bull,
    /// User-entered annual rate, in percent (e.g. `7.5`)
    Custom(f64),
}

impl Scenario {
    /// Annual growth rate as a fraction (`0.10` for 10 %).
    pub fn annual_rate(&self) -> f64 {
        match self {
            Scenario::Bear => 0.03,
            Scenario::Expected => 0.10,
            Scenario::Bull => 0.15,
            Scenario::Custom(percent) => percent / 100.0,
        }
    }

    /// Monthly rate applied by the projection.
    ///
    /// This is the annual rate divided by 12, not the geometric
    /// `(1 + r)^(1/12) - 1`; projections are compared against figures
    /// computed this way, so it stays.
    pub fn monthly_rate(&self) -> f64 {
        self.annual_rate() / 12.0
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if let Scenario::Custom(percent) = self {
            if !percent.is_finite()
                || !(MIN_CUSTOM_RATE_PERCENT..=MAX_CUSTOM_RATE_PERCENT).contains(percent)
            {
                return Err(CoreError::ValidationError(format!(
                    "Custom annual rate {percent}% is outside {MIN_CUSTOM_RATE_PERCENT}..={MAX_CUSTOM_RATE_PERCENT}%"
                )));
            }
        }
        Ok(())
    }
}

impl Default for Scenario {
    fn default() -> Self {
        Scenario::Expected
    }
}

/// Inputs of the Vision Mode projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisionSettings {
    /// Projection horizon in years
    pub years: u32,

    /// Amount added at the end of every projected month
    pub monthly_contribution: f64,

    pub scenario: Scenario,

    /// One-time lump sum for the ghost projection; `0` disables it
    pub impact_amount: f64,
}

impl Default for VisionSettings {
    fn default() -> Self {
        Self {
            years: 10,
            monthly_contribution: 0.0,
            scenario: Scenario::Expected,
            impact_amount: 0.0,
        }
    }
}

impl VisionSettings {
    /// Months to project; capped at the longest allowed horizon so
    /// unvalidated settings cannot overflow.
    pub fn horizon_months(&self) -> u32 {
        self.years.min(MAX_VISION_YEARS) * 12
    }

    pub fn monthly_rate(&self) -> f64 {
        self.scenario.monthly_rate()
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if !(MIN_VISION_YEARS..=MAX_VISION_YEARS).contains(&self.years) {
            return Err(CoreError::ValidationError(format!(
                "Vision horizon of {} years is outside {MIN_VISION_YEARS}..={MAX_VISION_YEARS}",
                self.years
            )));
        }
        if !self.monthly_contribution.is_finite() || self.monthly_contribution < 0.0 {
            return Err(CoreError::ValidationError(format!(
                "Monthly contribution must be a finite, non-negative amount (got {})",
                self.monthly_contribution
            )));
        }
        if !self.impact_amount.is_finite() {
            return Err(CoreError::ValidationError(format!(
                "Impact amount must be finite (got {})",
                self.impact_amount
            )));
        }
        self.scenario.validate()
    }
}
