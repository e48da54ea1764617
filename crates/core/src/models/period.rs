use chrono::{Datelike, Months, NaiveDate, TimeDelta};
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// Historical range selectable on the performance chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TimePeriod {
    #[serde(rename = "1D")]
    OneDay,
    #[serde(rename = "1W")]
    OneWeek,
    #[serde(rename = "1M")]
    OneMonth,
    #[serde(rename = "YTD")]
    YearToDate,
    #[serde(rename = "1Y")]
    OneYear,
    #[serde(rename = "ALL")]
    All,
}

impl TimePeriod {
    /// All periods in selector order.
    pub const ALL_PERIODS: [TimePeriod; 6] = [
        TimePeriod::OneDay,
        TimePeriod::OneWeek,
        TimePeriod::OneMonth,
        TimePeriod::YearToDate,
        TimePeriod::OneYear,
        TimePeriod::All,
    ];

    /// Wire code used by the history endpoints.
    pub fn code(&self) -> &'static str {
        match self {
            TimePeriod::OneDay => "1D",
            TimePeriod::OneWeek => "1W",
            TimePeriod::OneMonth => "1M",
            TimePeriod::YearToDate => "YTD",
            TimePeriod::OneYear => "1Y",
            TimePeriod::All => "ALL",
        }
    }

    /// First day of the range ending at `today`.
    ///
    /// `ALL` is capped at five years back.
    pub fn start_date(&self, today: NaiveDate) -> NaiveDate {
        let months_back = |m: u32| today.checked_sub_months(Months::new(m)).unwrap_or(today);
        match self {
            TimePeriod::OneDay => today - TimeDelta::days(1),
            TimePeriod::OneWeek => today - TimeDelta::days(7),
            TimePeriod::OneMonth => months_back(1),
            TimePeriod::YearToDate => {
                NaiveDate::from_ymd_opt(today.year(), 1, 1).unwrap_or(today)
            }
            TimePeriod::OneYear => months_back(12),
            TimePeriod::All => months_back(60),
        }
    }

    /// How long a fetched benchmark series for this period stays fresh.
    pub fn cache_ttl(&self) -> TimeDelta {
        match self {
            TimePeriod::OneDay => TimeDelta::seconds(60),
            _ => TimeDelta::seconds(300),
        }
    }
}

impl Default for TimePeriod {
    fn default() -> Self {
        TimePeriod::OneYear
    }
}

impl std::fmt::Display for TimePeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl std::str::FromStr for TimePeriod {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_uppercase();
        TimePeriod::ALL_PERIODS
            .into_iter()
            .find(|p| p.code() == code)
            .ok_or_else(|| CoreError::InvalidPeriod(s.to_string()))
    }
}
