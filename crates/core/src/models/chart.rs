use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::series::SeriesId;

/// One calendar day of the historical comparison table.
///
/// `portfolio` is always present (a day seen only in a benchmark series
/// gets an explicit `0.0`); benchmark columns are sparse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergedRow {
    pub date: NaiveDate,

    /// Portfolio return since the first point of the period, in percent
    pub portfolio: f64,

    /// Benchmark returns keyed by benchmark id, in percent
    #[serde(flatten)]
    pub benchmarks: BTreeMap<SeriesId, f64>,
}

impl MergedRow {
    pub fn new(date: NaiveDate, portfolio: f64) -> Self {
        Self {
            date,
            portfolio,
            benchmarks: BTreeMap::new(),
        }
    }

    /// Value of a column by series id (`"portfolio"` or a benchmark id).
    pub fn value(&self, id: &str) -> Option<f64> {
        if id == SeriesId::PORTFOLIO {
            Some(self.portfolio)
        } else {
            self.benchmarks.get(id).copied()
        }
    }
}

/// One forward month of a Vision Mode projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionPoint {
    pub date: NaiveDate,

    /// Projected portfolio value in currency units
    pub projected_value: f64,

    /// Projected return in percent, continuing the historical curve
    pub projected_change_percent: f64,

    /// Value of the "what-if" ghost projection (lump sum added today)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impact_value: Option<f64>,

    /// Ghost return in percent, relative to the same base present value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impact_change_percent: Option<f64>,
}

impl ProjectionPoint {
    /// What the lump sum added today is worth at this month.
    pub fn impact_delta(&self) -> Option<f64> {
        self.impact_value.map(|v| v - self.projected_value)
    }
}

/// A row of the Vision Mode table: either a historical portfolio point or a
/// projected month. Carries no benchmark columns.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct VisionRow {
    pub date: NaiveDate,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub portfolio: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub projected_value: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub projected_change_percent: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impact_value: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impact_change_percent: Option<f64>,
}

impl VisionRow {
    pub fn historical(date: NaiveDate, change_percent: f64) -> Self {
        Self {
            date,
            portfolio: Some(change_percent),
            ..Default::default()
        }
    }

    /// Overwrite the projection columns from a projected month.
    /// The historical `portfolio` column is left untouched.
    pub fn set_projection(&mut self, point: &ProjectionPoint) {
        self.projected_value = Some(point.projected_value);
        self.projected_change_percent = Some(point.projected_change_percent);
        self.impact_value = point.impact_value;
        self.impact_change_percent = point.impact_change_percent;
    }

    pub fn is_projected(&self) -> bool {
        self.projected_value.is_some()
    }
}

impl From<&ProjectionPoint> for VisionRow {
    fn from(point: &ProjectionPoint) -> Self {
        let mut row = VisionRow {
            date: point.date,
            ..Default::default()
        };
        row.set_projection(point);
        row
    }
}

/// Headline numbers for the end of the projection horizon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionSummary {
    /// Value the projection starts from
    pub present_value: f64,

    /// Monthly growth rate applied (annual rate / 12)
    pub monthly_rate: f64,

    pub horizon_months: u32,

    /// Projected value at the last month (equals `present_value` for an empty horizon)
    pub end_value: f64,

    /// Sum of all monthly contributions over the horizon
    pub total_contributed: f64,

    /// Market growth: `end_value - present_value - total_contributed`
    pub growth: f64,

    /// Ghost projection value at the last month, when an impact amount is set
    pub impact_end_value: Option<f64>,

    /// `impact_end_value - end_value`, never clamped
    pub impact_effect: Option<f64>,
}

/// Historical comparison: portfolio plus benchmark columns.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HistoricalView {
    pub rows: Vec<MergedRow>,
}

/// Vision Mode: portfolio history followed by the forward projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionView {
    pub rows: Vec<VisionRow>,
    pub summary: ProjectionSummary,
}

/// What the rendering layer draws.
///
/// The variants are exclusive: benchmark columns only exist in
/// `Historical`, projection columns only in `Projection`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ChartView {
    Historical(HistoricalView),
    Projection(ProjectionView),
}

impl ChartView {
    pub fn len(&self) -> usize {
        match self {
            ChartView::Historical(v) => v.rows.len(),
            ChartView::Projection(v) => v.rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_projection(&self) -> bool {
        matches!(self, ChartView::Projection(_))
    }
}

/// Header numbers shown above the chart.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PortfolioStats {
    /// Present portfolio value (caller supplied, display currency)
    pub value: f64,

    /// Absolute change over the period in the same currency
    pub change: f64,

    /// Percentage change over the period
    pub change_percent: f64,
}

impl PortfolioStats {
    pub fn is_positive(&self) -> bool {
        self.change_percent >= 0.0
    }
}

/// Padded Y-axis range for the visible rows.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YDomain {
    pub min: f64,
    pub max: f64,
}
