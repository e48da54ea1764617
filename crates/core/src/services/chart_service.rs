use chrono::NaiveDate;
use std::collections::{BTreeMap, HashSet};

use crate::models::chart::{ChartView, HistoricalView, MergedRow, ProjectionView, VisionRow};
use crate::models::query::HistorySnapshot;
use crate::models::scenario::VisionSettings;
use crate::models::series::{RawPoint, SeriesId};
use crate::models::settings::{ChartMode, ChartSettings};

use super::impact::simulate_impact;
use super::merger::merge_raw;
use super::normalizer::normalize;
use super::projection::{project, summarize, ProjectionInput};

/// Turns a raw history snapshot plus chart settings into the table the
/// rendering layer draws.
///
/// Every call recomputes from scratch; there is no cached intermediate
/// state, so identical inputs always give identical output.
pub struct ChartService;

impl ChartService {
    pub fn new() -> Self {
        Self
    }

    /// Build the view for the current mode.
    ///
    /// `today` anchors a projection when there is no portfolio history yet.
    pub fn build_view(
        &self,
        settings: &ChartSettings,
        snapshot: &HistorySnapshot,
        present_value: f64,
        today: NaiveDate,
    ) -> ChartView {
        match settings.mode {
            ChartMode::Historical => ChartView::Historical(
                self.historical_view(snapshot, &settings.benchmarks),
            ),
            ChartMode::Vision => ChartView::Projection(self.projection_view(
                &settings.vision,
                &snapshot.portfolio,
                present_value,
                today,
            )),
        }
    }

    /// Portfolio merged with the selected benchmarks.
    ///
    /// Benchmarks in the snapshot that are no longer selected are left out,
    /// so deselecting one takes effect before the next fetch lands.
    pub fn historical_view(&self, snapshot: &HistorySnapshot, selected: &[SeriesId]) -> HistoricalView {
        let selected: HashSet<&SeriesId> = selected.iter().collect();
        let benchmarks: BTreeMap<SeriesId, Vec<RawPoint>> = snapshot
            .benchmarks
            .iter()
            .filter(|(id, _)| selected.contains(id))
            .map(|(id, series)| (id.clone(), series.clone()))
            .collect();

        let rows: Vec<MergedRow> = merge_raw(&snapshot.portfolio, &benchmarks);
        HistoricalView { rows }
    }

    /// Portfolio history followed by the projection (and ghost projection
    /// when an impact amount is set). Benchmarks never appear here.
    pub fn projection_view(
        &self,
        vision: &VisionSettings,
        portfolio: &[RawPoint],
        present_value: f64,
        today: NaiveDate,
    ) -> ProjectionView {
        let present_value = if present_value.is_finite() { present_value } else { 0.0 };
        let normalized = normalize(portfolio);

        let historical_return = normalized.last().map(|p| p.change_percent).unwrap_or(0.0);
        let anchor = portfolio.last().map(|p| p.day()).unwrap_or(today);
        let input = ProjectionInput::from_vision(vision, present_value, historical_return, anchor);

        let points =
            simulate_impact(&input, vision.impact_amount).unwrap_or_else(|| project(&input));

        let mut rows: BTreeMap<NaiveDate, VisionRow> = BTreeMap::new();
        for point in &normalized {
            let day = point.day();
            rows.entry(day)
                .and_modify(|row| row.portfolio = Some(point.change_percent))
                .or_insert_with(|| VisionRow::historical(day, point.change_percent));
        }
        for point in &points {
            rows.entry(point.date)
                .and_modify(|row| row.set_projection(point))
                .or_insert_with(|| VisionRow::from(point));
        }

        ProjectionView {
            rows: rows.into_values().collect(),
            summary: summarize(&input, &points),
        }
    }
}

impl Default for ChartService {
    fn default() -> Self {
        Self::new()
    }
}
