pub mod errors;
pub mod models;
pub mod providers;
pub mod services;
pub mod storage;

use chrono::NaiveDate;
use models::{
    benchmark::find_benchmark,
    chart::{ChartView, PortfolioStats, YDomain},
    history::HistoryCache,
    period::TimePeriod,
    query::{ApplyOutcome, HistoryQuery, HistoryRequest, HistoryResponse, HistorySnapshot},
    scenario::{Scenario, VisionSettings},
    series::SeriesId,
    settings::{ChartMode, ChartSettings},
    window::Window,
};
use services::{
    analytics_service,
    chart_service::ChartService,
    history_service::HistoryService,
    zoom::{self, ZoomDirection},
};
use storage::manager::StorageManager;

use errors::CoreError;

/// Main entry point for the performance chart core.
///
/// Holds the chart inputs (settings, present value, zoom window) and the
/// latest raw history snapshot. Derived data is never stored: [`view`]
/// reruns normalize → merge/project on every call, and [`visible_view`]
/// slices that result by the current window.
///
/// Fetching is split in three steps so a UI can run it in the background:
/// [`history_request`] tags the current query, [`HistoryService::fetch`]
/// loads it, and [`apply_history`] accepts the response only if the inputs
/// haven't changed since. [`refresh`] does all three in one go.
///
/// [`view`]: PerformanceChart::view
/// [`visible_view`]: PerformanceChart::visible_view
/// [`history_request`]: PerformanceChart::history_request
/// [`apply_history`]: PerformanceChart::apply_history
/// [`refresh`]: PerformanceChart::refresh
#[must_use]
pub struct PerformanceChart {
    settings: ChartSettings,
    /// Present portfolio value in the reference currency (caller supplied)
    present_value: f64,
    window: Window,
    /// Bumped whenever the history query changes
    generation: u64,
    snapshot: HistorySnapshot,
    failed_benchmarks: Vec<SeriesId>,
    cache: HistoryCache,
    chart_service: ChartService,
}

impl std::fmt::Debug for PerformanceChart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PerformanceChart")
            .field("settings", &self.settings)
            .field("present_value", &self.present_value)
            .field("window", &self.window)
            .field("generation", &self.generation)
            .field("portfolio_points", &self.snapshot.portfolio.len())
            .field("benchmarks", &self.snapshot.benchmarks.len())
            .field("cached_series", &self.cache.len())
            .finish()
    }
}

impl PerformanceChart {
    /// Chart for `username` with default settings (1Y, no benchmarks, historical mode).
    pub fn new(username: &str, present_value: f64) -> Result<Self, CoreError> {
        Self::with_settings(ChartSettings::for_user(username), present_value)
    }

    /// Chart with explicit settings, e.g. loaded through `storage`.
    pub fn with_settings(settings: ChartSettings, present_value: f64) -> Result<Self, CoreError> {
        settings.validate()?;
        validate_present_value(present_value)?;
        Ok(Self {
            settings,
            present_value,
            window: Window::full(),
            generation: 0,
            snapshot: HistorySnapshot::default(),
            failed_benchmarks: Vec::new(),
            cache: HistoryCache::new(),
            chart_service: ChartService::new(),
        })
    }

    // ── Settings ────────────────────────────────────────────────────

    #[must_use]
    pub fn settings(&self) -> &ChartSettings {
        &self.settings
    }

    #[must_use]
    pub fn present_value(&self) -> f64 {
        self.present_value
    }

    /// Update the present portfolio value (already converted to the
    /// reference currency). Only the projection and header stats use it.
    pub fn set_present_value(&mut self, value: f64) -> Result<(), CoreError> {
        validate_present_value(value)?;
        self.present_value = value;
        Ok(())
    }

    /// Select a historical period. Resets the zoom window.
    pub fn set_period(&mut self, period: TimePeriod) {
        if self.settings.period == period {
            return;
        }
        let before = self.current_query();
        self.settings.period = period;
        self.window = Window::full();
        self.bump_if_query_changed(&before);
    }

    /// Switch between the historical comparison and Vision Mode.
    /// Resets the zoom window, since the two tables differ.
    pub fn set_mode(&mut self, mode: ChartMode) {
        if self.settings.mode == mode {
            return;
        }
        let before = self.current_query();
        self.settings.mode = mode;
        self.window = Window::full();
        self.bump_if_query_changed(&before);
    }

    /// Add or remove a benchmark. Returns `true` if it is now selected.
    pub fn toggle_benchmark(&mut self, id: &str) -> Result<bool, CoreError> {
        if find_benchmark(id).is_none() {
            return Err(CoreError::UnknownBenchmark(id.to_string()));
        }
        let before = self.current_query();
        let selected = match self.settings.benchmarks.iter().position(|b| b.as_str() == id) {
            Some(idx) => {
                self.settings.benchmarks.remove(idx);
                false
            }
            None => {
                self.settings.benchmarks.push(SeriesId::new(id));
                true
            }
        };
        self.bump_if_query_changed(&before);
        Ok(selected)
    }

    /// Replace the benchmark selection (e.g. restoring saved preferences).
    pub fn set_benchmarks(&mut self, ids: Vec<SeriesId>) -> Result<(), CoreError> {
        let mut candidate = self.settings.clone();
        candidate.benchmarks = ids;
        candidate.validate()?;
        let before = self.current_query();
        self.settings = candidate;
        self.bump_if_query_changed(&before);
        Ok(())
    }

    /// Show or hide the portfolio series. Returns the new visibility.
    /// Rendering only; the merged table is unchanged.
    pub fn toggle_portfolio_visible(&mut self) -> bool {
        self.settings.portfolio_visible = !self.settings.portfolio_visible;
        self.settings.portfolio_visible
    }

    pub fn set_vision_years(&mut self, years: u32) -> Result<(), CoreError> {
        self.update_vision(|v| v.years = years)
    }

    pub fn set_monthly_contribution(&mut self, amount: f64) -> Result<(), CoreError> {
        self.update_vision(|v| v.monthly_contribution = amount)
    }

    pub fn set_scenario(&mut self, scenario: Scenario) -> Result<(), CoreError> {
        self.update_vision(|v| v.scenario = scenario)
    }

    /// Lump sum for the ghost projection; `0` turns it off.
    pub fn set_impact_amount(&mut self, amount: f64) -> Result<(), CoreError> {
        self.update_vision(|v| v.impact_amount = amount)
    }

    /// Export settings as a versioned JSON document.
    pub fn export_settings(&self) -> Result<String, CoreError> {
        StorageManager::save_to_string(&self.settings)
    }

    /// Replace all settings from an exported document. The loaded
    /// settings are validated before anything changes.
    pub fn import_settings(&mut self, data: &str) -> Result<(), CoreError> {
        let settings = StorageManager::load_from_str(data)?;
        let before = self.current_query();
        if self.settings.mode != settings.mode || self.settings.period != settings.period {
            self.window = Window::full();
        }
        self.settings = settings;
        self.bump_if_query_changed(&before);
        Ok(())
    }

    // ── Zoom ────────────────────────────────────────────────────────

    #[must_use]
    pub fn window(&self) -> Window {
        self.window
    }

    pub fn set_window(&mut self, window: Window) {
        self.window = window;
    }

    /// Apply one zoom step. Returns `false` (window unchanged) when the
    /// step would shrink the window below its minimum span.
    pub fn zoom(&mut self, direction: ZoomDirection) -> bool {
        match zoom::zoom(&self.window, direction) {
            Some(window) => {
                self.window = window;
                true
            }
            None => false,
        }
    }

    pub fn reset_zoom(&mut self) {
        self.window = Window::full();
    }

    // ── History ─────────────────────────────────────────────────────

    /// The query the current inputs need.
    ///
    /// Vision Mode always projects from the full history and never loads
    /// benchmarks.
    #[must_use]
    pub fn current_query(&self) -> HistoryQuery {
        match self.settings.mode {
            ChartMode::Historical => HistoryQuery {
                username: self.settings.username.clone(),
                period: self.settings.period,
                benchmarks: self.settings.benchmarks.clone(),
            },
            ChartMode::Vision => HistoryQuery {
                username: self.settings.username.clone(),
                period: TimePeriod::All,
                benchmarks: Vec::new(),
            },
        }
    }

    /// Tag the current query for the fetch layer.
    #[must_use]
    pub fn history_request(&self) -> HistoryRequest {
        HistoryRequest {
            generation: self.generation,
            query: self.current_query(),
        }
    }

    /// Accept a fetch result if it answers the current query.
    ///
    /// A response for an older generation or a different query is dropped
    /// and the current snapshot is kept.
    pub fn apply_history(&mut self, response: HistoryResponse) -> ApplyOutcome {
        let request = &response.request;
        if request.generation != self.generation || request.query != self.current_query() {
            log::debug!(
                "Discarding stale history response (generation {} vs current {})",
                request.generation,
                self.generation
            );
            return ApplyOutcome::Stale;
        }
        self.snapshot = response.snapshot;
        self.failed_benchmarks = response.failed_benchmarks;
        ApplyOutcome::Applied
    }

    /// Fetch the current query through `service` and apply it.
    pub async fn refresh(&mut self, service: &HistoryService) -> ApplyOutcome {
        let request = self.history_request();
        self.prune_cache(chrono::Utc::now());

        // Take the cache out so `service.fetch` can borrow it mutably while
        // `self` stays untouched until the response is applied.
        let mut cache = std::mem::take(&mut self.cache);
        let response = service.fetch(request, &mut cache).await;
        self.cache = cache;

        self.apply_history(response)
    }

    #[must_use]
    pub fn snapshot(&self) -> &HistorySnapshot {
        &self.snapshot
    }

    /// Benchmarks that failed in the last applied fetch.
    #[must_use]
    pub fn failed_benchmarks(&self) -> &[SeriesId] {
        &self.failed_benchmarks
    }

    /// Drop cached series that expired by `now`. Returns the number removed.
    pub fn prune_cache(&mut self, now: chrono::DateTime<chrono::Utc>) -> usize {
        let removed = self.cache.prune_stale(now);
        if removed > 0 {
            log::debug!("Pruned {removed} expired history series");
        }
        removed
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    #[must_use]
    pub fn cached_series_count(&self) -> usize {
        self.cache.len()
    }

    // ── Derived data ────────────────────────────────────────────────

    /// Full chart table for the current inputs.
    #[must_use]
    pub fn view(&self) -> ChartView {
        self.view_at(chrono::Utc::now().date_naive())
    }

    /// Like [`view`](Self::view) with an explicit "today", used to anchor a
    /// projection when there is no portfolio history.
    #[must_use]
    pub fn view_at(&self, today: NaiveDate) -> ChartView {
        self.chart_service
            .build_view(&self.settings, &self.snapshot, self.present_value, today)
    }

    /// The rows inside the current zoom window.
    #[must_use]
    pub fn visible_view(&self) -> ChartView {
        zoom::window_view(&self.view(), &self.window)
    }

    /// Header numbers for the loaded portfolio history.
    #[must_use]
    pub fn portfolio_stats(&self) -> PortfolioStats {
        analytics_service::portfolio_stats(&self.snapshot.portfolio, self.present_value)
    }

    /// Y-axis range for the visible historical rows; `None` in Vision Mode
    /// or when nothing is visible.
    #[must_use]
    pub fn y_domain(&self) -> Option<YDomain> {
        match self.visible_view() {
            ChartView::Historical(view) => analytics_service::y_domain(
                &view.rows,
                self.settings.portfolio_visible,
                &self.settings.benchmarks,
            ),
            ChartView::Projection(_) => None,
        }
    }

    /// Y-axis ticks for Vision Mode; empty in historical mode.
    #[must_use]
    pub fn vision_ticks(&self) -> Vec<f64> {
        match self.view() {
            ChartView::Projection(view) => analytics_service::vision_ticks(&view.rows),
            ChartView::Historical(_) => Vec::new(),
        }
    }

    // ── Internal ────────────────────────────────────────────────────

    /// Start a new generation when an input change altered the query, so
    /// in-flight responses for the old one are discarded.
    fn bump_if_query_changed(&mut self, before: &HistoryQuery) {
        if self.current_query() != *before {
            self.generation = self.generation.wrapping_add(1);
        }
    }

    fn update_vision(&mut self, apply: impl FnOnce(&mut VisionSettings)) -> Result<(), CoreError> {
        let mut vision = self.settings.vision.clone();
        apply(&mut vision);
        vision.validate()?;
        self.settings.vision = vision;
        Ok(())
    }
}

fn validate_present_value(value: f64) -> Result<(), CoreError> {
    if !value.is_finite() {
        return Err(CoreError::ValidationError(format!(
            "Present value must be a finite number (got {value})"
        )));
    }
    Ok(())
}
