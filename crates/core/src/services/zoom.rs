use serde::{Deserialize, Serialize};

use crate::models::chart::{ChartView, HistoricalView, ProjectionView};
use crate::models::window::{Window, MIN_WINDOW_SPAN};

/// Percentage points each bound moves per zoom step.
pub const ZOOM_STEP: f64 = 2.0;

/// Direction of a zoom gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoomDirection {
    /// Narrow the window
    In,
    /// Widen the window
    Out,
}

impl ZoomDirection {
    /// Map a wheel delta: scrolling down zooms out, scrolling up zooms in.
    pub fn from_wheel_delta(delta_y: f64) -> Self {
        if delta_y > 0.0 {
            ZoomDirection::Out
        } else {
            ZoomDirection::In
        }
    }
}

/// Move both bounds of `window` by one step.
///
/// Bounds are clamped to `0..=100`. Returns `None` (the caller keeps the
/// current window) when the new span would drop below the minimum.
pub fn zoom(window: &Window, direction: ZoomDirection) -> Option<Window> {
    let delta = match direction {
        ZoomDirection::Out => ZOOM_STEP,
        ZoomDirection::In => -ZOOM_STEP,
    };
    let left = (window.left_percent() - delta).max(0.0);
    let right = (window.right_percent() + delta).min(100.0);
    if right - left < MIN_WINDOW_SPAN {
        return None;
    }
    Window::new(left, right).ok()
}

/// Slice `rows` by percentage bounds.
///
/// `start = floor(left% * len)`, `end = max(start + 2, ceil(right% * len))`.
/// Indices are clamped to the slice, and when the start sits at the very end
/// it is pulled back so two rows remain whenever `rows` has at least two.
/// Works on any bounds, including spans narrower than a [`Window`] allows.
pub fn apply_window_bounds<T>(rows: &[T], left_percent: f64, right_percent: f64) -> &[T] {
    let len = rows.len();
    if len == 0 {
        return rows;
    }
    // float → usize casts saturate and map NaN to 0
    let start = ((left_percent / 100.0) * len as f64).floor().max(0.0) as usize;
    let end_raw = ((right_percent / 100.0) * len as f64).ceil().max(0.0) as usize;

    let start = start.min(len);
    let end = end_raw.max(start.saturating_add(2)).min(len);
    let start = start.min(end.saturating_sub(2));
    &rows[start..end]
}

/// Slice `rows` to the visible part of `window`.
pub fn apply_window<'a, T>(rows: &'a [T], window: &Window) -> &'a [T] {
    apply_window_bounds(rows, window.left_percent(), window.right_percent())
}

/// Copy of `view` holding only the rows visible in `window`.
/// The projection summary always describes the full horizon.
pub fn window_view(view: &ChartView, window: &Window) -> ChartView {
    match view {
        ChartView::Historical(v) => ChartView::Historical(HistoricalView {
            rows: apply_window(&v.rows, window).to_vec(),
        }),
        ChartView::Projection(v) => ChartView::Projection(ProjectionView {
            rows: apply_window(&v.rows, window).to_vec(),
            summary: v.summary.clone(),
        }),
    }
}
