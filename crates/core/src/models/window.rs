use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// Smallest visible span, in percentage points of the full table.
pub const MIN_WINDOW_SPAN: f64 = 5.0;

/// Visible sub-range of the chart table, as percentages of its length.
///
/// Always satisfies `0 <= left < right <= 100` and
/// `right - left >= MIN_WINDOW_SPAN`; the only way to build one is through
/// [`Window::new`] or [`Window::full`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "WindowBounds", into = "WindowBounds")]
pub struct Window {
    left_percent: f64,
    right_percent: f64,
}

impl Window {
    /// The whole table.
    pub const fn full() -> Self {
        Self {
            left_percent: 0.0,
            right_percent: 100.0,
        }
    }

    pub fn new(left_percent: f64, right_percent: f64) -> Result<Self, CoreError> {
        let valid = left_percent.is_finite()
            && right_percent.is_finite()
            && left_percent >= 0.0
            && right_percent <= 100.0
            && right_percent - left_percent >= MIN_WINDOW_SPAN;
        if !valid {
            return Err(CoreError::InvalidWindow {
                left: left_percent,
                right: right_percent,
            });
        }
        Ok(Self {
            left_percent,
            right_percent,
        })
    }

    pub fn left_percent(&self) -> f64 {
        self.left_percent
    }

    pub fn right_percent(&self) -> f64 {
        self.right_percent
    }

    pub fn span(&self) -> f64 {
        self.right_percent - self.left_percent
    }

    pub fn is_full(&self) -> bool {
        self.left_percent <= 0.0 && self.right_percent >= 100.0
    }
}

impl Default for Window {
    fn default() -> Self {
        Self::full()
    }
}

/// Unchecked wire form of a [`Window`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct WindowBounds {
    left_percent: f64,
    right_percent: f64,
}

impl TryFrom<WindowBounds> for Window {
    type Error = CoreError;

    fn try_from(bounds: WindowBounds) -> Result<Self, Self::Error> {
        Window::new(bounds.left_percent, bounds.right_percent)
    }
}

impl From<Window> for WindowBounds {
    fn from(window: Window) -> Self {
        WindowBounds {
            left_percent: window.left_percent,
            right_percent: window.right_percent,
        }
    }
}
