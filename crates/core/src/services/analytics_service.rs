use crate::models::chart::{MergedRow, PortfolioStats, VisionRow, YDomain};
use crate::models::series::{RawPoint, SeriesId};

use super::normalizer::change_percent;

/// Number of intervals on the Vision Mode Y axis.
const VISION_TICK_COUNT: u32 = 5;

/// Header numbers for the selected period.
///
/// `change_percent` compares the last and first points of the raw history;
/// `change` applies that percentage to the present value.
pub fn portfolio_stats(history: &[RawPoint], present_value: f64) -> PortfolioStats {
    let change_percent = match (history.first(), history.last()) {
        (Some(first), Some(last)) => change_percent(last.value, first.value),
        _ => 0.0,
    };
    PortfolioStats {
        value: present_value,
        change: present_value * (change_percent / 100.0),
        change_percent,
    }
}

/// Y-axis range covering the visible series of the (windowed) rows.
///
/// The portfolio column counts only when it is drawn. The range is padded by
/// 10 % of its height, or by one percentage point when it is flat.
pub fn y_domain(rows: &[MergedRow], portfolio_visible: bool, benchmarks: &[SeriesId]) -> Option<YDomain> {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;

    for row in rows {
        let portfolio = portfolio_visible.then_some(row.portfolio);
        let values = portfolio
            .into_iter()
            .chain(benchmarks.iter().filter_map(|id| row.benchmarks.get(id).copied()));
        for value in values.filter(|v| v.is_finite()) {
            min = min.min(value);
            max = max.max(value);
        }
    }

    if !min.is_finite() || !max.is_finite() {
        return None;
    }

    let range = max - min;
    let padding = if range > 0.0 { range * 0.1 } else { 1.0 };
    Some(YDomain {
        min: min - padding,
        max: max + padding,
    })
}

/// Evenly spaced "nice" ticks from 0 up to at least the highest projected
/// percentage. Empty when there are no rows.
pub fn vision_ticks(rows: &[VisionRow]) -> Vec<f64> {
    if rows.is_empty() {
        return Vec::new();
    }

    let max = rows
        .iter()
        .filter_map(|r| r.projected_change_percent)
        .filter(|v| v.is_finite())
        .fold(0.0_f64, f64::max);
    let max = if max <= 0.0 { 1.0 } else { max };

    let step = nice_step(max / f64::from(VISION_TICK_COUNT));
    (0..=VISION_TICK_COUNT).map(|i| f64::from(i) * step).collect()
}

/// Round `rough` up to 1, 2, 5 or 10 times a power of ten.
fn nice_step(rough: f64) -> f64 {
    let magnitude = 10_f64.powf(rough.log10().floor());
    let normalized = rough / magnitude;
    let clean = if normalized <= 1.0 {
        1.0
    } else if normalized <= 2.0 {
        2.0
    } else if normalized <= 5.0 {
        5.0
    } else {
        10.0
    };
    clean * magnitude
}
