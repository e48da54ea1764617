use crate::models::series::{NormalizedPoint, RawPoint};

/// Percentage change of `value` from `reference`, guarded so a zero or
/// non-finite reference yields `0.0` instead of `inf`/`NaN`.
pub fn change_percent(value: f64, reference: f64) -> f64 {
    if reference == 0.0 || !reference.is_finite() {
        return 0.0;
    }
    let pct = (value / reference - 1.0) * 100.0;
    if pct.is_finite() {
        pct
    } else {
        0.0
    }
}

/// Rescale an absolute series to percent change from its first point.
///
/// Order is preserved; callers sort beforehand when the source does not
/// guarantee ascending dates (see [`normalize_sorted`]). The first output
/// point is always exactly `0.0`.
pub fn normalize(series: &[RawPoint]) -> Vec<NormalizedPoint> {
    let Some(first) = series.first() else {
        return Vec::new();
    };
    let reference = first.value;

    series
        .iter()
        .enumerate()
        .map(|(i, point)| NormalizedPoint {
            date: point.date,
            change_percent: if i == 0 {
                0.0
            } else {
                change_percent(point.value, reference)
            },
        })
        .collect()
}

/// Sort by date (stable, so same-day duplicates keep their input order)
/// and normalize.
pub fn normalize_sorted(mut series: Vec<RawPoint>) -> Vec<NormalizedPoint> {
    series.sort_by_key(|p| p.date);
    normalize(&series)
}
