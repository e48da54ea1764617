use chrono::NaiveDate;
use std::collections::BTreeMap;

use crate::models::chart::MergedRow;
use crate::models::series::{NormalizedPoint, RawPoint, SeriesId};

use super::normalizer::{normalize, normalize_sorted};

/// Combine the normalized portfolio with normalized benchmarks into one
/// row per calendar day, ascending.
///
/// Rows are seeded from the portfolio; a day that only a benchmark has gets
/// a row with `portfolio = 0.0`. Within one series, a later point on the
/// same day overwrites an earlier one. Existing rows are never dropped.
pub fn merge(
    portfolio: &[NormalizedPoint],
    benchmarks: &BTreeMap<SeriesId, Vec<NormalizedPoint>>,
) -> Vec<MergedRow> {
    let mut rows: BTreeMap<NaiveDate, MergedRow> = BTreeMap::new();

    for point in portfolio {
        let day = point.day();
        rows.entry(day)
            .and_modify(|row| row.portfolio = point.change_percent)
            .or_insert_with(|| MergedRow::new(day, point.change_percent));
    }

    for (id, series) in benchmarks {
        for point in series {
            let day = point.day();
            rows.entry(day)
                .or_insert_with(|| MergedRow::new(day, 0.0))
                .benchmarks
                .insert(id.clone(), point.change_percent);
        }
    }

    rows.into_values().collect()
}

/// Normalize raw series and merge them.
///
/// The portfolio history arrives ordered from its provider and is used as
/// is; benchmark series are sorted by date first.
pub fn merge_raw(
    portfolio: &[RawPoint],
    benchmarks: &BTreeMap<SeriesId, Vec<RawPoint>>,
) -> Vec<MergedRow> {
    let normalized_portfolio = normalize(portfolio);
    let normalized_benchmarks: BTreeMap<SeriesId, Vec<NormalizedPoint>> = benchmarks
        .iter()
        .map(|(id, series)| (id.clone(), normalize_sorted(series.clone())))
        .collect();
    merge(&normalized_portfolio, &normalized_benchmarks)
}
