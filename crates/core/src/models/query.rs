use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::period::TimePeriod;
use super::series::{RawPoint, SeriesId};

/// Everything the fetch layer needs to load one chart's raw history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryQuery {
    pub username: String,
    pub period: TimePeriod,

    /// Benchmark ids to fetch; empty in Vision Mode
    pub benchmarks: Vec<SeriesId>,
}

/// A query tagged with the generation of the inputs that produced it.
///
/// The generation is bumped on every input change, so a response whose
/// request no longer matches is known to be stale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRequest {
    pub generation: u64,
    pub query: HistoryQuery,
}

/// Raw series returned by the fetch layer, tagged with its request.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HistorySnapshot {
    pub portfolio: Vec<RawPoint>,

    /// Successfully fetched benchmark series by id
    pub benchmarks: BTreeMap<SeriesId, Vec<RawPoint>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub request: HistoryRequest,
    pub snapshot: HistorySnapshot,

    /// Benchmarks that failed to load (already logged); absent from `snapshot`
    pub failed_benchmarks: Vec<SeriesId>,
}

/// Result of offering a response to the chart state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    Applied,
    /// The inputs changed since the request was issued; nothing was applied
    Stale,
}
