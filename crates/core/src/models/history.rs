use chrono::{DateTime, TimeDelta, Utc};
use std::collections::HashMap;

use super::period::TimePeriod;
use super::series::RawPoint;

/// How long a fetched portfolio history stays fresh.
pub const PORTFOLIO_HISTORY_TTL_SECS: i64 = 120;

/// Where a cached series came from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HistorySource {
    /// Portfolio total for a username
    Portfolio(String),
    /// Benchmark price by market symbol
    Benchmark(String),
}

impl HistorySource {
    fn ttl(&self, period: TimePeriod) -> TimeDelta {
        match self {
            HistorySource::Portfolio(_) => TimeDelta::seconds(PORTFOLIO_HISTORY_TTL_SECS),
            HistorySource::Benchmark(_) => period.cache_ttl(),
        }
    }
}

/// Cache key: (source, period) e.g., (Benchmark("^GSPC"), 1Y)
pub type HistoryCacheKey = (HistorySource, TimePeriod);

#[derive(Debug, Clone)]
struct CachedSeries {
    fetched_at: DateTime<Utc>,
    points: Vec<RawPoint>,
}

/// In-memory cache of fetched raw series.
///
/// Entries are served while younger than their TTL (1 minute for `1D`
/// benchmarks, 5 minutes for other benchmark periods, 2 minutes for the
/// portfolio) and ignored afterwards. Nothing here is persisted.
#[derive(Debug, Clone, Default)]
pub struct HistoryCache {
    entries: HashMap<HistoryCacheKey, CachedSeries>,
}

impl HistoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached series for `(source, period)` if it is still fresh at `now`.
    pub fn get_fresh(
        &self,
        source: &HistorySource,
        period: TimePeriod,
        now: DateTime<Utc>,
    ) -> Option<&[RawPoint]> {
        let entry = self.entries.get(&(source.clone(), period))?;
        if now - entry.fetched_at < source.ttl(period) {
            Some(&entry.points)
        } else {
            None
        }
    }

    /// Insert or replace a fetched series.
    pub fn insert(
        &mut self,
        source: HistorySource,
        period: TimePeriod,
        points: Vec<RawPoint>,
        fetched_at: DateTime<Utc>,
    ) {
        self.entries
            .insert((source, period), CachedSeries { fetched_at, points });
    }

    /// Remove every expired entry. Returns the number removed.
    pub fn prune_stale(&mut self, now: DateTime<Utc>) -> usize {
        let before = self.entries.len();
        self.entries
            .retain(|(source, period), entry| now - entry.fetched_at < source.ttl(*period));
        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
