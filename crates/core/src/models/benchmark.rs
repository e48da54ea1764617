use serde::Serialize;

use super::series::SeriesId;

/// A market index or asset the portfolio can be compared against.
///
/// Benchmarks are selected by `id` (the column name in merged rows) and
/// fetched by `symbol` (the market-data ticker).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BenchmarkAsset {
    pub id: &'static str,
    pub name: &'static str,
    pub symbol: &'static str,
}

impl BenchmarkAsset {
    pub fn series_id(&self) -> SeriesId {
        SeriesId::new(self.id)
    }
}

/// Benchmarks offered by the compare menu.
pub const BENCHMARK_ASSETS: [BenchmarkAsset; 5] = [
    BenchmarkAsset { id: "SPX", name: "S&P 500", symbol: "^GSPC" },
    BenchmarkAsset { id: "IXIC", name: "NASDAQ", symbol: "^IXIC" },
    BenchmarkAsset { id: "BIST100", name: "BIST 100", symbol: "XU100.IS" },
    BenchmarkAsset { id: "GOLD", name: "Gold", symbol: "GC=F" },
    BenchmarkAsset { id: "BTC", name: "Bitcoin", symbol: "BTC-USD" },
];

/// Look up a benchmark by id (case-sensitive, as stored in preferences).
pub fn find_benchmark(id: &str) -> Option<&'static BenchmarkAsset> {
    BENCHMARK_ASSETS.iter().find(|b| b.id == id)
}
