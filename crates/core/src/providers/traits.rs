use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::period::TimePeriod;
use crate::models::series::RawPoint;

/// Source of a user's portfolio value history.
///
/// Implementations return points in ascending date order with values in a
/// single reference currency. An empty Vec means "no data", not an error.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait PortfolioHistoryProvider: Send + Sync {
    /// Human-readable name of this provider (for logs/errors).
    fn name(&self) -> &str;

    async fn get_portfolio_history(
        &self,
        username: &str,
        period: TimePeriod,
    ) -> Result<Vec<RawPoint>, CoreError>;
}

/// Source of benchmark (index or asset) price history.
///
/// Order of the returned points is not guaranteed; the merger sorts
/// benchmark series before normalizing them.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait BenchmarkHistoryProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Price history of a market symbol (e.g. `^GSPC`) over a period.
    async fn get_benchmark_history(
        &self,
        symbol: &str,
        period: TimePeriod,
    ) -> Result<Vec<RawPoint>, CoreError>;
}
