use chrono::Utc;
use futures::future::join_all;

use crate::errors::CoreError;
use crate::models::benchmark::find_benchmark;
use crate::models::history::{HistoryCache, HistorySource};
use crate::models::period::TimePeriod;
use crate::models::query::{HistoryRequest, HistoryResponse, HistorySnapshot};
use crate::models::series::RawPoint;
use crate::providers::dashboard_api::DashboardApiProvider;
use crate::providers::registry::BenchmarkProviderRegistry;
use crate::providers::traits::PortfolioHistoryProvider;

/// Loads the raw series a chart needs.
///
/// The portfolio history and every benchmark are fetched concurrently and
/// joined once all have settled. A failing benchmark is logged and left out
/// of the snapshot; it never fails the other series. A failing portfolio
/// fetch is logged and yields an empty series.
pub struct HistoryService {
    portfolio_provider: Box<dyn PortfolioHistoryProvider>,
    benchmark_registry: BenchmarkProviderRegistry,
}

impl HistoryService {
    pub fn new(
        portfolio_provider: Box<dyn PortfolioHistoryProvider>,
        benchmark_registry: BenchmarkProviderRegistry,
    ) -> Self {
        Self {
            portfolio_provider,
            benchmark_registry,
        }
    }

    /// Dashboard API for the portfolio, default benchmark providers.
    pub fn new_with_defaults(api_base_url: &str) -> Self {
        Self::new(
            Box::new(DashboardApiProvider::new(api_base_url)),
            BenchmarkProviderRegistry::new_with_defaults(api_base_url),
        )
    }

    /// Names of the benchmark providers, in fallback order.
    pub fn benchmark_provider_names(&self) -> Vec<String> {
        self.benchmark_registry.provider_names()
    }

    /// Fetch everything `request` asks for, serving fresh entries from
    /// `cache` and storing whatever was fetched.
    ///
    /// The returned response echoes `request` so the caller can drop it if
    /// its inputs moved on in the meantime.
    pub async fn fetch(&self, request: HistoryRequest, cache: &mut HistoryCache) -> HistoryResponse {
        let now = Utc::now();
        let query = &request.query;
        let period = query.period;

        let portfolio_source = HistorySource::Portfolio(query.username.clone());
        let cached_portfolio = cache
            .get_fresh(&portfolio_source, period, now)
            .map(<[RawPoint]>::to_vec);

        let mut failed_benchmarks = Vec::new();
        let mut jobs = Vec::new();
        for id in &query.benchmarks {
            let Some(asset) = find_benchmark(id.as_str()) else {
                log::warn!("Unknown benchmark id '{id}', no series will be merged for it");
                failed_benchmarks.push(id.clone());
                continue;
            };
            let cached = cache
                .get_fresh(&HistorySource::Benchmark(asset.symbol.to_string()), period, now)
                .map(<[RawPoint]>::to_vec);
            jobs.push((id.clone(), asset.symbol, cached));
        }

        let portfolio_fut = async {
            match cached_portfolio {
                Some(points) => {
                    log::debug!("Portfolio history for {} ({period}) served from cache", query.username);
                    Ok((points, false))
                }
                None => self
                    .portfolio_provider
                    .get_portfolio_history(&query.username, period)
                    .await
                    .map(|points| (points, true)),
            }
        };

        let benchmark_futs = jobs.into_iter().map(|(id, symbol, cached)| async move {
            let result = match cached {
                Some(points) => {
                    log::debug!("Benchmark {symbol} ({period}) served from cache");
                    Ok((points, false))
                }
                None => self
                    .fetch_benchmark(symbol, period)
                    .await
                    .map(|points| (points, true)),
            };
            (id, symbol, result)
        });

        let (portfolio_result, benchmark_results) =
            futures::join!(portfolio_fut, join_all(benchmark_futs));

        let mut snapshot = HistorySnapshot::default();

        match portfolio_result {
            Ok((points, fetched)) => {
                let points = sanitize(points, "portfolio");
                if fetched {
                    cache.insert(portfolio_source, period, points.clone(), now);
                }
                snapshot.portfolio = points;
            }
            Err(e) => {
                log::error!(
                    "Failed to fetch portfolio history for {} ({period}) from {}: {e}",
                    query.username,
                    self.portfolio_provider.name()
                );
            }
        }

        for (id, symbol, result) in benchmark_results {
            match result {
                Ok((points, fetched)) => {
                    let points = sanitize(points, symbol);
                    if fetched {
                        cache.insert(
                            HistorySource::Benchmark(symbol.to_string()),
                            period,
                            points.clone(),
                            now,
                        );
                    }
                    snapshot.benchmarks.insert(id, points);
                }
                Err(e) => {
                    log::warn!("Benchmark {id} ({symbol}, {period}) unavailable: {e}");
                    failed_benchmarks.push(id);
                }
            }
        }

        HistoryResponse {
            request,
            snapshot,
            failed_benchmarks,
        }
    }

    /// Fetch one benchmark with automatic fallback.
    ///
    /// Tries providers in registration order and returns the first success.
    async fn fetch_benchmark(&self, symbol: &str, period: TimePeriod) -> Result<Vec<RawPoint>, CoreError> {
        let providers = self.benchmark_registry.providers();
        if providers.is_empty() {
            return Err(CoreError::NoProvider(format!("benchmark {symbol}")));
        }

        let mut last_error = None;
        for provider in &providers {
            match provider.get_benchmark_history(symbol, period).await {
                Ok(points) => return Ok(points),
                Err(e) => {
                    log::warn!("{} failed for {symbol} ({period}), trying next provider: {e}", provider.name());
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| CoreError::NoProvider(format!("benchmark {symbol}"))))
    }
}

/// Drop samples whose value is not a finite number.
fn sanitize(mut points: Vec<RawPoint>, label: &str) -> Vec<RawPoint> {
    let before = points.len();
    points.retain(|p| p.value.is_finite());
    let dropped = before - points.len();
    if dropped > 0 {
        log::debug!("Dropped {dropped} non-finite samples from {label}");
    }
    points
}
