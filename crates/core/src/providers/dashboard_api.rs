use async_trait::async_trait;
use chrono::{NaiveTime, SecondsFormat, Utc};
use reqwest::{Client, Url};
use serde::Deserialize;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;

use crate::errors::CoreError;
use crate::models::period::TimePeriod;
use crate::models::series::RawPoint;
use super::traits::{BenchmarkHistoryProvider, PortfolioHistoryProvider};

const PROVIDER_NAME: &str = "Dashboard API";

/// Client for the dashboard's own history endpoints.
///
/// - `GET /api/portfolio/{username}/history?period=1Y` → portfolio totals
/// - `GET /api/benchmark?symbol=^GSPC&start=…&end=…&period=1Y` → benchmark prices
///
/// Both answer `{ "data": [{ "date": "<ISO-8601>", "value": <number> }, …] }`;
/// a missing or null `data` is treated as an empty series. The server caches
/// benchmark data per (symbol, period), so this provider is registered ahead
/// of Yahoo Finance.
pub struct DashboardApiProvider {
    client: Client,
    base_url: String,
}

impl DashboardApiProvider {
    /// `base_url` is the dashboard origin, e.g. `https://dashboard.example.com`.
    pub fn new(base_url: impl Into<String>) -> Self {
        let builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(Duration::from_secs(30));
        Self {
            client: builder.build().unwrap_or_else(|_| Client::new()),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build `{base}/{segments…}` with each segment percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, CoreError> {
        let mut url = Url::parse(&self.base_url).map_err(|e| CoreError::Api {
            provider: PROVIDER_NAME.into(),
            message: format!("Invalid base URL '{}': {e}", self.base_url),
        })?;
        url.path_segments_mut()
            .map_err(|_| CoreError::Api {
                provider: PROVIDER_NAME.into(),
                message: format!("Base URL '{}' cannot carry a path", self.base_url),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn fetch_series(&self, url: Url, what: &str) -> Result<Vec<RawPoint>, CoreError> {
        let resp: SeriesResponse = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
            .map_err(|e| CoreError::Api {
                provider: PROVIDER_NAME.into(),
                message: format!("Failed to parse {what}: {e}"),
            })?;
        Ok(resp.data.unwrap_or_default())
    }
}

// ── Dashboard API response types ────────────────────────────────────

#[derive(Deserialize)]
struct SeriesResponse {
    #[serde(default)]
    data: Option<Vec<RawPoint>>,
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl PortfolioHistoryProvider for DashboardApiProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn get_portfolio_history(
        &self,
        username: &str,
        period: TimePeriod,
    ) -> Result<Vec<RawPoint>, CoreError> {
        let mut url = self.endpoint(&["api", "portfolio", username, "history"])?;
        url.query_pairs_mut().append_pair("period", period.code());

        self.fetch_series(url, &format!("portfolio history for {username} ({period})"))
            .await
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl BenchmarkHistoryProvider for DashboardApiProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn get_benchmark_history(
        &self,
        symbol: &str,
        period: TimePeriod,
    ) -> Result<Vec<RawPoint>, CoreError> {
        let now = Utc::now();
        let start = period
            .start_date(now.date_naive())
            .and_time(NaiveTime::MIN)
            .and_utc();

        let mut url = self.endpoint(&["api", "benchmark"])?;
        url.query_pairs_mut()
            .append_pair("symbol", symbol)
            .append_pair("start", &start.to_rfc3339_opts(SecondsFormat::Millis, true))
            .append_pair("end", &now.to_rfc3339_opts(SecondsFormat::Millis, true))
            .append_pair("period", period.code());

        self.fetch_series(url, &format!("benchmark history for {symbol} ({period})"))
            .await
    }
}
