use async_trait::async_trait;
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use time::OffsetDateTime;

use crate::errors::CoreError;
use crate::models::period::TimePeriod;
use crate::models::series::RawPoint;
use super::traits::BenchmarkHistoryProvider;

const PROVIDER_NAME: &str = "Yahoo Finance";

/// Yahoo Finance provider for benchmark index and asset prices.
///
/// - **Free**: No API key required.
/// - **Coverage**: Indices (`^GSPC`, `^IXIC`, `XU100.IS`), futures (`GC=F`),
///   crypto pairs (`BTC-USD`).
/// - **Data**: Daily closes over the requested period (intraday for `1D`).
///
/// Uses the `yahoo_finance_api` crate. Not WASM-compatible (native
/// reqwest/tokio); the registry only includes it on native targets.
pub struct YahooFinanceProvider {
    connector: yahoo_finance_api::YahooConnector,
}

impl YahooFinanceProvider {
    pub fn new() -> Result<Self, CoreError> {
        let connector = yahoo_finance_api::YahooConnector::new()
            .map_err(|e| CoreError::Api {
                provider: PROVIDER_NAME.into(),
                message: format!("Failed to create connector: {e}"),
            })?;
        Ok(Self { connector })
    }

    /// Convert a `chrono::NaiveDate` to `time::OffsetDateTime` (midnight UTC).
    fn day_to_offset_datetime(date: NaiveDate) -> Result<OffsetDateTime, CoreError> {
        let month = u8::try_from(date.month())
            .ok()
            .and_then(|m| time::Month::try_from(m).ok())
            .ok_or_else(|| CoreError::Api {
                provider: PROVIDER_NAME.into(),
                message: format!("Invalid month in {date}"),
            })?;

        let odt = time::Date::from_calendar_date(date.year(), month, date.day() as u8)
            .map_err(|e| CoreError::Api {
                provider: PROVIDER_NAME.into(),
                message: format!("Invalid date {date}: {e}"),
            })?
            .midnight()
            .assume_utc();
        Ok(odt)
    }

    fn now_offset_datetime(now: DateTime<Utc>) -> Result<OffsetDateTime, CoreError> {
        OffsetDateTime::from_unix_timestamp(now.timestamp()).map_err(|e| CoreError::Api {
            provider: PROVIDER_NAME.into(),
            message: format!("Invalid timestamp {now}: {e}"),
        })
    }
}

#[async_trait]
impl BenchmarkHistoryProvider for YahooFinanceProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn get_benchmark_history(
        &self,
        symbol: &str,
        period: TimePeriod,
    ) -> Result<Vec<RawPoint>, CoreError> {
        let now = Utc::now();
        let start = Self::day_to_offset_datetime(period.start_date(now.date_naive()))?;
        let end = Self::now_offset_datetime(now)?;

        let resp = self
            .connector
            .get_quote_history(symbol, start, end)
            .await
            .map_err(|e| CoreError::Api {
                provider: PROVIDER_NAME.into(),
                message: format!("Failed to fetch {period} history for {symbol}: {e}"),
            })?;

        let quotes = resp.quotes().map_err(|e| CoreError::Api {
            provider: PROVIDER_NAME.into(),
            message: format!("Failed to parse quotes for {symbol}: {e}"),
        })?;

        let points = quotes
            .iter()
            .filter_map(|q| {
                let date = DateTime::from_timestamp(q.timestamp as i64, 0)?;
                Some(RawPoint::new(date, q.close))
            })
            .collect();

        Ok(points)
    }
}
