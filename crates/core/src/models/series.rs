use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::borrow::Borrow;

/// One sample of an absolute value series (portfolio total or benchmark price).
///
/// Produced by the history providers; the `date` is kept with its time of day
/// so intraday (`1D`) series stay ordered, and is truncated to a calendar day
/// only when rows are merged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawPoint {
    #[serde(with = "iso_datetime")]
    pub date: DateTime<Utc>,
    pub value: f64,
}

impl RawPoint {
    pub fn new(date: DateTime<Utc>, value: f64) -> Self {
        Self { date, value }
    }

    /// Convenience constructor for daily series (midnight UTC).
    pub fn on_day(day: NaiveDate, value: f64) -> Self {
        Self {
            date: day.and_time(chrono::NaiveTime::MIN).and_utc(),
            value,
        }
    }

    /// Calendar day of this sample (UTC).
    pub fn day(&self) -> NaiveDate {
        day_key(&self.date)
    }
}

/// A sample expressed as percentage change from the first value of its series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedPoint {
    #[serde(with = "iso_datetime")]
    pub date: DateTime<Utc>,
    pub change_percent: f64,
}

impl NormalizedPoint {
    pub fn day(&self) -> NaiveDate {
        day_key(&self.date)
    }
}

/// Truncate a timestamp to its calendar day.
///
/// Every series goes through this one function so a portfolio sample and a
/// benchmark sample taken on the same UTC day always share a row.
pub fn day_key(date: &DateTime<Utc>) -> NaiveDate {
    date.date_naive()
}

/// Key of a series in the merged table: `"portfolio"` or a benchmark id.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeriesId(String);

impl SeriesId {
    pub const PORTFOLIO: &'static str = "portfolio";

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn portfolio() -> Self {
        Self(Self::PORTFOLIO.to_string())
    }

    pub fn is_portfolio(&self) -> bool {
        self.0 == Self::PORTFOLIO
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SeriesId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SeriesId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for SeriesId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Borrow<str> for SeriesId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Parse the date strings the history endpoints emit.
///
/// Accepts RFC 3339 timestamps (`2025-01-15T09:30:00.000Z`), naive timestamps
/// (assumed UTC) and plain ISO days (`2025-01-15`, midnight UTC).
pub fn parse_iso_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(ndt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(ndt.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .map(|d| d.and_time(chrono::NaiveTime::MIN).and_utc())
}

mod iso_datetime {
    use super::*;

    pub fn serialize<S: Serializer>(date: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&date.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(d)?;
        parse_iso_date(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid ISO-8601 date: {raw}")))
    }
}
