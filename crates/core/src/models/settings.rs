use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

use super::benchmark::find_benchmark;
use super::period::TimePeriod;
use super::scenario::VisionSettings;
use super::series::SeriesId;

/// Which variant of the performance chart is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartMode {
    /// Portfolio against benchmarks over a historical period
    #[default]
    Historical,
    /// Portfolio history followed by a forward projection
    Vision,
}

/// User-configurable chart settings, persisted through `storage`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartSettings {
    /// Owner of the portfolio history
    pub username: String,

    /// Selected historical period
    pub period: TimePeriod,

    /// Selected benchmark ids, in selection order
    pub benchmarks: Vec<SeriesId>,

    /// Whether the portfolio series is drawn (benchmarks are still merged)
    pub portfolio_visible: bool,

    pub mode: ChartMode,

    pub vision: VisionSettings,
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            username: String::new(),
            period: TimePeriod::OneYear,
            benchmarks: Vec::new(),
            portfolio_visible: true,
            mode: ChartMode::Historical,
            vision: VisionSettings::default(),
        }
    }
}

impl ChartSettings {
    pub fn for_user(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            ..Default::default()
        }
    }

    /// Check every field against its allowed range.
    pub fn validate(&self) -> Result<(), CoreError> {
        validate_username(&self.username)?;

        let mut seen = std::collections::HashSet::new();
        for id in &self.benchmarks {
            if find_benchmark(id.as_str()).is_none() {
                return Err(CoreError::UnknownBenchmark(id.to_string()));
            }
            if !seen.insert(id) {
                return Err(CoreError::ValidationError(format!(
                    "Benchmark {id} is selected more than once"
                )));
            }
        }

        self.vision.validate()
    }
}

/// Usernames end up in a URL path segment.
pub(crate) fn validate_username(username: &str) -> Result<(), CoreError> {
    let trimmed = username.trim();
    if trimmed.is_empty() {
        return Err(CoreError::ValidationError("Username must not be empty".into()));
    }
    if trimmed.contains(['/', '?', '#']) {
        return Err(CoreError::ValidationError(format!(
            "Username '{username}' contains characters not allowed in a path segment"
        )));
    }
    if trimmed.chars().all(|c| c == '.') {
        return Err(CoreError::ValidationError(format!(
            "Username '{username}' would be read as a relative path segment"
        )));
    }
    Ok(())
}
