use thiserror::Error;

/// Unified error type for the entire performance-chart-core library.
///
/// The numeric pipeline (normalize → merge/project → window) never fails;
/// errors only come from the boundaries: settings validation, fetching
/// history, and settings persistence.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Storage / File ──────────────────────────────────────────────
    #[error("Invalid file format: {0}")]
    InvalidFileFormat(String),

    #[error("Unsupported settings format version: {0}")]
    UnsupportedVersion(u16),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    // ── File I/O (native only) ──────────────────────────────────────
    #[error("File I/O error: {0}")]
    FileIO(String),

    // ── API / Network ───────────────────────────────────────────────
    #[error("API error ({provider}): {message}")]
    Api {
        provider: String,
        message: String,
    },

    #[error("Network error: {0}")]
    Network(String),

    #[error("No history provider available for {0}")]
    NoProvider(String),

    // ── Chart inputs ────────────────────────────────────────────────
    #[error("Validation failed: {0}")]
    ValidationError(String),

    #[error("Unknown benchmark: {0}")]
    UnknownBenchmark(String),

    #[error("Invalid time period '{0}': expected one of 1D, 1W, 1M, YTD, 1Y, ALL")]
    InvalidPeriod(String),

    #[error("Invalid window [{left}, {right}]: bounds must lie in 0..=100 and span at least 5 points")]
    InvalidWindow { left: f64, right: f64 },
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<std::io::Error> for CoreError {
    fn from(e: std::io::Error) -> Self {
        CoreError::FileIO(e.to_string())
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Deserialization(e.to_string())
    }
}

impl From<reqwest::Error> for CoreError {
    fn from(e: reqwest::Error) -> Self {
        // reqwest messages carry the full URL; drop the query string so
        // usernames and symbols in parameters don't leak into logs.
        let msg = e.to_string();
        let sanitized = if let Some(idx) = msg.find('?') {
            format!("{}?<query redacted>", &msg[..idx])
        } else {
            msg
        };
        CoreError::Network(sanitized)
    }
}
