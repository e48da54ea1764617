// ═══════════════════════════════════════════════════════════════════
// Error Tests — CoreError variants, Display formatting, From impls
// ═══════════════════════════════════════════════════════════════════

use performance_chart_core::errors::CoreError;

// ── Display formatting ──────────────────────────────────────────────

mod display {
    use super::*;

    #[test]
    fn invalid_file_format() {
        let err = CoreError::InvalidFileFormat("Missing format_version".into());
        assert_eq!(err.to_string(), "Invalid file format: Missing format_version");
    }

    #[test]
    fn unsupported_version() {
        let err = CoreError::UnsupportedVersion(7);
        assert_eq!(err.to_string(), "Unsupported settings format version: 7");
    }

    #[test]
    fn api_error_names_provider() {
        let err = CoreError::Api {
            provider: "Dashboard API".into(),
            message: "HTTP 502".into(),
        };
        assert_eq!(err.to_string(), "API error (Dashboard API): HTTP 502");
    }

    #[test]
    fn network() {
        let err = CoreError::Network("connection refused".into());
        assert_eq!(err.to_string(), "Network error: connection refused");
    }

    #[test]
    fn no_provider() {
        let err = CoreError::NoProvider("benchmark ^GSPC".into());
        assert_eq!(err.to_string(), "No history provider available for benchmark ^GSPC");
    }

    #[test]
    fn unknown_benchmark() {
        let err = CoreError::UnknownBenchmark("DAX".into());
        assert_eq!(err.to_string(), "Unknown benchmark: DAX");
    }

    #[test]
    fn invalid_period_lists_codes() {
        let err = CoreError::InvalidPeriod("2Y".into());
        let msg = err.to_string();
        assert!(msg.starts_with("Invalid time period '2Y'"));
        assert!(msg.contains("YTD"));
        assert!(msg.contains("ALL"));
    }

    #[test]
    fn invalid_window_shows_bounds() {
        let err = CoreError::InvalidWindow {
            left: 40.0,
            right: 42.0,
        };
        assert!(err.to_string().contains("[40, 42]"));
    }

    #[test]
    fn validation() {
        let err = CoreError::ValidationError("Username must not be empty".into());
        assert_eq!(err.to_string(), "Validation failed: Username must not be empty");
    }
}

// ── From impls ──────────────────────────────────────────────────────

mod conversions {
    use super::*;

    #[test]
    fn from_io_error() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "settings.json missing");
        let err: CoreError = io.into();
        assert!(matches!(err, CoreError::FileIO(ref m) if m.contains("settings.json missing")));
    }

    #[test]
    fn from_serde_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{ nope").unwrap_err();
        let err: CoreError = json_err.into();
        assert!(matches!(err, CoreError::Deserialization(_)));
    }

    #[test]
    fn question_mark_propagates_io() {
        fn read_missing() -> Result<String, CoreError> {
            Ok(std::fs::read_to_string("/definitely/not/here/settings.json")?)
        }
        assert!(matches!(read_missing(), Err(CoreError::FileIO(_))));
    }
}

// ── Trait bounds ────────────────────────────────────────────────────

mod bounds {
    use super::*;

    #[test]
    fn core_error_is_send_sync_and_std_error() {
        fn assert_bounds<T: Send + Sync + std::error::Error + 'static>() {}
        assert_bounds::<CoreError>();
    }

    #[test]
    fn debug_format_names_variant() {
        let err = CoreError::UnknownBenchmark("DAX".into());
        assert!(format!("{err:?}").contains("UnknownBenchmark"));
    }
}
