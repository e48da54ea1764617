use serde::{Deserialize, Serialize};

use crate::errors::CoreError;
use crate::models::settings::ChartSettings;

/// Current settings file format version.
pub const CURRENT_VERSION: u16 = 1;

/// On-disk envelope around [`ChartSettings`].
///
/// ```text
/// { "format_version": 1, "settings": { "username": "…", "period": "1Y", … } }
/// ```
#[derive(Debug, Serialize, Deserialize)]
pub struct SettingsFile {
    pub format_version: u16,
    pub settings: ChartSettings,
}

/// Serialize settings into a versioned JSON document.
pub fn write_settings(settings: &ChartSettings) -> Result<String, CoreError> {
    let file = SettingsFile {
        format_version: CURRENT_VERSION,
        settings: settings.clone(),
    };
    serde_json::to_string_pretty(&file)
        .map_err(|e| CoreError::Serialization(format!("Failed to serialize settings: {e}")))
}

/// Parse a versioned JSON document back into settings.
///
/// The version is checked before the settings body is interpreted, so a
/// file from a newer release fails with `UnsupportedVersion` rather than a
/// confusing field error.
pub fn read_settings(data: &str) -> Result<ChartSettings, CoreError> {
    let value: serde_json::Value = serde_json::from_str(data)
        .map_err(|e| CoreError::InvalidFileFormat(format!("Settings file is not valid JSON: {e}")))?;

    let version = value
        .get("format_version")
        .and_then(serde_json::Value::as_u64)
        .ok_or_else(|| CoreError::InvalidFileFormat("Missing format_version".into()))?;
    let version = u16::try_from(version)
        .map_err(|_| CoreError::InvalidFileFormat(format!("format_version {version} out of range")))?;

    if version == 0 || version > CURRENT_VERSION {
        return Err(CoreError::UnsupportedVersion(version));
    }

    let file: SettingsFile = serde_json::from_value(value)
        .map_err(|e| CoreError::Deserialization(format!("Failed to deserialize settings: {e}")))?;
    Ok(file.settings)
}
