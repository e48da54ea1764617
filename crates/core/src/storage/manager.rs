use crate::errors::CoreError;
use crate::models::settings::ChartSettings;

use super::format;

/// High-level storage operations: save/load chart settings to/from strings or files.
///
/// Loaded settings are validated before they are returned, so a hand-edited
/// file with an unknown benchmark or an out-of-range horizon is rejected.
pub struct StorageManager;

impl StorageManager {
    /// Serialize settings to a portable JSON string.
    pub fn save_to_string(settings: &ChartSettings) -> Result<String, CoreError> {
        format::write_settings(settings)
    }

    /// Parse and validate settings from a JSON string.
    pub fn load_from_str(data: &str) -> Result<ChartSettings, CoreError> {
        let settings = format::read_settings(data)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Save settings to a file on disk (native only).
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to_file(settings: &ChartSettings, path: &str) -> Result<(), CoreError> {
        let json = Self::save_to_string(settings)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load settings from a file on disk (native only).
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_file(path: &str) -> Result<ChartSettings, CoreError> {
        let data = std::fs::read_to_string(path)?;
        Self::load_from_str(&data)
    }
}
