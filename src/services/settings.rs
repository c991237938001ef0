use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Connection settings for the remote photo store, kept as TOML in the app
/// data directory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoreSettings {
    pub server_url: String,
    pub username: String,
    pub app_password: String,
    pub remote_path: String,
}

impl StoreSettings {
    /// Converts to TOML string
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Loads from TOML string
    pub fn from_toml(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }
}

pub fn settings_path() -> PathBuf {
    crate::filesystem::app_data_dir().join("settings.toml")
}

/// Load the store settings; `None` when the file has not been created yet.
pub fn load_settings() -> Result<Option<StoreSettings>, AppError> {
    let path = settings_path();
    if !path.exists() {
        return Ok(None);
    }
    let raw = std::fs::read_to_string(&path)?;
    let settings = StoreSettings::from_toml(&raw)
        .map_err(|e| AppError::Other(format!("Malformed settings file: {}", e)))?;
    Ok(Some(settings))
}

/// Save or update the store settings
#[allow(dead_code)]
pub fn save_settings(settings: &StoreSettings) -> Result<(), AppError> {
    let path = settings_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let raw = settings
        .to_toml()
        .map_err(|e| AppError::Other(format!("Settings serialization: {}", e)))?;
    std::fs::write(&path, raw)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_round_trip_through_toml() {
        let settings = StoreSettings {
            server_url: "https://cloud.example".to_string(),
            username: "anna".to_string(),
            app_password: "app-pass".to_string(),
            remote_path: "/photolog".to_string(),
        };

        let raw = settings.to_toml().unwrap();
        let parsed = StoreSettings::from_toml(&raw).unwrap();
        assert_eq!(parsed, settings);
    }

    #[test]
    fn test_malformed_settings_are_rejected() {
        assert!(StoreSettings::from_toml("server_url = 1").is_err());
    }
}
