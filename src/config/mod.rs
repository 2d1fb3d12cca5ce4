// LiveCrab - GPL-3.0-or-later
// This file is part of LiveCrab.
//
// Copyright (C) 2025 Daniel Freiermuth
//
// LiveCrab is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// LiveCrab is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with LiveCrab.  If not, see <https://www.gnu.org/licenses/>.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Server to follow when neither the CLI nor the config names one.
pub const DEFAULT_SERVER_URL: &str = "http://localhost:8080/";

fn default_timestamp_format() -> String {
    "%Y-%m-%d %H:%M:%S%.3f".to_string()
}

/// Global user configuration stored in config directory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalConfig {
    /// Base URL of the log server from the last session
    #[serde(default)]
    pub server_url: Option<String>,

    /// chrono format string for the timestamp column
    #[serde(default = "default_timestamp_format")]
    pub timestamp_format: String,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        GlobalConfig {
            server_url: None,
            timestamp_format: default_timestamp_format(),
        }
    }
}

impl GlobalConfig {
    /// Get the path to the global config file
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|config_dir| config_dir.join("livecrab").join("config.json"))
    }

    /// Load global config from disk, returning defaults if not found
    pub fn load() -> Self {
        if let Some(path) = Self::config_path() {
            if path.exists() {
                log::info!("Loading global config from {path:?}");
                if let Ok(contents) = std::fs::read_to_string(&path) {
                    if let Ok(config) = serde_json::from_str::<GlobalConfig>(&contents) {
                        return config;
                    }
                    log::warn!("Could not parse global config, using defaults");
                }
            } else {
                log::info!("No global config found, using defaults");
            }
        }

        Self::default()
    }

    /// Save global config to disk
    pub fn save(&self) -> Result<(), String> {
        let path = Self::config_path().ok_or("Could not determine config directory")?;

        // Create directory if it doesn't exist
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create config directory: {e}"))?;
        }

        let json = serde_json::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize config: {e}"))?;

        std::fs::write(&path, json).map_err(|e| format!("Failed to write config file: {e}"))?;

        log::info!("Saved global config to {path:?}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_fields_fall_back_to_defaults() {
        let config: GlobalConfig = serde_json::from_str("{}").expect("empty object parses");
        assert_eq!(config.server_url, None);
        assert_eq!(config.timestamp_format, default_timestamp_format());
    }

    #[test]
    fn test_round_trip_through_file() {
        let config = GlobalConfig {
            server_url: Some("http://logs.example.net/".to_string()),
            timestamp_format: "%H:%M:%S".to_string(),
        };

        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        let json = serde_json::to_string_pretty(&config).expect("config serializes");
        file.write_all(json.as_bytes()).expect("write temp config");

        let contents = std::fs::read_to_string(file.path()).expect("read temp config");
        let loaded: GlobalConfig = serde_json::from_str(&contents).expect("config parses");
        assert_eq!(loaded.server_url.as_deref(), Some("http://logs.example.net/"));
        assert_eq!(loaded.timestamp_format, "%H:%M:%S");
    }
}
