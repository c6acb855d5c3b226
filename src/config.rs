use log::{info, warn};
use serde::Deserialize;
use std::path::Path;

/// Environment variable naming a JSON file to read the wrapper configuration from.
pub const CONFIG_ENV: &str = "XRLEAP_CONFIG";

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WrapperConfig {
    /// Module that registers the hand tracker feature when loaded.
    pub hand_tracking_module: String,
    /// Name the hand tracker is registered under.
    pub hand_tracker_feature: String,
    /// Reported in every frame.
    pub framerate: f32,
    /// Reset a hand's slot when it stops being tracked, instead of keeping its last pose.
    pub clear_untracked_hands: bool,
}

impl Default for WrapperConfig {
    fn default() -> Self {
        Self {
            hand_tracking_module: "OpenXRHandTracking".to_owned(),
            hand_tracker_feature: "HandTracker".to_owned(),
            framerate: 90.0,
            clear_untracked_hands: false,
        }
    }
}

#[derive(Debug, derive_more::From)]
#[allow(dead_code)] // Errors are only printed
pub enum ConfigError {
    Io(std::io::Error),
    Json(serde_json::Error),
}

impl WrapperConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let data = std::fs::read_to_string(path)?;
        Self::from_json(&data)
    }

    /// Reads the file named by `XRLEAP_CONFIG`, if set. Falls back to the defaults if the variable
    /// is unset or the file can't be used.
    pub fn load() -> Self {
        let Some(path) = std::env::var_os(CONFIG_ENV) else {
            return Self::default();
        };

        match Self::from_path(&path) {
            Ok(config) => {
                info!("Loaded config from {path:?}: {config:?}");
                config
            }
            Err(e) => {
                warn!("Failed to load config from {path:?}, using defaults: {e:?}");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_is_default() {
        assert_eq!(WrapperConfig::from_json("{}").unwrap(), WrapperConfig::default());
    }

    #[test]
    fn partial_json() {
        let config = WrapperConfig::from_json(
            r#"{ "framerate": 72.0, "clear_untracked_hands": true }"#,
        )
        .unwrap();
        assert_eq!(config.framerate, 72.0);
        assert!(config.clear_untracked_hands);
        assert_eq!(config.hand_tracker_feature, "HandTracker");
        assert_eq!(config.hand_tracking_module, "OpenXRHandTracking");
    }

    #[test]
    fn bad_json() {
        assert!(matches!(
            WrapperConfig::from_json(r#"{ "framerate": "fast" }"#),
            Err(ConfigError::Json(_))
        ));
        assert!(matches!(
            WrapperConfig::from_json(r#"{ "frame_rate": 60 }"#),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn missing_file() {
        assert!(matches!(
            WrapperConfig::from_path("/nonexistent/xrleap.json"),
            Err(ConfigError::Io(_))
        ));
    }
}
