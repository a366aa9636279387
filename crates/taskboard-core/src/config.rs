use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Activation thresholds for turning a press into a drag gesture.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorConfig {
    /// Pixels a mouse pointer must travel before the press activates.
    #[serde(default = "default_mouse_distance")]
    pub mouse_distance: f64,
    /// Milliseconds a touch must be held before the press activates.
    #[serde(default = "default_touch_delay_ms")]
    pub touch_delay_ms: u64,
    /// Pixels a touch may drift while the delay runs.
    #[serde(default = "default_touch_tolerance")]
    pub touch_tolerance: f64,
}

fn default_mouse_distance() -> f64 {
    10.0
}

fn default_touch_delay_ms() -> u64 {
    250
}

fn default_touch_tolerance() -> f64 {
    500.0
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            mouse_distance: default_mouse_distance(),
            touch_delay_ms: default_touch_delay_ms(),
            touch_tolerance: default_touch_tolerance(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub sensors: SensorConfig,
    #[serde(default)]
    pub default_file: Option<PathBuf>,
}

impl AppConfig {
    pub fn config_path() -> Option<PathBuf> {
        #[cfg(target_os = "macos")]
        {
            dirs::home_dir().map(|home| home.join(".config/taskboard/config.toml"))
        }
        #[cfg(target_os = "linux")]
        {
            dirs::config_dir().map(|config| config.join("taskboard/config.toml"))
        }
        #[cfg(target_os = "windows")]
        {
            dirs::config_dir().map(|config| config.join("taskboard\\config.toml"))
        }
        #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
        {
            None
        }
    }

    pub fn load() -> Self {
        if let Some(config_path) = Self::config_path() {
            if config_path.exists() {
                if let Ok(content) = std::fs::read_to_string(&config_path) {
                    if let Ok(config) = Self::from_toml(&content) {
                        return config;
                    }
                }
            }
        }
        Self::default()
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = AppConfig::from_toml("").unwrap();
        assert_eq!(config.sensors, SensorConfig::default());
        assert!(config.default_file.is_none());
    }

    #[test]
    fn test_partial_sensor_section() {
        let config = AppConfig::from_toml("[sensors]\nmouse_distance = 4.0\n").unwrap();
        assert_eq!(config.sensors.mouse_distance, 4.0);
        assert_eq!(config.sensors.touch_delay_ms, 250);
        assert_eq!(config.sensors.touch_tolerance, 500.0);
    }

    #[test]
    fn test_default_file() {
        let config = AppConfig::from_toml("default_file = \"/tmp/board.json\"\n").unwrap();
        assert_eq!(config.default_file, Some(PathBuf::from("/tmp/board.json")));
    }
}
