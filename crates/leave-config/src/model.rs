use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::ConfigError;

const PRIORITIES: [&str; 5] = ["cl-first", "pl-first", "balanced", "pl-only", "cl-only"];
const ID_SCHEMES: [&str; 2] = ["timestamp", "uuid"];
const MAX_LOOK_AHEAD_MONTHS: u32 = 12;

/// Stores user-configurable CLI preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Where the leave data files live. Defaults to `<base>/data`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    #[serde(default = "Config::default_priority_value")]
    pub default_priority: String,
    #[serde(default = "Config::default_look_ahead_months")]
    pub look_ahead_months: u32,
    #[serde(default = "Config::default_ui_color_enabled")]
    pub ui_color_enabled: bool,
    /// Tracing filter directive used when `RUST_LOG` is unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_filter: Option<String>,
    /// How new leave request ids are generated: `timestamp` or `uuid`.
    #[serde(default = "Config::default_id_scheme")]
    pub id_scheme: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            default_priority: Self::default_priority_value(),
            look_ahead_months: Self::default_look_ahead_months(),
            ui_color_enabled: Self::default_ui_color_enabled(),
            log_filter: None,
            id_scheme: Self::default_id_scheme(),
        }
    }
}

impl Config {
    pub const KEYS: [&'static str; 6] = [
        "data_dir",
        "default_priority",
        "look_ahead_months",
        "ui_color_enabled",
        "log_filter",
        "id_scheme",
    ];

    pub fn default_priority_value() -> String {
        "cl-first".into()
    }

    pub fn default_look_ahead_months() -> u32 {
        3
    }

    pub fn default_ui_color_enabled() -> bool {
        true
    }

    pub fn default_id_scheme() -> String {
        "timestamp".into()
    }

    pub fn resolve_data_dir(&self, base: &Path) -> PathBuf {
        self.data_dir
            .clone()
            .unwrap_or_else(|| base.join("data"))
    }

    /// Current value of `key` rendered for display.
    pub fn get(&self, key: &str) -> Result<String, ConfigError> {
        let value = match key {
            "data_dir" => self
                .data_dir
                .as_ref()
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "(default)".into()),
            "default_priority" => self.default_priority.clone(),
            "look_ahead_months" => self.look_ahead_months.to_string(),
            "ui_color_enabled" => self.ui_color_enabled.to_string(),
            "log_filter" => self.log_filter.clone().unwrap_or_else(|| "(default)".into()),
            "id_scheme" => self.id_scheme.clone(),
            other => return Err(ConfigError::UnknownKey(other.to_string())),
        };
        Ok(value)
    }

    /// Parses and applies `value` to `key`. `default` clears optional settings.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let value = value.trim();
        let invalid = |reason: &str| ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        };
        match key {
            "data_dir" => {
                self.data_dir = (value != "default").then(|| PathBuf::from(value));
            }
            "default_priority" => {
                let normalized = value.to_ascii_lowercase();
                if !PRIORITIES.contains(&normalized.as_str()) {
                    return Err(invalid(&format!("expected one of {}", PRIORITIES.join(", "))));
                }
                self.default_priority = normalized;
            }
            "look_ahead_months" => {
                let months: u32 = value
                    .parse()
                    .map_err(|_| invalid("expected a whole number of months"))?;
                if !(1..=MAX_LOOK_AHEAD_MONTHS).contains(&months) {
                    return Err(invalid("must be between 1 and 12"));
                }
                self.look_ahead_months = months;
            }
            "ui_color_enabled" => {
                self.ui_color_enabled = match value.to_ascii_lowercase().as_str() {
                    "true" | "on" | "yes" => true,
                    "false" | "off" | "no" => false,
                    _ => return Err(invalid("expected true or false")),
                };
            }
            "log_filter" => {
                self.log_filter = (value != "default" && !value.is_empty()).then(|| value.to_string());
            }
            "id_scheme" => {
                let normalized = value.to_ascii_lowercase();
                if !ID_SCHEMES.contains(&normalized.as_str()) {
                    return Err(invalid(&format!("expected one of {}", ID_SCHEMES.join(", "))));
                }
                self.id_scheme = normalized;
            }
            other => return Err(ConfigError::UnknownKey(other.to_string())),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let config: Config = serde_json::from_str("{\"look_ahead_months\": 6}").unwrap();
        assert_eq!(config.look_ahead_months, 6);
        assert_eq!(config.default_priority, "cl-first");
        assert!(config.ui_color_enabled);
        assert_eq!(config.id_scheme, "timestamp");
    }

    #[test]
    fn set_validates_values() {
        let mut config = Config::default();
        config.set("default_priority", "Balanced").unwrap();
        assert_eq!(config.default_priority, "balanced");
        assert!(config.set("default_priority", "random").is_err());
        assert!(config.set("look_ahead_months", "13").is_err());
        assert!(matches!(
            config.set("colour", "true"),
            Err(ConfigError::UnknownKey(_))
        ));
        config.set("ui_color_enabled", "off").unwrap();
        assert_eq!(config.get("ui_color_enabled").unwrap(), "false");
        config.set("id_scheme", "UUID").unwrap();
        assert_eq!(config.get("id_scheme").unwrap(), "uuid");
        assert!(config.set("id_scheme", "serial").is_err());
    }
}
