use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::ConfigError;

/// Stores user-configurable shell preferences and metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub locale: String,
    pub currency: String,
    #[serde(default = "Config::default_ui_color_enabled")]
    pub ui_color_enabled: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    /// Optional directory for the persisted snapshot. Defaults to `<home>/data`.
    pub data_root: Option<PathBuf>,

    #[serde(skip_serializing_if = "Option::is_none")]
    /// Optional directory for export files. Defaults to `<home>/exports`.
    pub export_dir: Option<PathBuf>,

    #[serde(default = "Config::default_urgency_threshold_days")]
    pub urgency_threshold_days: i64,
    #[serde(default = "Config::default_saving_indicator_ms")]
    pub saving_indicator_ms: u64,
    #[serde(default = "Config::default_transaction_list_limit")]
    pub transaction_list_limit: usize,
    #[serde(default)]
    pub insight: InsightSettings,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_user: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: "pt-BR".into(),
            currency: "BRL".into(),
            ui_color_enabled: Self::default_ui_color_enabled(),
            data_root: None,
            export_dir: None,
            urgency_threshold_days: Self::default_urgency_threshold_days(),
            saving_indicator_ms: Self::default_saving_indicator_ms(),
            transaction_list_limit: Self::default_transaction_list_limit(),
            insight: InsightSettings::default(),
            last_user: None,
        }
    }
}

impl Config {
    pub const SETTABLE_KEYS: [&'static str; 7] = [
        "locale",
        "currency",
        "ui_color_enabled",
        "urgency_threshold_days",
        "transaction_list_limit",
        "insight.model",
        "insight.endpoint",
    ];

    pub fn default_ui_color_enabled() -> bool {
        true
    }

    pub fn default_urgency_threshold_days() -> i64 {
        90
    }

    pub fn default_saving_indicator_ms() -> u64 {
        800
    }

    pub fn default_transaction_list_limit() -> usize {
        15
    }

    pub fn resolve_data_root(&self, home: &Path) -> PathBuf {
        self.data_root
            .clone()
            .unwrap_or_else(|| home.join("data"))
    }

    pub fn resolve_export_dir(&self, home: &Path) -> PathBuf {
        self.export_dir
            .clone()
            .unwrap_or_else(|| home.join("exports"))
    }

    /// Updates a single setting from its textual form.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let value = value.trim();
        let invalid = |reason: &str| ConfigError::InvalidSetting {
            key: key.to_string(),
            reason: reason.to_string(),
        };
        match key {
            "locale" => self.locale = non_empty(value).ok_or_else(|| invalid("empty value"))?,
            "currency" => self.currency = non_empty(value).ok_or_else(|| invalid("empty value"))?,
            "ui_color_enabled" => {
                self.ui_color_enabled = match value.to_ascii_lowercase().as_str() {
                    "on" | "true" | "yes" => true,
                    "off" | "false" | "no" => false,
                    _ => return Err(invalid("expected on/off")),
                }
            }
            "urgency_threshold_days" => {
                self.urgency_threshold_days = value
                    .parse::<i64>()
                    .ok()
                    .filter(|days| *days >= 0)
                    .ok_or_else(|| invalid("expected a non-negative number of days"))?
            }
            "transaction_list_limit" => {
                self.transaction_list_limit = value
                    .parse::<usize>()
                    .ok()
                    .filter(|limit| *limit > 0)
                    .ok_or_else(|| invalid("expected a positive number"))?
            }
            "insight.model" => {
                self.insight.model = non_empty(value).ok_or_else(|| invalid("empty value"))?
            }
            "insight.endpoint" => {
                self.insight.endpoint = non_empty(value)
                    .map(|url| url.trim_end_matches('/').to_string())
                    .ok_or_else(|| invalid("empty value"))?
            }
            _ => return Err(invalid("unknown setting")),
        }
        Ok(())
    }
}

/// Connection settings for the external text-generation service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightSettings {
    #[serde(default = "InsightSettings::default_endpoint")]
    pub endpoint: String,
    #[serde(default = "InsightSettings::default_model")]
    pub model: String,
    /// Environment variable holding the API key; the key itself is never stored.
    #[serde(default = "InsightSettings::default_api_key_env")]
    pub api_key_env: String,
    /// Optional request timeout. Unset means the call waits for the service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Default for InsightSettings {
    fn default() -> Self {
        Self {
            endpoint: Self::default_endpoint(),
            model: Self::default_model(),
            api_key_env: Self::default_api_key_env(),
            timeout_secs: None,
        }
    }
}

impl InsightSettings {
    pub fn default_endpoint() -> String {
        "https://generativelanguage.googleapis.com/v1beta".into()
    }

    pub fn default_model() -> String {
        "gemini-3-flash-preview".into()
    }

    pub fn default_api_key_env() -> String {
        "API_KEY".into()
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
