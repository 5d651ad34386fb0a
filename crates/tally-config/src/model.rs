use serde::{Deserialize, Serialize};
use std::{env, fmt, str::FromStr};

use crate::ConfigError;

pub const API_URL_ENV: &str = "TALLY_API_URL";

/// Where the displayed balance comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BalanceSource {
    /// Summed client-side from the fetched list.
    #[default]
    Local,
    /// Fetched pre-aggregated from `/transactions/balance`.
    Remote,
}

impl fmt::Display for BalanceSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BalanceSource::Local => "local",
            BalanceSource::Remote => "remote",
        };
        f.write_str(label)
    }
}

impl FromStr for BalanceSource {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "local" | "client" => Ok(BalanceSource::Local),
            "remote" | "server" | "backend" => Ok(BalanceSource::Remote),
            other => Err(format!("expected `local` or `remote`, got `{other}`")),
        }
    }
}

/// Stores user-configurable client preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "Config::default_api_base_url")]
    pub api_base_url: String,
    #[serde(default)]
    pub balance_source: BalanceSource,
    #[serde(default = "Config::default_currency_label")]
    pub currency_label: String,
    #[serde(default = "Config::default_ui_color_enabled")]
    pub ui_color_enabled: bool,
    #[serde(default)]
    pub plain_output: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: Self::default_api_base_url(),
            balance_source: BalanceSource::default(),
            currency_label: Self::default_currency_label(),
            ui_color_enabled: Self::default_ui_color_enabled(),
            plain_output: false,
        }
    }
}

impl Config {
    pub const KEYS: [&'static str; 5] = [
        "api_base_url",
        "balance_source",
        "currency_label",
        "ui_color_enabled",
        "plain_output",
    ];

    pub fn default_api_base_url() -> String {
        "https://backend-appjava.onrender.com".into()
    }

    pub fn default_currency_label() -> String {
        "FCFA".into()
    }

    pub fn default_ui_color_enabled() -> bool {
        true
    }

    /// Applies `TALLY_API_URL` when set to a non-empty value.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(url) = env::var(API_URL_ENV) {
            let trimmed = url.trim();
            if !trimmed.is_empty() {
                self.api_base_url = trimmed.to_string();
            }
        }
    }

    /// Key/value pairs in display order.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        vec![
            ("api_base_url", self.api_base_url.clone()),
            ("balance_source", self.balance_source.to_string()),
            ("currency_label", self.currency_label.clone()),
            ("ui_color_enabled", self.ui_color_enabled.to_string()),
            ("plain_output", self.plain_output.to_string()),
        ]
    }

    /// Updates a single key from its textual form.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            reason,
        };
        match key {
            "api_base_url" => {
                let trimmed = value.trim();
                if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
                    return Err(invalid("must start with http:// or https://".into()));
                }
                self.api_base_url = trimmed.trim_end_matches('/').to_string();
            }
            "balance_source" => self.balance_source = value.parse().map_err(invalid)?,
            "currency_label" => self.currency_label = value.trim().to_string(),
            "ui_color_enabled" => self.ui_color_enabled = parse_flag(value).map_err(invalid)?,
            "plain_output" => self.plain_output = parse_flag(value).map_err(invalid)?,
            other => return Err(ConfigError::UnknownKey(other.to_string())),
        }
        Ok(())
    }
}

fn parse_flag(value: &str) -> Result<bool, String> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        other => Err(format!("expected true or false, got `{other}`")),
    }
}
