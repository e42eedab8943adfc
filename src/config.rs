//! Runtime settings for the dashboard.
//!
//! Settings are read once at startup from the `settings` key in local storage
//! as JSON. Any field that is missing falls back to its default, and a value
//! that cannot be parsed at all falls back to [AppConfig::default].

use std::time::Duration;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::storage;

const SETTINGS_KEY: &str = "settings";

/// Dashboard configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Base URL of the backend API, without a trailing `/api`.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// How long filter edits must settle before the expense list is re-queried.
    #[serde(default = "default_filter_debounce_ms")]
    pub filter_debounce_ms: u64,
    /// Symbol used when displaying monetary amounts.
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Keep the session token in local storage so it survives a reload.
    #[serde(default)]
    pub persist_session: bool,
}

fn default_api_base_url() -> String {
    option_env!("INVOICE_API_BASE_URL")
        .unwrap_or("http://localhost:8000")
        .to_string()
}

fn default_filter_debounce_ms() -> u64 {
    300
}

fn default_currency_symbol() -> String {
    "₪".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            filter_debounce_ms: default_filter_debounce_ms(),
            currency_symbol: default_currency_symbol(),
            log_level: default_log_level(),
            persist_session: false,
        }
    }
}

impl AppConfig {
    /// Load the configuration saved in local storage, or the defaults.
    pub fn load() -> Self {
        match storage::read_item(SETTINGS_KEY) {
            Some(raw) => Self::from_json(&raw),
            None => Self::default(),
        }
    }

    /// Parse a JSON settings document.
    pub fn from_json(raw: &str) -> Self {
        serde_json::from_str(raw).unwrap_or_else(|error| {
            warn!("ignoring invalid settings, using defaults: {error}");
            Self::default()
        })
    }

    pub fn filter_debounce(&self) -> Duration {
        Duration::from_millis(self.filter_debounce_ms)
    }

    /// The configured log level, `info` if it is not recognised.
    pub fn log_level(&self) -> log::Level {
        self.log_level.parse().unwrap_or(log::Level::Info)
    }
}
