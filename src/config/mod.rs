pub mod settings;

use crate::core::SubmissionTiming;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Origin of the local analysis service, used when nothing else names one.
pub const DEFAULT_ORIGIN: &str = "http://127.0.0.1:8000";

/// Environment variable that overrides the API base URL.
pub const API_URL_ENV: &str = "API_URL";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub api_url: String,
    pub minimum_duration_ms: u64,
    pub progress_window_ms: u64,
    pub progress_tick_ms: u64,
    pub window_size: (f64, f64),
}

impl AppConfig {
    /// Resolves the configuration once at startup: defaults, then the
    /// optional settings file, then the `API_URL` environment variable.
    pub fn load() -> Result<Self> {
        let mut config = settings::load_config(None)?;
        config.apply_env();
        Ok(config)
    }

    /// Overrides the API base URL from the environment, if set.
    pub fn apply_env(&mut self) {
        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.trim().is_empty() {
                self.api_url = url;
            }
        }
        self.api_url = normalize_api_url(&self.api_url);
    }

    pub fn timing(&self) -> SubmissionTiming {
        SubmissionTiming {
            minimum_duration: Duration::from_millis(self.minimum_duration_ms),
            progress_window: Duration::from_millis(self.progress_window_ms),
        }
    }

    pub fn progress_tick(&self) -> Duration {
        Duration::from_millis(self.progress_tick_ms.max(1))
    }
}

/// Strips trailing slashes, falling back to [`DEFAULT_ORIGIN`] when blank.
pub fn normalize_api_url(raw: &str) -> String {
    let trimmed = raw.trim();
    let base = if trimmed.is_empty() {
        DEFAULT_ORIGIN
    } else {
        trimmed
    };
    base.trim_end_matches('/').to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_ORIGIN.to_string(),
            minimum_duration_ms: 15_000,
            progress_window_ms: 20_000,
            progress_tick_ms: 100,
            window_size: (1000.0, 760.0),
        }
    }
}
