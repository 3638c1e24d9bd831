//! Application configuration
//!
//! Defaults are overridden from the environment:
//!
//! - `GEMINI_API_KEY` (or `API_KEY`): answer service key
//! - `ANSWER_MODEL`: model name
//! - `ANSWER_BASE_URL`: service endpoint root
//! - `ANSWER_DATA_DIR`: where the persistence mirror lives

use std::path::PathBuf;
use std::time::Duration;

use crate::answer::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use crate::ledger::DEFAULT_QUIET_PERIOD;

/// Runtime configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    /// `None` keeps everything in memory
    pub data_dir: Option<PathBuf>,
    /// Omnibox debounce before an edit becomes an undo step
    pub history_quiet_period: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            data_dir: default_data_dir(),
            history_quiet_period: DEFAULT_QUIET_PERIOD,
        }
    }
}

impl AppConfig {
    /// Defaults overridden by environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        config.api_key = non_empty("GEMINI_API_KEY").or_else(|| non_empty("API_KEY"));
        if let Some(model) = non_empty("ANSWER_MODEL") {
            config.model = model;
        }
        if let Some(base_url) = non_empty("ANSWER_BASE_URL") {
            config.base_url = base_url;
        }
        if let Some(dir) = non_empty("ANSWER_DATA_DIR") {
            config.data_dir = Some(PathBuf::from(dir));
        }
        config
    }

    /// Keep all state in memory for this run
    pub fn ephemeral(mut self) -> Self {
        self.data_dir = None;
        self
    }
}

fn default_data_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join("answer-browser"))
}
