//! User settings

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{KeyValueStore, Mirror, SETTINGS_KEY};

/// Engine named in the omnibox placeholder
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchEngine {
    #[default]
    Google,
    DuckDuckGo,
    Bing,
}

impl SearchEngine {
    pub const ALL: [SearchEngine; 3] = [
        SearchEngine::Google,
        SearchEngine::DuckDuckGo,
        SearchEngine::Bing,
    ];
}

impl fmt::Display for SearchEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SearchEngine::Google => "Google",
            SearchEngine::DuckDuckGo => "DuckDuckGo",
            SearchEngine::Bing => "Bing",
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl FontSize {
    pub const ALL: [FontSize; 3] = [FontSize::Small, FontSize::Medium, FontSize::Large];

    /// Body text size in points
    pub fn points(&self) -> f32 {
        match self {
            FontSize::Small => 12.0,
            FontSize::Medium => 14.0,
            FontSize::Large => 17.0,
        }
    }
}

impl fmt::Display for FontSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FontSize::Small => "small",
            FontSize::Medium => "medium",
            FontSize::Large => "large",
        })
    }
}

/// Persisted settings values
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SettingsState {
    pub search_engine: SearchEngine,
    pub block_trackers: bool,
    pub clear_history_on_exit: bool,
    pub font_size: FontSize,
    pub high_contrast: bool,
    pub enable_sound_cues: bool,
    pub reduce_motion: bool,
}

impl Default for SettingsState {
    fn default() -> Self {
        Self {
            search_engine: SearchEngine::Google,
            block_trackers: true,
            clear_history_on_exit: false,
            font_size: FontSize::Medium,
            high_contrast: false,
            enable_sound_cues: true,
            reduce_motion: false,
        }
    }
}

/// Settings mirrored to local storage; every setter persists
pub struct Settings {
    state: SettingsState,
    mirror: Mirror<SettingsState>,
}

impl Settings {
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let mirror = Mirror::new(store, SETTINGS_KEY);
        let state = mirror.hydrate();
        Self { state, mirror }
    }

    pub fn get(&self) -> &SettingsState {
        &self.state
    }

    pub fn set_search_engine(&mut self, engine: SearchEngine) {
        self.update(|s| s.search_engine = engine);
    }

    pub fn set_block_trackers(&mut self, value: bool) {
        self.update(|s| s.block_trackers = value);
    }

    pub fn set_clear_history_on_exit(&mut self, value: bool) {
        self.update(|s| s.clear_history_on_exit = value);
    }

    pub fn set_font_size(&mut self, size: FontSize) {
        self.update(|s| s.font_size = size);
    }

    pub fn set_high_contrast(&mut self, value: bool) {
        self.update(|s| s.high_contrast = value);
    }

    pub fn set_enable_sound_cues(&mut self, value: bool) {
        self.update(|s| s.enable_sound_cues = value);
    }

    pub fn set_reduce_motion(&mut self, value: bool) {
        self.update(|s| s.reduce_motion = value);
    }

    fn update(&mut self, change: impl FnOnce(&mut SettingsState)) {
        let before = self.state.clone();
        change(&mut self.state);
        if self.state != before {
            self.mirror.write(&self.state);
        }
    }
}
