//! Desktop user interface for the answer browser

mod app;
mod panels;

pub use app::{BrowserApp, run};

/// UI configuration
#[derive(Debug, Clone)]
pub struct UiConfig {
    pub window_width: u32,
    pub window_height: u32,
    pub theme: Theme,
    /// Tab titles longer than this are shortened in the tab bar
    pub max_tab_title: usize,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            window_width: 1280,
            window_height: 720,
            theme: Theme::System,
            max_tab_title: 20,
        }
    }
}

/// UI theme
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Theme {
    Light,
    Dark,
    System,
}
