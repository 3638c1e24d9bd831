//! # Answer Browser
//!
//! A browser shell whose omnibox answers questions instead of loading pages.
//! Typed input is either treated as a URL or sent to a generative answer
//! service, and the structured answer is shown in the tab.
//!
//! ## Architecture
//!
//! The browser is organized into the following core modules:
//!
//! - **session**: Tabs, the active tab and view, sidebar and settings flags
//! - **ledger**: Undo/redo history for a value, plus the debounced omnibox field
//! - **omnibox**: URL-vs-query classification and autocomplete
//! - **answer**: The answer service seam and its Gemini client
//! - **storage**: Bookmarks, history, downloads and settings with persistence
//! - **ticker**: Mock download traffic
//! - **sound**: UI sound cues
//! - **app**: The context object wiring all of the above together
//! - **ui** / **cli**: Desktop and line-mode front ends
//! - **utils**: Shared utilities and error types

pub mod answer;
pub mod app;
pub mod cli;
pub mod config;
pub mod ledger;
pub mod omnibox;
pub mod session;
pub mod sound;
pub mod storage;
pub mod ticker;
pub mod ui;
pub mod utils;

// Re-export main types for convenience
pub use app::{AppContext, Submission};
pub use config::AppConfig;
pub use ledger::{DebouncedField, Ledger};
pub use session::{ActiveView, SearchTicket, Session, Tab, TabDisplay, TabId, TabUpdate};
pub use utils::error::{AnswerError, Result};

/// Browser version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = "Answer Browser";
