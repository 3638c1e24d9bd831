//! Tabs and their display state

use std::fmt;

use crate::answer::Answer;

/// Title every blank tab starts with
pub const NEW_TAB_TITLE: &str = "New Tab";

/// Unique tab identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TabId(u64);

impl TabId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tab-{}", self.0)
    }
}

/// What a tab is currently showing.
///
/// Exactly one variant applies at a time, so a tab can never be searching
/// while also holding an answer or an error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TabDisplay {
    /// Fresh tab, landing page
    #[default]
    Blank,
    /// The omnibox input was treated as a URL
    Navigating { url: String },
    /// An answer request is outstanding
    Searching { query: String, generation: u64 },
    /// The answer request failed
    Failed { query: String, error: String },
    /// The answer request resolved
    Answered { query: String, answer: Answer },
}

impl TabDisplay {
    /// Query behind the current search state, if any
    pub fn query(&self) -> Option<&str> {
        match self {
            Self::Searching { query, .. }
            | Self::Failed { query, .. }
            | Self::Answered { query, .. } => Some(query),
            Self::Blank | Self::Navigating { .. } => None,
        }
    }
}

/// A browser tab
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tab {
    id: TabId,
    title: String,
    /// Text shown in the omnibox while this tab is active
    input_value: String,
    display: TabDisplay,
}

impl Tab {
    /// Create a new blank tab
    pub fn new(id: TabId) -> Self {
        Self {
            id,
            title: NEW_TAB_TITLE.to_string(),
            input_value: String::new(),
            display: TabDisplay::Blank,
        }
    }

    pub fn id(&self) -> TabId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn input_value(&self) -> &str {
        &self.input_value
    }

    pub fn display(&self) -> &TabDisplay {
        &self.display
    }

    pub fn is_blank(&self) -> bool {
        matches!(self.display, TabDisplay::Blank)
    }

    /// True only while an answer request is unresolved for this tab
    pub fn is_searching(&self) -> bool {
        matches!(self.display, TabDisplay::Searching { .. })
    }

    pub fn answer(&self) -> Option<&Answer> {
        match &self.display {
            TabDisplay::Answered { answer, .. } => Some(answer),
            _ => None,
        }
    }

    pub fn search_error(&self) -> Option<&str> {
        match &self.display {
            TabDisplay::Failed { error, .. } => Some(error),
            _ => None,
        }
    }

    pub fn navigation_url(&self) -> Option<&str> {
        match &self.display {
            TabDisplay::Navigating { url } => Some(url),
            _ => None,
        }
    }

    /// Query that produced the current search state
    pub fn search_query(&self) -> Option<&str> {
        self.display.query()
    }

    /// Merge a partial update; absent fields are left alone
    pub fn apply(&mut self, update: TabUpdate) {
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(input_value) = update.input_value {
            self.input_value = input_value;
        }
        if let Some(display) = update.display {
            self.display = display;
        }
    }

    /// Back to blank-tab defaults, keeping the id
    pub fn clear(&mut self) {
        *self = Self::new(self.id);
    }
}

/// Partial tab update, merged field by field
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TabUpdate {
    pub title: Option<String>,
    pub input_value: Option<String>,
    pub display: Option<TabDisplay>,
}

impl TabUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn input_value(mut self, input_value: impl Into<String>) -> Self {
        self.input_value = Some(input_value.into());
        self
    }

    pub fn display(mut self, display: TabDisplay) -> Self {
        self.display = Some(display);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_tab_is_blank() {
        let tab = Tab::new(TabId::new(7));
        assert_eq!(tab.title(), NEW_TAB_TITLE);
        assert_eq!(tab.input_value(), "");
        assert!(tab.is_blank());
        assert!(!tab.is_searching());
        assert!(tab.answer().is_none());
        assert!(tab.search_error().is_none());
        assert!(tab.navigation_url().is_none());
        assert!(tab.search_query().is_none());
    }

    #[test]
    fn test_apply_merges_only_given_fields() {
        let mut tab = Tab::new(TabId::new(1));
        tab.apply(TabUpdate::new().input_value("rust"));
        tab.apply(TabUpdate::new().title("Searching: rust"));

        assert_eq!(tab.input_value(), "rust");
        assert_eq!(tab.title(), "Searching: rust");
        assert!(tab.is_blank());
    }

    #[test]
    fn test_display_accessors() {
        let mut tab = Tab::new(TabId::new(1));
        tab.apply(TabUpdate::new().display(TabDisplay::Failed {
            query: "q".into(),
            error: "boom".into(),
        }));
        assert_eq!(tab.search_error(), Some("boom"));
        assert_eq!(tab.search_query(), Some("q"));
        assert!(tab.answer().is_none());

        tab.apply(TabUpdate::new().display(TabDisplay::Navigating {
            url: "https://example.com".into(),
        }));
        assert_eq!(tab.navigation_url(), Some("https://example.com"));
        assert!(tab.search_query().is_none());
        assert!(tab.search_error().is_none());
    }

    #[test]
    fn test_clear_keeps_id() {
        let mut tab = Tab::new(TabId::new(3));
        tab.apply(
            TabUpdate::new()
                .title("x")
                .input_value("y")
                .display(TabDisplay::Navigating { url: "z".into() }),
        );
        tab.clear();
        assert_eq!(tab, Tab::new(TabId::new(3)));
    }

    #[test]
    fn test_tab_id_display() {
        assert_eq!(TabId::new(42).to_string(), "tab-42");
    }
}
