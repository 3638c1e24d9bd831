//! Tab session management
//!
//! The [`Session`] owns the ordered tab list, which tab is active, which side
//! view is shown, and the sidebar/settings flags. Every operation is
//! synchronous and infallible; unknown ids are tolerated as no-ops.

mod tab;

pub use tab::{NEW_TAB_TITLE, Tab, TabDisplay, TabId, TabUpdate};

use std::fmt;

use crate::answer::Answer;

/// Which panel the content area shows
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ActiveView {
    /// The active tab's own content
    #[default]
    Tabs,
    Bookmarks,
    History,
    Downloads,
    Extensions,
}

impl ActiveView {
    /// Side panels reachable from the sidebar, in display order
    pub const PANELS: [ActiveView; 4] = [
        ActiveView::Bookmarks,
        ActiveView::History,
        ActiveView::Downloads,
        ActiveView::Extensions,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ActiveView::Tabs => "Tabs",
            ActiveView::Bookmarks => "Bookmarks",
            ActiveView::History => "History",
            ActiveView::Downloads => "Downloads",
            ActiveView::Extensions => "Extensions",
        }
    }
}

impl fmt::Display for ActiveView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Handle for one outstanding answer request.
///
/// The generation ties a response to the exact search that issued it, so a
/// slow response for a superseded search is discarded instead of
/// overwriting newer content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    pub tab_id: TabId,
    pub query: String,
    pub generation: u64,
}

/// Browser session: tabs plus shell state
#[derive(Debug, Clone)]
pub struct Session {
    tabs: Vec<Tab>,
    active_tab: TabId,
    active_view: ActiveView,
    sidebar_collapsed: bool,
    settings_open: bool,
    next_id: u64,
    next_generation: u64,
}

impl Session {
    /// Create a session holding one blank, active tab
    pub fn new() -> Self {
        let first = TabId::new(1);
        Self {
            tabs: vec![Tab::new(first)],
            active_tab: first,
            active_view: ActiveView::Tabs,
            sidebar_collapsed: false,
            settings_open: false,
            next_id: 2,
            next_generation: 1,
        }
    }

    fn blank_tab(&mut self) -> Tab {
        let id = TabId::new(self.next_id);
        self.next_id += 1;
        Tab::new(id)
    }

    /// Open a blank tab at the end and make it active
    pub fn add_tab(&mut self) -> TabId {
        let tab = self.blank_tab();
        let id = tab.id();
        self.tabs.push(tab);
        self.active_tab = id;
        self.active_view = ActiveView::Tabs;
        log::debug!("Opened {}", id);
        id
    }

    /// Close a tab.
    ///
    /// Closing the active tab selects its preceding sibling (or the first
    /// tab); closing the last tab leaves a fresh blank one. Returns whether a
    /// tab was closed.
    pub fn remove_tab(&mut self, id: TabId) -> bool {
        let Some(index) = self.tabs.iter().position(|t| t.id() == id) else {
            return false;
        };

        self.tabs.remove(index);
        log::debug!("Closed {}", id);

        if self.tabs.is_empty() {
            let tab = self.blank_tab();
            self.active_tab = tab.id();
            self.tabs.push(tab);
            self.active_view = ActiveView::Tabs;
        } else if self.active_tab == id {
            let next = index.saturating_sub(1);
            self.active_tab = self.tabs[next].id();
            self.active_view = ActiveView::Tabs;
        }

        true
    }

    /// Activate a tab. The id is not checked; callers pass ids they got from
    /// this session.
    pub fn set_active_tab(&mut self, id: TabId) {
        self.active_tab = id;
        self.active_view = ActiveView::Tabs;
    }

    /// Replace the tab order with a caller-supplied permutation of tab ids
    pub fn reorder_tabs(&mut self, order: &[TabId]) {
        let mut remaining = std::mem::take(&mut self.tabs);
        let mut reordered = Vec::with_capacity(remaining.len());

        for id in order {
            if let Some(pos) = remaining.iter().position(|t| t.id() == *id) {
                reordered.push(remaining.remove(pos));
            }
        }
        // Anything the order left out keeps its relative position at the end.
        reordered.extend(remaining);
        self.tabs = reordered;
    }

    /// Drag-and-drop helper: move the tab at `from` to index `to`
    pub fn move_tab(&mut self, from: usize, to: usize) {
        if from >= self.tabs.len() || from == to {
            return;
        }
        let mut order: Vec<TabId> = self.tabs.iter().map(Tab::id).collect();
        let id = order.remove(from);
        order.insert(to.min(order.len()), id);
        self.reorder_tabs(&order);
    }

    /// Merge new content into the active tab and bring the tab view forward
    pub fn update_active_tab_content(&mut self, update: TabUpdate) {
        let active = self.active_tab;
        if let Some(tab) = self.tab_mut(active) {
            tab.apply(update);
        }
        self.active_view = ActiveView::Tabs;
    }

    /// Reset the active tab to blank defaults, keeping its id
    pub fn clear_active_tab(&mut self) {
        let active = self.active_tab;
        if let Some(tab) = self.tab_mut(active) {
            tab.clear();
        }
        self.active_view = ActiveView::Tabs;
    }

    /// Show a side panel; asking for the panel already shown goes back to tabs
    pub fn set_active_view(&mut self, view: ActiveView) {
        self.active_view = if self.active_view == view {
            ActiveView::Tabs
        } else {
            view
        };
    }

    pub fn toggle_sidebar(&mut self) {
        self.sidebar_collapsed = !self.sidebar_collapsed;
    }

    pub fn open_settings_modal(&mut self) {
        self.settings_open = true;
    }

    pub fn close_settings_modal(&mut self) {
        self.settings_open = false;
    }

    /// Put the active tab into the searching state and hand out a ticket for
    /// the request
    pub fn begin_search(&mut self, query: impl Into<String>) -> SearchTicket {
        let query = query.into();
        let generation = self.next_generation;
        self.next_generation += 1;

        self.update_active_tab_content(
            TabUpdate::new()
                .title(format!("Searching: {}", query))
                .input_value(query.clone())
                .display(TabDisplay::Searching {
                    query: query.clone(),
                    generation,
                }),
        );

        SearchTicket {
            tab_id: self.active_tab,
            query,
            generation,
        }
    }

    /// Store the outcome of a search in the tab that issued it.
    ///
    /// Returns false when the ticket is stale: the tab was closed, cleared,
    /// navigated, or started a newer search in the meantime.
    pub fn complete_search(
        &mut self,
        ticket: &SearchTicket,
        outcome: std::result::Result<Answer, String>,
    ) -> bool {
        let current = self.tab(ticket.tab_id).map(Tab::display);
        let still_waiting = matches!(
            current,
            Some(TabDisplay::Searching { generation, .. }) if *generation == ticket.generation
        );
        if !still_waiting {
            log::debug!(
                "Discarding stale result for {:?} on {}",
                ticket.query,
                ticket.tab_id
            );
            return false;
        }

        let query = ticket.query.clone();
        let update = match outcome {
            Ok(answer) => TabUpdate::new()
                .title(format!("Answer: {}", query))
                .display(TabDisplay::Answered { query, answer }),
            Err(error) => TabUpdate::new()
                .title(format!("Error: {}", query))
                .display(TabDisplay::Failed { query, error }),
        };

        if ticket.tab_id == self.active_tab {
            self.update_active_tab_content(update);
        } else if let Some(tab) = self.tab_mut(ticket.tab_id) {
            tab.apply(update);
        }
        true
    }

    /// All tabs in display order
    pub fn tabs(&self) -> &[Tab] {
        &self.tabs
    }

    pub fn count(&self) -> usize {
        self.tabs.len()
    }

    pub fn tab(&self, id: TabId) -> Option<&Tab> {
        self.tabs.iter().find(|t| t.id() == id)
    }

    fn tab_mut(&mut self, id: TabId) -> Option<&mut Tab> {
        self.tabs.iter_mut().find(|t| t.id() == id)
    }

    pub fn active_tab_id(&self) -> TabId {
        self.active_tab
    }

    /// The active tab; `None` only after `set_active_tab` with a foreign id
    pub fn active_tab(&self) -> Option<&Tab> {
        self.tab(self.active_tab)
    }

    pub fn active_view(&self) -> ActiveView {
        self.active_view
    }

    pub fn is_sidebar_collapsed(&self) -> bool {
        self.sidebar_collapsed
    }

    pub fn is_settings_open(&self) -> bool {
        self.settings_open
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
