//! Debounced commits into a text ledger
//!
//! Keystrokes update the visible value immediately but only reach the
//! ledger after a quiet period or at an explicit commit point (blur,
//! submit), so undo steps land at word/pause granularity.

use std::time::{Duration, Instant};

use super::Ledger;

/// Quiet period before an edit is folded into history
pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(500);

/// A text field with debounced undo/redo history
#[derive(Debug, Clone)]
pub struct DebouncedField {
    ledger: Ledger<String>,
    visible: String,
    quiet_period: Duration,
    deadline: Option<Instant>,
}

impl DebouncedField {
    pub fn new(initial: impl Into<String>) -> Self {
        Self::with_quiet_period(initial, DEFAULT_QUIET_PERIOD)
    }

    pub fn with_quiet_period(initial: impl Into<String>, quiet_period: Duration) -> Self {
        let initial = initial.into();
        Self {
            ledger: Ledger::new(initial.clone()),
            visible: initial,
            quiet_period,
            deadline: None,
        }
    }

    /// Text currently shown in the field
    pub fn value(&self) -> &str {
        &self.visible
    }

    /// Mutable access for widgets that edit the buffer in place; follow up
    /// with [`DebouncedField::touch`]
    pub fn buffer_mut(&mut self) -> &mut String {
        &mut self.visible
    }

    /// Record a keystroke-level edit
    pub fn edit(&mut self, value: impl Into<String>, now: Instant) {
        self.visible = value.into();
        self.touch(now);
    }

    /// Restart the quiet period after the buffer changed in place
    pub fn touch(&mut self, now: Instant) {
        self.deadline = Some(now + self.quiet_period);
    }

    /// Commit the pending edit once its quiet period has elapsed.
    /// Returns true if something was committed.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => self.commit(),
            _ => false,
        }
    }

    /// Fold the visible value into history right away
    pub fn commit(&mut self) -> bool {
        self.deadline = None;
        if self.visible == *self.ledger.present() {
            return false;
        }
        self.ledger.set(self.visible.clone());
        true
    }

    /// Replace the visible value and commit it (e.g. a submitted suggestion)
    pub fn commit_value(&mut self, value: impl Into<String>) {
        self.visible = value.into();
        self.commit();
    }

    pub fn undo(&mut self) -> bool {
        self.commit();
        let moved = self.ledger.undo();
        self.sync_visible();
        moved
    }

    pub fn redo(&mut self) -> bool {
        self.commit();
        let moved = self.ledger.redo();
        self.sync_visible();
        moved
    }

    /// Rebind the field to another document, dropping all history
    pub fn rebind(&mut self, value: impl Into<String>) {
        let value = value.into();
        self.ledger.reset(value.clone());
        self.visible = value;
        self.deadline = None;
    }

    pub fn can_undo(&self) -> bool {
        self.ledger.can_undo() || self.has_pending_edit()
    }

    pub fn can_redo(&self) -> bool {
        self.ledger.can_redo() && !self.has_pending_edit()
    }

    /// Visible text differs from the last committed value
    pub fn has_pending_edit(&self) -> bool {
        self.visible != *self.ledger.present()
    }

    pub fn ledger(&self) -> &Ledger<String> {
        &self.ledger
    }

    fn sync_visible(&mut self) {
        self.visible.clone_from(self.ledger.present());
    }
}

impl Default for DebouncedField {
    fn default() -> Self {
        Self::new(String::new())
    }
}
