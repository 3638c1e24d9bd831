//! Browsing history

use std::sync::Arc;

use chrono::{DateTime, Duration, Local, NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};

use super::{HISTORY_KEY, KeyValueStore, Mirror, generate_id};
use crate::utils::now_millis;

/// A visited page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryItem {
    pub id: String,
    pub url: String,
    pub title: String,
    /// Milliseconds since the Unix epoch
    pub timestamp: i64,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct HistoryState {
    history: Vec<HistoryItem>,
}

/// Visit history mirrored to local storage
pub struct History {
    state: HistoryState,
    mirror: Mirror<HistoryState>,
}

impl History {
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let mirror = Mirror::new(store, HISTORY_KEY);
        let state = mirror.hydrate();
        Self { state, mirror }
    }

    /// Entries oldest first
    pub fn all(&self) -> &[HistoryItem] {
        &self.state.history
    }

    pub fn len(&self) -> usize {
        self.state.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.history.is_empty()
    }

    /// Record a visit. Revisiting the most recent url is not recorded again.
    pub fn add(&mut self, url: impl Into<String>, title: impl Into<String>) -> bool {
        let url = url.into();
        if self.state.history.last().is_some_and(|last| last.url == url) {
            return false;
        }
        self.state.history.push(HistoryItem {
            id: generate_id(),
            url,
            title: title.into(),
            timestamp: now_millis(),
        });
        self.persist();
        true
    }

    pub fn remove(&mut self, id: &str) {
        let before = self.state.history.len();
        self.state.history.retain(|item| item.id != id);
        if self.state.history.len() != before {
            self.persist();
        }
    }

    pub fn clear(&mut self) {
        self.state.history.clear();
        self.persist();
    }

    /// Case-insensitive match on title or url, newest first
    pub fn search(&self, query: &str) -> Vec<&HistoryItem> {
        let needle = query.to_lowercase();
        let mut found: Vec<&HistoryItem> = self
            .state
            .history
            .iter()
            .filter(|item| {
                needle.is_empty()
                    || item.title.to_lowercase().contains(&needle)
                    || item.url.to_lowercase().contains(&needle)
            })
            .collect();
        found.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        found
    }

    fn persist(&self) {
        self.mirror.write(&self.state);
    }
}

/// Entries that share a calendar day
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryGroup<'a> {
    /// "Today", "Yesterday", or a long date such as "March 4, 2026"
    pub label: String,
    pub items: Vec<&'a HistoryItem>,
}

/// Group entries by local calendar day, preserving input order.
pub fn group_by_day<'a>(items: &[&'a HistoryItem], today: NaiveDate) -> Vec<HistoryGroup<'a>> {
    let yesterday = today - Duration::days(1);
    let mut groups: Vec<HistoryGroup<'a>> = Vec::new();

    for &item in items {
        let day = local_date(item.timestamp);
        let label = if day == Some(today) {
            "Today".to_string()
        } else if day == Some(yesterday) {
            "Yesterday".to_string()
        } else {
            day.map(|d| d.format("%B %-d, %Y").to_string())
                .unwrap_or_else(|| "Unknown date".to_string())
        };

        match groups.iter_mut().find(|g| g.label == label) {
            Some(group) => group.items.push(item),
            None => groups.push(HistoryGroup {
                label,
                items: vec![item],
            }),
        }
    }

    groups
}

fn local_date(timestamp_ms: i64) -> Option<NaiveDate> {
    let utc = DateTime::from_timestamp_millis(timestamp_ms)?;
    Some(Local.from_utc_datetime(&utc.naive_utc()).date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn history() -> History {
        History::load(Arc::new(MemoryStore::new()))
    }

    fn item_on(date: NaiveDate, id: &str) -> HistoryItem {
        let noon = date.and_hms_opt(12, 0, 0).unwrap();
        let timestamp = Local
            .from_local_datetime(&noon)
            .single()
            .unwrap()
            .timestamp_millis();
        HistoryItem {
            id: id.into(),
            url: format!("https://{}.example", id),
            title: id.into(),
            timestamp,
        }
    }

    #[test]
    fn test_consecutive_duplicate_is_skipped() {
        let mut history = history();
        assert!(history.add("https://a.example", "a"));
        assert!(!history.add("https://a.example", "a"));
        assert!(history.add("https://b.example", "b"));
        assert!(history.add("https://a.example", "a"));
        assert_eq!(history.len(), 3);
    }

    #[test]
    fn test_remove_and_clear() {
        let mut history = history();
        history.add("https://a.example", "a");
        history.add("https://b.example", "b");
        let id = history.all()[0].id.clone();

        history.remove(&id);
        assert_eq!(history.len(), 1);
        assert_eq!(history.all()[0].title, "b");

        history.clear();
        assert!(history.is_empty());
    }

    #[test]
    fn test_search_filters_title_and_url() {
        let mut history = history();
        history.add("https://rust-lang.org", "rust-lang.org");
        history.add("https://docs.rs", "Docs");
        assert_eq!(history.search("RUST").len(), 1);
        assert_eq!(history.search("docs").len(), 1);
        assert_eq!(history.search("").len(), 2);
    }

    #[test]
    fn test_group_by_day_labels() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        let a = item_on(today, "a");
        let b = item_on(today - Duration::days(1), "b");
        let c = item_on(NaiveDate::from_ymd_opt(2026, 3, 4).unwrap(), "c");
        let d = item_on(today, "d");
        let items = vec![&a, &b, &c, &d];

        let groups = group_by_day(&items, today);

        let labels: Vec<&str> = groups.iter().map(|g| g.label.as_str()).collect();
        assert_eq!(labels, vec!["Today", "Yesterday", "March 4, 2026"]);
        assert_eq!(groups[0].items.len(), 2);
    }
}
