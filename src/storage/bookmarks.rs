//! Bookmarks

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{BOOKMARKS_KEY, KeyValueStore, Mirror, generate_id};
use crate::utils::now_millis;

/// A saved page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bookmark {
    pub id: String,
    pub url: String,
    pub title: String,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Milliseconds since the Unix epoch
    pub created_at: i64,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct BookmarkState {
    bookmarks: Vec<Bookmark>,
}

/// Bookmark collection mirrored to local storage
pub struct Bookmarks {
    state: BookmarkState,
    mirror: Mirror<BookmarkState>,
}

impl Bookmarks {
    /// Hydrate from the store
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let mirror = Mirror::new(store, BOOKMARKS_KEY);
        let state = mirror.hydrate();
        Self { state, mirror }
    }

    /// Bookmarks in insertion order
    pub fn all(&self) -> &[Bookmark] {
        &self.state.bookmarks
    }

    pub fn len(&self) -> usize {
        self.state.bookmarks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.bookmarks.is_empty()
    }

    pub fn add(&mut self, url: impl Into<String>, title: impl Into<String>, tags: Vec<String>) -> String {
        let bookmark = Bookmark {
            id: generate_id(),
            url: url.into(),
            title: title.into(),
            tags,
            created_at: now_millis(),
        };
        let id = bookmark.id.clone();
        self.state.bookmarks.push(bookmark);
        self.persist();
        id
    }

    pub fn remove(&mut self, id: &str) {
        let before = self.state.bookmarks.len();
        self.state.bookmarks.retain(|b| b.id != id);
        if self.state.bookmarks.len() != before {
            self.persist();
        }
    }

    pub fn update_tags(&mut self, id: &str, tags: Vec<String>) {
        if let Some(bookmark) = self.state.bookmarks.iter_mut().find(|b| b.id == id) {
            bookmark.tags = tags;
            self.persist();
        }
    }

    pub fn find_by_url(&self, url: &str) -> Option<&Bookmark> {
        self.state.bookmarks.iter().find(|b| b.url == url)
    }

    pub fn is_bookmarked(&self, url: &str) -> bool {
        self.find_by_url(url).is_some()
    }

    /// Bookmark `url` if it is not bookmarked yet, otherwise remove it.
    /// Returns whether the page is bookmarked afterwards.
    pub fn toggle(&mut self, url: &str, title: &str) -> bool {
        match self.find_by_url(url).map(|b| b.id.clone()) {
            Some(id) => {
                self.remove(&id);
                false
            }
            None => {
                self.add(url, title, Vec::new());
                true
            }
        }
    }

    /// Case-insensitive match on title, url or any tag, newest first
    pub fn search(&self, query: &str) -> Vec<&Bookmark> {
        let needle = query.to_lowercase();
        let mut found: Vec<&Bookmark> = self
            .state
            .bookmarks
            .iter()
            .filter(|b| {
                needle.is_empty()
                    || b.title.to_lowercase().contains(&needle)
                    || b.url.to_lowercase().contains(&needle)
                    || b.tags.iter().any(|t| t.to_lowercase().contains(&needle))
            })
            .collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        found
    }

    fn persist(&self) {
        self.mirror.write(&self.state);
    }
}
