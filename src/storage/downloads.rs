//! Download list

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{DOWNLOADS_KEY, KeyValueStore, Mirror, generate_id};
use crate::utils::now_millis;

/// Lifecycle of a download
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DownloadStatus {
    InProgress,
    Completed,
    Failed,
    Cancelled,
}

impl fmt::Display for DownloadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DownloadStatus::InProgress => "in progress",
            DownloadStatus::Completed => "completed",
            DownloadStatus::Failed => "failed",
            DownloadStatus::Cancelled => "cancelled",
        })
    }
}

/// A downloaded (or downloading) file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadItem {
    pub id: String,
    pub file_name: String,
    pub url: String,
    /// Human-readable size, e.g. "2.4 MB"
    pub size: String,
    /// Percent complete, 0 to 100
    pub progress: f64,
    pub status: DownloadStatus,
    pub created_at: i64,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct DownloadState {
    downloads: Vec<DownloadItem>,
}

/// Download list mirrored to local storage
pub struct Downloads {
    state: DownloadState,
    mirror: Mirror<DownloadState>,
}

impl Downloads {
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let mirror = Mirror::new(store, DOWNLOADS_KEY);
        let state = mirror.hydrate();
        Self { state, mirror }
    }

    pub fn all(&self) -> &[DownloadItem] {
        &self.state.downloads
    }

    pub fn get(&self, id: &str) -> Option<&DownloadItem> {
        self.state.downloads.iter().find(|d| d.id == id)
    }

    /// Newest first
    pub fn sorted(&self) -> Vec<&DownloadItem> {
        let mut sorted: Vec<&DownloadItem> = self.state.downloads.iter().collect();
        sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        sorted
    }

    /// Start tracking a download at 0%
    pub fn add(
        &mut self,
        file_name: impl Into<String>,
        url: impl Into<String>,
        size: impl Into<String>,
    ) -> String {
        let item = DownloadItem {
            id: generate_id(),
            file_name: file_name.into(),
            url: url.into(),
            size: size.into(),
            progress: 0.0,
            status: DownloadStatus::InProgress,
            created_at: now_millis(),
        };
        let id = item.id.clone();
        self.state.downloads.push(item);
        self.persist();
        id
    }

    /// Change progress and/or status of one download
    pub fn update(&mut self, id: &str, progress: Option<f64>, status: Option<DownloadStatus>) {
        let Some(item) = self.state.downloads.iter_mut().find(|d| d.id == id) else {
            return;
        };
        if let Some(progress) = progress {
            item.progress = progress.clamp(0.0, 100.0);
        }
        if let Some(status) = status {
            item.status = status;
        }
        self.persist();
    }

    /// Stop an in-progress download
    pub fn cancel(&mut self, id: &str) {
        if self
            .get(id)
            .is_some_and(|d| d.status == DownloadStatus::InProgress)
        {
            self.update(id, None, Some(DownloadStatus::Cancelled));
        }
    }

    pub fn remove(&mut self, id: &str) {
        let before = self.state.downloads.len();
        self.state.downloads.retain(|d| d.id != id);
        if self.state.downloads.len() != before {
            self.persist();
        }
    }

    pub fn clear(&mut self) {
        self.state.downloads.clear();
        self.persist();
    }

    pub fn in_progress_count(&self) -> usize {
        self.count_with(DownloadStatus::InProgress)
    }

    pub fn completed_count(&self) -> usize {
        self.count_with(DownloadStatus::Completed)
    }

    fn count_with(&self, status: DownloadStatus) -> usize {
        self.state
            .downloads
            .iter()
            .filter(|d| d.status == status)
            .count()
    }

    fn persist(&self) {
        self.mirror.write(&self.state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn downloads() -> (Arc<dyn KeyValueStore>, Downloads) {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let downloads = Downloads::load(store.clone());
        (store, downloads)
    }

    #[test]
    fn test_add_starts_in_progress() {
        let (_, mut downloads) = downloads();
        let id = downloads.add("a.zip", "https://example.com/a.zip", "1 MB");
        let item = downloads.get(&id).unwrap();
        assert_eq!(item.progress, 0.0);
        assert_eq!(item.status, DownloadStatus::InProgress);
        assert_eq!(downloads.in_progress_count(), 1);
    }

    #[test]
    fn test_update_clamps_and_persists() {
        let (store, mut downloads) = downloads();
        let id = downloads.add("a.zip", "u", "1 MB");
        downloads.update(&id, Some(140.0), Some(DownloadStatus::Completed));

        let reloaded = Downloads::load(store);
        let item = reloaded.get(&id).unwrap();
        assert_eq!(item.progress, 100.0);
        assert_eq!(item.status, DownloadStatus::Completed);
        assert_eq!(reloaded.completed_count(), 1);
    }

    #[test]
    fn test_cancel_only_affects_in_progress() {
        let (_, mut downloads) = downloads();
        let running = downloads.add("a", "u", "1 MB");
        let done = downloads.add("b", "u", "1 MB");
        downloads.update(&done, Some(100.0), Some(DownloadStatus::Completed));

        downloads.cancel(&running);
        downloads.cancel(&done);

        assert_eq!(downloads.get(&running).unwrap().status, DownloadStatus::Cancelled);
        assert_eq!(downloads.get(&done).unwrap().status, DownloadStatus::Completed);
    }

    #[test]
    fn test_status_serializes_kebab_case() {
        let json = serde_json::to_string(&DownloadStatus::InProgress).unwrap();
        assert_eq!(json, "\"in-progress\"");
    }

    #[test]
    fn test_remove_and_clear() {
        let (_, mut downloads) = downloads();
        let id = downloads.add("a", "u", "1 MB");
        downloads.add("b", "u", "1 MB");
        downloads.remove(&id);
        assert_eq!(downloads.all().len(), 1);
        downloads.clear();
        assert!(downloads.all().is_empty());
    }
}
