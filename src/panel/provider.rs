use crate::error::{AppError, Result};
use crate::models::{PanelSnapshot, VoteEntry};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Mutex;

/// Yields the vote entries currently displayed by a voting panel.
#[async_trait]
pub trait SnapshotProvider: Send + Sync {
    async fn snapshot(&self) -> Result<Vec<VoteEntry>>;
}

/// Reads a `PanelSnapshot` JSON document on every call.
pub struct FileSnapshotProvider {
    path: PathBuf,
}

impl FileSnapshotProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SnapshotProvider for FileSnapshotProvider {
    async fn snapshot(&self) -> Result<Vec<VoteEntry>> {
        // A missing file means the page has no panel (yet)
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(AppError::PanelNotFound(self.path.display().to_string()));
            }
            Err(e) => return Err(e.into()),
        };
        let snapshot: PanelSnapshot = serde_json::from_str(&raw)?;
        Ok(snapshot.entries)
    }
}

/// In-memory provider whose snapshot can be swapped out between calls.
/// `None` behaves like a page without a panel.
#[derive(Default)]
pub struct StaticSnapshotProvider {
    entries: Mutex<Option<Vec<VoteEntry>>>,
}

impl StaticSnapshotProvider {
    pub fn new(entries: Option<Vec<VoteEntry>>) -> Self {
        Self {
            entries: Mutex::new(entries),
        }
    }

    pub fn replace(&self, entries: Option<Vec<VoteEntry>>) {
        // A poisoned lock only means a panicked writer; the data is still a plain Vec
        let mut guard = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        *guard = entries;
    }
}

#[async_trait]
impl SnapshotProvider for StaticSnapshotProvider {
    async fn snapshot(&self) -> Result<Vec<VoteEntry>> {
        let guard = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        guard
            .clone()
            .ok_or_else(|| AppError::PanelNotFound("no panel loaded".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path() -> PathBuf {
        std::env::temp_dir().join(format!("poker-tally-{}.json", uuid::Uuid::new_v4()))
    }

    #[tokio::test]
    async fn test_file_provider_reads_entries() {
        let path = temp_path();
        tokio::fs::write(&path, r#"{"entries":[{"estimate":"3"},{"estimate":null}]}"#)
            .await
            .unwrap();

        let provider = FileSnapshotProvider::new(&path);
        let entries = provider.snapshot().await.unwrap();
        assert_eq!(entries, vec![VoteEntry::revealed("3"), VoteEntry::unrevealed()]);

        tokio::fs::remove_file(&path).await.unwrap();
    }

    #[tokio::test]
    async fn test_file_provider_blank_cards_stay_unrevealed() {
        let path = temp_path();
        tokio::fs::write(
            &path,
            r#"{"entries":[{"estimate":""},{"estimate":"  "},{"estimate":"5"}]}"#,
        )
        .await
        .unwrap();

        let entries = FileSnapshotProvider::new(&path).snapshot().await.unwrap();
        assert_eq!(
            entries,
            vec![VoteEntry::unrevealed(), VoteEntry::unrevealed(), VoteEntry::revealed("5")]
        );

        let result = crate::voting::tally(&entries);
        assert_eq!(result.total_count, 3);
        assert_eq!(result.summary.as_deref(), Some("Plurality: 5 (1 votes, 33%)"));
        assert_eq!(crate::voting::resolve_estimate(&entries), Some(5.0));

        tokio::fs::remove_file(&path).await.unwrap();
    }

    #[tokio::test]
    async fn test_file_provider_missing_file() {
        let provider = FileSnapshotProvider::new(temp_path());
        assert!(matches!(
            provider.snapshot().await,
            Err(AppError::PanelNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_file_provider_bad_json() {
        let path = temp_path();
        tokio::fs::write(&path, "not json").await.unwrap();
        let provider = FileSnapshotProvider::new(&path);
        assert!(matches!(provider.snapshot().await, Err(AppError::Json(_))));
        tokio::fs::remove_file(&path).await.unwrap();
    }

    #[tokio::test]
    async fn test_static_provider_replace() {
        let provider = StaticSnapshotProvider::new(None);
        assert!(provider.snapshot().await.is_err());

        provider.replace(Some(vec![VoteEntry::revealed("8")]));
        assert_eq!(provider.snapshot().await.unwrap(), vec![VoteEntry::revealed("8")]);
    }
}
