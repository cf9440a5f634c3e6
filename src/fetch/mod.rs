//! Asynchronous resource fetching with bounded retry.

mod retry;

use async_trait::async_trait;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use std::sync::Mutex;

use crate::error::FetchError;

pub use retry::{fetch_json_with_retry, fetch_with_retry, RetryPolicy};

/// Source of site content addressed by relative path (`locales/en.json`).
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, path: &str) -> Result<String, FetchError>;
}

/// Reads content from a directory on disk.
#[derive(Debug, Clone)]
pub struct FsFetcher {
    root: PathBuf,
}

impl FsFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> Option<PathBuf> {
        let relative = Path::new(path.trim_start_matches('/'));
        let safe = relative
            .components()
            .all(|component| matches!(component, Component::Normal(_)));
        safe.then(|| self.root.join(relative))
    }
}

#[async_trait]
impl Fetcher for FsFetcher {
    async fn fetch(&self, path: &str) -> Result<String, FetchError> {
        let full_path = self.resolve(path).ok_or_else(|| FetchError::Status {
            path: path.to_string(),
            status: 400,
        })?;

        tokio::fs::read_to_string(&full_path)
            .await
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => FetchError::Status {
                    path: path.to_string(),
                    status: 404,
                },
                _ => FetchError::Network {
                    path: path.to_string(),
                    message: e.to_string(),
                },
            })
    }
}

/// Serves content from memory; unknown paths answer 404.
#[derive(Debug, Default)]
pub struct MemoryFetcher {
    files: Mutex<HashMap<String, String>>,
}

impl MemoryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(self, path: &str, body: impl Into<String>) -> Self {
        self.insert(path, body);
        self
    }

    pub fn insert(&self, path: &str, body: impl Into<String>) {
        self.files
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(path.trim_start_matches('/').to_string(), body.into());
    }
}

#[async_trait]
impl Fetcher for MemoryFetcher {
    async fn fetch(&self, path: &str) -> Result<String, FetchError> {
        self.files
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(path.trim_start_matches('/'))
            .cloned()
            .ok_or_else(|| FetchError::Status {
                path: path.to_string(),
                status: 404,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fs_fetcher_reads_files_under_root() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("locales")).unwrap();
        std::fs::write(dir.path().join("locales/en.json"), "{}").unwrap();

        let fetcher = FsFetcher::new(dir.path());
        assert_eq!(fetcher.fetch("locales/en.json").await.unwrap(), "{}");
        assert_eq!(fetcher.fetch("/locales/en.json").await.unwrap(), "{}");
    }

    #[tokio::test]
    async fn fs_fetcher_maps_missing_files_to_404() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = FsFetcher::new(dir.path());
        match fetcher.fetch("locales/lo.json").await {
            Err(FetchError::Status { status, .. }) => assert_eq!(status, 404),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn fs_fetcher_refuses_parent_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = FsFetcher::new(dir.path().join("content"));
        match fetcher.fetch("../secret.txt").await {
            Err(FetchError::Status { status, .. }) => assert_eq!(status, 400),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn memory_fetcher_serves_inserted_content() {
        let fetcher = MemoryFetcher::new().with("data/projects.json", "{\"projects\":[]}");
        assert!(fetcher.fetch("/data/projects.json").await.is_ok());
        assert!(fetcher.fetch("data/other.json").await.is_err());
    }
}
