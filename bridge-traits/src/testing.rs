//! Deterministic in-memory test doubles
//!
//! Available behind the `testing` feature. Downstream crates enable it from
//! their dev-dependencies to drive walker and pipeline tests against a fully
//! scripted store without mocking every call.

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::Mutex;
use std::time::Duration;

use crate::error::{BridgeError, Result};
use crate::store::{EntryKind, FileProperties, LinkIssuer, ShareEntry, ShareStore};
use crate::time::Clock;

#[derive(Debug, Clone)]
struct StoredFile {
    properties: FileProperties,
    data: Bytes,
}

#[derive(Debug, Default)]
struct Inner {
    files: BTreeMap<String, StoredFile>,
    directories: BTreeSet<String>,
    fail_listings: HashSet<String>,
    fail_properties: HashSet<String>,
}

/// In-memory [`ShareStore`] with scriptable failures
///
/// Listing order is deterministic: the direct children of a directory are
/// returned sorted by name, directories and files interleaved.
///
/// # Example
///
/// ```ignore
/// let store = MemoryShareStore::new();
/// store.add_file("calls/a.wav", 128, mtime, "audio/wav");
/// store.fail_listing("calls/broken");
/// ```
#[derive(Debug, Default)]
pub struct MemoryShareStore {
    inner: Mutex<Inner>,
}

impl MemoryShareStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a file, creating every ancestor directory
    pub fn add_file(
        &self,
        path: &str,
        size: u64,
        last_modified: DateTime<Utc>,
        content_type: &str,
    ) {
        let mut inner = self.inner.lock().unwrap();
        Self::register_ancestors(&mut inner, path);
        inner.files.insert(
            path.to_string(),
            StoredFile {
                properties: FileProperties {
                    size,
                    last_modified,
                    content_type: content_type.to_string(),
                },
                data: Bytes::new(),
            },
        );
    }

    /// Register an empty directory
    pub fn add_directory(&self, path: &str) {
        let mut inner = self.inner.lock().unwrap();
        Self::register_ancestors(&mut inner, path);
        inner.directories.insert(path.to_string());
    }

    /// Make `list_children` fail for one directory
    pub fn fail_listing(&self, path: &str) {
        self.inner
            .lock()
            .unwrap()
            .fail_listings
            .insert(path.to_string());
    }

    /// Make `file_properties` fail for one file
    pub fn fail_properties(&self, path: &str) {
        self.inner
            .lock()
            .unwrap()
            .fail_properties
            .insert(path.to_string());
    }

    /// Content previously stored via `upload`, if any
    pub fn uploaded(&self, path: &str) -> Option<Bytes> {
        self.inner
            .lock()
            .unwrap()
            .files
            .get(path)
            .map(|f| f.data.clone())
    }

    pub fn contains(&self, path: &str) -> bool {
        self.inner.lock().unwrap().files.contains_key(path)
    }

    fn register_ancestors(inner: &mut Inner, path: &str) {
        let mut prefix = String::new();
        let mut segments = path.split('/').collect::<Vec<_>>();
        // The last segment is the entry itself, not an ancestor.
        segments.pop();
        for segment in segments {
            if !prefix.is_empty() {
                prefix.push('/');
            }
            prefix.push_str(segment);
            inner.directories.insert(prefix.clone());
        }
    }

    fn parent_of(path: &str) -> &str {
        path.rsplit_once('/').map(|(p, _)| p).unwrap_or("")
    }

    fn name_of(path: &str) -> &str {
        path.rsplit_once('/').map(|(_, n)| n).unwrap_or(path)
    }
}

#[async_trait]
impl ShareStore for MemoryShareStore {
    async fn list_children(&self, path: &str) -> Result<Vec<ShareEntry>> {
        let inner = self.inner.lock().unwrap();
        if inner.fail_listings.contains(path) {
            return Err(BridgeError::OperationFailed(format!(
                "injected listing failure for '{}'",
                path
            )));
        }
        if !path.is_empty() && !inner.directories.contains(path) {
            return Err(BridgeError::NotFound(path.to_string()));
        }

        let mut children: Vec<ShareEntry> = Vec::new();
        for dir in &inner.directories {
            if Self::parent_of(dir) == path {
                children.push(ShareEntry {
                    name: Self::name_of(dir).to_string(),
                    kind: EntryKind::Directory,
                });
            }
        }
        for file in inner.files.keys() {
            if Self::parent_of(file) == path {
                children.push(ShareEntry {
                    name: Self::name_of(file).to_string(),
                    kind: EntryKind::File,
                });
            }
        }
        children.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(children)
    }

    async fn file_properties(&self, path: &str) -> Result<FileProperties> {
        let inner = self.inner.lock().unwrap();
        if inner.fail_properties.contains(path) {
            return Err(BridgeError::OperationFailed(format!(
                "injected properties failure for '{}'",
                path
            )));
        }
        inner
            .files
            .get(path)
            .map(|f| f.properties.clone())
            .ok_or_else(|| BridgeError::NotFound(path.to_string()))
    }

    async fn upload(&self, path: &str, data: Bytes) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        Self::register_ancestors(&mut inner, path);
        inner.files.insert(
            path.to_string(),
            StoredFile {
                properties: FileProperties {
                    size: data.len() as u64,
                    last_modified: Utc::now(),
                    content_type: "application/octet-stream".to_string(),
                },
                data,
            },
        );
        Ok(())
    }

    async fn probe(&self) -> Result<()> {
        let inner = self.inner.lock().unwrap();
        if inner.fail_listings.contains("") {
            return Err(BridgeError::OperationFailed(
                "injected probe failure".to_string(),
            ));
        }
        Ok(())
    }
}

/// [`LinkIssuer`] double producing predictable URLs
#[derive(Debug, Default)]
pub struct StaticLinkIssuer {
    base: String,
    fail_paths: Mutex<HashSet<String>>,
}

impl StaticLinkIssuer {
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            fail_paths: Mutex::new(HashSet::new()),
        }
    }

    /// Make `issue_link` fail for one path
    pub fn fail_for(&self, path: &str) {
        self.fail_paths.lock().unwrap().insert(path.to_string());
    }
}

#[async_trait]
impl LinkIssuer for StaticLinkIssuer {
    async fn issue_link(&self, path: &str, ttl: Duration) -> Result<String> {
        if self.fail_paths.lock().unwrap().contains(path) {
            return Err(BridgeError::OperationFailed(format!(
                "injected link failure for '{}'",
                path
            )));
        }
        Ok(format!("{}/{}?sig=stub&ttl={}", self.base, path, ttl.as_secs()))
    }
}

/// [`Clock`] pinned to one instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn mtime() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 7, 1, 12, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_listing_is_sorted_and_scoped() {
        let store = MemoryShareStore::new();
        store.add_file("b.wav", 1, mtime(), "audio/wav");
        store.add_file("calls/a.wav", 1, mtime(), "audio/wav");
        store.add_directory("archive");

        let root = store.list_children("").await.unwrap();
        let names: Vec<_> = root.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["archive", "b.wav", "calls"]);

        let nested = store.list_children("calls").await.unwrap();
        assert_eq!(nested, vec![ShareEntry::file("a.wav")]);
    }

    #[tokio::test]
    async fn test_injected_failures() {
        let store = MemoryShareStore::new();
        store.add_file("calls/a.wav", 1, mtime(), "audio/wav");
        store.fail_listing("calls");
        store.fail_properties("calls/a.wav");

        assert!(store.list_children("calls").await.is_err());
        assert!(store.file_properties("calls/a.wav").await.is_err());
    }

    #[tokio::test]
    async fn test_missing_entries_are_not_found() {
        let store = MemoryShareStore::new();
        let err = store.file_properties("nope.wav").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_upload_roundtrip() {
        let store = MemoryShareStore::new();
        store
            .upload("in/clip.wav", Bytes::from_static(b"pcm"))
            .await
            .unwrap();
        assert_eq!(store.uploaded("in/clip.wav").unwrap(), Bytes::from_static(b"pcm"));
        assert!(store.list_children("in").await.is_ok());
    }

    #[tokio::test]
    async fn test_static_link_issuer() {
        let issuer = StaticLinkIssuer::new("https://links.test");
        let url = issuer
            .issue_link("calls/a.wav", Duration::from_secs(60))
            .await
            .unwrap();
        assert_eq!(url, "https://links.test/calls/a.wav?sig=stub&ttl=60");

        issuer.fail_for("calls/a.wav");
        assert!(issuer
            .issue_link("calls/a.wav", Duration::from_secs(60))
            .await
            .is_err());
    }
}
