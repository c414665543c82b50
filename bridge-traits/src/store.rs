//! Remote Share Store Abstractions
//!
//! Traits for the hierarchical remote file store the relay scans, and for
//! minting time-limited download links against it.

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use std::time::Duration;

use crate::error::Result;

/// Kind of a directory entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
}

/// One entry of a directory listing, as returned by the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareEntry {
    /// Entry name without any path prefix
    pub name: String,
    pub kind: EntryKind,
}

impl ShareEntry {
    pub fn file(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::File,
        }
    }

    pub fn directory(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::Directory,
        }
    }
}

/// Per-file properties fetched from the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileProperties {
    pub size: u64,
    pub last_modified: DateTime<Utc>,
    pub content_type: String,
}

/// Hierarchical remote file store
///
/// Abstracts the cloud file share the relay scans. Paths are slash-separated
/// and root-relative; the root is the empty string and no path carries a
/// leading slash.
///
/// # Failure modes
///
/// - `BridgeError::NotFound` - the path does not exist
/// - `BridgeError::OperationFailed` - transient or network failure
/// - `BridgeError::Unauthorized` - the credentials do not cover the operation
///
/// Callers treat not-found specially only where noted (companion lookup);
/// everywhere else any failure is a per-item failure.
#[async_trait]
pub trait ShareStore: Send + Sync {
    /// List the direct children of a directory
    ///
    /// Returns entries in the order the store reports them; that order is not
    /// guaranteed stable across calls.
    async fn list_children(&self, path: &str) -> Result<Vec<ShareEntry>>;

    /// Fetch size, last-modified time and content type for one file
    async fn file_properties(&self, path: &str) -> Result<FileProperties>;

    /// Upload file content, creating any missing directory hierarchy
    async fn upload(&self, path: &str, data: Bytes) -> Result<()>;

    /// Cheap readiness check
    ///
    /// Used before jobs start so configuration and connectivity problems fail
    /// fast instead of surfacing as a wall of per-item errors.
    async fn probe(&self) -> Result<()>;
}

/// Bounded-lifetime download link issuer
///
/// The issued URL must be resolvable by the downstream sink without further
/// credentials and remain valid for at least `ttl`. Issuers mint one link per
/// call; links are never cached or reused across job runs.
#[async_trait]
pub trait LinkIssuer: Send + Sync {
    async fn issue_link(&self, path: &str, ttl: Duration) -> Result<String>;
}

/// Join a directory prefix and an entry name with `/`
///
/// The empty prefix denotes the share root, so root-level entries carry no
/// leading slash.
pub fn join_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", prefix, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_path_root() {
        assert_eq!(join_path("", "clip.wav"), "clip.wav");
    }

    #[test]
    fn test_join_path_nested() {
        assert_eq!(join_path("calls/2026", "clip.wav"), "calls/2026/clip.wav");
    }

    #[test]
    fn test_share_entry_constructors() {
        assert_eq!(ShareEntry::file("a").kind, EntryKind::File);
        assert_eq!(ShareEntry::directory("d").kind, EntryKind::Directory);
    }
}
