//! File descriptors produced by the walk

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Immutable snapshot of one remote file at scan time
///
/// Lives only for the duration of one scan or job run; descriptors are never
/// cached across runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileDescriptor {
    /// Slash-separated path, relative to the scan root, unique within a scan.
    /// Root-level files carry no leading slash.
    pub path: String,
    /// Entry name without any path prefix
    pub name: String,
    /// Size in bytes
    pub size: u64,
    /// Last modification time
    pub last_modified: DateTime<Utc>,
    /// Content type as reported by the store
    pub content_type: String,
}

impl FileDescriptor {
    /// Extension of the file name, without the dot, if any
    pub fn extension(&self) -> Option<&str> {
        match self.name.rsplit_once('.') {
            Some(("", _)) | None => None,
            Some((_, ext)) => Some(ext),
        }
    }
}
