//! Companion matching
//!
//! A data file's sidecar metadata companion shares its base name and carries a
//! fixed metadata extension. The lookup is best-effort: a companion that
//! appears between check and use is not guaranteed visible, and no failure in
//! the lookup ever fails the primary.

use bridge_traits::store::ShareStore;
use serde::Serialize;
use tracing::debug;

use crate::descriptor::FileDescriptor;

/// A primary data file and its optional sidecar companion
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilePair {
    pub primary: FileDescriptor,
    pub companion: Option<FileDescriptor>,
}

/// Derives companion paths and confirms companion existence
///
/// Only files whose extension is in `data_extensions` are eligible for
/// pairing; everything else passes through with no companion.
#[derive(Debug, Clone)]
pub struct CompanionMatcher {
    data_extensions: Vec<String>,
    metadata_extension: String,
}

impl Default for CompanionMatcher {
    fn default() -> Self {
        Self::new(&["wav", "mp3"], "json")
    }
}

impl CompanionMatcher {
    /// Extensions are matched case-insensitively and stored without dots
    pub fn new<I, S>(data_extensions: I, metadata_extension: &str) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            data_extensions: data_extensions
                .into_iter()
                .map(|e| e.as_ref().trim_start_matches('.').to_ascii_lowercase())
                .collect(),
            metadata_extension: metadata_extension.trim_start_matches('.').to_string(),
        }
    }

    /// Whether this file is an eligible data file
    pub fn is_eligible(&self, fd: &FileDescriptor) -> bool {
        fd.extension()
            .map(|ext| self.data_extensions.contains(&ext.to_ascii_lowercase()))
            .unwrap_or(false)
    }

    /// Companion path for an eligible data path, `None` otherwise
    ///
    /// `calls/clip.wav` -> `calls/clip.json`
    pub fn companion_path(&self, path: &str) -> Option<String> {
        let (base, ext) = path.rsplit_once('.')?;
        if base.is_empty() || !self.data_extensions.contains(&ext.to_ascii_lowercase()) {
            return None;
        }
        Some(format!("{}.{}", base, self.metadata_extension))
    }

    /// Look up the companion of `primary` in the store
    ///
    /// One property fetch; not-found and transient failures both mean "no
    /// companion". This never returns an error to the caller.
    pub async fn find_companion(
        &self,
        store: &dyn ShareStore,
        primary: &FileDescriptor,
    ) -> Option<FileDescriptor> {
        let companion_path = self.companion_path(&primary.path)?;
        match store.file_properties(&companion_path).await {
            Ok(properties) => {
                let name = companion_path
                    .rsplit_once('/')
                    .map(|(_, n)| n)
                    .unwrap_or(&companion_path)
                    .to_string();
                Some(FileDescriptor {
                    path: companion_path,
                    name,
                    size: properties.size,
                    last_modified: properties.last_modified,
                    content_type: properties.content_type,
                })
            }
            Err(e) => {
                debug!(
                    primary = %primary.path,
                    companion = %companion_path,
                    reason = %e,
                    "No companion"
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_traits::testing::MemoryShareStore;
    use chrono::{TimeZone, Utc};

    fn mtime() -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 7, 1, 12, 0, 0).unwrap()
    }

    fn wav(path: &str) -> FileDescriptor {
        FileDescriptor {
            path: path.to_string(),
            name: path.rsplit('/').next().unwrap().to_string(),
            size: 10,
            last_modified: mtime(),
            content_type: "audio/wav".to_string(),
        }
    }

    #[test]
    fn test_companion_path_replaces_data_extension() {
        let matcher = CompanionMatcher::default();
        assert_eq!(
            matcher.companion_path("calls/clip.wav"),
            Some("calls/clip.json".to_string())
        );
        assert_eq!(
            matcher.companion_path("CLIP.MP3"),
            Some("CLIP.json".to_string())
        );
        assert_eq!(matcher.companion_path("notes.txt"), None);
        assert_eq!(matcher.companion_path("no_extension"), None);
    }

    #[test]
    fn test_eligibility_is_case_insensitive() {
        let matcher = CompanionMatcher::default();
        assert!(matcher.is_eligible(&wav("clip.WAV")));
        assert!(!matcher.is_eligible(&wav("clip.txt")));
    }

    #[tokio::test]
    async fn test_present_companion_is_returned() {
        let store = MemoryShareStore::new();
        store.add_file("clip.wav", 10, mtime(), "audio/wav");
        store.add_file("clip.json", 2, mtime(), "application/json");

        let matcher = CompanionMatcher::default();
        let companion = matcher.find_companion(&store, &wav("clip.wav")).await;

        let companion = companion.expect("companion present");
        assert_eq!(companion.path, "clip.json");
        assert_eq!(companion.name, "clip.json");
        assert_eq!(companion.size, 2);
    }

    #[tokio::test]
    async fn test_absent_companion_is_none() {
        let store = MemoryShareStore::new();
        store.add_file("clip.wav", 10, mtime(), "audio/wav");

        let matcher = CompanionMatcher::default();
        assert!(matcher.find_companion(&store, &wav("clip.wav")).await.is_none());
    }

    #[tokio::test]
    async fn test_property_failure_is_none_not_error() {
        let store = MemoryShareStore::new();
        store.add_file("clip.wav", 10, mtime(), "audio/wav");
        store.add_file("clip.json", 2, mtime(), "application/json");
        store.fail_properties("clip.json");

        let matcher = CompanionMatcher::default();
        assert!(matcher.find_companion(&store, &wav("clip.wav")).await.is_none());
    }

    #[tokio::test]
    async fn test_ineligible_file_gets_no_lookup() {
        let store = MemoryShareStore::new();
        let matcher = CompanionMatcher::default();
        assert!(matcher.find_companion(&store, &wav("clip.txt")).await.is_none());
    }
}
