//! Share adapter over an `object_store::ObjectStore`
//!
//! Object stores have no real directories; levels are synthesized with
//! delimiter listings, so listing a prefix with no objects under it simply
//! yields no children.

use async_trait::async_trait;
use bridge_traits::error::Result;
use bridge_traits::store::{EntryKind, FileProperties, ShareEntry, ShareStore};
use bytes::Bytes;
use object_store::{path::Path, ObjectStore};
use std::sync::Arc;
use tracing::{debug, instrument};

use crate::error::ShareProviderError;

/// [`ShareStore`] implementation backed by any `ObjectStore`
pub struct ObjectStoreShare {
    store: Arc<dyn ObjectStore>,
}

impl ObjectStoreShare {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    fn location(path: &str) -> Path {
        Path::from(path)
    }
}

#[async_trait]
impl ShareStore for ObjectStoreShare {
    #[instrument(skip(self), fields(path = %path))]
    async fn list_children(&self, path: &str) -> Result<Vec<ShareEntry>> {
        let prefix = if path.is_empty() {
            None
        } else {
            Some(Self::location(path))
        };
        let listing = self
            .store
            .list_with_delimiter(prefix.as_ref())
            .await
            .map_err(ShareProviderError::Store)?;

        let mut children = Vec::with_capacity(
            listing.common_prefixes.len() + listing.objects.len(),
        );
        for dir in &listing.common_prefixes {
            if let Some(name) = dir.filename() {
                children.push(ShareEntry {
                    name: name.to_string(),
                    kind: EntryKind::Directory,
                });
            }
        }
        for object in &listing.objects {
            if let Some(name) = object.location.filename() {
                children.push(ShareEntry {
                    name: name.to_string(),
                    kind: EntryKind::File,
                });
            }
        }

        debug!(children = children.len(), "Listed directory");
        Ok(children)
    }

    #[instrument(skip(self), fields(path = %path))]
    async fn file_properties(&self, path: &str) -> Result<FileProperties> {
        let meta = self
            .store
            .head(&Self::location(path))
            .await
            .map_err(ShareProviderError::Store)?;

        Ok(FileProperties {
            size: meta.size,
            last_modified: meta.last_modified,
            // `head` carries no content type; derive it from the extension.
            content_type: content_type_for(path).to_string(),
        })
    }

    #[instrument(skip(self, data), fields(path = %path, bytes = data.len()))]
    async fn upload(&self, path: &str, data: Bytes) -> Result<()> {
        self.store
            .put(&Self::location(path), data.into())
            .await
            .map_err(ShareProviderError::Store)?;
        Ok(())
    }

    async fn probe(&self) -> Result<()> {
        self.store
            .list_with_delimiter(None)
            .await
            .map_err(ShareProviderError::Store)?;
        Ok(())
    }
}

/// Best-effort content type from the file extension
fn content_type_for(path: &str) -> &'static str {
    let extension = path
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "wav" => "audio/wav",
        "mp3" => "audio/mpeg",
        "json" => "application/json",
        "txt" => "text/plain",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use object_store::memory::InMemory;

    async fn seeded() -> ObjectStoreShare {
        let store = InMemory::new();
        for path in ["a.wav", "a.json", "calls/b.wav", "calls/2026/c.mp3"] {
            store
                .put(&Path::from(path), Bytes::from_static(b"data").into())
                .await
                .unwrap();
        }
        ObjectStoreShare::new(Arc::new(store))
    }

    #[tokio::test]
    async fn test_list_children_at_root() {
        let share = seeded().await;
        let children = share.list_children("").await.unwrap();

        assert!(children.contains(&ShareEntry::directory("calls")));
        assert!(children.contains(&ShareEntry::file("a.wav")));
        assert!(children.contains(&ShareEntry::file("a.json")));
        assert_eq!(children.len(), 3);
    }

    #[tokio::test]
    async fn test_list_children_nested() {
        let share = seeded().await;
        let children = share.list_children("calls").await.unwrap();

        assert!(children.contains(&ShareEntry::directory("2026")));
        assert!(children.contains(&ShareEntry::file("b.wav")));
        assert_eq!(children.len(), 2);
    }

    #[tokio::test]
    async fn test_empty_prefix_has_no_children() {
        let share = seeded().await;
        let children = share.list_children("nowhere").await.unwrap();
        assert!(children.is_empty());
    }

    #[tokio::test]
    async fn test_file_properties() {
        let share = seeded().await;
        let properties = share.file_properties("calls/b.wav").await.unwrap();

        assert_eq!(properties.size, 4);
        assert_eq!(properties.content_type, "audio/wav");
    }

    #[tokio::test]
    async fn test_missing_file_is_not_found() {
        let share = seeded().await;
        let err = share.file_properties("missing.wav").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_upload_then_head() {
        let share = seeded().await;
        share
            .upload("in/new.mp3", Bytes::from_static(b"012345"))
            .await
            .unwrap();

        let properties = share.file_properties("in/new.mp3").await.unwrap();
        assert_eq!(properties.size, 6);
        assert_eq!(properties.content_type, "audio/mpeg");
    }

    #[tokio::test]
    async fn test_probe_succeeds() {
        let share = seeded().await;
        share.probe().await.unwrap();
    }

    #[test]
    fn test_content_type_inference() {
        assert_eq!(content_type_for("x/clip.WAV"), "audio/wav");
        assert_eq!(content_type_for("meta.json"), "application/json");
        assert_eq!(content_type_for("blob"), "application/octet-stream");
    }
}
