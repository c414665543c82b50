//! Bulk folder upload
//!
//! Mirrors a local directory tree into the share under a remote base path.
//! Per-file failures are recorded and the upload continues; only a missing or
//! unreadable local root aborts the whole operation.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use bridge_traits::store::{join_path, ShareStore};
use bytes::Bytes;
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};

use crate::error::{RelayError, Result};

/// One file that could not be uploaded
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadFailure {
    /// Path relative to the local root, slash-separated
    pub file: String,
    pub error: String,
}

/// Aggregate outcome of one folder upload
#[derive(Debug, Clone, Default, Serialize)]
pub struct UploadSummary {
    /// Files discovered under the local root
    pub total: u64,
    pub uploaded: u64,
    pub failed: u64,
    pub failures: Vec<UploadFailure>,
}

/// Uploads a local directory tree into the share
pub struct FolderUploader {
    store: Arc<dyn ShareStore>,
}

impl FolderUploader {
    pub fn new(store: Arc<dyn ShareStore>) -> Self {
        Self { store }
    }

    /// Upload everything under `local_root` below `remote_base`
    ///
    /// Relative paths are preserved, joined with `/`. Cancellation is
    /// observed between files; files not attempted are recorded as failures
    /// so the summary stays exact.
    ///
    /// # Errors
    ///
    /// Returns `RelayError::LocalPath` when `local_root` is missing or not a
    /// directory.
    #[instrument(skip(self, cancel), fields(local = %local_root.display(), remote = %remote_base))]
    pub async fn upload(
        &self,
        local_root: &Path,
        remote_base: &str,
        cancel: &CancellationToken,
    ) -> Result<UploadSummary> {
        let metadata = tokio::fs::metadata(local_root).await.map_err(|e| {
            RelayError::LocalPath(format!(
                "local folder not found: {}: {}",
                local_root.display(),
                e
            ))
        })?;
        if !metadata.is_dir() {
            return Err(RelayError::LocalPath(format!(
                "not a directory: {}",
                local_root.display()
            )));
        }

        let mut summary = UploadSummary::default();
        let files = self.collect_files(local_root, &mut summary).await;
        summary.total = files.len() as u64;
        info!(total = summary.total, "Uploading folder");

        let mut remaining = files.into_iter();
        for file in remaining.by_ref() {
            if cancel.is_cancelled() {
                summary.failures.push(UploadFailure {
                    file: relative_slash_path(local_root, &file),
                    error: "cancelled before upload".to_string(),
                });
                break;
            }

            let relative = relative_slash_path(local_root, &file);
            let remote_path = join_path(remote_base, &relative);
            match tokio::fs::read(&file).await {
                Ok(bytes) => match self.store.upload(&remote_path, Bytes::from(bytes)).await {
                    Ok(()) => {
                        debug!(file = %relative, remote = %remote_path, "Uploaded");
                        summary.uploaded += 1;
                    }
                    Err(e) => summary.failures.push(UploadFailure {
                        file: relative,
                        error: e.to_string(),
                    }),
                },
                Err(e) => summary.failures.push(UploadFailure {
                    file: relative,
                    error: e.to_string(),
                }),
            }
        }
        for file in remaining {
            summary.failures.push(UploadFailure {
                file: relative_slash_path(local_root, &file),
                error: "cancelled before upload".to_string(),
            });
        }

        summary.failed = summary.failures.len() as u64;
        info!(
            uploaded = summary.uploaded,
            failed = summary.failed,
            "Folder upload finished"
        );
        Ok(summary)
    }

    /// Enumerate files below `root` with an explicit directory stack
    ///
    /// Unreadable subdirectories are recorded as failures and skipped.
    async fn collect_files(&self, root: &Path, summary: &mut UploadSummary) -> Vec<PathBuf> {
        let mut pending = vec![root.to_path_buf()];
        let mut files = Vec::new();

        while let Some(dir) = pending.pop() {
            let mut entries = match tokio::fs::read_dir(&dir).await {
                Ok(entries) => entries,
                Err(e) => {
                    summary.failures.push(UploadFailure {
                        file: relative_slash_path(root, &dir),
                        error: e.to_string(),
                    });
                    continue;
                }
            };
            loop {
                match entries.next_entry().await {
                    Ok(Some(entry)) => {
                        let path = entry.path();
                        match entry.file_type().await {
                            Ok(ft) if ft.is_dir() => pending.push(path),
                            Ok(ft) if ft.is_file() => files.push(path),
                            // Symlinks and other specials are ignored.
                            Ok(_) => {}
                            Err(e) => summary.failures.push(UploadFailure {
                                file: relative_slash_path(root, &path),
                                error: e.to_string(),
                            }),
                        }
                    }
                    Ok(None) => break,
                    Err(e) => {
                        summary.failures.push(UploadFailure {
                            file: relative_slash_path(root, &dir),
                            error: e.to_string(),
                        });
                        break;
                    }
                }
            }
        }

        files.sort();
        files
    }
}

/// Relative path below `root`, slash-separated regardless of platform
fn relative_slash_path(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_traits::testing::MemoryShareStore;

    async fn seed_local_tree(root: &Path) {
        tokio::fs::create_dir_all(root.join("nested/deep")).await.unwrap();
        tokio::fs::write(root.join("a.wav"), b"pcm-a").await.unwrap();
        tokio::fs::write(root.join("nested/b.wav"), b"pcm-b").await.unwrap();
        tokio::fs::write(root.join("nested/deep/c.json"), b"{}").await.unwrap();
    }

    #[tokio::test]
    async fn test_upload_mirrors_relative_paths() {
        let dir = tempfile::tempdir().unwrap();
        seed_local_tree(dir.path()).await;

        let store = Arc::new(MemoryShareStore::new());
        let uploader = FolderUploader::new(store.clone());
        let summary = uploader
            .upload(dir.path(), "incoming", &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(summary.total, 3);
        assert_eq!(summary.uploaded, 3);
        assert_eq!(summary.failed, 0);
        assert_eq!(
            store.uploaded("incoming/a.wav").unwrap(),
            Bytes::from_static(b"pcm-a")
        );
        assert!(store.contains("incoming/nested/b.wav"));
        assert!(store.contains("incoming/nested/deep/c.json"));
    }

    #[tokio::test]
    async fn test_upload_to_share_root() {
        let dir = tempfile::tempdir().unwrap();
        tokio::fs::write(dir.path().join("a.wav"), b"x").await.unwrap();

        let store = Arc::new(MemoryShareStore::new());
        let uploader = FolderUploader::new(store.clone());
        let summary = uploader
            .upload(dir.path(), "", &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(summary.uploaded, 1);
        assert!(store.contains("a.wav"));
    }

    #[tokio::test]
    async fn test_missing_root_is_hard_error() {
        let store = Arc::new(MemoryShareStore::new());
        let uploader = FolderUploader::new(store);
        let err = uploader
            .upload(Path::new("/definitely/not/here"), "", &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, RelayError::LocalPath(_)));
    }

    #[tokio::test]
    async fn test_root_must_be_directory() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("plain.txt");
        tokio::fs::write(&file, b"x").await.unwrap();

        let store = Arc::new(MemoryShareStore::new());
        let uploader = FolderUploader::new(store);
        assert!(uploader
            .upload(&file, "", &CancellationToken::new())
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_cancelled_upload_accounts_every_file() {
        let dir = tempfile::tempdir().unwrap();
        seed_local_tree(dir.path()).await;

        let cancel = CancellationToken::new();
        cancel.cancel();

        let store = Arc::new(MemoryShareStore::new());
        let uploader = FolderUploader::new(store);
        let summary = uploader.upload(dir.path(), "in", &cancel).await.unwrap();

        assert_eq!(summary.total, 3);
        assert_eq!(summary.uploaded, 0);
        assert_eq!(summary.failed, 3);
        assert_eq!(summary.uploaded + summary.failed, summary.total);
    }
}
