//! Listing and query operations over the share
//!
//! Thin compositions of the walker and the window predicate: full-tree
//! listings, rolling recent-files queries, and explicit date-range queries.

use std::sync::Arc;
use std::time::Duration;

use bridge_traits::store::ShareStore;
use chrono::{DateTime, Utc};
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument};

use crate::descriptor::FileDescriptor;
use crate::error::Result;
use crate::walker::{TreeWalker, WalkReport};
use crate::window::TimeWindow;

/// Files found by a query plus the walk's error report
#[derive(Debug, Clone)]
pub struct Listing {
    pub files: Vec<FileDescriptor>,
    pub report: WalkReport,
}

/// Read-only queries over the share tree
pub struct Scanner {
    walker: TreeWalker,
}

impl Scanner {
    pub fn new(store: Arc<dyn ShareStore>) -> Self {
        Self {
            walker: TreeWalker::new(store),
        }
    }

    /// Every file below `root`, in discovery order
    #[instrument(skip(self, cancel), fields(root = %root))]
    pub async fn list_tree(&self, root: &str, cancel: &CancellationToken) -> Listing {
        let mut files = Vec::new();
        let report = self.walker.walk(root, cancel, |fd| files.push(fd)).await;
        info!(found = files.len(), "Tree listing complete");
        Listing { files, report }
    }

    /// Files whose modification time falls inside `window`, newest first
    #[instrument(skip(self, cancel), fields(root = %root, window = %window))]
    pub async fn files_in_window(
        &self,
        root: &str,
        window: TimeWindow,
        cancel: &CancellationToken,
    ) -> Listing {
        let mut files = Vec::new();
        let report = self
            .walker
            .walk(root, cancel, |fd| {
                if window.contains(fd.last_modified) {
                    files.push(fd);
                }
            })
            .await;
        files.sort_by(|a, b| b.last_modified.cmp(&a.last_modified));
        info!(found = files.len(), "Window query complete");
        Listing { files, report }
    }

    /// Files modified within the last `lookback`, measured from `now`
    pub async fn recent_files(
        &self,
        root: &str,
        now: DateTime<Utc>,
        lookback: Duration,
        cancel: &CancellationToken,
    ) -> Listing {
        self.files_in_window(root, TimeWindow::rolling(now, lookback), cancel)
            .await
    }

    /// Files modified inside `[start, end]`, both bounds inclusive
    pub async fn files_in_range(
        &self,
        root: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        cancel: &CancellationToken,
    ) -> Result<Listing> {
        let window = TimeWindow::between(start, end)?;
        Ok(self.files_in_window(root, window, cancel).await)
    }
}
