//! Tree walker
//!
//! Pre-order, depth-first enumeration of every file below a root directory.
//! Traversal state is an explicit frame stack, so pathological tree depths
//! cannot exhaust the call stack and cancellation slots in naturally between
//! entries.

use std::sync::Arc;

use bridge_traits::store::{join_path, EntryKind, ShareEntry, ShareStore};
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, warn};

use crate::descriptor::FileDescriptor;

/// One recorded traversal failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkError {
    pub path: String,
    pub reason: String,
}

/// Aggregate outcome of one walk
///
/// `visited + skipped` equals the number of file nodes whose properties were
/// attempted; subtrees lost to a listing failure appear in `errors` only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalkReport {
    /// Files handed to the visitor
    pub visited: u64,
    /// Files skipped because their properties could not be fetched
    pub skipped: u64,
    /// Per-node failures, in discovery order
    pub errors: Vec<WalkError>,
}

impl WalkReport {
    fn record_error(&mut self, path: String, reason: String) {
        warn!(path = %path, reason = %reason, "Walk error, continuing");
        self.errors.push(WalkError { path, reason });
    }
}

/// A directory level currently being traversed
struct Frame {
    path: String,
    entries: Vec<ShareEntry>,
    next: usize,
}

/// Pre-order depth-first walker over a [`ShareStore`]
///
/// Sibling order is whatever order the store returns; each directory entry is
/// expanded immediately, before the remaining entries of its own level.
/// Per-node failures are recorded in the [`WalkReport`] and never abort the
/// traversal of siblings or ancestors.
pub struct TreeWalker {
    store: Arc<dyn ShareStore>,
}

impl TreeWalker {
    pub fn new(store: Arc<dyn ShareStore>) -> Self {
        Self { store }
    }

    /// Walk the tree below `root`, invoking `visit` for every file
    ///
    /// `root` is `""` for the share root. Cancellation is observed between
    /// entries; a cancelled walk returns the report accumulated so far.
    #[instrument(skip(self, cancel, visit), fields(root = %root))]
    pub async fn walk<F>(
        &self,
        root: &str,
        cancel: &CancellationToken,
        mut visit: F,
    ) -> WalkReport
    where
        F: FnMut(FileDescriptor),
    {
        let mut report = WalkReport::default();
        let mut stack: Vec<Frame> = Vec::new();

        match self.store.list_children(root).await {
            Ok(entries) => stack.push(Frame {
                path: root.to_string(),
                entries,
                next: 0,
            }),
            Err(e) => {
                report.record_error(root.to_string(), e.to_string());
                return report;
            }
        }

        loop {
            if cancel.is_cancelled() {
                debug!("Walk cancelled");
                break;
            }

            // Take the next entry off the top frame, popping exhausted frames.
            let Some(frame) = stack.last_mut() else { break };
            let (entry, child_path) = match frame.entries.get(frame.next) {
                Some(entry) => {
                    frame.next += 1;
                    let child_path = join_path(&frame.path, &entry.name);
                    (entry.clone(), child_path)
                }
                None => {
                    stack.pop();
                    continue;
                }
            };

            match entry.kind {
                EntryKind::Directory => match self.store.list_children(&child_path).await {
                    Ok(entries) => stack.push(Frame {
                        path: child_path,
                        entries,
                        next: 0,
                    }),
                    Err(e) => report.record_error(child_path, e.to_string()),
                },
                EntryKind::File => match self.store.file_properties(&child_path).await {
                    Ok(properties) => {
                        report.visited += 1;
                        visit(FileDescriptor {
                            path: child_path,
                            name: entry.name,
                            size: properties.size,
                            last_modified: properties.last_modified,
                            content_type: properties.content_type,
                        });
                    }
                    Err(e) => {
                        report.skipped += 1;
                        report.record_error(child_path, e.to_string());
                    }
                },
            }
        }

        debug!(
            visited = report.visited,
            skipped = report.skipped,
            errors = report.errors.len(),
            "Walk finished"
        );
        report
    }
}
