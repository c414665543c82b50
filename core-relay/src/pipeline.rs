//! # Relay Pipeline
//!
//! Orchestrates one relay job run end to end.
//!
//! ## Workflow
//!
//! 1. Probe the store so connectivity problems fail the run before any
//!    traversal begins
//! 2. Snapshot `now` once (rolling runs) and walk the share tree
//! 3. Keep descriptors that are inside the window AND carry an eligible data
//!    extension; the kept count is `total_found`
//! 4. Per item: look up the sidecar companion (absent on any failure), issue
//!    download links, build the payload, POST it to the sink
//! 5. Record one `DeliveryResult` per item; no item failure aborts the batch
//!
//! Items are processed through an ordered bounded-concurrency stream, so
//! `results` preserves discovery order even when several items are in flight.
//! Cancellation takes effect between items: in-flight items complete or are
//! abandoned, and everything not delivered is recorded as a failure so the
//! summary counts stay exact.

use std::sync::Arc;
use std::time::Duration;

use bridge_traits::store::{LinkIssuer, ShareStore};
use bridge_traits::time::Clock;
use core_scan::pairing::{CompanionMatcher, FilePair};
use core_scan::walker::TreeWalker;
use core_scan::{FileDescriptor, TimeWindow};
use futures::stream::{self, StreamExt};
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument, warn};

use crate::error::Result;
use crate::job::{DeliveryOutcome, DeliveryResult, JobSummary, PairLinks, RelayJob};
use crate::payload::{format_timestamp, DeliveryPayload};
use crate::sink::AnalyticsSink;

/// Pipeline configuration
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Directory the scan starts from; empty string is the share root
    pub root: String,
    /// `source` tag stamped on every payload
    pub source: String,
    /// Lifetime requested for issued download links
    pub link_ttl: Duration,
    /// Items in flight at once; 1 reproduces strictly sequential delivery
    pub max_concurrent: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            root: String::new(),
            source: "azure-file-share".to_string(),
            link_ttl: Duration::from_secs(3600),
            max_concurrent: 1,
        }
    }
}

/// Delivery pipeline for one configured share + sink
pub struct RelayPipeline {
    store: Arc<dyn ShareStore>,
    link_issuer: Arc<dyn LinkIssuer>,
    sink: Arc<dyn AnalyticsSink>,
    clock: Arc<dyn Clock>,
    matcher: CompanionMatcher,
    config: PipelineConfig,
}

impl RelayPipeline {
    pub fn new(
        store: Arc<dyn ShareStore>,
        link_issuer: Arc<dyn LinkIssuer>,
        sink: Arc<dyn AnalyticsSink>,
        clock: Arc<dyn Clock>,
        matcher: CompanionMatcher,
        config: PipelineConfig,
    ) -> Self {
        Self {
            store,
            link_issuer,
            sink,
            clock,
            matcher,
            config,
        }
    }

    /// Run against a rolling window ending at a single `now` snapshot
    pub async fn run_rolling(
        &self,
        lookback: Duration,
        cancel: &CancellationToken,
    ) -> Result<JobSummary> {
        let now = self.clock.now();
        self.run(TimeWindow::rolling(now, lookback), cancel).await
    }

    /// Run one relay job against an explicit window
    ///
    /// # Errors
    ///
    /// Only failures that prevent any work from starting (store probe) are
    /// hard errors; everything after traversal begins is recorded per item in
    /// the returned summary.
    #[instrument(skip(self, cancel), fields(window = %window, root = %self.config.root))]
    pub async fn run(&self, window: TimeWindow, cancel: &CancellationToken) -> Result<JobSummary> {
        let job = RelayJob::new().start()?;
        info!(job_id = %job.id, "Starting relay job");

        if let Err(e) = self.store.probe().await {
            warn!(job_id = %job.id, error = %e, "Store probe failed, aborting run");
            return Err(e.into());
        }

        // Discover: walk once, keeping in-window eligible data files.
        let walker = TreeWalker::new(self.store.clone());
        let mut kept: Vec<FileDescriptor> = Vec::new();
        let walk_report = walker
            .walk(&self.config.root, cancel, |fd| {
                if window.contains(fd.last_modified) && self.matcher.is_eligible(&fd) {
                    kept.push(fd);
                }
            })
            .await;

        let total_found = kept.len() as u64;
        info!(
            job_id = %job.id,
            total_found,
            walk_errors = walk_report.errors.len(),
            "Scan complete"
        );

        // Deliver: ordered bounded concurrency, one accumulation point.
        let concurrency = self.config.max_concurrent.max(1);
        let mut deliveries = stream::iter(kept.clone())
            .map(|fd| self.process_item(fd))
            .buffered(concurrency);

        let mut results: Vec<DeliveryResult> = Vec::with_capacity(kept.len());
        let mut cancelled = false;
        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    cancelled = true;
                    break;
                }
                next = deliveries.next() => match next {
                    Some(result) => results.push(result),
                    None => break,
                }
            }
        }
        drop(deliveries);

        if cancelled {
            warn!(job_id = %job.id, delivered = results.len(), "Run cancelled");
            for fd in kept.into_iter().skip(results.len()) {
                results.push(DeliveryResult::cancelled(fd));
            }
        }

        let processed = results.iter().filter(|r| r.outcome.is_success()).count() as u64;
        let failed = results.len() as u64 - processed;
        let job = if cancelled { job.cancel()? } else { job.complete()? };

        info!(
            job_id = %job.id,
            total_found,
            processed,
            failed,
            status = %job.status,
            "Relay job finished"
        );

        Ok(JobSummary {
            job,
            total_found,
            processed,
            failed,
            results,
        })
    }

    /// Pair, link, build and deliver one item; never returns an error
    #[instrument(skip(self), fields(path = %fd.path))]
    async fn process_item(&self, fd: FileDescriptor) -> DeliveryResult {
        let companion = self.matcher.find_companion(self.store.as_ref(), &fd).await;
        let pair = FilePair {
            primary: fd,
            companion,
        };

        let primary_link = match self
            .link_issuer
            .issue_link(&pair.primary.path, self.config.link_ttl)
            .await
        {
            Ok(url) => url,
            Err(e) => {
                let reason = format!("link issuance failed for '{}': {}", pair.primary.path, e);
                return DeliveryResult::failure(pair, PairLinks::default(), reason);
            }
        };

        let companion_path = pair.companion.as_ref().map(|c| c.path.clone());
        let companion_link = match companion_path {
            Some(path) => match self.link_issuer.issue_link(&path, self.config.link_ttl).await {
                Ok(url) => Some(url),
                Err(e) => {
                    let reason = format!("link issuance failed for '{}': {}", path, e);
                    let links = PairLinks {
                        primary: Some(primary_link),
                        companion: None,
                    };
                    return DeliveryResult::failure(pair, links, reason);
                }
            },
            None => None,
        };

        let payload = DeliveryPayload {
            file_name: pair.primary.name.clone(),
            date: format_timestamp(pair.primary.last_modified),
            audio_download_link: primary_link.clone(),
            metadata_download_link: companion_link.clone().unwrap_or_default(),
            source: self.config.source.clone(),
            size_bytes: pair.primary.size,
            file_path: pair.primary.path.clone(),
        };
        let links = PairLinks {
            primary: Some(primary_link),
            companion: companion_link,
        };

        match self.sink.send(&payload).await {
            Ok(response) if response.is_success() => DeliveryResult {
                pair,
                links,
                outcome: DeliveryOutcome::Success {
                    status: response.status,
                },
                payload: Some(payload),
            },
            Ok(response) => {
                let reason = format!("sink responded {}: {}", response.status, response.body);
                warn!(reason = %reason, "Delivery rejected");
                DeliveryResult {
                    pair,
                    links,
                    outcome: DeliveryOutcome::Failure { reason },
                    payload: Some(payload),
                }
            }
            Err(e) => {
                let reason = e.to_string();
                warn!(reason = %reason, "Delivery failed");
                DeliveryResult {
                    pair,
                    links,
                    outcome: DeliveryOutcome::Failure { reason },
                    payload: Some(payload),
                }
            }
        }
    }
}
