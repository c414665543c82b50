//! # Relay Job Accounting
//!
//! Job lifecycle state machine plus the per-item and per-run result types.
//!
//! ## State Machine
//!
//! ```text
//! Pending → Running → Completed
//!     ↓         ↓         ↑
//!     └──────→ Failed    │
//!     └──────→ Cancelled │
//! ```
//!
//! A job run owns all of its results; nothing here is persisted and nothing
//! is shared across runs.

use chrono::{DateTime, Utc};
use core_scan::pairing::FilePair;
use serde::Serialize;
use uuid::Uuid;

use crate::error::{RelayError, Result};
use crate::payload::DeliveryPayload;

// ============================================================================
// ID Types
// ============================================================================

/// Unique identifier for a relay job run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct RelayJobId(Uuid);

impl RelayJobId {
    /// Create a new random job ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RelayJobId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RelayJobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Status Types
// ============================================================================

/// The current status of a relay job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RelayStatus {
    /// Job has been created but not yet started
    Pending,
    /// Job is currently running
    Running,
    /// Job completed (individual items may still have failed)
    Completed,
    /// Job failed before any items could be processed
    Failed,
    /// Job was cancelled by the caller
    Cancelled,
}

impl RelayStatus {
    /// Check if this status represents a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RelayStatus::Completed | RelayStatus::Failed | RelayStatus::Cancelled
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RelayStatus::Pending => "pending",
            RelayStatus::Running => "running",
            RelayStatus::Completed => "completed",
            RelayStatus::Failed => "failed",
            RelayStatus::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for RelayStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// Job Entity
// ============================================================================

/// A relay job with validated state transitions
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelayJob {
    pub id: RelayJobId,
    pub status: RelayStatus,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    /// Error message when the run failed as a whole
    pub error_message: Option<String>,
}

impl RelayJob {
    /// Create a new job in pending state
    pub fn new() -> Self {
        Self {
            id: RelayJobId::new(),
            status: RelayStatus::Pending,
            created_at: Utc::now(),
            started_at: None,
            completed_at: None,
            error_message: None,
        }
    }

    /// Start the job
    pub fn start(mut self) -> Result<Self> {
        self.validate_transition(RelayStatus::Running)?;
        self.status = RelayStatus::Running;
        self.started_at = Some(Utc::now());
        Ok(self)
    }

    /// Mark the job as completed
    pub fn complete(mut self) -> Result<Self> {
        self.validate_transition(RelayStatus::Completed)?;
        self.status = RelayStatus::Completed;
        self.completed_at = Some(Utc::now());
        Ok(self)
    }

    /// Mark the job as failed with an error message
    pub fn fail(mut self, error_message: String) -> Result<Self> {
        self.validate_transition(RelayStatus::Failed)?;
        self.status = RelayStatus::Failed;
        self.completed_at = Some(Utc::now());
        self.error_message = Some(error_message);
        Ok(self)
    }

    /// Cancel the job
    pub fn cancel(mut self) -> Result<Self> {
        self.validate_transition(RelayStatus::Cancelled)?;
        self.status = RelayStatus::Cancelled;
        self.completed_at = Some(Utc::now());
        Ok(self)
    }

    /// Duration of the job, available once terminal
    pub fn duration(&self) -> Option<chrono::Duration> {
        match (self.started_at, self.completed_at) {
            (Some(start), Some(end)) => Some(end - start),
            _ => None,
        }
    }

    fn validate_transition(&self, to: RelayStatus) -> Result<()> {
        let valid = match (self.status, to) {
            (RelayStatus::Pending, RelayStatus::Running) => true,
            (RelayStatus::Pending, RelayStatus::Cancelled) => true,
            (RelayStatus::Pending, RelayStatus::Failed) => true,

            (RelayStatus::Running, RelayStatus::Completed) => true,
            (RelayStatus::Running, RelayStatus::Failed) => true,
            (RelayStatus::Running, RelayStatus::Cancelled) => true,

            // Terminal states cannot transition
            _ => false,
        };

        if !valid {
            return Err(RelayError::InvalidStateTransition {
                from: self.status.as_str().to_string(),
                to: to.as_str().to_string(),
                reason: format!(
                    "Cannot transition from {} to {}",
                    self.status.as_str(),
                    to.as_str()
                ),
            });
        }

        Ok(())
    }
}

impl Default for RelayJob {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Per-item results
// ============================================================================

/// Download links issued for a pair
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PairLinks {
    pub primary: Option<String>,
    pub companion: Option<String>,
}

/// Terminal outcome of one delivered item
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum DeliveryOutcome {
    Success { status: u16 },
    Failure { reason: String },
}

impl DeliveryOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, DeliveryOutcome::Success { .. })
    }
}

/// Outcome of one pipeline item
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeliveryResult {
    pub pair: FilePair,
    pub links: PairLinks,
    pub outcome: DeliveryOutcome,
    /// The payload as sent, present only for delivered items
    pub payload: Option<DeliveryPayload>,
}

impl DeliveryResult {
    pub fn failure(pair: FilePair, links: PairLinks, reason: impl Into<String>) -> Self {
        Self {
            pair,
            links,
            outcome: DeliveryOutcome::Failure {
                reason: reason.into(),
            },
            payload: None,
        }
    }

    /// Result for an item the run never got to before cancellation
    pub fn cancelled(primary: core_scan::FileDescriptor) -> Self {
        Self::failure(
            FilePair {
                primary,
                companion: None,
            },
            PairLinks::default(),
            "cancelled before delivery",
        )
    }
}

// ============================================================================
// Run summary
// ============================================================================

/// Aggregate outcome of one job run
///
/// Invariant: `processed + failed == total_found`, including cancelled runs
/// (undelivered items are recorded as failures).
#[derive(Debug, Clone, Serialize)]
pub struct JobSummary {
    pub job: RelayJob,
    pub total_found: u64,
    pub processed: u64,
    pub failed: u64,
    /// Per-item results, preserving discovery order
    pub results: Vec<DeliveryResult>,
}

impl JobSummary {
    /// Caller-facing report, serialized for request handlers
    pub fn to_report(&self) -> JobReport {
        let mut processed_files = Vec::new();
        let mut failed_files = Vec::new();
        for result in &self.results {
            match &result.outcome {
                DeliveryOutcome::Success { status } => processed_files.push(ProcessedFile {
                    file: result.pair.primary.name.clone(),
                    sink_status: *status,
                }),
                DeliveryOutcome::Failure { reason } => failed_files.push(FailedFile {
                    file: result.pair.primary.name.clone(),
                    error: reason.clone(),
                }),
            }
        }

        JobReport {
            success: self.failed == 0,
            total_found: self.total_found,
            processed: self.processed,
            failed: self.failed,
            processed_files,
            failed_files,
        }
    }
}

/// One successfully delivered file in a [`JobReport`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedFile {
    pub file: String,
    pub sink_status: u16,
}

/// One failed file in a [`JobReport`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedFile {
    pub file: String,
    pub error: String,
}

/// JSON shape handed back to request handlers
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobReport {
    pub success: bool,
    pub total_found: u64,
    pub processed: u64,
    pub failed: u64,
    pub processed_files: Vec<ProcessedFile>,
    pub failed_files: Vec<FailedFile>,
}
