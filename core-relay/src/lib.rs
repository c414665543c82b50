//! # Relay Module
//!
//! Delivery of freshly modified share files to the downstream analytics sink.
//!
//! ## Overview
//!
//! This crate drives the end-to-end relay job:
//! - Scanning the share for files inside the job's time window
//! - Pairing each eligible data file with its sidecar metadata companion
//! - Issuing bounded-lifetime download links for both members of a pair
//! - Posting one payload per pair to the sink and recording the outcome
//! - Aggregating a per-run summary with exact found/processed/failed counts
//!
//! It also carries the reverse direction: bulk upload of a local directory
//! tree into the share.
//!
//! ## Components
//!
//! - **Relay Job** (`job`): Job lifecycle state machine, per-item outcomes,
//!   run summary and the caller-facing report
//! - **Payload** (`payload`): The sink's wire format
//! - **Sink** (`sink`): `AnalyticsSink` contract and the HTTP implementation
//! - **Pipeline** (`pipeline`): Orchestrates scan, pairing, links and delivery
//! - **Uploader** (`upload`): Local tree to share upload

pub mod error;
pub mod job;
pub mod payload;
pub mod pipeline;
pub mod sink;
pub mod upload;

pub use error::{RelayError, Result};
pub use job::{
    DeliveryOutcome, DeliveryResult, FailedFile, JobReport, JobSummary, PairLinks, ProcessedFile,
    RelayJob, RelayJobId, RelayStatus,
};
pub use payload::DeliveryPayload;
pub use pipeline::{PipelineConfig, RelayPipeline};
pub use sink::{AnalyticsSink, HttpAnalyticsSink, SinkResponse};
pub use upload::{FolderUploader, UploadFailure, UploadSummary};
