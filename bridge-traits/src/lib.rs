//! # Collaborator Bridge Traits
//!
//! Contracts between the relay core and its external collaborators.
//!
//! ## Overview
//!
//! This crate defines the seams of the system. The core never talks to a
//! concrete storage SDK, HTTP stack, or wall clock directly; it talks to the
//! traits defined here, and hosts wire in concrete adapters at startup.
//!
//! ## Traits
//!
//! ### Remote store
//! - [`ShareStore`](store::ShareStore) - List a directory level, fetch
//!   per-file properties, upload file content, probe connectivity
//! - [`LinkIssuer`](store::LinkIssuer) - Mint bounded-lifetime download URLs
//!   that resolve without further credentials
//!
//! ### Networking
//! - [`HttpClient`](http::HttpClient) - Async HTTP operations with retry
//!   policies, used for the downstream analytics sink
//!
//! ### Utilities
//! - [`Clock`](time::Clock) - Injectable time source so a whole job run can
//!   share a single `now` snapshot and tests can pin time
//!
//! ## Error Handling
//!
//! All bridge traits use the [`BridgeError`](error::BridgeError) type. Adapter
//! implementations should:
//!
//! - Map a missing remote entry to `BridgeError::NotFound` (companion lookup
//!   depends on it being distinguishable)
//! - Convert SDK-specific errors to `BridgeError` with actionable messages
//! - Never panic across the trait boundary
//!
//! ## Thread Safety
//!
//! All bridge traits require `Send + Sync` bounds so adapters can be shared
//! across async tasks behind `Arc`.
//!
//! ## Test doubles
//!
//! With the `testing` feature enabled this crate ships
//! [`MemoryShareStore`](testing::MemoryShareStore) and
//! [`StaticLinkIssuer`](testing::StaticLinkIssuer), deterministic in-memory
//! doubles used by the downstream crates' test suites.

pub mod error;
pub mod http;
pub mod store;
#[cfg(feature = "testing")]
pub mod testing;
pub mod time;

pub use error::BridgeError;

// Re-export commonly used types
pub use http::{HttpClient, HttpMethod, HttpRequest, HttpResponse, RetryPolicy};
pub use store::{EntryKind, FileProperties, LinkIssuer, ShareEntry, ShareStore};
pub use time::{Clock, SystemClock};
