//! # Scan Module
//!
//! Recursive enumeration and filtering of the remote file share.
//!
//! ## Overview
//!
//! This crate turns a hierarchical remote store into flat, filtered file
//! listings:
//! - Walking the whole tree below a root without call-stack recursion
//! - Tolerating per-node failures while the walk continues
//! - Deciding whether a file's modification time falls in a closed window
//! - Matching a data file to its sidecar metadata companion by name
//!
//! ## Components
//!
//! - **File Descriptor** (`descriptor`): Immutable snapshot of one remote file
//! - **Tree Walker** (`walker`): Pre-order depth-first traversal with a
//!   per-walk error report
//! - **Time Window** (`window`): Closed interval predicate over modification
//!   times
//! - **Companion Matcher** (`pairing`): Suffix-replacement sidecar lookup
//! - **Scanner** (`scanner`): Listing, recent-files and date-range queries

pub mod descriptor;
pub mod error;
pub mod pairing;
pub mod scanner;
pub mod walker;
pub mod window;

pub use descriptor::FileDescriptor;
pub use error::{Result, ScanError};
pub use pairing::{CompanionMatcher, FilePair};
pub use scanner::{Listing, Scanner};
pub use walker::{TreeWalker, WalkError, WalkReport};
pub use window::TimeWindow;
