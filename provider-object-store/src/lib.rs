//! # Object Store Provider
//!
//! Concrete [`ShareStore`](bridge_traits::store::ShareStore) backend over the
//! `object_store` crate, plus a shared-access-signature link issuer.
//!
//! ## Overview
//!
//! This crate adapts any `object_store::ObjectStore` (Azure, S3, a local
//! directory, or the in-memory store used in tests) to the share contract
//! the relay core consumes:
//! - Directory levels via `list_with_delimiter`
//! - Per-file properties via `head`
//! - Uploads via `put`
//!
//! Link issuance does not talk to the store at all: a pre-provisioned SAS
//! token is composed with the encoded file path, mirroring how shares are
//! commonly exposed to downstream consumers without further credentials.
//!
//! ## Example
//!
//! ```ignore
//! use object_store::azure::MicrosoftAzureBuilder;
//! use provider_object_store::{ObjectStoreShare, SasLinkIssuer};
//! use std::sync::Arc;
//!
//! let azure = MicrosoftAzureBuilder::from_env().build()?;
//! let store = Arc::new(ObjectStoreShare::new(Arc::new(azure)));
//! let links = Arc::new(SasLinkIssuer::from_sas_url(&config.sas_url, clock)?);
//! ```

pub mod error;
pub mod links;
pub mod share;

pub use error::{Result, ShareProviderError};
pub use links::SasLinkIssuer;
pub use share::ObjectStoreShare;
