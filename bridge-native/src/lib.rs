//! # Native Bridge Implementations
//!
//! Desktop/server implementations of the collaborator bridge traits.
//!
//! Currently ships [`ReqwestHttpClient`], a connection-pooled `HttpClient`
//! with retry and exponential backoff.

pub mod http;

pub use http::ReqwestHttpClient;
