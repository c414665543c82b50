//! # Relay Configuration
//!
//! Builder-validated configuration for a relay deployment.
//!
//! ## Overview
//!
//! `RelayConfig` holds every setting the relay needs: the share's SAS URL,
//! the sink endpoint, the scan window and interval, pairing extensions and
//! link lifetime. It is constructed once at process start, either
//! programmatically through the builder or from the environment via
//! [`RelayConfig::from_env`], and passed into the components that need it.
//! Core logic never reads environment variables itself.
//!
//! The builder fails fast: a missing or nonsensical setting aborts startup
//! with an actionable message instead of surfacing later as a wall of
//! per-item errors.
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::RelayConfig;
//! use std::time::Duration;
//!
//! let config = RelayConfig::builder()
//!     .sas_url("https://acct.file.core.windows.net/calls?sv=...&se=...&sig=...")
//!     .sink_endpoint("https://analytics.example.com/v1/files/publish")
//!     .lookback(Duration::from_secs(120))
//!     .scan_interval(Duration::from_secs(120))
//!     .build()?;
//! # Ok::<(), core_runtime::Error>(())
//! ```

use std::time::Duration;

use crate::error::{Error, Result};

/// Environment variable names read by [`RelayConfig::from_env`]
pub const ENV_SAS_URL: &str = "SAS_URL";
pub const ENV_SINK_ENDPOINT: &str = "RELAY_SINK_ENDPOINT";
pub const ENV_SCAN_ROOT: &str = "RELAY_SCAN_ROOT";
pub const ENV_LOOKBACK_SECONDS: &str = "RELAY_LOOKBACK_SECONDS";
pub const ENV_SCAN_INTERVAL_SECONDS: &str = "RELAY_SCAN_INTERVAL_SECONDS";
pub const ENV_LINK_TTL_SECONDS: &str = "RELAY_LINK_TTL_SECONDS";
pub const ENV_SOURCE: &str = "RELAY_SOURCE";

/// Relay deployment configuration
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Full SAS URL of the share, credentials included
    pub sas_url: String,

    /// Sink endpoint receiving delivery payloads
    pub sink_endpoint: String,

    /// Directory the scan starts from; empty string is the share root
    pub scan_root: String,

    /// Rolling window length for scheduled runs
    pub lookback: Duration,

    /// Time between scheduled runs
    pub scan_interval: Duration,

    /// Lifetime requested for issued download links
    pub link_ttl: Duration,

    /// Data file extensions eligible for pairing, without dots
    pub data_extensions: Vec<String>,

    /// Sidecar metadata extension, without the dot
    pub metadata_extension: String,

    /// `source` tag stamped on every payload
    pub source: String,

    /// Pipeline items in flight at once
    pub max_concurrent: usize,
}

impl RelayConfig {
    pub fn builder() -> RelayConfigBuilder {
        RelayConfigBuilder::default()
    }

    /// Build a configuration from the process environment
    ///
    /// Intended to be called exactly once, at process start. Optional
    /// variables fall back to the builder defaults.
    pub fn from_env() -> Result<Self> {
        let mut builder = Self::builder();

        if let Ok(value) = std::env::var(ENV_SAS_URL) {
            builder = builder.sas_url(value);
        }
        if let Ok(value) = std::env::var(ENV_SINK_ENDPOINT) {
            builder = builder.sink_endpoint(value);
        }
        if let Ok(value) = std::env::var(ENV_SCAN_ROOT) {
            builder = builder.scan_root(value);
        }
        if let Ok(value) = std::env::var(ENV_SOURCE) {
            builder = builder.source(value);
        }
        if let Some(seconds) = seconds_from_env(ENV_LOOKBACK_SECONDS)? {
            builder = builder.lookback(seconds);
        }
        if let Some(seconds) = seconds_from_env(ENV_SCAN_INTERVAL_SECONDS)? {
            builder = builder.scan_interval(seconds);
        }
        if let Some(seconds) = seconds_from_env(ENV_LINK_TTL_SECONDS)? {
            builder = builder.link_ttl(seconds);
        }

        builder.build()
    }
}

fn seconds_from_env(name: &str) -> Result<Option<Duration>> {
    match std::env::var(name) {
        Ok(value) => {
            let seconds: u64 = value.parse().map_err(|_| Error::InvalidConfiguration {
                field: name.to_string(),
                message: format!("expected a number of seconds, got '{}'", value),
            })?;
            Ok(Some(Duration::from_secs(seconds)))
        }
        Err(_) => Ok(None),
    }
}

/// Builder for [`RelayConfig`] with fail-fast validation
#[derive(Debug, Clone)]
pub struct RelayConfigBuilder {
    sas_url: Option<String>,
    sink_endpoint: Option<String>,
    scan_root: String,
    lookback: Duration,
    scan_interval: Duration,
    link_ttl: Duration,
    data_extensions: Vec<String>,
    metadata_extension: String,
    source: String,
    max_concurrent: usize,
}

impl Default for RelayConfigBuilder {
    fn default() -> Self {
        Self {
            sas_url: None,
            sink_endpoint: None,
            scan_root: String::new(),
            lookback: Duration::from_secs(120),
            scan_interval: Duration::from_secs(120),
            link_ttl: Duration::from_secs(3600),
            data_extensions: vec!["wav".to_string(), "mp3".to_string()],
            metadata_extension: "json".to_string(),
            source: "azure-file-share".to_string(),
            max_concurrent: 1,
        }
    }
}

impl RelayConfigBuilder {
    pub fn sas_url(mut self, value: impl Into<String>) -> Self {
        self.sas_url = Some(value.into());
        self
    }

    pub fn sink_endpoint(mut self, value: impl Into<String>) -> Self {
        self.sink_endpoint = Some(value.into());
        self
    }

    pub fn scan_root(mut self, value: impl Into<String>) -> Self {
        self.scan_root = value.into();
        self
    }

    pub fn lookback(mut self, value: Duration) -> Self {
        self.lookback = value;
        self
    }

    pub fn scan_interval(mut self, value: Duration) -> Self {
        self.scan_interval = value;
        self
    }

    pub fn link_ttl(mut self, value: Duration) -> Self {
        self.link_ttl = value;
        self
    }

    pub fn data_extensions(mut self, values: &[&str]) -> Self {
        self.data_extensions = values.iter().map(|v| v.to_string()).collect();
        self
    }

    pub fn metadata_extension(mut self, value: impl Into<String>) -> Self {
        self.metadata_extension = value.into();
        self
    }

    pub fn source(mut self, value: impl Into<String>) -> Self {
        self.source = value.into();
        self
    }

    pub fn max_concurrent(mut self, value: usize) -> Self {
        self.max_concurrent = value;
        self
    }

    /// Validate and build
    ///
    /// # Errors
    ///
    /// Returns `Error::MissingConfiguration` or `Error::InvalidConfiguration`
    /// with an actionable message; nothing partial is ever returned.
    pub fn build(self) -> Result<RelayConfig> {
        let sas_url = self.sas_url.ok_or_else(|| Error::MissingConfiguration {
            field: "sas_url".to_string(),
            message: format!(
                "Provide the share's SAS URL via the builder or the {} environment variable.",
                ENV_SAS_URL
            ),
        })?;
        require_http_url("sas_url", &sas_url)?;

        let sink_endpoint = self
            .sink_endpoint
            .ok_or_else(|| Error::MissingConfiguration {
                field: "sink_endpoint".to_string(),
                message: format!(
                    "Provide the analytics sink endpoint via the builder or the {} environment variable.",
                    ENV_SINK_ENDPOINT
                ),
            })?;
        require_http_url("sink_endpoint", &sink_endpoint)?;

        if self.lookback.is_zero() {
            return Err(Error::InvalidConfiguration {
                field: "lookback".to_string(),
                message: "the rolling window must be longer than zero".to_string(),
            });
        }
        if self.scan_interval.is_zero() {
            return Err(Error::InvalidConfiguration {
                field: "scan_interval".to_string(),
                message: "the scan interval must be longer than zero".to_string(),
            });
        }
        if self.data_extensions.is_empty() {
            return Err(Error::InvalidConfiguration {
                field: "data_extensions".to_string(),
                message: "at least one data extension is required".to_string(),
            });
        }

        Ok(RelayConfig {
            sas_url,
            sink_endpoint,
            scan_root: self.scan_root,
            lookback: self.lookback,
            scan_interval: self.scan_interval,
            link_ttl: self.link_ttl,
            data_extensions: self.data_extensions,
            metadata_extension: self.metadata_extension,
            source: self.source,
            max_concurrent: self.max_concurrent.max(1),
        })
    }
}

fn require_http_url(field: &str, value: &str) -> Result<()> {
    if value.starts_with("http://") || value.starts_with("https://") {
        Ok(())
    } else {
        Err(Error::InvalidConfiguration {
            field: field.to_string(),
            message: format!("expected an http(s) URL, got '{}'", value),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal() -> RelayConfigBuilder {
        RelayConfig::builder()
            .sas_url("https://acct.file.core.windows.net/calls?sig=x")
            .sink_endpoint("https://analytics.test/ingest")
    }

    #[test]
    fn test_minimal_build_applies_defaults() {
        let config = minimal().build().unwrap();
        assert_eq!(config.scan_root, "");
        assert_eq!(config.lookback, Duration::from_secs(120));
        assert_eq!(config.data_extensions, vec!["wav", "mp3"]);
        assert_eq!(config.metadata_extension, "json");
        assert_eq!(config.source, "azure-file-share");
        assert_eq!(config.max_concurrent, 1);
    }

    #[test]
    fn test_missing_sas_url_fails_fast() {
        let err = RelayConfig::builder()
            .sink_endpoint("https://analytics.test/ingest")
            .build()
            .unwrap_err();
        match err {
            Error::MissingConfiguration { field, .. } => assert_eq!(field, "sas_url"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_missing_sink_endpoint_fails_fast() {
        let err = RelayConfig::builder()
            .sas_url("https://acct.file.core.windows.net/calls?sig=x")
            .build()
            .unwrap_err();
        match err {
            Error::MissingConfiguration { field, .. } => assert_eq!(field, "sink_endpoint"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_non_http_urls_are_rejected() {
        assert!(minimal().sas_url("ftp://share").build().is_err());
        assert!(minimal().sink_endpoint("not-a-url").build().is_err());
    }

    #[test]
    fn test_zero_durations_are_rejected() {
        assert!(minimal().lookback(Duration::ZERO).build().is_err());
        assert!(minimal().scan_interval(Duration::ZERO).build().is_err());
    }

    #[test]
    fn test_empty_extensions_are_rejected() {
        assert!(minimal().data_extensions(&[]).build().is_err());
    }

    #[test]
    fn test_max_concurrent_is_clamped_to_one() {
        let config = minimal().max_concurrent(0).build().unwrap();
        assert_eq!(config.max_concurrent, 1);
    }
}
