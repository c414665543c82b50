//! Workspace facade crate.
//!
//! Hosts can depend on `callrelay-workspace` alone and reach every member
//! crate through the re-exports below instead of wiring each crate
//! individually. [`build_pipeline`] assembles a delivery pipeline from a
//! validated configuration and the host's collaborator adapters.

use std::sync::Arc;

pub use bridge_native;
pub use bridge_traits;
pub use core_relay;
pub use core_runtime;
pub use core_scan;
pub use provider_object_store;

use bridge_traits::{BridgeError, Clock, HttpClient, ShareStore};
use core_relay::{HttpAnalyticsSink, PipelineConfig, RelayPipeline};
use core_runtime::RelayConfig;
use core_scan::CompanionMatcher;
use provider_object_store::SasLinkIssuer;

/// Wire a delivery pipeline from a validated configuration
///
/// The store and HTTP client stay injectable so hosts pick their backends
/// (and tests their doubles); the link issuer is derived from the
/// configuration's SAS URL.
pub fn build_pipeline(
    config: &RelayConfig,
    store: Arc<dyn ShareStore>,
    http: Arc<dyn HttpClient>,
    clock: Arc<dyn Clock>,
) -> Result<RelayPipeline, BridgeError> {
    let links = SasLinkIssuer::from_sas_url(&config.sas_url, clock.clone())
        .map_err(BridgeError::from)?;
    let sink = HttpAnalyticsSink::new(http, config.sink_endpoint.clone());
    let matcher = CompanionMatcher::new(&config.data_extensions, &config.metadata_extension);
    let pipeline_config = PipelineConfig {
        root: config.scan_root.clone(),
        source: config.source.clone(),
        link_ttl: config.link_ttl,
        max_concurrent: config.max_concurrent,
    };

    Ok(RelayPipeline::new(
        store,
        Arc::new(links),
        Arc::new(sink),
        clock,
        matcher,
        pipeline_config,
    ))
}
