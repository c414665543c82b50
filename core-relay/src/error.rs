use bridge_traits::BridgeError;
use core_scan::ScanError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RelayError {
    #[error("Invalid job state transition from {from} to {to}: {reason}")]
    InvalidStateTransition {
        from: String,
        to: String,
        reason: String,
    },

    #[error("Sink request failed: {0}")]
    SinkTransport(String),

    #[error("Local path error: {0}")]
    LocalPath(String),

    #[error("Scan failed: {0}")]
    Scan(#[from] ScanError),

    #[error("Store error: {0}")]
    Store(#[from] BridgeError),
}

pub type Result<T> = std::result::Result<T, RelayError>;
