use bridge_traits::BridgeError;
use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Invalid time window: start {start} is after end {end}")]
    InvalidWindow {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    #[error("Store error: {0}")]
    Store(#[from] BridgeError),
}

pub type Result<T> = std::result::Result<T, ScanError>;
