//! Error types for the object store provider

use thiserror::Error;

/// Object store provider errors
#[derive(Error, Debug)]
pub enum ShareProviderError {
    /// The configured SAS URL could not be parsed
    #[error("Invalid SAS URL: {0}")]
    InvalidSasUrl(String),

    /// Underlying object store failure
    #[error("Object store error: {0}")]
    Store(#[from] object_store::Error),
}

/// Result type for provider operations
pub type Result<T> = std::result::Result<T, ShareProviderError>;

impl From<ShareProviderError> for bridge_traits::error::BridgeError {
    fn from(error: ShareProviderError) -> Self {
        match error {
            ShareProviderError::InvalidSasUrl(msg) => {
                bridge_traits::error::BridgeError::OperationFailed(format!(
                    "Invalid SAS URL: {}",
                    msg
                ))
            }
            ShareProviderError::Store(object_store::Error::NotFound { path, .. }) => {
                bridge_traits::error::BridgeError::NotFound(path)
            }
            ShareProviderError::Store(e) => {
                bridge_traits::error::BridgeError::OperationFailed(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_traits::error::BridgeError;

    #[test]
    fn test_not_found_maps_to_bridge_not_found() {
        let err = ShareProviderError::Store(object_store::Error::NotFound {
            path: "calls/x.wav".to_string(),
            source: "gone".into(),
        });
        let bridge: BridgeError = err.into();
        assert!(bridge.is_not_found());
    }

    #[test]
    fn test_invalid_sas_url_maps_to_operation_failed() {
        let bridge: BridgeError =
            ShareProviderError::InvalidSasUrl("missing query".to_string()).into();
        assert!(matches!(bridge, BridgeError::OperationFailed(_)));
    }
}
