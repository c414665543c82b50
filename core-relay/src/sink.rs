//! Analytics sink
//!
//! The downstream HTTP service that receives delivery payloads. Transport
//! failures are errors; an HTTP response of any status is returned to the
//! caller, who decides what counts as success.

use async_trait::async_trait;
use bridge_traits::http::{HttpClient, HttpMethod, HttpRequest, RetryPolicy};
use std::sync::Arc;
use tracing::{debug, instrument};

use crate::error::{RelayError, Result};
use crate::payload::DeliveryPayload;

/// Sink response, status and body captured verbatim for operator visibility
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkResponse {
    pub status: u16,
    pub body: String,
}

impl SinkResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Downstream delivery target
#[async_trait]
pub trait AnalyticsSink: Send + Sync {
    /// POST one payload
    ///
    /// # Errors
    ///
    /// Returns `RelayError::SinkTransport` when no HTTP response was obtained
    /// at all. Non-2xx responses are `Ok`; callers inspect the status.
    async fn send(&self, payload: &DeliveryPayload) -> Result<SinkResponse>;
}

/// HTTP POST sink
///
/// Sends each payload exactly once per call: the request runs under a
/// single-attempt retry policy so one pipeline item maps to at most one
/// delivery attempt per run.
pub struct HttpAnalyticsSink {
    client: Arc<dyn HttpClient>,
    endpoint: String,
}

impl HttpAnalyticsSink {
    pub fn new(client: Arc<dyn HttpClient>, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl AnalyticsSink for HttpAnalyticsSink {
    #[instrument(skip(self, payload), fields(file = %payload.file_name))]
    async fn send(&self, payload: &DeliveryPayload) -> Result<SinkResponse> {
        let request = HttpRequest::new(HttpMethod::Post, &self.endpoint)
            .json(payload)
            .map_err(|e| RelayError::SinkTransport(e.to_string()))?;

        let response = self
            .client
            .execute_with_retry(request, RetryPolicy::none())
            .await
            .map_err(|e| RelayError::SinkTransport(e.to_string()))?;

        debug!(status = response.status, "Sink responded");
        Ok(SinkResponse {
            status: response.status,
            body: response.text(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_traits::error::{BridgeError, Result as BridgeResult};
    use bridge_traits::http::HttpResponse;
    use bytes::Bytes;
    use mockall::mock;
    use std::collections::HashMap;

    mock! {
        HttpClient {}

        #[async_trait]
        impl HttpClient for HttpClient {
            async fn execute(&self, request: HttpRequest) -> BridgeResult<HttpResponse>;
            async fn execute_with_retry(
                &self,
                request: HttpRequest,
                policy: RetryPolicy,
            ) -> BridgeResult<HttpResponse>;
        }
    }

    fn payload() -> DeliveryPayload {
        DeliveryPayload {
            file_name: "clip.wav".to_string(),
            date: "2026-07-01 09:05:03".to_string(),
            audio_download_link: "https://x/clip.wav".to_string(),
            metadata_download_link: String::new(),
            source: "azure-file-share".to_string(),
            size_bytes: 42,
            file_path: "calls/clip.wav".to_string(),
        }
    }

    #[tokio::test]
    async fn test_send_posts_json_single_attempt() {
        let mut mock_http = MockHttpClient::new();
        mock_http
            .expect_execute_with_retry()
            .times(1)
            .returning(|request, policy| {
                assert_eq!(policy.max_attempts, 1);
                assert_eq!(request.method, HttpMethod::Post);
                assert_eq!(
                    request.headers.get("Content-Type"),
                    Some(&"application/json".to_string())
                );
                let sent: DeliveryPayload =
                    serde_json::from_slice(request.body.as_ref().unwrap()).unwrap();
                assert_eq!(sent.file_name, "clip.wav");

                Ok(HttpResponse {
                    status: 200,
                    headers: HashMap::new(),
                    body: Bytes::from_static(b"ok"),
                })
            });

        let sink = HttpAnalyticsSink::new(Arc::new(mock_http), "https://sink.test/ingest");
        let response = sink.send(&payload()).await.unwrap();

        assert!(response.is_success());
        assert_eq!(response.body, "ok");
    }

    #[tokio::test]
    async fn test_non_2xx_is_returned_not_error() {
        let mut mock_http = MockHttpClient::new();
        mock_http.expect_execute_with_retry().times(1).returning(|_, _| {
            Ok(HttpResponse {
                status: 500,
                headers: HashMap::new(),
                body: Bytes::from_static(b"boom"),
            })
        });

        let sink = HttpAnalyticsSink::new(Arc::new(mock_http), "https://sink.test/ingest");
        let response = sink.send(&payload()).await.unwrap();

        assert!(!response.is_success());
        assert_eq!(response.status, 500);
        assert_eq!(response.body, "boom");
    }

    #[tokio::test]
    async fn test_transport_failure_is_error() {
        let mut mock_http = MockHttpClient::new();
        mock_http.expect_execute_with_retry().times(1).returning(|_, _| {
            Err(BridgeError::OperationFailed("connection refused".to_string()))
        });

        let sink = HttpAnalyticsSink::new(Arc::new(mock_http), "https://sink.test/ingest");
        let err = sink.send(&payload()).await.unwrap_err();

        assert!(matches!(err, RelayError::SinkTransport(_)));
    }
}
