//! SAS link issuer
//!
//! Composes a pre-provisioned shared-access-signature token with an encoded
//! file path. The resulting URL downloads the file without further
//! credentials; its real lifetime is the token's, so issuance fails when the
//! token cannot cover the requested TTL.

use async_trait::async_trait;
use bridge_traits::error::{BridgeError, Result as BridgeResult};
use bridge_traits::store::LinkIssuer;
use bridge_traits::time::Clock;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::error::{Result, ShareProviderError};

/// Issues download links by composing `base_url/path?sas_token`
pub struct SasLinkIssuer {
    /// Share URL without the query, e.g. `https://acct.file.core.windows.net/calls`
    base_url: String,
    /// SAS token query string, without the leading `?`
    sas_query: String,
    /// Token expiry from the `se` parameter, when present
    expiry: Option<DateTime<Utc>>,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for SasLinkIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SasLinkIssuer")
            .field("base_url", &self.base_url)
            .field("sas_query", &self.sas_query)
            .field("expiry", &self.expiry)
            .finish_non_exhaustive()
    }
}

impl SasLinkIssuer {
    /// Build an issuer from a full SAS URL
    ///
    /// The URL must carry its token as the query string. The `se` expiry
    /// parameter is parsed when present and enforced at issuance time;
    /// tokens without one are taken at face value.
    pub fn from_sas_url(sas_url: &str, clock: Arc<dyn Clock>) -> Result<Self> {
        let url = Url::parse(sas_url)
            .map_err(|e| ShareProviderError::InvalidSasUrl(e.to_string()))?;
        if url.scheme() != "https" && url.scheme() != "http" {
            return Err(ShareProviderError::InvalidSasUrl(format!(
                "unsupported scheme '{}'",
                url.scheme()
            )));
        }

        let sas_query = url
            .query()
            .filter(|q| !q.is_empty())
            .ok_or_else(|| {
                ShareProviderError::InvalidSasUrl("missing SAS token query".to_string())
            })?
            .to_string();

        let expiry = url
            .query_pairs()
            .find(|(key, _)| key == "se")
            .map(|(_, value)| {
                DateTime::parse_from_rfc3339(&value)
                    .map(|dt| dt.with_timezone(&Utc))
                    .map_err(|e| {
                        ShareProviderError::InvalidSasUrl(format!(
                            "unparseable 'se' expiry '{}': {}",
                            value, e
                        ))
                    })
            })
            .transpose()?;

        let mut base = url;
        base.set_query(None);
        base.set_fragment(None);
        let base_url = base.as_str().trim_end_matches('/').to_string();

        Ok(Self {
            base_url,
            sas_query,
            expiry,
            clock,
        })
    }

    fn encode_path(path: &str) -> String {
        path.split('/')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect::<Vec<_>>()
            .join("/")
    }
}

#[async_trait]
impl LinkIssuer for SasLinkIssuer {
    async fn issue_link(&self, path: &str, ttl: Duration) -> BridgeResult<String> {
        if let Some(expiry) = self.expiry {
            let span = chrono::Duration::from_std(ttl).map_err(|_| {
                BridgeError::OperationFailed(format!(
                    "requested link ttl of {}s is not representable",
                    ttl.as_secs()
                ))
            })?;
            let needed_until = self.clock.now() + span;
            if needed_until > expiry {
                return Err(BridgeError::OperationFailed(format!(
                    "SAS token expires at {}, cannot cover a {}s link ttl",
                    expiry,
                    ttl.as_secs()
                )));
            }
        }

        let link = format!(
            "{}/{}?{}",
            self.base_url,
            Self::encode_path(path),
            self.sas_query
        );
        debug!(path = %path, "Issued download link");
        Ok(link)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_traits::testing::FixedClock;
    use chrono::TimeZone;

    fn clock() -> Arc<dyn Clock> {
        Arc::new(FixedClock(
            Utc.with_ymd_and_hms(2026, 7, 1, 12, 0, 0).unwrap(),
        ))
    }

    const SAS_URL: &str = "https://acct.file.core.windows.net/calls?sv=2024-01-01&se=2026-07-01T14%3A00%3A00Z&sig=abc123";

    #[tokio::test]
    async fn test_issue_link_composes_base_path_and_token() {
        let issuer = SasLinkIssuer::from_sas_url(SAS_URL, clock()).unwrap();
        let link = issuer
            .issue_link("2026/clip.wav", Duration::from_secs(3600))
            .await
            .unwrap();

        assert_eq!(
            link,
            "https://acct.file.core.windows.net/calls/2026/clip.wav?sv=2024-01-01&se=2026-07-01T14%3A00%3A00Z&sig=abc123"
        );
    }

    #[tokio::test]
    async fn test_path_segments_are_encoded() {
        let issuer = SasLinkIssuer::from_sas_url(SAS_URL, clock()).unwrap();
        let link = issuer
            .issue_link("team calls/clip one.wav", Duration::from_secs(60))
            .await
            .unwrap();

        assert!(link.contains("/calls/team%20calls/clip%20one.wav?"));
    }

    #[tokio::test]
    async fn test_ttl_beyond_token_expiry_is_rejected() {
        // Token expires at 14:00; 12:00 + 3h > 14:00.
        let issuer = SasLinkIssuer::from_sas_url(SAS_URL, clock()).unwrap();
        let err = issuer
            .issue_link("clip.wav", Duration::from_secs(3 * 3600))
            .await
            .unwrap_err();

        assert!(matches!(err, BridgeError::OperationFailed(_)));
        assert!(err.to_string().contains("SAS token expires"));
    }

    #[tokio::test]
    async fn test_token_without_expiry_skips_check() {
        let issuer = SasLinkIssuer::from_sas_url(
            "https://acct.file.core.windows.net/calls?sig=abc",
            clock(),
        )
        .unwrap();

        assert!(issuer
            .issue_link("clip.wav", Duration::from_secs(u32::MAX as u64))
            .await
            .is_ok());
    }

    #[test]
    fn test_url_without_query_is_rejected() {
        let err =
            SasLinkIssuer::from_sas_url("https://acct.file.core.windows.net/calls", clock())
                .unwrap_err();
        assert!(matches!(err, ShareProviderError::InvalidSasUrl(_)));
    }

    #[test]
    fn test_non_http_scheme_is_rejected() {
        assert!(SasLinkIssuer::from_sas_url("ftp://host/share?sig=x", clock()).is_err());
    }

    #[test]
    fn test_unparseable_expiry_is_rejected() {
        assert!(SasLinkIssuer::from_sas_url(
            "https://host/share?se=tomorrow&sig=x",
            clock()
        )
        .is_err());
    }
}
