//! Sink wire format
//!
//! Field names must match the downstream contract byte-for-byte; do not
//! rename without coordinating with the sink owners.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One delivery payload, POSTed to the sink as JSON
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryPayload {
    pub file_name: String,
    /// `YYYY-MM-DD HH:mm:ss`, UTC, truncated to seconds
    pub date: String,
    pub audio_download_link: String,
    /// Empty string when the pair has no companion
    pub metadata_download_link: String,
    pub source: String,
    pub size_bytes: u64,
    pub file_path: String,
}

/// Format a timestamp the way the sink expects dates
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_truncates_to_seconds() {
        let ts = Utc.with_ymd_and_hms(2026, 7, 1, 9, 5, 3).unwrap()
            + chrono::Duration::milliseconds(987);
        assert_eq!(format_timestamp(ts), "2026-07-01 09:05:03");
    }

    #[test]
    fn test_wire_field_names_are_exact() {
        let payload = DeliveryPayload {
            file_name: "clip.wav".to_string(),
            date: "2026-07-01 09:05:03".to_string(),
            audio_download_link: "https://x/clip.wav".to_string(),
            metadata_download_link: String::new(),
            source: "azure-file-share".to_string(),
            size_bytes: 42,
            file_path: "calls/clip.wav".to_string(),
        };

        let value = serde_json::to_value(&payload).unwrap();
        let keys: Vec<&str> = value.as_object().unwrap().keys().map(|k| k.as_str()).collect();
        for expected in [
            "file_name",
            "date",
            "audio_download_link",
            "metadata_download_link",
            "source",
            "size_bytes",
            "file_path",
        ] {
            assert!(keys.contains(&expected), "missing field {}", expected);
        }
        assert_eq!(keys.len(), 7);
    }
}
