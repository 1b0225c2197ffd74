//! Remote document-store client
//!
//! HTTP client for a hosted document store exposing one collection of
//! trade documents. Requests carrying a JSON body are signed with
//! HMAC-SHA256 over that body; bodyless requests (list, delete) sign a
//! timestamp payload and transmit the timestamp in its own header, so
//! the server can reconstruct the signed bytes and reject stale
//! requests.

use async_trait::async_trait;
use chrono::Utc;
use hmac::{Hmac, Mac};
use reqwest::StatusCode;
use serde::Deserialize;
use sha2::Sha256;
use tracing::debug;

use super::{StoreError, StoreResult, TradeStore};
use crate::types::TradeRecord;

type HmacSha256 = Hmac<Sha256>;

const API_KEY_HEADER: &str = "X-AUTH-APIKEY";
const SIGNATURE_HEADER: &str = "X-AUTH-SIGNATURE";
const TIMESTAMP_HEADER: &str = "X-AUTH-TIMESTAMP";

/// The payload signed for bodyless requests. The server rebuilds this
/// from the timestamp header verbatim, so the shape is fixed.
fn timestamp_payload(timestamp: i64) -> String {
    format!("{{\"timestamp\":{timestamp}}}")
}

#[derive(Debug, Clone)]
pub struct HttpStore {
    base_url: String,
    collection: String,
    api_key: String,
    api_secret: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct InsertResponse {
    id: String,
}

impl HttpStore {
    pub fn new(
        base_url: impl Into<String>,
        collection: impl Into<String>,
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
    ) -> Self {
        HttpStore {
            base_url: base_url.into(),
            collection: collection.into(),
            api_key: api_key.into(),
            api_secret: api_secret.into(),
            client: reqwest::Client::new(),
        }
    }

    fn documents_url(&self) -> String {
        format!(
            "{}/collections/{}/documents",
            self.base_url.trim_end_matches('/'),
            self.collection
        )
    }

    fn document_url(&self, id: &str) -> String {
        format!("{}/{}", self.documents_url(), id)
    }

    fn sign(&self, payload: &str) -> String {
        let mut mac = HmacSha256::new_from_slice(self.api_secret.as_bytes())
            .expect("HMAC can take key of any size");
        mac.update(payload.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    /// Map a non-success response to a typed error, consuming the body
    /// as the message.
    async fn check(response: reqwest::Response, id: Option<&str>) -> StoreResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::NOT_FOUND {
            if let Some(id) = id {
                return Err(StoreError::NotFound(id.to_string()));
            }
        }
        let message = response.text().await.unwrap_or_default();
        Err(StoreError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl TradeStore for HttpStore {
    async fn list_all(&self) -> StoreResult<Vec<TradeRecord>> {
        let timestamp = Utc::now().timestamp_millis();
        let signature = self.sign(&timestamp_payload(timestamp));

        let response = self
            .client
            .get(self.documents_url())
            .header(API_KEY_HEADER, &self.api_key)
            .header(TIMESTAMP_HEADER, timestamp)
            .header(SIGNATURE_HEADER, signature)
            .send()
            .await?;
        let response = Self::check(response, None).await?;

        let records: Vec<TradeRecord> = response.json().await?;
        debug!("Fetched {} trades from remote store", records.len());
        Ok(records)
    }

    async fn insert(&self, record: &TradeRecord) -> StoreResult<String> {
        let body = serde_json::to_string(record)
            .map_err(|e| StoreError::Parse(e.to_string()))?;
        let signature = self.sign(&body);

        let response = self
            .client
            .post(self.documents_url())
            .header(API_KEY_HEADER, &self.api_key)
            .header(SIGNATURE_HEADER, signature)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;
        let response = Self::check(response, None).await?;

        let inserted: InsertResponse = response.json().await?;
        debug!("Trade inserted remotely: id={}", inserted.id);
        Ok(inserted.id)
    }

    async fn update(&self, id: &str, record: &TradeRecord) -> StoreResult<()> {
        let body = serde_json::to_string(record)
            .map_err(|e| StoreError::Parse(e.to_string()))?;
        let signature = self.sign(&body);

        let response = self
            .client
            .put(self.document_url(id))
            .header(API_KEY_HEADER, &self.api_key)
            .header(SIGNATURE_HEADER, signature)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;
        Self::check(response, Some(id)).await?;
        debug!("Trade updated remotely: id={}", id);
        Ok(())
    }

    async fn delete(&self, id: &str) -> StoreResult<()> {
        let timestamp = Utc::now().timestamp_millis();
        let signature = self.sign(&timestamp_payload(timestamp));

        let response = self
            .client
            .delete(self.document_url(id))
            .header(API_KEY_HEADER, &self.api_key)
            .header(TIMESTAMP_HEADER, timestamp)
            .header(SIGNATURE_HEADER, signature)
            .send()
            .await?;
        Self::check(response, Some(id)).await?;
        debug!("Trade deleted remotely: id={}", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls_tolerate_trailing_slash() {
        let store = HttpStore::new("https://store.example.com/", "trades", "k", "s");
        assert_eq!(
            store.documents_url(),
            "https://store.example.com/collections/trades/documents"
        );
        assert_eq!(
            store.document_url("abc"),
            "https://store.example.com/collections/trades/documents/abc"
        );
    }

    #[test]
    fn test_bodyless_signature_is_reconstructible_from_timestamp() {
        // The server only sees the timestamp header; signing that
        // exact payload shape must yield the transmitted signature.
        let store = HttpStore::new("https://store.example.com", "trades", "k", "secret");
        let timestamp = 1_700_000_000_000_i64;

        let payload = timestamp_payload(timestamp);
        assert_eq!(payload, "{\"timestamp\":1700000000000}");

        let sent = store.sign(&payload);
        let reconstructed = store.sign(&timestamp_payload(timestamp));
        assert_eq!(sent, reconstructed);
    }

    #[test]
    fn test_signature_is_stable_hex() {
        let store = HttpStore::new("https://store.example.com", "trades", "k", "secret");
        let a = store.sign("payload");
        let b = store.sign("payload");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
