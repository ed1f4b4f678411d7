use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use bytes::Bytes;
use docrelay_core::models::CompletedResult;
use reqwest::header::CONTENT_TYPE;

/// Parsed OCR output: `fields`, `confidence` and `raw`, each defaulting to `{}`.
pub type OcrResponse = CompletedResult;

/// Ways a single OCR call can fail.
#[derive(Debug, thiserror::Error)]
pub enum OcrError {
    /// The service answered with a non-success status.
    #[error("OCR service error: {status}")]
    Upstream { status: u16, body: String },

    /// No usable answer: connection refused, DNS failure, timeout.
    #[error("OCR service request failed: {0}")]
    Transport(String),

    /// The service answered 2xx with a body that is not JSON.
    #[error("OCR service returned an unreadable response: {0}")]
    Decode(String),
}

/// Client for the external OCR service.
#[async_trait]
pub trait OcrClient: Send + Sync {
    /// Send the raw document bytes, declared as `mime`, and parse the answer.
    async fn parse(&self, bytes: Bytes, mime: &str) -> Result<OcrResponse, OcrError>;
}

/// OCR client speaking HTTP: `POST {base_url}/parse` with the file as body.
pub struct HttpOcrClient {
    http_client: reqwest::Client,
    parse_url: String,
}

impl Debug for HttpOcrClient {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("HttpOcrClient")
            .field("parse_url", &self.parse_url)
            .finish()
    }
}

impl HttpOcrClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client for OCR service")?;

        Ok(Self {
            http_client,
            parse_url: format!("{}/parse", base_url.trim_end_matches('/')),
        })
    }

    pub fn parse_url(&self) -> &str {
        &self.parse_url
    }
}

#[async_trait]
impl OcrClient for HttpOcrClient {
    #[tracing::instrument(skip(self, bytes), fields(ocr.url = %self.parse_url, ocr.bytes = bytes.len()))]
    async fn parse(&self, bytes: Bytes, mime: &str) -> Result<OcrResponse, OcrError> {
        let response = self
            .http_client
            .post(&self.parse_url)
            .header(CONTENT_TYPE, mime)
            .body(bytes)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    OcrError::Transport("request timed out".to_string())
                } else {
                    OcrError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "OCR service rejected document");
            return Err(OcrError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| OcrError::Decode(e.to_string()))?;

        Ok(CompletedResult::from_response_body(body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn client_for(server: &mockito::Server) -> HttpOcrClient {
        HttpOcrClient::new(&server.url(), Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_parse_url_trims_trailing_slash() {
        let client = HttpOcrClient::new("http://ocr:8000/", Duration::from_secs(1)).unwrap();
        assert_eq!(client.parse_url(), "http://ocr:8000/parse");
    }

    #[tokio::test]
    async fn test_parse_success_defaults_missing_members() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/parse")
            .match_header("content-type", "application/pdf")
            .match_body("%PDF-1.4")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"fields":{"name":"X"},"raw":null}"#)
            .create_async()
            .await;

        let response = client_for(&server)
            .parse(Bytes::from_static(b"%PDF-1.4"), "application/pdf")
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(response.fields, json!({ "name": "X" }));
        assert_eq!(response.confidence, json!({}));
        assert_eq!(response.raw, json!({}));
    }

    #[tokio::test]
    async fn test_parse_upstream_error_keeps_status_and_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/parse")
            .with_status(422)
            .with_body("unsupported layout")
            .create_async()
            .await;

        let err = client_for(&server)
            .parse(Bytes::from_static(b"img"), "image/png")
            .await
            .unwrap_err();

        match err {
            OcrError::Upstream { status, body } => {
                assert_eq!(status, 422);
                assert_eq!(body, "unsupported layout");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_parse_non_json_body_is_decode_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/parse")
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let err = client_for(&server)
            .parse(Bytes::from_static(b"img"), "image/png")
            .await
            .unwrap_err();
        assert!(matches!(err, OcrError::Decode(_)));
    }

    #[tokio::test]
    async fn test_parse_unreachable_service_is_transport_error() {
        let client = HttpOcrClient::new("http://127.0.0.1:1", Duration::from_secs(2)).unwrap();
        let err = client
            .parse(Bytes::from_static(b"img"), "image/png")
            .await
            .unwrap_err();
        assert!(matches!(err, OcrError::Transport(_)));
    }
}
