//! HTTP client for the annotation backend's REST endpoints.
//!
//! One method per remote capability, each a pure request/response
//! mapping: no retries, no shared-state mutation. Failures are surfaced
//! verbatim to the caller, which owns rollback and error presentation.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use vadmark_core::{AggregateStatistics, AnnotationState, MediaId, MediaItem};

/// HTTP client for a single annotation backend.
pub struct AnnotationApi {
    client: reqwest::Client,
    api_url: String,
}

/// Envelope returned by `GET /media`.
#[derive(Debug, Deserialize)]
struct MediaListResponse {
    items: Vec<MediaItem>,
}

/// Envelope returned by `POST /annotate` on success.
#[derive(Debug, Deserialize)]
struct AnnotateResponse {
    stats: AggregateStatistics,
}

/// Result of `GET /export`.
#[derive(Debug, Clone, Deserialize)]
pub struct ExportReport {
    /// Full CSV document, one row per media item.
    pub csv: String,
    pub total: i64,
    pub annotated: i64,
}

/// Result of `POST /reset`.
#[derive(Debug, Clone, Deserialize)]
pub struct ResetReport {
    pub message: String,
}

/// Result of `GET /health`.
#[derive(Debug, Clone, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

/// Body of `POST /annotate`. The backend upserts by media id, merging
/// with any prior annotation, so absent fields are omitted entirely.
#[derive(Debug, Serialize)]
struct AnnotateRequest<'a> {
    #[serde(rename = "mediaId")]
    media_id: MediaId,
    #[serde(skip_serializing_if = "Option::is_none")]
    tag: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    valence: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    arousal: Option<f64>,
}

/// Errors from the backend REST layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The backend returned a non-2xx status code.
    #[error("Backend API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body; usually a JSON `{"error": "..."}`.
        body: String,
    },
}

impl ApiError {
    /// True when the request never produced a server response, i.e. the
    /// failure is on the transport rather than a rejection.
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Request(_))
    }

    /// Server-provided rejection reason, when one exists.
    ///
    /// Extracts the `error` field from a JSON error body; falls back to
    /// the raw body text for non-JSON responses.
    pub fn rejection_reason(&self) -> Option<String> {
        match self {
            Self::Request(_) => None,
            Self::Api { body, .. } => {
                #[derive(Deserialize)]
                struct ErrorBody {
                    error: String,
                }
                match serde_json::from_str::<ErrorBody>(body) {
                    Ok(parsed) => Some(parsed.error),
                    Err(_) => Some(body.clone()),
                }
            }
        }
    }
}

impl AnnotationApi {
    /// Create a new client for the backend at `api_url`
    /// (e.g. `http://localhost:5000/api`).
    pub fn new(api_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url,
        }
    }

    /// Create a client whose requests time out after `timeout`.
    ///
    /// An expired timeout surfaces as [`ApiError::Request`], so the
    /// caller's network-failure rollback path covers it unchanged.
    pub fn with_timeout(api_url: String, timeout: Duration) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, api_url })
    }

    /// Create an API client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, api_url: String) -> Self {
        Self { client, api_url }
    }

    /// Base API URL this client talks to.
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Fetch the full ordered media collection.
    ///
    /// Sends `GET /media` and unwraps the `{ items, ... }` envelope.
    pub async fn fetch_media_items(&self) -> Result<Vec<MediaItem>, ApiError> {
        let response = self
            .client
            .get(format!("{}/media", self.api_url))
            .send()
            .await?;

        let list: MediaListResponse = Self::parse_response(response).await?;
        tracing::debug!(count = list.items.len(), "Fetched media collection");
        Ok(list.items)
    }

    /// Fetch current aggregate statistics via `GET /stats`.
    pub async fn fetch_statistics(&self) -> Result<AggregateStatistics, ApiError> {
        let response = self
            .client
            .get(format!("{}/stats", self.api_url))
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Upsert the annotation for one media item.
    ///
    /// Sends `POST /annotate` with the full logical record for the item
    /// (the backend merges by media id). Returns the refreshed
    /// statistics from the success envelope.
    pub async fn submit_annotation(
        &self,
        media_id: MediaId,
        record: &AnnotationState,
    ) -> Result<AggregateStatistics, ApiError> {
        let body = AnnotateRequest {
            media_id,
            tag: record.tag.map(|t| t.as_str()),
            valence: record.valence,
            arousal: record.arousal,
        };

        let response = self
            .client
            .post(format!("{}/annotate", self.api_url))
            .json(&body)
            .send()
            .await?;

        let parsed: AnnotateResponse = Self::parse_response(response).await?;
        tracing::debug!(media_id, "Annotation saved");
        Ok(parsed.stats)
    }

    /// Export all annotation results as CSV via `GET /export`.
    pub async fn export_results(&self) -> Result<ExportReport, ApiError> {
        let response = self
            .client
            .get(format!("{}/export", self.api_url))
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Clear every annotation server-side via `POST /reset`.
    /// Media records themselves are kept.
    pub async fn reset_all(&self) -> Result<ResetReport, ApiError> {
        let response = self
            .client
            .post(format!("{}/reset", self.api_url))
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Liveness probe via `GET /health`.
    pub async fn health(&self) -> Result<HealthStatus, ApiError> {
        let response = self
            .client
            .get(format!("{}/health", self.api_url))
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// URL the bytes for `item` can be fetched from.
    ///
    /// A locator taken verbatim from the item's own `url` (scheme
    /// qualified or site-absolute) is already resolvable as-is; only the
    /// derived `/media/{id}/file` path is backend-relative and gets this
    /// client's base URL joined on.
    pub fn media_file_url(&self, item: &MediaItem) -> String {
        let locator = item.file_locator();
        if item.url.as_deref() == Some(locator.as_str()) {
            locator
        } else {
            format!("{}{}", self.api_url, locator)
        }
    }

    // ---- private helpers ----

    /// Ensure the response has a success status code. Returns the
    /// response unchanged on success, or an [`ApiError::Api`] containing
    /// the status and body text on failure.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(ApiError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Parse a successful JSON response body into the expected type.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }
}
