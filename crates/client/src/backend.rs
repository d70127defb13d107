//! Trait seam between the session layer and the remote backend.
//!
//! The session is written against [`AnnotationBackend`] rather than
//! [`AnnotationApi`](crate::api::AnnotationApi) directly so its
//! optimistic-write and rollback behavior can be driven by a scripted
//! mock in tests.

use async_trait::async_trait;
use vadmark_core::{AggregateStatistics, AnnotationState, MediaId, MediaItem};

use crate::api::{AnnotationApi, ApiError, ExportReport, ResetReport};

/// The remote capabilities the annotation session depends on.
#[async_trait]
pub trait AnnotationBackend: Send + Sync {
    /// Fetch the full ordered media collection.
    async fn fetch_media_items(&self) -> Result<Vec<MediaItem>, ApiError>;

    /// Fetch current aggregate statistics.
    async fn fetch_statistics(&self) -> Result<AggregateStatistics, ApiError>;

    /// Upsert the full logical annotation record for one media item,
    /// returning refreshed statistics.
    async fn submit_annotation(
        &self,
        media_id: MediaId,
        record: &AnnotationState,
    ) -> Result<AggregateStatistics, ApiError>;

    /// Export all annotation results.
    async fn export_results(&self) -> Result<ExportReport, ApiError>;

    /// Clear every annotation server-side.
    async fn reset_all(&self) -> Result<ResetReport, ApiError>;
}

#[async_trait]
impl AnnotationBackend for AnnotationApi {
    async fn fetch_media_items(&self) -> Result<Vec<MediaItem>, ApiError> {
        AnnotationApi::fetch_media_items(self).await
    }

    async fn fetch_statistics(&self) -> Result<AggregateStatistics, ApiError> {
        AnnotationApi::fetch_statistics(self).await
    }

    async fn submit_annotation(
        &self,
        media_id: MediaId,
        record: &AnnotationState,
    ) -> Result<AggregateStatistics, ApiError> {
        AnnotationApi::submit_annotation(self, media_id, record).await
    }

    async fn export_results(&self) -> Result<ExportReport, ApiError> {
        AnnotationApi::export_results(self).await
    }

    async fn reset_all(&self) -> Result<ResetReport, ApiError> {
        AnnotationApi::reset_all(self).await
    }
}
