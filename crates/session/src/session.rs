//! Async session driver.
//!
//! [`Session`] ties the store and write coordinator to an injected
//! [`AnnotationBackend`]. It is the only component that talks to the
//! network; the presentation layer reads state through the store
//! accessors and mutates exclusively through these methods.

use vadmark_client::{AnnotationBackend, ExportReport};
use vadmark_core::{AggregateStatistics, AnnotationPatch, EmotionTag, MediaItem};

use crate::coordinator::{WriteCoordinator, WriteOutcome};
use crate::error::SessionError;
use crate::store::{SessionStore, SessionSummary};

/// One mounted annotation session over a fixed media collection.
///
/// Created via [`start`](Self::start) and torn down by drop. Taking the
/// backend by value keeps the dependency explicit instead of reaching
/// for a process-wide singleton.
pub struct Session<B: AnnotationBackend> {
    backend: B,
    store: SessionStore,
    coordinator: WriteCoordinator,
}

impl<B: AnnotationBackend> Session<B> {
    /// Fetch the media collection and open a session over it.
    ///
    /// The initial statistics fetch is best-effort: the backend is the
    /// system of record for aggregates, but a session without a stats
    /// cache is still fully usable.
    ///
    /// # Errors
    /// Returns a [`SessionError`] when the media fetch itself fails;
    /// there is no session to open without a collection.
    pub async fn start(backend: B) -> Result<Self, SessionError> {
        let items = backend
            .fetch_media_items()
            .await
            .map_err(SessionError::from_api)?;
        tracing::info!(count = items.len(), "Annotation session started");

        let mut store = SessionStore::new();
        store.initialize(items);

        let mut session = Self {
            backend,
            store,
            coordinator: WriteCoordinator::new(),
        };
        match session.backend.fetch_statistics().await {
            Ok(stats) => session.store.set_statistics(stats),
            Err(error) => {
                tracing::warn!(error = %error, "Initial statistics fetch failed");
            }
        }
        Ok(session)
    }

    // ---- read surface ----

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn current_item(&self) -> Option<&MediaItem> {
        self.store.current_item()
    }

    pub fn current_tag(&self) -> Option<EmotionTag> {
        self.store.current_tag()
    }

    pub fn annotated_count(&self) -> usize {
        self.store.annotated_count()
    }

    pub fn statistics(&self) -> Option<&AggregateStatistics> {
        self.store.statistics()
    }

    pub fn last_error(&self) -> Option<&SessionError> {
        self.store.last_error()
    }

    /// Terminal progress report, e.g. for a finish dialog.
    pub fn summary(&self) -> SessionSummary {
        self.store.summary()
    }

    // ---- navigation ----

    /// Step to the next item (clamped). Returns whether the cursor moved.
    pub fn advance(&mut self) -> bool {
        self.store.advance()
    }

    /// Step to the previous item (clamped). Returns whether the cursor
    /// moved.
    pub fn retreat(&mut self) -> bool {
        self.store.retreat()
    }

    // ---- edits ----

    /// Apply a patch to the item under the cursor.
    pub async fn annotate_current(
        &mut self,
        patch: AnnotationPatch,
    ) -> Result<Option<WriteOutcome>, SessionError> {
        self.annotate(self.store.cursor(), patch).await
    }

    /// Apply a patch to the item at `index`: optimistic local update,
    /// remote upsert, then commit or rollback.
    ///
    /// Input-boundary policy: invalid patches (out-of-range VAD) and
    /// no-op patches are dropped silently -- nothing is stored, nothing
    /// is sent, and `Ok(None)` is returned. An out-of-range index on a
    /// non-empty collection is treated the same way.
    ///
    /// # Errors
    /// [`SessionError::EmptyCollection`] when no media items are
    /// loaded. Network failures and server rejections are returned
    /// *and* recorded as the store's `last_error` after rolling the
    /// optimistic edit back; they are never fatal and the same edit may
    /// simply be retried.
    pub async fn annotate(
        &mut self,
        index: usize,
        patch: AnnotationPatch,
    ) -> Result<Option<WriteOutcome>, SessionError> {
        if self.store.is_empty() {
            return Err(SessionError::EmptyCollection);
        }
        let Some(item) = self.store.media_item(index) else {
            tracing::debug!(index, "Edit for out-of-range index dropped");
            return Ok(None);
        };
        let media_id = item.id;

        if patch.is_noop() {
            return Ok(None);
        }
        let (ticket, record) = match self.coordinator.begin(&mut self.store, index, &patch) {
            Ok(begun) => begun,
            Err(error) => {
                tracing::debug!(index, error = %error, "Invalid edit dropped at input boundary");
                return Ok(None);
            }
        };

        let result = self
            .backend
            .submit_annotation(media_id, &record)
            .await
            .map_err(SessionError::from_api);
        let failure = result.as_ref().err().cloned();

        let outcomes = self.coordinator.resolve(&mut self.store, ticket, result);

        match failure {
            Some(error) => Err(error),
            None => Ok(outcomes.last().copied()),
        }
    }

    // ---- bulk operations ----

    /// Overwrite the statistics cache from the backend.
    pub async fn refresh_statistics(&mut self) -> Result<(), SessionError> {
        match self.backend.fetch_statistics().await {
            Ok(stats) => {
                self.store.set_statistics(stats);
                Ok(())
            }
            Err(error) => {
                let error = SessionError::from_api(error);
                self.store.set_error(error.clone());
                Err(error)
            }
        }
    }

    /// Export all results from the backend.
    pub async fn export(&self) -> Result<ExportReport, SessionError> {
        self.backend
            .export_results()
            .await
            .map_err(SessionError::from_api)
    }

    /// Clear every annotation, locally and server-side.
    ///
    /// The local clear is unconditional: the user already confirmed
    /// destructive intent, so a remote failure only sets `last_error`
    /// and is never rolled back. In-flight write completions from
    /// before the reset are dropped as stale.
    pub async fn reset_all(&mut self) -> Result<String, SessionError> {
        self.store.clear_annotations();
        self.coordinator.reset();

        match self.backend.reset_all().await {
            Ok(report) => {
                self.store.clear_error();
                match self.backend.fetch_statistics().await {
                    Ok(stats) => self.store.set_statistics(stats),
                    Err(error) => {
                        tracing::warn!(error = %error, "Statistics refresh after reset failed");
                    }
                }
                tracing::info!("All annotations reset");
                Ok(report.message)
            }
            Err(error) => {
                let error = SessionError::from_api(error);
                self.store.set_error(error.clone());
                Err(error)
            }
        }
    }
}
