//! The single authoritative holder of annotation session state.

use std::collections::HashMap;

use vadmark_core::{AggregateStatistics, AnnotationState, EmotionTag, MediaItem};

use crate::error::SessionError;

/// Terminal progress report for a finished session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSummary {
    pub total: usize,
    pub annotated: usize,
    /// Percentage in `[0, 100]`; zero for an empty collection.
    pub completion_rate: f64,
}

/// In-memory state for one annotation session.
///
/// Owns the annotation map and cursor for the lifetime of the session;
/// the media list is read-only once initialized; statistics are a cache
/// sourced from the backend. Nothing outside this module's methods
/// writes any of these fields, which keeps the single-writer discipline
/// without locks.
#[derive(Debug, Default)]
pub struct SessionStore {
    media_items: Vec<MediaItem>,
    cursor: usize,
    annotations: HashMap<usize, AnnotationState>,
    statistics: Option<AggregateStatistics>,
    last_error: Option<SessionError>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the media collection and reset all per-session state.
    ///
    /// An empty collection is accepted; item accessors then return
    /// `None` and navigation is a no-op.
    pub fn initialize(&mut self, items: Vec<MediaItem>) {
        self.media_items = items;
        self.cursor = 0;
        self.annotations.clear();
        self.statistics = None;
        self.last_error = None;
    }

    // ---- collection and cursor ----

    pub fn len(&self) -> usize {
        self.media_items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.media_items.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn media_item(&self, index: usize) -> Option<&MediaItem> {
        self.media_items.get(index)
    }

    /// The item under the cursor; `None` iff the collection is empty.
    pub fn current_item(&self) -> Option<&MediaItem> {
        self.media_items.get(self.cursor)
    }

    /// Move the cursor forward, clamped at the last item. Clears any
    /// stale error either way. Returns whether the cursor moved.
    pub fn advance(&mut self) -> bool {
        self.last_error = None;
        if self.cursor + 1 < self.media_items.len() {
            self.cursor += 1;
            true
        } else {
            false
        }
    }

    /// Move the cursor back, clamped at zero. Clears any stale error
    /// either way. Returns whether the cursor moved.
    pub fn retreat(&mut self) -> bool {
        self.last_error = None;
        if self.cursor > 0 {
            self.cursor -= 1;
            true
        } else {
            false
        }
    }

    // ---- annotations ----

    pub fn annotation(&self, index: usize) -> Option<&AnnotationState> {
        self.annotations.get(&index)
    }

    pub fn current_annotation(&self) -> Option<&AnnotationState> {
        self.annotations.get(&self.cursor)
    }

    pub fn current_tag(&self) -> Option<EmotionTag> {
        self.current_annotation().and_then(|state| state.tag)
    }

    /// Number of items satisfying the completeness predicate (any of
    /// tag/valence/arousal present). Never exceeds `len()`.
    pub fn annotated_count(&self) -> usize {
        self.annotations
            .values()
            .filter(|state| state.is_annotated())
            .count()
    }

    /// Replace the record at `index`. Coordinator path for the
    /// optimistic local apply.
    pub fn put_annotation(&mut self, index: usize, state: AnnotationState) {
        self.annotations.insert(index, state);
    }

    /// Restore the record at `index` to a captured snapshot; `None`
    /// removes the entry. Coordinator path for rollback.
    pub fn restore_annotation(&mut self, index: usize, snapshot: Option<AnnotationState>) {
        match snapshot {
            Some(state) => {
                self.annotations.insert(index, state);
            }
            None => {
                self.annotations.remove(&index);
            }
        }
    }

    /// Drop every local annotation. Used by the full reset, which never
    /// rolls this back even if the remote reset fails.
    pub fn clear_annotations(&mut self) {
        self.annotations.clear();
    }

    // ---- statistics cache ----

    pub fn statistics(&self) -> Option<&AggregateStatistics> {
        self.statistics.as_ref()
    }

    /// Overwrite the cache wholesale with a fresher backend payload.
    pub fn set_statistics(&mut self, stats: AggregateStatistics) {
        self.statistics = Some(stats);
    }

    // ---- error surface ----

    pub fn last_error(&self) -> Option<&SessionError> {
        self.last_error.as_ref()
    }

    pub fn set_error(&mut self, error: SessionError) {
        self.last_error = Some(error);
    }

    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    // ---- progress ----

    pub fn summary(&self) -> SessionSummary {
        let total = self.len();
        let annotated = self.annotated_count();
        let completion_rate = if total == 0 {
            0.0
        } else {
            annotated as f64 / total as f64 * 100.0
        };
        SessionSummary {
            total,
            annotated,
            completion_rate,
        }
    }
}
