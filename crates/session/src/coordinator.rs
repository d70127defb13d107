//! Optimistic write coordination.
//!
//! Each logical edit moves through `Idle -> Pending -> {Committed |
//! RolledBack}`. The edit is applied to the [`SessionStore`] immediately
//! so the UI reflects it with zero latency; when the remote write
//! resolves, the coordinator either commits (adopting the backend's
//! statistics payload) or rolls the index back to its pre-edit snapshot.
//!
//! Writes to the same index are sequenced: completions are applied in
//! the order the writes were issued, even when the underlying network
//! calls resolve out of order, giving last-write-wins semantics without
//! cancelling in-flight requests. Writes to different indices are fully
//! independent lanes.

use std::collections::{HashMap, VecDeque};

use vadmark_core::{AggregateStatistics, AnnotationPatch, AnnotationState, CoreError};

use crate::error::SessionError;
use crate::store::SessionStore;

/// Handle for one in-flight optimistic write. Consumed by
/// [`WriteCoordinator::resolve`] so each edit commits or rolls back
/// exactly once.
#[derive(Debug)]
pub struct WriteTicket {
    index: usize,
    seq: u64,
}

impl WriteTicket {
    pub fn index(&self) -> usize {
        self.index
    }
}

/// Terminal state of one resolved write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Committed,
    RolledBack,
}

/// One write awaiting its remote completion.
#[derive(Debug)]
struct PendingWrite {
    seq: u64,
    /// The index's last committed value at issue time; `None` means the
    /// entry was absent. Restored on rollback.
    snapshot: Option<AnnotationState>,
    /// The optimistically applied value; becomes the committed value on
    /// success.
    value: AnnotationState,
}

/// Per-index write sequencing state.
#[derive(Debug, Default)]
struct Lane {
    /// Last committed value for this index (`None` = absent). Snapshots
    /// are taken from here, never from a still-pending value.
    committed: Option<AnnotationState>,
    pending: VecDeque<PendingWrite>,
    /// Completions that arrived ahead of an earlier write's, parked
    /// until their turn.
    resolved: HashMap<u64, Result<AggregateStatistics, SessionError>>,
}

/// Applies optimistic edits and reconciles their remote completions.
#[derive(Debug, Default)]
pub struct WriteCoordinator {
    lanes: HashMap<usize, Lane>,
    /// Coordinator-wide issue counter. Survives [`reset`](Self::reset)
    /// so tickets issued before a reset can never alias new writes.
    next_seq: u64,
}

impl WriteCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin an optimistic write: validate the patch, capture the
    /// rollback snapshot, apply the merged record to the store, and
    /// issue a ticket.
    ///
    /// Returns the ticket together with the full post-merge record for
    /// the index, which is what the backend upsert must carry.
    ///
    /// # Errors
    /// Returns [`CoreError::Validation`] when the patch carries an
    /// out-of-range or non-finite VAD value; the store is untouched.
    pub fn begin(
        &mut self,
        store: &mut SessionStore,
        index: usize,
        patch: &AnnotationPatch,
    ) -> Result<(WriteTicket, AnnotationState), CoreError> {
        patch.validate()?;

        let seq = self.next_seq;
        self.next_seq += 1;

        let lane = self.lanes.entry(index).or_default();

        // An idle lane's committed value is whatever the store holds:
        // with nothing pending, the store state is committed by
        // definition.
        if lane.pending.is_empty() {
            lane.committed = store.annotation(index).cloned();
        }
        let snapshot = lane.committed.clone();

        // Merge onto the currently visible (possibly still pending)
        // value so stacked edits compose the way the user saw them.
        let base = store.annotation(index).cloned().unwrap_or_default();
        let value = patch.apply_to(&base);

        store.put_annotation(index, value.clone());

        lane.pending.push_back(PendingWrite {
            seq,
            snapshot,
            value: value.clone(),
        });

        tracing::debug!(index, seq, "Optimistic write applied");
        Ok((WriteTicket { index, seq }, value))
    }

    /// Record the remote completion for a write and apply every
    /// completion that is now unblocked, in issuance order.
    ///
    /// Returns the outcomes applied by this call (possibly none, when
    /// the completion arrived ahead of an earlier write's).
    pub fn resolve(
        &mut self,
        store: &mut SessionStore,
        ticket: WriteTicket,
        result: Result<AggregateStatistics, SessionError>,
    ) -> Vec<WriteOutcome> {
        let Some(lane) = self.lanes.get_mut(&ticket.index) else {
            // Lane was cleared by a reset while the write was in flight;
            // the local state no longer reflects this edit.
            tracing::debug!(index = ticket.index, seq = ticket.seq, "Stale write completion dropped");
            return Vec::new();
        };
        if !lane.pending.iter().any(|w| w.seq == ticket.seq) {
            tracing::debug!(index = ticket.index, seq = ticket.seq, "Stale write completion dropped");
            return Vec::new();
        }

        lane.resolved.insert(ticket.seq, result);

        let mut outcomes = Vec::new();
        while let Some(front) = lane.pending.front() {
            let Some(result) = lane.resolved.remove(&front.seq) else {
                break;
            };
            let Some(write) = lane.pending.pop_front() else {
                break;
            };

            match result {
                Ok(stats) => {
                    // The backend is the authority on aggregate counts.
                    lane.committed = Some(write.value);
                    store.set_statistics(stats);
                    store.clear_error();
                    tracing::debug!(index = ticket.index, seq = write.seq, "Write committed");
                    outcomes.push(WriteOutcome::Committed);
                }
                Err(error) => {
                    // Only the newest outstanding write owns the visible
                    // value; a shadowed failure must not clobber a later
                    // pending edit.
                    if lane.pending.is_empty() {
                        store.restore_annotation(ticket.index, write.snapshot);
                    }
                    tracing::warn!(
                        index = ticket.index,
                        seq = write.seq,
                        error = %error,
                        "Write rolled back",
                    );
                    store.set_error(error);
                    outcomes.push(WriteOutcome::RolledBack);
                }
            }
        }

        outcomes
    }

    /// True when at least one write for `index` awaits its completion.
    pub fn is_pending(&self, index: usize) -> bool {
        self.lanes
            .get(&index)
            .is_some_and(|lane| !lane.pending.is_empty())
    }

    /// Forget all lanes. Used by the full reset; completions for writes
    /// issued before the reset are dropped as stale.
    pub fn reset(&mut self) {
        self.lanes.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vadmark_core::{EmotionTag, MediaItem, MediaType, VadEdit};

    fn store_with(n: usize) -> SessionStore {
        let items = (0..n)
            .map(|i| MediaItem {
                id: i as i64 + 1,
                media_type: MediaType::Image,
                url: None,
                title: None,
            })
            .collect();
        let mut store = SessionStore::new();
        store.initialize(items);
        store
    }

    fn stats(annotated: i64) -> AggregateStatistics {
        AggregateStatistics {
            total_media: 3,
            total_annotated: annotated,
            ..Default::default()
        }
    }

    fn tag_patch(tag: EmotionTag) -> AnnotationPatch {
        AnnotationPatch::set_tag(tag)
    }

    // -- single write lifecycle --------------------------------------------

    #[test]
    fn optimistic_apply_is_visible_before_resolution() {
        let mut store = store_with(3);
        let mut coord = WriteCoordinator::new();

        let (ticket, record) = coord
            .begin(&mut store, 0, &tag_patch(EmotionTag::Happy))
            .unwrap();
        assert_eq!(record.tag, Some(EmotionTag::Happy));
        assert_eq!(store.annotation(0).unwrap().tag, Some(EmotionTag::Happy));
        assert!(coord.is_pending(0));

        let outcomes = coord.resolve(&mut store, ticket, Ok(stats(1)));
        assert_eq!(outcomes, vec![WriteOutcome::Committed]);
        assert_eq!(store.annotation(0).unwrap().tag, Some(EmotionTag::Happy));
        assert_eq!(store.statistics().unwrap().total_annotated, 1);
        assert!(!coord.is_pending(0));
    }

    #[test]
    fn failed_write_restores_absent_entry() {
        let mut store = store_with(3);
        let mut coord = WriteCoordinator::new();

        let (ticket, _) = coord
            .begin(&mut store, 1, &tag_patch(EmotionTag::Sad))
            .unwrap();
        let outcomes = coord.resolve(
            &mut store,
            ticket,
            Err(SessionError::Network("connection refused".into())),
        );

        assert_eq!(outcomes, vec![WriteOutcome::RolledBack]);
        assert_eq!(store.annotation(1), None);
        assert!(matches!(store.last_error(), Some(SessionError::Network(_))));
    }

    #[test]
    fn failed_write_restores_prior_committed_value() {
        let mut store = store_with(3);
        let mut coord = WriteCoordinator::new();

        let (t1, _) = coord
            .begin(&mut store, 0, &tag_patch(EmotionTag::Happy))
            .unwrap();
        coord.resolve(&mut store, t1, Ok(stats(1)));

        let (t2, _) = coord
            .begin(&mut store, 0, &tag_patch(EmotionTag::Angry))
            .unwrap();
        coord.resolve(&mut store, t2, Err(SessionError::Rejected("nope".into())));

        assert_eq!(store.annotation(0).unwrap().tag, Some(EmotionTag::Happy));
    }

    #[test]
    fn invalid_patch_leaves_store_untouched() {
        let mut store = store_with(1);
        let mut coord = WriteCoordinator::new();

        let patch = AnnotationPatch::set_valence(VadEdit::Set(2.5));
        assert!(coord.begin(&mut store, 0, &patch).is_err());
        assert_eq!(store.annotation(0), None);
        assert!(!coord.is_pending(0));
    }

    #[test]
    fn commit_clears_stale_error() {
        let mut store = store_with(1);
        let mut coord = WriteCoordinator::new();
        store.set_error(SessionError::Network("old".into()));

        let (ticket, _) = coord
            .begin(&mut store, 0, &tag_patch(EmotionTag::Fear))
            .unwrap();
        coord.resolve(&mut store, ticket, Ok(stats(1)));
        assert_eq!(store.last_error(), None);
    }

    // -- stacked writes on one index ---------------------------------------

    #[test]
    fn stacked_writes_merge_onto_visible_value() {
        let mut store = store_with(1);
        let mut coord = WriteCoordinator::new();

        let (_t1, r1) = coord
            .begin(&mut store, 0, &tag_patch(EmotionTag::Happy))
            .unwrap();
        let (_t2, r2) = coord
            .begin(&mut store, 0, &AnnotationPatch::set_valence(VadEdit::Set(0.5)))
            .unwrap();

        assert_eq!(r1.tag, Some(EmotionTag::Happy));
        // The second write composes on top of the first's optimistic
        // value, carrying the full logical record.
        assert_eq!(r2.tag, Some(EmotionTag::Happy));
        assert_eq!(r2.valence, Some(0.5));
    }

    #[test]
    fn out_of_order_completions_apply_in_issuance_order() {
        let mut store = store_with(1);
        let mut coord = WriteCoordinator::new();

        let (t1, _) = coord
            .begin(&mut store, 0, &tag_patch(EmotionTag::Happy))
            .unwrap();
        let (t2, _) = coord
            .begin(&mut store, 0, &tag_patch(EmotionTag::Angry))
            .unwrap();

        // The second write's completion arrives first: parked.
        let outcomes = coord.resolve(&mut store, t2, Ok(stats(2)));
        assert!(outcomes.is_empty());
        assert!(coord.is_pending(0));

        // The first write's completion unblocks both, in order.
        let outcomes = coord.resolve(&mut store, t1, Ok(stats(1)));
        assert_eq!(
            outcomes,
            vec![WriteOutcome::Committed, WriteOutcome::Committed]
        );
        // Last write wins; its stats payload is the one retained.
        assert_eq!(store.annotation(0).unwrap().tag, Some(EmotionTag::Angry));
        assert_eq!(store.statistics().unwrap().total_annotated, 2);
        assert!(!coord.is_pending(0));
    }

    #[test]
    fn shadowed_failure_keeps_newer_optimistic_value() {
        let mut store = store_with(1);
        let mut coord = WriteCoordinator::new();

        let (t1, _) = coord
            .begin(&mut store, 0, &tag_patch(EmotionTag::Happy))
            .unwrap();
        let (t2, _) = coord
            .begin(&mut store, 0, &tag_patch(EmotionTag::Angry))
            .unwrap();

        // First write fails while the second is still pending: the
        // newer optimistic value stays visible.
        coord.resolve(&mut store, t1, Err(SessionError::Network("lost".into())));
        assert_eq!(store.annotation(0).unwrap().tag, Some(EmotionTag::Angry));
        assert!(store.last_error().is_some());

        // Second write succeeds and commits its own value.
        let outcomes = coord.resolve(&mut store, t2, Ok(stats(1)));
        assert_eq!(outcomes, vec![WriteOutcome::Committed]);
        assert_eq!(store.annotation(0).unwrap().tag, Some(EmotionTag::Angry));
        assert_eq!(store.last_error(), None);
    }

    #[test]
    fn second_write_snapshots_last_committed_not_pending() {
        let mut store = store_with(1);
        let mut coord = WriteCoordinator::new();

        let (t1, _) = coord
            .begin(&mut store, 0, &tag_patch(EmotionTag::Happy))
            .unwrap();
        let (t2, _) = coord
            .begin(&mut store, 0, &tag_patch(EmotionTag::Angry))
            .unwrap();

        // Both fail: the index returns to its pre-first-edit state
        // (absent), not to the first write's pending value.
        coord.resolve(&mut store, t1, Err(SessionError::Network("lost".into())));
        coord.resolve(&mut store, t2, Err(SessionError::Network("lost".into())));
        assert_eq!(store.annotation(0), None);
    }

    // -- independent indices -----------------------------------------------

    #[test]
    fn different_indices_resolve_independently() {
        let mut store = store_with(3);
        let mut coord = WriteCoordinator::new();

        let (t0, _) = coord
            .begin(&mut store, 0, &tag_patch(EmotionTag::Happy))
            .unwrap();
        let (t2, _) = coord
            .begin(&mut store, 2, &tag_patch(EmotionTag::Sad))
            .unwrap();

        // Cross-index completions may land in any order.
        let outcomes = coord.resolve(&mut store, t2, Ok(stats(1)));
        assert_eq!(outcomes, vec![WriteOutcome::Committed]);
        let outcomes = coord.resolve(&mut store, t0, Ok(stats(2)));
        assert_eq!(outcomes, vec![WriteOutcome::Committed]);

        assert_eq!(store.annotation(0).unwrap().tag, Some(EmotionTag::Happy));
        assert_eq!(store.annotation(2).unwrap().tag, Some(EmotionTag::Sad));
    }

    // -- reset -------------------------------------------------------------

    #[test]
    fn completion_after_reset_is_dropped() {
        let mut store = store_with(1);
        let mut coord = WriteCoordinator::new();

        let (ticket, _) = coord
            .begin(&mut store, 0, &tag_patch(EmotionTag::Happy))
            .unwrap();
        store.clear_annotations();
        coord.reset();

        let outcomes = coord.resolve(&mut store, ticket, Ok(stats(1)));
        assert!(outcomes.is_empty());
        assert_eq!(store.annotation(0), None);
    }
}
