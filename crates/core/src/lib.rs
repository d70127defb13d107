//! Domain types and pure validation for the vadmark annotation tool.
//!
//! Everything in this crate is synchronous and side-effect free: media
//! item metadata, the closed emotion tag set, VAD (valence/arousal)
//! range validation, per-item annotation records, and the aggregate
//! statistics payload shapes returned by the backend.

pub mod annotation;
pub mod emotion;
pub mod error;
pub mod media;
pub mod stats;
pub mod vad;

pub use annotation::{AnnotationPatch, AnnotationState, VadEdit};
pub use emotion::EmotionTag;
pub use error::CoreError;
pub use media::{MediaId, MediaItem, MediaType};
pub use stats::{AggregateStatistics, VadSummary};
