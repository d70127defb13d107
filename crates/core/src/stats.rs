//! Aggregate statistics payloads.
//!
//! The backend is the system of record across all historical sessions,
//! so these shapes are a cache: overwritten wholesale whenever a write
//! succeeds or an explicit refresh lands, never derived locally.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Snapshot of annotation progress as computed by the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregateStatistics {
    pub total_media: i64,
    pub total_annotated: i64,
    #[serde(default)]
    pub pending: i64,
    /// Percentage in `[0, 100]`.
    #[serde(default)]
    pub completion_rate: f64,
    /// Tag string -> count of items carrying that tag.
    #[serde(default)]
    pub emotion_summary: HashMap<String, i64>,
    /// Media type string -> count.
    #[serde(default)]
    pub type_summary: HashMap<String, i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vad_summary: Option<VadSummary>,
}

/// VAD averages over all annotated items. Every field is optional: the
/// backend emits nulls until at least one item carries VAD values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VadSummary {
    #[serde(default)]
    pub avg_valence: Option<f64>,
    #[serde(default)]
    pub avg_arousal: Option<f64>,
    #[serde(default)]
    pub std_valence: Option<f64>,
    #[serde(default)]
    pub std_arousal: Option<f64>,
}
