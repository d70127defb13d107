//! Per-item annotation records and partial edits.

use serde::{Deserialize, Serialize};

use crate::emotion::EmotionTag;
use crate::error::CoreError;
use crate::vad::validate_vad_value;

/// The mutable markup for one media item.
///
/// All three fields are independently optional; the invariant that any
/// present VAD value lies in `[-1.0, 1.0]` is enforced at the edit
/// boundary (see [`AnnotationPatch::validate`]), never checked lazily.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnnotationState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<EmotionTag>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valence: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arousal: Option<f64>,
}

impl AnnotationState {
    /// Completeness predicate: an item counts as annotated once any of
    /// tag, valence, or arousal is set. Partial annotation is a valid
    /// end state for a human annotator.
    pub fn is_annotated(&self) -> bool {
        self.tag.is_some() || self.valence.is_some() || self.arousal.is_some()
    }

    /// True when every field is unset.
    pub fn is_empty(&self) -> bool {
        !self.is_annotated()
    }
}

/// Tri-state edit for one VAD dimension.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum VadEdit {
    /// Leave the current value untouched.
    #[default]
    Keep,
    /// Unset the value.
    Clear,
    /// Replace the value.
    Set(f64),
}

impl VadEdit {
    /// Lift the clear-sentinel convention of
    /// [`parse_vad_input`](crate::vad::parse_vad_input) into an edit:
    /// `None` clears the field, `Some(v)` sets it.
    pub fn from_parsed(parsed: Option<f64>) -> Self {
        match parsed {
            Some(value) => Self::Set(value),
            None => Self::Clear,
        }
    }

    fn apply(self, slot: &mut Option<f64>) {
        match self {
            Self::Keep => {}
            Self::Clear => *slot = None,
            Self::Set(value) => *slot = Some(value),
        }
    }
}

/// A partial edit to one item's annotation.
///
/// Unmentioned fields keep their current value, so a tag click and a
/// single VAD field change are both expressed as one-field patches.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnnotationPatch {
    pub tag: Option<EmotionTag>,
    pub valence: VadEdit,
    pub arousal: VadEdit,
}

impl AnnotationPatch {
    /// Patch that sets the emotion tag.
    pub fn set_tag(tag: EmotionTag) -> Self {
        Self {
            tag: Some(tag),
            ..Self::default()
        }
    }

    /// Patch that edits the valence dimension.
    pub fn set_valence(edit: VadEdit) -> Self {
        Self {
            valence: edit,
            ..Self::default()
        }
    }

    /// Patch that edits the arousal dimension.
    pub fn set_arousal(edit: VadEdit) -> Self {
        Self {
            arousal: edit,
            ..Self::default()
        }
    }

    /// True when the patch would change nothing.
    pub fn is_noop(&self) -> bool {
        self.tag.is_none() && self.valence == VadEdit::Keep && self.arousal == VadEdit::Keep
    }

    /// Validate every value the patch would introduce.
    ///
    /// Must pass before the patch is applied locally or sent remotely;
    /// a rejected patch leaves no trace anywhere.
    pub fn validate(&self) -> Result<(), CoreError> {
        if let VadEdit::Set(value) = self.valence {
            validate_vad_value(value)?;
        }
        if let VadEdit::Set(value) = self.arousal {
            validate_vad_value(value)?;
        }
        Ok(())
    }

    /// Return `base` with this patch applied.
    pub fn apply_to(&self, base: &AnnotationState) -> AnnotationState {
        let mut next = base.clone();
        if let Some(tag) = self.tag {
            next.tag = Some(tag);
        }
        self.valence.apply(&mut next.valence);
        self.arousal.apply(&mut next.arousal);
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -- completeness predicate --------------------------------------------

    #[test]
    fn empty_state_is_not_annotated() {
        assert!(!AnnotationState::default().is_annotated());
    }

    #[test]
    fn tag_alone_counts_as_annotated() {
        let state = AnnotationState {
            tag: Some(EmotionTag::Happy),
            ..Default::default()
        };
        assert!(state.is_annotated());
    }

    #[test]
    fn single_vad_dimension_counts_as_annotated() {
        let state = AnnotationState {
            valence: Some(0.2),
            ..Default::default()
        };
        assert!(state.is_annotated());
    }

    // -- patch application -------------------------------------------------

    #[test]
    fn tag_patch_preserves_vad() {
        let base = AnnotationState {
            tag: None,
            valence: Some(0.5),
            arousal: Some(-0.3),
        };
        let next = AnnotationPatch::set_tag(EmotionTag::Sad).apply_to(&base);
        assert_eq!(next.tag, Some(EmotionTag::Sad));
        assert_eq!(next.valence, Some(0.5));
        assert_eq!(next.arousal, Some(-0.3));
    }

    #[test]
    fn vad_patch_preserves_tag() {
        let base = AnnotationState {
            tag: Some(EmotionTag::Fear),
            ..Default::default()
        };
        let next = AnnotationPatch::set_valence(VadEdit::Set(0.9)).apply_to(&base);
        assert_eq!(next.tag, Some(EmotionTag::Fear));
        assert_eq!(next.valence, Some(0.9));
    }

    #[test]
    fn clear_edit_unsets_field() {
        let base = AnnotationState {
            valence: Some(0.5),
            ..Default::default()
        };
        let next = AnnotationPatch::set_valence(VadEdit::Clear).apply_to(&base);
        assert_eq!(next.valence, None);
    }

    #[test]
    fn keep_edit_leaves_field_untouched() {
        let base = AnnotationState {
            arousal: Some(-0.7),
            ..Default::default()
        };
        let next = AnnotationPatch::set_tag(EmotionTag::Angry).apply_to(&base);
        assert_eq!(next.arousal, Some(-0.7));
    }

    // -- patch validation --------------------------------------------------

    #[test]
    fn in_range_patch_validates() {
        assert!(AnnotationPatch::set_valence(VadEdit::Set(1.0)).validate().is_ok());
        assert!(AnnotationPatch::set_arousal(VadEdit::Set(-1.0)).validate().is_ok());
    }

    #[test]
    fn out_of_range_patch_rejected() {
        assert!(AnnotationPatch::set_valence(VadEdit::Set(2.5)).validate().is_err());
        assert!(AnnotationPatch::set_arousal(VadEdit::Set(f64::NAN)).validate().is_err());
    }

    #[test]
    fn clear_and_keep_always_validate() {
        assert!(AnnotationPatch::set_valence(VadEdit::Clear).validate().is_ok());
        assert!(AnnotationPatch::default().validate().is_ok());
    }

    #[test]
    fn noop_detection() {
        assert!(AnnotationPatch::default().is_noop());
        assert!(!AnnotationPatch::set_tag(EmotionTag::Neutral).is_noop());
        assert!(!AnnotationPatch::set_valence(VadEdit::Clear).is_noop());
    }

    // -- serialization -----------------------------------------------------

    #[test]
    fn unset_fields_are_omitted_from_json() {
        let state = AnnotationState {
            tag: Some(EmotionTag::Happy),
            ..Default::default()
        };
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json, serde_json::json!({"tag": "happy"}));
    }
}
