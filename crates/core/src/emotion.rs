//! The closed set of categorical emotion tags.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Categorical emotion label assignable to one media item.
///
/// The set is closed: the backend schema enforces the same seven values,
/// so parsing anything else is a validation error rather than a new tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmotionTag {
    Angry,
    Sad,
    Neutral,
    Happy,
    Disgust,
    Surprise,
    Fear,
}

/// All tags in display order.
pub const ALL_TAGS: [EmotionTag; 7] = [
    EmotionTag::Angry,
    EmotionTag::Sad,
    EmotionTag::Neutral,
    EmotionTag::Happy,
    EmotionTag::Disgust,
    EmotionTag::Surprise,
    EmotionTag::Fear,
];

/// All valid tag strings, for error messages.
const VALID_TAG_STRINGS: &[&str] = &[
    "angry", "sad", "neutral", "happy", "disgust", "surprise", "fear",
];

impl EmotionTag {
    /// Return the tag as its lowercase wire string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Angry => "angry",
            Self::Sad => "sad",
            Self::Neutral => "neutral",
            Self::Happy => "happy",
            Self::Disgust => "disgust",
            Self::Surprise => "surprise",
            Self::Fear => "fear",
        }
    }

    /// Parse a tag from its wire string.
    pub fn from_str(s: &str) -> Result<Self, CoreError> {
        match s {
            "angry" => Ok(Self::Angry),
            "sad" => Ok(Self::Sad),
            "neutral" => Ok(Self::Neutral),
            "happy" => Ok(Self::Happy),
            "disgust" => Ok(Self::Disgust),
            "surprise" => Ok(Self::Surprise),
            "fear" => Ok(Self::Fear),
            _ => Err(CoreError::Validation(format!(
                "Invalid emotion tag '{s}'. Must be one of: {}",
                VALID_TAG_STRINGS.join(", ")
            ))),
        }
    }
}

impl std::fmt::Display for EmotionTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
