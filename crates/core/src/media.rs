//! Media item metadata and file URL resolution.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Backend-assigned media identifier.
pub type MediaId = i64;

/// Kind of annotatable media.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaType {
    Image,
    Video,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
        }
    }

    pub fn from_str(s: &str) -> Result<Self, CoreError> {
        match s {
            "image" => Ok(Self::Image),
            "video" => Ok(Self::Video),
            _ => Err(CoreError::Validation(format!(
                "Invalid media type '{s}'. Must be one of: image, video"
            ))),
        }
    }
}

/// One annotatable unit, fetched once at session start and immutable for
/// the lifetime of the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaItem {
    pub id: MediaId,
    #[serde(rename = "type")]
    pub media_type: MediaType,
    /// Direct resource locator. Absent means the file is served by the
    /// backend under a path derived from `id`.
    #[serde(default)]
    pub url: Option<String>,
    /// Optional display label.
    #[serde(default)]
    pub title: Option<String>,
}

impl MediaItem {
    /// Resolve the path or URL the media bytes should be fetched from.
    ///
    /// A `url` that carries a scheme (`https://...`) or is an absolute
    /// path (`/uploads/x.jpg`) is used verbatim; anything else falls
    /// back to the backend's `/media/{id}/file` route.
    pub fn file_locator(&self) -> String {
        if let Some(url) = &self.url {
            if url.contains("://") || url.starts_with('/') {
                return url.clone();
            }
        }
        format!("/media/{}/file", self.id)
    }
}
