//! Session-level error classification.

use vadmark_client::ApiError;

/// Errors surfaced to the presentation layer via the session store.
///
/// Validation failures never appear here: out-of-range or non-numeric
/// input is rejected at the input boundary before any state mutation or
/// network call. Network failures and server rejections are never fatal;
/// the user may retry the same edit.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// Navigation or annotation attempted with zero media items. Not an
    /// exception path so much as a defined empty state the presentation
    /// layer must render distinctly.
    #[error("No media items are loaded")]
    EmptyCollection,

    /// The request never reached or never returned from the backend
    /// (includes timeouts).
    #[error("Network error: {0}")]
    Network(String),

    /// The backend answered with a non-2xx status and a reason.
    #[error("Rejected by server: {0}")]
    Rejected(String),
}

impl SessionError {
    /// Classify a client-layer failure into its user-facing kind.
    pub fn from_api(err: ApiError) -> Self {
        if err.is_network() {
            Self::Network(err.to_string())
        } else {
            let reason = err
                .rejection_reason()
                .unwrap_or_else(|| err.to_string());
            Self::Rejected(reason)
        }
    }
}
