#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Local input failed validation and was rejected before any state
    /// mutation or network call.
    #[error("Validation failed: {0}")]
    Validation(String),
}
