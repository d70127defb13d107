//! REST client for the vadmark annotation backend.
//!
//! Wraps the backend HTTP API (media listing, annotation upserts,
//! statistics, export, reset, liveness) using [`reqwest`], and exposes
//! the [`AnnotationBackend`](backend::AnnotationBackend) trait seam the
//! session layer is written against.

pub mod api;
pub mod backend;

pub use api::{AnnotationApi, ApiError, ExportReport, HealthStatus, ResetReport};
pub use backend::AnnotationBackend;
