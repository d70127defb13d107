//! Annotation session state machinery.
//!
//! The session layer is the sole source of truth a presentation layer
//! reads from. It is built from three parts:
//!
//! - [`SessionStore`](store::SessionStore): the ordered media list,
//!   clamped cursor, per-item annotation map, statistics cache, and the
//!   last surfaced error.
//! - [`WriteCoordinator`](coordinator::WriteCoordinator): an explicit
//!   state machine for optimistic writes -- apply locally first, then
//!   commit or roll back exactly once when the remote call resolves,
//!   in issuance order per item.
//! - [`Session`](session::Session): the async driver tying the store
//!   and coordinator to an [`AnnotationBackend`] with an explicit
//!   `start` lifecycle.
//!
//! All mutation happens through the store's own methods in response to
//! discrete events; network calls are the only suspension points, so no
//! locking is needed.

pub mod coordinator;
pub mod error;
pub mod session;
pub mod store;

pub use coordinator::{WriteCoordinator, WriteOutcome, WriteTicket};
pub use error::SessionError;
pub use session::Session;
pub use store::{SessionStore, SessionSummary};

pub use vadmark_client::AnnotationBackend;
