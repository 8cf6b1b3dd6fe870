//! Core job lifecycle logic for the render proxy.
//!
//! Defines the progress state machine, the persisted job record, the
//! seams to the progress store and the remote inference provider, the
//! lifecycle controller that drives jobs between them, and the result
//! resolver that turns provider output into a downloadable artifact.
//!
//! No HTTP framework types appear in this crate; the api crate adapts
//! everything here onto its wire surface.

pub mod error;
pub mod lifecycle;
pub mod progress;
pub mod provider;
pub mod record;
pub mod resolver;
pub mod store;
pub mod types;

pub use error::CoreError;
pub use lifecycle::JobController;
pub use progress::JobState;
pub use record::{JobRecord, ResultRef};
pub use types::JobId;
