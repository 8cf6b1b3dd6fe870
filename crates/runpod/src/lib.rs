//! RunPod serverless endpoint client.
//!
//! Implements the core [`Provider`](rendergate_core::provider::Provider)
//! trait over the RunPod request/status HTTP protocol using [`reqwest`].

pub mod api;

pub use api::RunPodApi;
