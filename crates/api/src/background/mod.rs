//! Background tasks.
//!
//! Each submodule provides an async function intended to be spawned via
//! `tokio::spawn`. All tasks observe the server's shutdown
//! [`CancellationToken`](tokio_util::sync::CancellationToken).

pub mod ingest;
