//! Progress store implementations.
//!
//! [`MemoryStore`] backs tests and ephemeral deployments;
//! [`FileStore`] persists one JSON record per job with atomic-rename
//! writes, replacing the unsynchronized read-modify-write file access
//! this service historically relied on.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;
