//! # umlsync-sync
//!
//! Hash-gated commit of rendered diagrams back to the pushed ref.
//!
//! Call [`pipeline::run`] with a push event, or [`sync_blocks`] directly when
//! the blocks are already extracted. The object store is a trait so the
//! engine runs the same against [`GitHubStore`] and the in-process
//! [`MemoryStore`].

pub mod engine;
pub mod error;
pub mod github;
pub mod memory;
pub mod pipeline;
pub mod store;
pub mod target;

pub use engine::{sync_blocks, ArtifactResult, SyncReport};
pub use error::{StoreError, SyncError};
pub use github::{GitHubStore, DEFAULT_API_URL};
pub use memory::{blob_hash, MemoryStore, StoreCall};
pub use store::{ExistingObject, ObjectStore};
pub use target::resolve;
