//! umlsync core library: domain types, push payload, run configuration, errors.
//!
//! - [`types`]: newtypes and the block / target / tree-entry records
//! - [`payload`]: push event loading
//! - [`config`]: [`SyncConfig`], [`OutputTemplate`], [`Token`]
//! - [`error`]: [`ConfigError`]

pub mod config;
pub mod error;
pub mod payload;
pub mod types;

pub use config::{OutputTemplate, SyncConfig, Token, DEFAULT_COMMIT_MESSAGE};
pub use error::ConfigError;
pub use payload::{Commit, PushEvent};
pub use types::{
    DiagramBlock, GitRef, ObjectHash, OutputTarget, PushTarget, RepoSlug, SyncResult, TreeEntry,
};
