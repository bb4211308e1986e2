//! Error types for umlsync-sync.

use thiserror::Error;

use umlsync_core::{ConfigError, ObjectHash};
use umlsync_extractor::ExtractError;

/// Failures of a single object store call.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The API answered with a non-success status.
    #[error("{op} failed with HTTP {status}: {body}")]
    Status {
        op: &'static str,
        status: u16,
        body: String,
    },

    /// The request never produced a response.
    #[error("{op} failed: {message}")]
    Transport { op: &'static str, message: String },

    /// The response body was not the expected JSON document.
    #[error("{op} returned an unreadable response: {source}")]
    Decode {
        op: &'static str,
        #[source]
        source: std::io::Error,
    },

    /// Blobs are uploaded as UTF-8 text.
    #[error("blob content is not UTF-8 text ({len} bytes)")]
    NonUtf8Blob { len: usize },

    /// A referenced commit or tree does not exist in the store.
    #[error("{op}: unknown object {hash}")]
    UnknownObject { op: &'static str, hash: ObjectHash },
}

/// All errors that abort a sync run.
///
/// Render failures are not here: the engine contains them per block.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to read changed files: {0}")]
    Extract(#[from] ExtractError),

    /// Any object store failure. No rollback is attempted; blobs created
    /// before the failure stay unreferenced.
    #[error("API failure: {0}")]
    Api(#[from] StoreError),

    /// A directory occupies the output path, so no blob can replace it.
    #[error("cannot write {path}: a directory already exists at that path")]
    HashMismatchUnresolvable { path: String },
}
