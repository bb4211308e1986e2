//! Error types for umlsync-core.

use std::path::PathBuf;

use thiserror::Error;

/// Fatal configuration problems. Every variant aborts a run before any
/// object store traffic happens.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No access token was supplied for the object store.
    #[error("missing access token; set GITHUB_TOKEN")]
    MissingToken,

    /// No push event payload location was supplied.
    #[error("missing push event payload; set GITHUB_EVENT_PATH or pass --event")]
    MissingEvent,

    /// The push payload has no (or an incomplete) `repository` object.
    #[error("push event has no repository context")]
    MissingRepository,

    /// The push payload has no `ref`.
    #[error("push event has no ref")]
    MissingRef,

    /// Tree entries exist but the push carried no commit to build on.
    #[error("push event has no commits to use as a parent")]
    MissingBaseCommit,

    /// The payload file could not be read.
    #[error("failed to read push event at {path}: {source}")]
    EventIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The payload file is not a valid push event document.
    #[error("failed to parse push event at {path}: {source}")]
    EventParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
