//! Diagram block discovery for `umlsync-extractor`.
//!
//! Three steps turn a push into diagram sources:
//!
//! 1. [`changed_paths`]: added/modified paths across the push, first-seen order.
//! 2. [`load_sources`]: read those paths from the checked-out workspace.
//! 3. [`extract`]: find `@startuml` … `@enduml` blocks in each file.
//!
//! Every step preserves input order, so the same push always yields the same
//! blocks in the same order.

mod blocks;
mod changeset;
mod sources;

use std::path::PathBuf;

use thiserror::Error;

pub use blocks::{extract, extract_file, END_MARKER, START_MARKER};
pub use changeset::changed_paths;
pub use sources::{is_scannable, load_sources, SourceFile, SCANNED_EXTENSIONS};

/// Errors from reading changed files.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
