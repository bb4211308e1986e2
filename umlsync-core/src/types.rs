//! Domain types shared by the extractor, renderer, and sync crates.
//!
//! Repository paths are `String`s with `/` separators, relative to the
//! repository root. They never go through `PathBuf`, because they name
//! entries in a git tree rather than files on the host.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// A content-addressed object identifier as reported by the object store
/// (blob, tree, or commit SHA).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectHash(pub String);

impl ObjectHash {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for ObjectHash {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ObjectHash {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// A fully qualified git reference, e.g. `refs/heads/main`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GitRef(pub String);

impl GitRef {
    /// The reference without its leading `refs/`, as the Git refs endpoint
    /// addresses it (`refs/heads/main` → `heads/main`).
    pub fn short(&self) -> &str {
        self.0.strip_prefix("refs/").unwrap_or(&self.0)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GitRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for GitRef {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// `owner/name` of a hosted repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoSlug {
    pub owner: String,
    pub name: String,
}

impl RepoSlug {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for RepoSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Where a run writes: the repository and ref the triggering push was on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushTarget {
    pub repo: RepoSlug,
    pub git_ref: GitRef,
}

// ---------------------------------------------------------------------------
// Extraction and sync records
// ---------------------------------------------------------------------------

/// One diagram source block found in a changed file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiagramBlock {
    /// Directory of the containing file, `""` for the repository root.
    pub source_dir: String,
    /// File name of the containing file without its last extension.
    pub base_name: String,
    /// Text strictly between the start and end marker lines.
    pub code: String,
}

/// Fully resolved destination of a rendered artifact.
///
/// Always repository-root-relative: the constructor strips leading `/`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct OutputTarget {
    path: String,
}

impl OutputTarget {
    pub fn new(path: impl Into<String>) -> Self {
        let path = path.into();
        if path.starts_with('/') {
            return Self {
                path: path.trim_start_matches('/').to_string(),
            };
        }
        Self { path }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn into_path(self) -> String {
        self.path
    }
}

impl fmt::Display for OutputTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.path.fmt(f)
    }
}

/// Git file mode of a tree entry. Rendered artifacts are regular files.
pub const REGULAR_FILE_MODE: &str = "100644";

/// A single path → blob mapping for the next tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeEntry {
    pub path: String,
    pub mode: &'static str,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub sha: ObjectHash,
}

impl TreeEntry {
    /// A regular-file blob entry.
    pub fn blob(target: OutputTarget, sha: ObjectHash) -> Self {
        Self {
            path: target.into_path(),
            mode: REGULAR_FILE_MODE,
            kind: "blob",
            sha,
        }
    }
}

/// Terminal outcome of a sync run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SyncResult {
    /// No artifact differed from the target ref; nothing was written.
    NoChanges,
    /// Dry run: these paths would have been committed.
    WouldCommit { paths: Vec<String> },
    /// A commit was created and the target ref now points at it.
    Committed { commit: ObjectHash, paths: Vec<String> },
}

impl SyncResult {
    /// Paths written (or that would be written) by this run.
    pub fn paths(&self) -> &[String] {
        match self {
            SyncResult::NoChanges => &[],
            SyncResult::WouldCommit { paths } | SyncResult::Committed { paths, .. } => paths,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
