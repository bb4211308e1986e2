//! Object store seam: content-addressed blobs, trees, commits, and refs.
//!
//! The store computes every hash. The engine never hashes locally, so a
//! freshly created blob and an object already on the ref are always compared
//! with the same algorithm.

use umlsync_core::{GitRef, ObjectHash, RepoSlug, TreeEntry};

use crate::error::StoreError;

/// What currently lives at a path on a ref.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExistingObject {
    /// A file (or symlink) with this blob hash.
    Blob(ObjectHash),
    /// A directory or submodule; a blob cannot take its place.
    Directory,
}

pub trait ObjectStore {
    /// Store `content` and return its content hash.
    fn create_blob(&self, repo: &RepoSlug, content: &[u8]) -> Result<ObjectHash, StoreError>;

    /// Look up the object at `path` on `git_ref`. `Ok(None)` means no such
    /// path, which is a normal outcome.
    fn object_at_path(
        &self,
        repo: &RepoSlug,
        git_ref: &GitRef,
        path: &str,
    ) -> Result<Option<ExistingObject>, StoreError>;

    /// Root tree of `commit`.
    fn commit_tree(&self, repo: &RepoSlug, commit: &ObjectHash) -> Result<ObjectHash, StoreError>;

    /// A new tree: `base_tree` with `entries` layered on top.
    fn create_tree(
        &self,
        repo: &RepoSlug,
        base_tree: &ObjectHash,
        entries: &[TreeEntry],
    ) -> Result<ObjectHash, StoreError>;

    /// A new commit with a single parent.
    fn create_commit(
        &self,
        repo: &RepoSlug,
        message: &str,
        parent: &ObjectHash,
        tree: &ObjectHash,
    ) -> Result<ObjectHash, StoreError>;

    /// Move `git_ref` to `commit` (fast-forward only).
    fn update_ref(
        &self,
        repo: &RepoSlug,
        git_ref: &GitRef,
        commit: &ObjectHash,
    ) -> Result<(), StoreError>;
}
