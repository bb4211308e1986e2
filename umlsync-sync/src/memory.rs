//! In-process [`ObjectStore`].
//!
//! Blob hashes are git-compatible (`sha1("blob {len}\0" ++ content)`). Trees
//! are stored flattened as `path → blob` maps, so "layering" a tree is a map
//! merge. Every trait call is appended to a call log that tests inspect.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard, PoisonError};

use sha1::{Digest, Sha1};

use umlsync_core::{GitRef, ObjectHash, RepoSlug, TreeEntry};

use crate::error::StoreError;
use crate::store::{ExistingObject, ObjectStore};

/// Which trait operation was invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreCall {
    CreateBlob,
    ObjectAtPath,
    CommitTree,
    CreateTree,
    CreateCommit,
    UpdateRef,
}

impl StoreCall {
    /// Calls that write history (as opposed to content-addressed blobs).
    pub fn is_history_write(self) -> bool {
        matches!(
            self,
            StoreCall::CreateTree | StoreCall::CreateCommit | StoreCall::UpdateRef
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRecord {
    pub tree: ObjectHash,
    pub parents: Vec<ObjectHash>,
    pub message: String,
}

type FlatTree = BTreeMap<String, ObjectHash>;

#[derive(Default)]
struct State {
    blobs: HashMap<ObjectHash, Vec<u8>>,
    trees: HashMap<ObjectHash, FlatTree>,
    commits: HashMap<ObjectHash, CommitRecord>,
    refs: HashMap<(RepoSlug, GitRef), ObjectHash>,
    calls: Vec<StoreCall>,
}

impl State {
    fn tree_at_ref(&self, repo: &RepoSlug, git_ref: &GitRef) -> Option<&FlatTree> {
        let commit = self.refs.get(&(repo.clone(), git_ref.clone()))?;
        let record = self.commits.get(commit)?;
        self.trees.get(&record.tree)
    }

    fn put_blob(&mut self, content: &[u8]) -> ObjectHash {
        let hash = blob_hash(content);
        self.blobs.entry(hash.clone()).or_insert_with(|| content.to_vec());
        hash
    }

    fn put_tree(&mut self, tree: FlatTree) -> ObjectHash {
        let mut hasher = Sha1::new();
        hasher.update(b"tree\0");
        for (path, blob) in &tree {
            hasher.update(path.as_bytes());
            hasher.update(b"\0");
            hasher.update(blob.as_str().as_bytes());
            hasher.update(b"\n");
        }
        let hash = ObjectHash(hex::encode(hasher.finalize()));
        self.trees.insert(hash.clone(), tree);
        hash
    }

    fn put_commit(&mut self, record: CommitRecord) -> ObjectHash {
        let mut hasher = Sha1::new();
        hasher.update(format!("commit\0tree {}\n", record.tree).as_bytes());
        for parent in &record.parents {
            hasher.update(format!("parent {parent}\n").as_bytes());
        }
        hasher.update(format!("\n{}", record.message).as_bytes());
        let hash = ObjectHash(hex::encode(hasher.finalize()));
        self.commits.insert(hash.clone(), record);
        hash
    }
}

/// Git blob hash of `content`.
pub fn blob_hash(content: &[u8]) -> ObjectHash {
    let mut hasher = Sha1::new();
    hasher.update(format!("blob {}\0", content.len()).as_bytes());
    hasher.update(content);
    ObjectHash(hex::encode(hasher.finalize()))
}

#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Create a root commit holding `files` and point `git_ref` at it.
    /// Does not touch the call log.
    pub fn seed(&self, repo: &RepoSlug, git_ref: &GitRef, files: &[(&str, &[u8])]) -> ObjectHash {
        let mut state = self.state();
        let mut tree = FlatTree::new();
        for (path, content) in files {
            let blob = state.put_blob(content);
            tree.insert((*path).to_string(), blob);
        }
        let tree = state.put_tree(tree);
        let commit = state.put_commit(CommitRecord {
            tree,
            parents: vec![],
            message: "seed".to_string(),
        });
        state
            .refs
            .insert((repo.clone(), git_ref.clone()), commit.clone());
        commit
    }

    /// Content of the file at `path` on `git_ref`, if any.
    pub fn file_at(&self, repo: &RepoSlug, git_ref: &GitRef, path: &str) -> Option<Vec<u8>> {
        let state = self.state();
        let blob = state.tree_at_ref(repo, git_ref)?.get(path)?;
        state.blobs.get(blob).cloned()
    }

    pub fn ref_target(&self, repo: &RepoSlug, git_ref: &GitRef) -> Option<ObjectHash> {
        self.state()
            .refs
            .get(&(repo.clone(), git_ref.clone()))
            .cloned()
    }

    pub fn commit(&self, hash: &ObjectHash) -> Option<CommitRecord> {
        self.state().commits.get(hash).cloned()
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        self.state().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state().calls.clear();
    }
}

impl ObjectStore for MemoryStore {
    fn create_blob(&self, _repo: &RepoSlug, content: &[u8]) -> Result<ObjectHash, StoreError> {
        let mut state = self.state();
        state.calls.push(StoreCall::CreateBlob);
        Ok(state.put_blob(content))
    }

    fn object_at_path(
        &self,
        repo: &RepoSlug,
        git_ref: &GitRef,
        path: &str,
    ) -> Result<Option<ExistingObject>, StoreError> {
        let mut state = self.state();
        state.calls.push(StoreCall::ObjectAtPath);
        let Some(tree) = state.tree_at_ref(repo, git_ref) else {
            return Ok(None);
        };
        if let Some(blob) = tree.get(path) {
            return Ok(Some(ExistingObject::Blob(blob.clone())));
        }
        let prefix = format!("{path}/");
        if tree.keys().any(|p| p.starts_with(&prefix)) {
            return Ok(Some(ExistingObject::Directory));
        }
        Ok(None)
    }

    fn commit_tree(&self, _repo: &RepoSlug, commit: &ObjectHash) -> Result<ObjectHash, StoreError> {
        let mut state = self.state();
        state.calls.push(StoreCall::CommitTree);
        state
            .commits
            .get(commit)
            .map(|record| record.tree.clone())
            .ok_or_else(|| StoreError::UnknownObject {
                op: "get commit",
                hash: commit.clone(),
            })
    }

    fn create_tree(
        &self,
        _repo: &RepoSlug,
        base_tree: &ObjectHash,
        entries: &[TreeEntry],
    ) -> Result<ObjectHash, StoreError> {
        let mut state = self.state();
        state.calls.push(StoreCall::CreateTree);
        let mut tree = state
            .trees
            .get(base_tree)
            .cloned()
            .ok_or_else(|| StoreError::UnknownObject {
                op: "create tree",
                hash: base_tree.clone(),
            })?;
        for entry in entries {
            if !state.blobs.contains_key(&entry.sha) {
                return Err(StoreError::UnknownObject {
                    op: "create tree",
                    hash: entry.sha.clone(),
                });
            }
            tree.insert(entry.path.clone(), entry.sha.clone());
        }
        Ok(state.put_tree(tree))
    }

    fn create_commit(
        &self,
        _repo: &RepoSlug,
        message: &str,
        parent: &ObjectHash,
        tree: &ObjectHash,
    ) -> Result<ObjectHash, StoreError> {
        let mut state = self.state();
        state.calls.push(StoreCall::CreateCommit);
        if !state.trees.contains_key(tree) {
            return Err(StoreError::UnknownObject {
                op: "create commit",
                hash: tree.clone(),
            });
        }
        Ok(state.put_commit(CommitRecord {
            tree: tree.clone(),
            parents: vec![parent.clone()],
            message: message.to_string(),
        }))
    }

    fn update_ref(
        &self,
        repo: &RepoSlug,
        git_ref: &GitRef,
        commit: &ObjectHash,
    ) -> Result<(), StoreError> {
        let mut state = self.state();
        state.calls.push(StoreCall::UpdateRef);
        if !state.commits.contains_key(commit) {
            return Err(StoreError::UnknownObject {
                op: "update ref",
                hash: commit.clone(),
            });
        }
        state
            .refs
            .insert((repo.clone(), git_ref.clone()), commit.clone());
        Ok(())
    }
}
