//! Hash-gated commit of rendered diagrams.
//!
//! Every block is rendered and uploaded as a blob; only blobs whose hash
//! differs from what the target ref already holds become tree entries. When
//! nothing differs no tree, commit, or ref is created, which makes a second
//! run over the same push a no-op.

use std::collections::HashSet;

use serde::Serialize;

use umlsync_core::{DiagramBlock, ObjectHash, PushTarget, SyncConfig, SyncResult, TreeEntry};
use umlsync_renderer::Renderer;

use crate::error::SyncError;
use crate::store::{ExistingObject, ObjectStore};
use crate::target::resolve;

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// What happened to one block's artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ArtifactResult {
    /// Content differs from the ref (or the path is new); part of the commit.
    Updated { path: String, blob: ObjectHash },
    /// The ref already holds identical content.
    Unchanged { path: String },
    /// The renderer failed; the block was skipped.
    RenderFailed { path: String, reason: String },
    /// An earlier block of the same run claimed this path.
    Duplicate { path: String },
}

impl ArtifactResult {
    pub fn path(&self) -> &str {
        match self {
            ArtifactResult::Updated { path, .. }
            | ArtifactResult::Unchanged { path }
            | ArtifactResult::RenderFailed { path, .. }
            | ArtifactResult::Duplicate { path } => path,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub result: SyncResult,
    /// One entry per block, in extraction order.
    pub artifacts: Vec<ArtifactResult>,
}

impl SyncReport {
    /// A run that found nothing to do.
    pub fn no_changes() -> Self {
        Self {
            result: SyncResult::NoChanges,
            artifacts: Vec::new(),
        }
    }

    pub fn render_failures(&self) -> usize {
        self.artifacts
            .iter()
            .filter(|a| matches!(a, ArtifactResult::RenderFailed { .. }))
            .count()
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Render `blocks`, compare against `target`, and commit whatever changed on
/// top of `base_commit`.
///
/// Render failures are contained per block. Any store failure aborts the run
/// with [`SyncError::Api`]; objects created before it are left as they are.
pub fn sync_blocks<R, S>(
    blocks: &[DiagramBlock],
    base_commit: &ObjectHash,
    target: &PushTarget,
    renderer: &R,
    store: &S,
    config: &SyncConfig,
) -> Result<SyncReport, SyncError>
where
    R: Renderer + ?Sized,
    S: ObjectStore + ?Sized,
{
    let repo = &target.repo;
    let mut claimed: HashSet<String> = HashSet::new();
    let mut entries: Vec<TreeEntry> = Vec::new();
    let mut artifacts = Vec::with_capacity(blocks.len());

    for block in blocks {
        let output = resolve(&config.output, block);
        let path = output.path().to_string();

        if claimed.contains(&path) {
            tracing::warn!("duplicate output path {path}; keeping the first block");
            artifacts.push(ArtifactResult::Duplicate { path });
            continue;
        }

        // A path is claimed only by a block that rendered.
        let image = match renderer.render(&block.code) {
            Ok(image) => image,
            Err(err) => {
                tracing::warn!("skipping {path}: {err}");
                artifacts.push(ArtifactResult::RenderFailed {
                    path,
                    reason: err.to_string(),
                });
                continue;
            }
        };
        claimed.insert(path.clone());

        let blob = store.create_blob(repo, &image)?;
        match store.object_at_path(repo, &target.git_ref, &path)? {
            Some(ExistingObject::Directory) => {
                return Err(SyncError::HashMismatchUnresolvable { path });
            }
            Some(ExistingObject::Blob(existing)) if existing == blob => {
                tracing::debug!("unchanged: {path}");
                artifacts.push(ArtifactResult::Unchanged { path });
            }
            _ => {
                tracing::info!("changed: {path} ({blob})");
                entries.push(TreeEntry::blob(output, blob.clone()));
                artifacts.push(ArtifactResult::Updated { path, blob });
            }
        }
    }

    let paths: Vec<String> = entries.iter().map(|e| e.path.clone()).collect();

    if entries.is_empty() {
        tracing::info!("no rendered diagram differs from {}", target.git_ref);
        return Ok(SyncReport {
            result: SyncResult::NoChanges,
            artifacts,
        });
    }

    if config.dry_run {
        for path in &paths {
            tracing::info!("[dry-run] would commit: {path}");
        }
        return Ok(SyncReport {
            result: SyncResult::WouldCommit { paths },
            artifacts,
        });
    }

    let base_tree = store.commit_tree(repo, base_commit)?;
    let tree = store.create_tree(repo, &base_tree, &entries)?;
    let commit = store.create_commit(repo, &config.commit_message, base_commit, &tree)?;
    store.update_ref(repo, &target.git_ref, &commit)?;
    tracing::info!(
        "committed {} file(s) to {} as {commit}",
        paths.len(),
        target.git_ref
    );

    Ok(SyncReport {
        result: SyncResult::Committed { commit, paths },
        artifacts,
    })
}
