//! Push event → report. The entry point the CLI calls.

use std::path::Path;

use umlsync_core::{ConfigError, PushEvent, SyncConfig};
use umlsync_extractor::{changed_paths, extract, load_sources};
use umlsync_renderer::Renderer;

use crate::engine::{sync_blocks, SyncReport};
use crate::error::SyncError;
use crate::store::ObjectStore;

/// Run one sync for `event`, reading changed files from `workspace`.
///
/// The repository context is validated before anything else, so a malformed
/// event fails without touching the workspace or the store.
pub fn run<R, S>(
    event: &PushEvent,
    workspace: &Path,
    renderer: &R,
    store: &S,
    config: &SyncConfig,
) -> Result<SyncReport, SyncError>
where
    R: Renderer + ?Sized,
    S: ObjectStore + ?Sized,
{
    let target = event.target()?;

    if event.deleted {
        tracing::info!("{} was deleted; nothing to render", target.git_ref);
        return Ok(SyncReport::no_changes());
    }

    let paths = changed_paths(&event.commits);
    tracing::debug!("{} changed path(s) in push", paths.len());

    let sources = load_sources(workspace, &paths)?;
    let blocks = extract(&sources);
    if blocks.is_empty() {
        tracing::info!("no diagram blocks in {} scanned file(s)", sources.len());
        return Ok(SyncReport::no_changes());
    }
    tracing::info!(
        "found {} diagram block(s) in {} file(s)",
        blocks.len(),
        sources.len()
    );

    let base_commit = event.base_commit().ok_or(ConfigError::MissingBaseCommit)?;
    sync_blocks(&blocks, base_commit, &target, renderer, store, config)
}
