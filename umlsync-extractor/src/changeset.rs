//! Change-set resolution across the commits of one push.

use std::collections::HashSet;

use umlsync_core::Commit;

/// Added and modified paths of every commit, deduplicated, first-seen order.
///
/// Within a commit, added paths come before modified ones. Removed paths never
/// contribute; a path removed by a later commit of the same push is still
/// returned, and the content fetch skips it when the file is gone.
pub fn changed_paths(commits: &[Commit]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut paths = Vec::new();
    for commit in commits {
        for path in commit.added.iter().chain(commit.modified.iter()) {
            if seen.insert(path.as_str()) {
                paths.push(path.clone());
            }
        }
    }
    paths
}
