//! Push event payload.
//!
//! The runner hands the triggering event to the process as a JSON file
//! (`GITHUB_EVENT_PATH`). Only the fields a sync run consumes are modelled;
//! everything else in the document is ignored.
//!
//! ```text
//! {
//!   "ref": "refs/heads/main",
//!   "deleted": false,
//!   "repository": { "name": "docs", "owner": { "login": "octo" } },
//!   "commits": [ { "id": "…", "added": [], "modified": [], "removed": [] } ]
//! }
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::types::{GitRef, ObjectHash, PushTarget, RepoSlug};

// ---------------------------------------------------------------------------
// 1. Payload model
// ---------------------------------------------------------------------------

/// One commit of the push, in payload order.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Commit {
    pub id: ObjectHash,
    #[serde(default)]
    pub added: Vec<String>,
    #[serde(default)]
    pub modified: Vec<String>,
    #[serde(default)]
    pub removed: Vec<String>,
}

impl Commit {
    /// A commit with only modified paths.
    pub fn modified(id: &str, paths: &[&str]) -> Self {
        Self {
            id: ObjectHash::from(id),
            added: vec![],
            modified: paths.iter().map(|p| p.to_string()).collect(),
            removed: vec![],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RepositoryOwner {
    /// Set on events delivered by the hosting service.
    #[serde(default)]
    pub login: Option<String>,
    /// Set on legacy webhook payloads instead of `login`.
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Repository {
    pub name: String,
    pub owner: RepositoryOwner,
}

/// The subset of a `push` event a sync run needs.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PushEvent {
    #[serde(rename = "ref", default)]
    pub git_ref: Option<String>,
    #[serde(default)]
    pub repository: Option<Repository>,
    #[serde(default)]
    pub commits: Vec<Commit>,
    /// `true` when the push deleted the ref.
    #[serde(default)]
    pub deleted: bool,
}

// ---------------------------------------------------------------------------
// 2. Load
// ---------------------------------------------------------------------------

impl PushEvent {
    /// Read and parse the event document at `path`.
    ///
    /// Returns `ConfigError::EventIo` if the file cannot be read and
    /// `ConfigError::EventParse` (with serde's line/column context) if it is
    /// not a push event.
    pub fn load_at(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::EventIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&contents).map_err(|source| ConfigError::EventParse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    // -----------------------------------------------------------------------
    // 3. Accessors
    // -----------------------------------------------------------------------

    /// Repository and ref this push was on.
    pub fn target(&self) -> Result<PushTarget, ConfigError> {
        let repository = self.repository.as_ref().ok_or(ConfigError::MissingRepository)?;
        let owner = repository
            .owner
            .login
            .as_deref()
            .or(repository.owner.name.as_deref())
            .filter(|owner| !owner.is_empty())
            .ok_or(ConfigError::MissingRepository)?;
        if repository.name.is_empty() {
            return Err(ConfigError::MissingRepository);
        }
        let git_ref = self
            .git_ref
            .as_deref()
            .filter(|r| !r.is_empty())
            .ok_or(ConfigError::MissingRef)?;
        Ok(PushTarget {
            repo: RepoSlug::new(owner, repository.name.as_str()),
            git_ref: GitRef::from(git_ref),
        })
    }

    /// The most recent commit of the push: parent of the generated commit.
    pub fn base_commit(&self) -> Option<&ObjectHash> {
        self.commits.last().map(|c| &c.id)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const PUSH: &str = r#"{
        "ref": "refs/heads/main",
        "before": "0000000000000000000000000000000000000000",
        "repository": { "name": "docs", "owner": { "login": "octo", "id": 1 } },
        "commits": [
            { "id": "c1", "added": ["a.md"], "modified": [], "removed": [] },
            { "id": "c2", "modified": ["b.puml"] }
        ],
        "pusher": { "name": "octo" }
    }"#;

    #[test]
    fn parses_push_and_ignores_unknown_fields() {
        let event = PushEvent::from_json(PUSH).expect("parse");
        assert_eq!(event.commits.len(), 2);
        assert_eq!(event.commits[1].added, Vec::<String>::new());
        assert_eq!(event.commits[1].modified, vec!["b.puml".to_string()]);
        assert!(!event.deleted);
    }

    #[test]
    fn target_uses_owner_login_and_full_ref() {
        let event = PushEvent::from_json(PUSH).expect("parse");
        let target = event.target().expect("target");
        assert_eq!(target.repo, RepoSlug::new("octo", "docs"));
        assert_eq!(target.git_ref.as_str(), "refs/heads/main");
    }

    #[test]
    fn target_falls_back_to_owner_name() {
        let event = PushEvent::from_json(
            r#"{"ref":"refs/heads/dev","repository":{"name":"r","owner":{"name":"legacy"}}}"#,
        )
        .expect("parse");
        assert_eq!(event.target().expect("target").repo.owner, "legacy");
    }

    #[test]
    fn missing_repository_is_config_error() {
        let event = PushEvent::from_json(r#"{"ref":"refs/heads/main","commits":[]}"#).expect("parse");
        assert!(matches!(event.target(), Err(ConfigError::MissingRepository)));
    }

    #[test]
    fn missing_ref_is_config_error() {
        let event =
            PushEvent::from_json(r#"{"repository":{"name":"r","owner":{"login":"o"}}}"#).expect("parse");
        assert!(matches!(event.target(), Err(ConfigError::MissingRef)));
    }

    #[test]
    fn base_commit_is_last_commit() {
        let event = PushEvent::from_json(PUSH).expect("parse");
        assert_eq!(event.base_commit(), Some(&ObjectHash::from("c2")));

        let empty = PushEvent::from_json("{}").expect("parse");
        assert_eq!(empty.base_commit(), None);
    }
}
