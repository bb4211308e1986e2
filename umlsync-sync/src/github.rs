//! [`ObjectStore`] over the GitHub REST API (Git database + contents endpoints).

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use umlsync_core::{GitRef, ObjectHash, RepoSlug, Token, TreeEntry};
use umlsync_renderer::truncate_body;

use crate::error::StoreError;
use crate::store::{ExistingObject, ObjectStore};

/// Public GitHub API root.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct BlobRequest<'a> {
    content: &'a str,
    encoding: &'static str,
}

#[derive(Serialize)]
struct TreeRequest<'a> {
    base_tree: &'a ObjectHash,
    tree: &'a [TreeEntry],
}

#[derive(Serialize)]
struct CommitRequest<'a> {
    message: &'a str,
    tree: &'a ObjectHash,
    parents: [&'a ObjectHash; 1],
}

#[derive(Serialize)]
struct RefRequest<'a> {
    sha: &'a ObjectHash,
    force: bool,
}

#[derive(Deserialize)]
struct ShaResponse {
    sha: ObjectHash,
}

#[derive(Deserialize)]
struct CommitResponse {
    tree: ShaResponse,
}

/// `GET contents/{path}` answers with an array for directories and an object
/// for everything else.
#[derive(Deserialize)]
#[serde(untagged)]
enum ContentsResponse {
    Listing(Vec<serde_json::Value>),
    Entry {
        #[serde(rename = "type")]
        kind: String,
        sha: ObjectHash,
    },
}

// ---------------------------------------------------------------------------
// GitHubStore
// ---------------------------------------------------------------------------

/// Authenticated client for one API root. No retries; every non-success
/// status becomes a [`StoreError`].
pub struct GitHubStore {
    api_url: String,
    token: Token,
    agent: ureq::Agent,
}

impl GitHubStore {
    pub fn new(api_url: impl Into<String>, token: Token) -> Self {
        let agent = ureq::AgentBuilder::new()
            .user_agent(concat!("umlsync/", env!("CARGO_PKG_VERSION")))
            .build();
        Self {
            api_url: api_url.into().trim_end_matches('/').to_string(),
            token,
            agent,
        }
    }

    fn url(&self, repo: &RepoSlug, tail: &str) -> String {
        format!(
            "{}/repos/{}/{}/{}",
            self.api_url,
            encode_segment(&repo.owner),
            encode_segment(&repo.name),
            tail
        )
    }

    fn request(&self, method: &str, url: &str) -> ureq::Request {
        self.agent
            .request(method, url)
            .set("Authorization", &format!("Bearer {}", self.token.expose()))
            .set("Accept", "application/vnd.github+json")
            .set("X-GitHub-Api-Version", "2022-11-28")
    }

    fn send_json<B: Serialize, T: DeserializeOwned>(
        &self,
        op: &'static str,
        method: &str,
        url: &str,
        body: &B,
    ) -> Result<T, StoreError> {
        tracing::debug!("{op}: {method} {url}");
        let response = self
            .request(method, url)
            .send_json(body)
            .map_err(|err| store_error(op, err))?;
        response
            .into_json()
            .map_err(|source| StoreError::Decode { op, source })
    }
}

impl ObjectStore for GitHubStore {
    fn create_blob(&self, repo: &RepoSlug, content: &[u8]) -> Result<ObjectHash, StoreError> {
        let text = std::str::from_utf8(content)
            .map_err(|_| StoreError::NonUtf8Blob { len: content.len() })?;
        let body = BlobRequest {
            content: text,
            encoding: "utf-8",
        };
        let created: ShaResponse =
            self.send_json("create blob", "POST", &self.url(repo, "git/blobs"), &body)?;
        Ok(created.sha)
    }

    fn object_at_path(
        &self,
        repo: &RepoSlug,
        git_ref: &GitRef,
        path: &str,
    ) -> Result<Option<ExistingObject>, StoreError> {
        const OP: &str = "look up path";
        let url = self.url(repo, &format!("contents/{}", encode_path(path)));
        tracing::debug!("{OP}: GET {url}?ref={git_ref}");
        let response = match self.request("GET", &url).query("ref", git_ref.as_str()).call() {
            Ok(response) => response,
            Err(ureq::Error::Status(404, _)) => return Ok(None),
            Err(err) => return Err(store_error(OP, err)),
        };
        let contents: ContentsResponse = response
            .into_json()
            .map_err(|source| StoreError::Decode { op: OP, source })?;
        Ok(Some(match contents {
            ContentsResponse::Listing(_) => ExistingObject::Directory,
            ContentsResponse::Entry { kind, .. } if kind == "dir" || kind == "submodule" => {
                ExistingObject::Directory
            }
            ContentsResponse::Entry { sha, .. } => ExistingObject::Blob(sha),
        }))
    }

    fn commit_tree(&self, repo: &RepoSlug, commit: &ObjectHash) -> Result<ObjectHash, StoreError> {
        const OP: &str = "get commit";
        let url = self.url(repo, &format!("git/commits/{}", encode_segment(commit.as_str())));
        tracing::debug!("{OP}: GET {url}");
        let response = self
            .request("GET", &url)
            .call()
            .map_err(|err| store_error(OP, err))?;
        let commit: CommitResponse = response
            .into_json()
            .map_err(|source| StoreError::Decode { op: OP, source })?;
        Ok(commit.tree.sha)
    }

    fn create_tree(
        &self,
        repo: &RepoSlug,
        base_tree: &ObjectHash,
        entries: &[TreeEntry],
    ) -> Result<ObjectHash, StoreError> {
        let body = TreeRequest {
            base_tree,
            tree: entries,
        };
        let created: ShaResponse =
            self.send_json("create tree", "POST", &self.url(repo, "git/trees"), &body)?;
        Ok(created.sha)
    }

    fn create_commit(
        &self,
        repo: &RepoSlug,
        message: &str,
        parent: &ObjectHash,
        tree: &ObjectHash,
    ) -> Result<ObjectHash, StoreError> {
        let body = CommitRequest {
            message,
            tree,
            parents: [parent],
        };
        let created: ShaResponse =
            self.send_json("create commit", "POST", &self.url(repo, "git/commits"), &body)?;
        Ok(created.sha)
    }

    fn update_ref(
        &self,
        repo: &RepoSlug,
        git_ref: &GitRef,
        commit: &ObjectHash,
    ) -> Result<(), StoreError> {
        let url = self.url(repo, &format!("git/refs/{}", encode_path(git_ref.short())));
        let body = RefRequest {
            sha: commit,
            force: false,
        };
        let _: serde_json::Value = self.send_json("update ref", "PATCH", &url, &body)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn store_error(op: &'static str, err: ureq::Error) -> StoreError {
    match err {
        ureq::Error::Status(status, response) => StoreError::Status {
            op,
            status,
            body: truncate_body(response.into_string().unwrap_or_default()),
        },
        ureq::Error::Transport(transport) => StoreError::Transport {
            op,
            message: transport.to_string(),
        },
    }
}

/// Percent-encode one URL path segment (RFC 3986 unreserved characters pass).
fn encode_segment(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    for byte in segment.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

/// Percent-encode each `/`-separated segment, keeping the separators.
fn encode_path(path: &str) -> String {
    path.split('/').map(encode_segment).collect::<Vec<_>>().join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> GitHubStore {
        let token = Token::require(Some("t".to_string())).unwrap();
        GitHubStore::new("https://ghe.example.com/api/v3/", token)
    }

    #[test]
    fn url_joins_api_root_and_repo() {
        let url = store().url(&RepoSlug::new("octo", "docs"), "git/blobs");
        assert_eq!(url, "https://ghe.example.com/api/v3/repos/octo/docs/git/blobs");
    }

    #[test]
    fn path_encoding_keeps_separators() {
        assert_eq!(encode_path("docs/flow.svg"), "docs/flow.svg");
        assert_eq!(encode_path("docs/my flow#1.svg"), "docs/my%20flow%231.svg");
        assert_eq!(encode_path("diagrams/é.svg"), "diagrams/%C3%A9.svg");
    }

    #[test]
    fn tree_request_shape() {
        let entries = vec![TreeEntry::blob(
            umlsync_core::OutputTarget::new("docs/flow.svg"),
            ObjectHash::from("b1"),
        )];
        let base = ObjectHash::from("t0");
        let json = serde_json::to_value(TreeRequest {
            base_tree: &base,
            tree: &entries,
        })
        .unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "base_tree": "t0",
                "tree": [{"path": "docs/flow.svg", "mode": "100644", "type": "blob", "sha": "b1"}],
            })
        );
    }

    #[test]
    fn commit_request_has_single_parent() {
        let (tree, parent) = (ObjectHash::from("t1"), ObjectHash::from("p1"));
        let json = serde_json::to_value(CommitRequest {
            message: "Render PlantUML diagrams",
            tree: &tree,
            parents: [&parent],
        })
        .unwrap();
        assert_eq!(json["parents"], serde_json::json!(["p1"]));
        assert_eq!(json["tree"], "t1");
    }

    #[test]
    fn contents_response_variants() {
        let dir: ContentsResponse = serde_json::from_str(r#"[{"type":"file","sha":"x"}]"#).unwrap();
        assert!(matches!(dir, ContentsResponse::Listing(_)));

        let file: ContentsResponse =
            serde_json::from_str(r#"{"type":"file","sha":"abc","name":"flow.svg","size":12}"#).unwrap();
        assert!(matches!(file, ContentsResponse::Entry { ref kind, .. } if kind == "file"));
    }
}
