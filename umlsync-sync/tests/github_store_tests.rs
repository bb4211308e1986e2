//! `GitHubStore` against a scripted local HTTP responder.

use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::thread::{self, JoinHandle};

use umlsync_core::{GitRef, ObjectHash, OutputTarget, RepoSlug, Token, TreeEntry};
use umlsync_sync::{ExistingObject, GitHubStore, ObjectStore, StoreError};

#[derive(Debug)]
struct Recorded {
    request_line: String,
    authorization: Option<String>,
    body: String,
}

/// Answer one connection per scripted `(status, body)` pair, in order.
fn serve(script: Vec<(&'static str, &'static str)>) -> (String, JoinHandle<Vec<Recorded>>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let base = format!("http://{}", listener.local_addr().expect("addr"));
    let handle = thread::spawn(move || {
        let mut recorded = Vec::new();
        for (status, body) in script {
            let (stream, _) = listener.accept().expect("accept");
            let mut reader = BufReader::new(stream.try_clone().expect("clone"));
            let mut request_line = String::new();
            reader.read_line(&mut request_line).expect("request line");

            let mut content_length = 0usize;
            let mut authorization = None;
            loop {
                let mut header = String::new();
                reader.read_line(&mut header).expect("header");
                if header == "\r\n" || header.is_empty() {
                    break;
                }
                if let Some((name, value)) = header.split_once(':') {
                    let value = value.trim().to_string();
                    match name.to_ascii_lowercase().as_str() {
                        "content-length" => content_length = value.parse().expect("length"),
                        "authorization" => authorization = Some(value),
                        _ => {}
                    }
                }
            }
            let mut request_body = vec![0; content_length];
            reader.read_exact(&mut request_body).expect("body");

            let mut stream = stream;
            write!(
                stream,
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            )
            .expect("write response");

            recorded.push(Recorded {
                request_line: request_line.trim_end().to_string(),
                authorization,
                body: String::from_utf8(request_body).expect("utf-8 body"),
            });
        }
        recorded
    });
    (base, handle)
}

fn store(base: &str) -> GitHubStore {
    GitHubStore::new(base, Token::require(Some("ghs_test".to_string())).expect("token"))
}

fn repo() -> RepoSlug {
    RepoSlug::new("octo", "docs")
}

#[test]
fn create_blob_posts_utf8_content() {
    let (base, handle) = serve(vec![("201 Created", r#"{"sha":"b1","url":"x"}"#)]);

    let sha = store(&base).create_blob(&repo(), b"<svg/>").expect("blob");
    assert_eq!(sha, ObjectHash::from("b1"));

    let recorded = handle.join().expect("server");
    assert_eq!(recorded[0].request_line, "POST /repos/octo/docs/git/blobs HTTP/1.1");
    assert_eq!(recorded[0].authorization.as_deref(), Some("Bearer ghs_test"));
    let body: serde_json::Value = serde_json::from_str(&recorded[0].body).expect("json");
    assert_eq!(body, serde_json::json!({"content": "<svg/>", "encoding": "utf-8"}));
}

#[test]
fn non_utf8_blob_is_rejected_before_any_request() {
    let err = store("http://127.0.0.1:9")
        .create_blob(&repo(), &[0xff, 0xfe])
        .unwrap_err();
    assert!(matches!(err, StoreError::NonUtf8Blob { len: 2 }));
}

#[test]
fn lookup_maps_404_file_and_directory() {
    let (base, handle) = serve(vec![
        ("404 Not Found", r#"{"message":"Not Found"}"#),
        ("200 OK", r#"{"type":"file","sha":"abc","name":"flow.svg"}"#),
        ("200 OK", r#"[{"type":"file","sha":"x","name":"a.svg"}]"#),
    ]);
    let store = store(&base);
    let git_ref = GitRef::from("refs/heads/main");

    assert_eq!(store.object_at_path(&repo(), &git_ref, "docs/none.svg").unwrap(), None);
    assert_eq!(
        store.object_at_path(&repo(), &git_ref, "docs/flow.svg").unwrap(),
        Some(ExistingObject::Blob(ObjectHash::from("abc")))
    );
    assert_eq!(
        store.object_at_path(&repo(), &git_ref, "docs").unwrap(),
        Some(ExistingObject::Directory)
    );

    let recorded = handle.join().expect("server");
    assert_eq!(
        recorded[0].request_line,
        "GET /repos/octo/docs/contents/docs/none.svg?ref=refs%2Fheads%2Fmain HTTP/1.1"
    );
}

#[test]
fn commit_sequence_hits_git_database_endpoints() {
    let (base, handle) = serve(vec![
        ("200 OK", r#"{"sha":"c0","tree":{"sha":"t0"}}"#),
        ("201 Created", r#"{"sha":"t1"}"#),
        ("201 Created", r#"{"sha":"c1"}"#),
        ("200 OK", r#"{"ref":"refs/heads/main","object":{"sha":"c1"}}"#),
    ]);
    let store = store(&base);
    let entry = TreeEntry::blob(OutputTarget::new("docs/flow.svg"), ObjectHash::from("b1"));

    let base_tree = store.commit_tree(&repo(), &ObjectHash::from("c0")).unwrap();
    assert_eq!(base_tree, ObjectHash::from("t0"));
    let tree = store.create_tree(&repo(), &base_tree, &[entry]).unwrap();
    let commit = store
        .create_commit(&repo(), "Render PlantUML diagrams", &ObjectHash::from("c0"), &tree)
        .unwrap();
    store
        .update_ref(&repo(), &GitRef::from("refs/heads/main"), &commit)
        .unwrap();

    let recorded = handle.join().expect("server");
    let lines: Vec<&str> = recorded.iter().map(|r| r.request_line.as_str()).collect();
    assert_eq!(
        lines,
        [
            "GET /repos/octo/docs/git/commits/c0 HTTP/1.1",
            "POST /repos/octo/docs/git/trees HTTP/1.1",
            "POST /repos/octo/docs/git/commits HTTP/1.1",
            "PATCH /repos/octo/docs/git/refs/heads/main HTTP/1.1",
        ]
    );
    let update: serde_json::Value = serde_json::from_str(&recorded[3].body).expect("json");
    assert_eq!(update, serde_json::json!({"sha": "c1", "force": false}));
}

#[test]
fn error_status_carries_operation_and_body() {
    let (base, handle) = serve(vec![("422 Unprocessable Entity", r#"{"message":"Update is not a fast forward"}"#)]);

    let err = store(&base)
        .update_ref(&repo(), &GitRef::from("refs/heads/main"), &ObjectHash::from("c1"))
        .unwrap_err();
    match err {
        StoreError::Status { op, status, body } => {
            assert_eq!(op, "update ref");
            assert_eq!(status, 422);
            assert!(body.contains("fast forward"));
        }
        other => panic!("expected status error, got {other:?}"),
    }
    handle.join().expect("server");
}
