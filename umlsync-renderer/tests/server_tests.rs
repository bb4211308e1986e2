//! `PlantUmlServer` against a one-shot local HTTP responder.

use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::thread::{self, JoinHandle};

use umlsync_renderer::{encoding, PlantUmlServer, RenderError, Renderer};

/// Serve exactly one request with `status` and `body`; returns the request
/// line the client sent.
fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let base = format!("http://{}", listener.local_addr().expect("addr"));
    let handle = thread::spawn(move || {
        let (stream, _) = listener.accept().expect("accept");
        let mut reader = BufReader::new(stream.try_clone().expect("clone"));
        let mut request_line = String::new();
        reader.read_line(&mut request_line).expect("read request line");
        loop {
            let mut header = String::new();
            reader.read_line(&mut header).expect("read header");
            if header == "\r\n" || header.is_empty() {
                break;
            }
        }
        let mut stream = stream;
        write!(
            stream,
            "HTTP/1.1 {status}\r\nContent-Type: image/svg+xml\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        )
        .expect("write response");
        request_line
    });
    (base, handle)
}

#[test]
fn success_returns_body_bytes() {
    let (base, handle) = serve_once("200 OK", "<svg>ok</svg>");
    let server = PlantUmlServer::new(format!("{base}/plantuml"));

    let image = server.render("Alice -> Bob\n").expect("render");
    assert_eq!(image, b"<svg>ok</svg>");

    let request_line = handle.join().expect("server thread");
    let encoded = encoding::encode("@startuml\nAlice -> Bob\n@enduml\n").expect("encode");
    assert_eq!(request_line.trim_end(), format!("GET /plantuml/svg/{encoded} HTTP/1.1"));
}

#[test]
fn non_success_status_is_a_render_failure() {
    let (base, handle) = serve_once("400 Bad Request", "Syntax Error?");
    let server = PlantUmlServer::new(base);

    let err = server.render("this is not plantuml\n").unwrap_err();
    match err {
        RenderError::Status { status, body } => {
            assert_eq!(status, 400);
            assert_eq!(body, "Syntax Error?");
        }
        other => panic!("expected status error, got {other:?}"),
    }
    handle.join().expect("server thread");
}
