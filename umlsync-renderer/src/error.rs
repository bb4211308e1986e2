//! Error types for umlsync-renderer.

use thiserror::Error;

/// All errors that can arise from rendering one diagram.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Compressing the source text for the request URL failed.
    #[error("failed to encode diagram source: {0}")]
    Encode(#[source] std::io::Error),

    /// The rendering service answered with a non-success status.
    #[error("rendering service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The request never produced a response (DNS, TLS, connection reset…).
    #[error("rendering service unreachable: {0}")]
    Transport(String),

    /// The response body could not be read.
    #[error("failed to read rendered image: {0}")]
    Body(#[source] std::io::Error),
}

/// Error bodies are cut to this many characters before they reach logs.
pub const MAX_ERROR_BODY: usize = 200;

/// Cut a service's error body down to [`MAX_ERROR_BODY`] characters.
pub fn truncate_body(body: String) -> String {
    if body.chars().count() <= MAX_ERROR_BODY {
        return body;
    }
    body.chars().take(MAX_ERROR_BODY).collect()
}
