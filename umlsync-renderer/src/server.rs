//! HTTP renderer backed by a PlantUML server.

use std::io::Read;

use crate::encoding;
use crate::engine::{wrap_source, Renderer};
use crate::error::{truncate_body, RenderError};

/// Public PlantUML server.
pub const DEFAULT_SERVER_URL: &str = "https://www.plantuml.com/plantuml";

/// Renders SVG through `GET {base_url}/svg/{encoded}`.
///
/// No retries and no timeout beyond the HTTP agent's defaults.
pub struct PlantUmlServer {
    base_url: String,
    agent: ureq::Agent,
}

impl PlantUmlServer {
    pub fn new(base_url: impl Into<String>) -> Self {
        let agent = ureq::AgentBuilder::new()
            .user_agent(concat!("umlsync/", env!("CARGO_PKG_VERSION")))
            .build();
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            agent,
        }
    }

    /// Request URL for a block of diagram code.
    pub fn svg_url(&self, code: &str) -> Result<String, RenderError> {
        let encoded = encoding::encode(&wrap_source(code))?;
        Ok(format!("{}/svg/{}", self.base_url, encoded))
    }
}

impl Default for PlantUmlServer {
    fn default() -> Self {
        Self::new(DEFAULT_SERVER_URL)
    }
}

impl Renderer for PlantUmlServer {
    fn render(&self, source: &str) -> Result<Vec<u8>, RenderError> {
        let url = self.svg_url(source)?;
        tracing::debug!("rendering via {url}");
        match self.agent.get(&url).call() {
            Ok(response) => {
                let mut image = Vec::new();
                response
                    .into_reader()
                    .read_to_end(&mut image)
                    .map_err(RenderError::Body)?;
                Ok(image)
            }
            Err(ureq::Error::Status(status, response)) => {
                Err(RenderError::Status {
                    status,
                    body: truncate_body(response.into_string().unwrap_or_default()),
                })
            }
            Err(ureq::Error::Transport(transport)) => {
                Err(RenderError::Transport(transport.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn svg_url_uses_base_and_encoding() {
        let server = PlantUmlServer::new("http://localhost:8080/plantuml/");
        let url = server.svg_url("A -> B\n").unwrap();
        let expected = encoding::encode("@startuml\nA -> B\n@enduml\n").unwrap();
        assert_eq!(url, format!("http://localhost:8080/plantuml/svg/{expected}"));
    }

    #[test]
    fn unreachable_server_is_a_transport_error() {
        // Port 9 (discard) on localhost is closed on any sane test machine.
        let server = PlantUmlServer::new("http://127.0.0.1:9");
        let err = server.render("A -> B\n").unwrap_err();
        assert!(matches!(err, RenderError::Transport(_)), "got: {err}");
    }
}
