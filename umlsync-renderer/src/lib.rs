//! # umlsync-renderer
//!
//! Turns diagram source text into image bytes.
//!
//! [`Renderer`] is the seam the sync engine depends on; [`PlantUmlServer`]
//! implements it against a PlantUML server's `/svg/{encoded}` endpoint.
//!
//! ```rust,no_run
//! use umlsync_renderer::{PlantUmlServer, Renderer};
//!
//! let server = PlantUmlServer::new("https://www.plantuml.com/plantuml");
//! match server.render("Alice -> Bob: hello\n") {
//!     Ok(svg) => println!("{} bytes", svg.len()),
//!     Err(err) => eprintln!("render failed: {err}"),
//! }
//! ```

pub mod encoding;
pub mod engine;
pub mod error;
pub mod server;

pub use engine::{wrap_source, Renderer};
pub use error::{truncate_body, RenderError, MAX_ERROR_BODY};
pub use server::{PlantUmlServer, DEFAULT_SERVER_URL};
