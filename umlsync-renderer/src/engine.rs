//! The rendering seam.

use crate::error::RenderError;

/// Converts diagram source (the text between the markers) into image bytes.
///
/// Implementations report every failure as a [`RenderError`]; callers decide
/// whether a failure is fatal.
pub trait Renderer {
    fn render(&self, source: &str) -> Result<Vec<u8>, RenderError>;
}

impl<R: Renderer + ?Sized> Renderer for &R {
    fn render(&self, source: &str) -> Result<Vec<u8>, RenderError> {
        (**self).render(source)
    }
}

impl<R: Renderer + ?Sized> Renderer for Box<R> {
    fn render(&self, source: &str) -> Result<Vec<u8>, RenderError> {
        (**self).render(source)
    }
}

/// Put the markers back around extracted code so the service sees a complete
/// diagram document.
pub fn wrap_source(code: &str) -> String {
    let mut doc = String::with_capacity(code.len() + 20);
    doc.push_str("@startuml\n");
    doc.push_str(code);
    if !code.is_empty() && !code.ends_with('\n') {
        doc.push('\n');
    }
    doc.push_str("@enduml\n");
    doc
}
