//! Output path resolution: template + block → repository path of the `.svg`.

use umlsync_core::{DiagramBlock, OutputTarget, OutputTemplate};

/// Extension of every rendered artifact.
pub const ARTIFACT_EXTENSION: &str = "svg";

/// Compose the artifact path for `block` under `template`.
pub fn resolve(template: &OutputTemplate, block: &DiagramBlock) -> OutputTarget {
    let dir = match template {
        OutputTemplate::Absolute(dir) => dir.clone(),
        OutputTemplate::SourceDir => block.source_dir.clone(),
        OutputTemplate::Relative(dir) => format!("{}/{}", block.source_dir, dir),
    };
    let file = format!("{}.{ARTIFACT_EXTENSION}", block.base_name);
    OutputTarget::new(normalize(&format!("{dir}/{file}")))
}

/// Drop empty and `.` segments; `..` pops the previous segment and is
/// dropped when there is none to pop.
fn normalize(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    segments.join("/")
}
