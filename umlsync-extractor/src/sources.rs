//! Reading changed files from the checked-out workspace.

use std::io::ErrorKind;
use std::path::Path;

use crate::ExtractError;

/// Extensions (lowercase, without dot) of files that may hold diagram blocks:
/// PlantUML sources first, then Markdown.
///
/// Rendered `.svg` output embeds its own source, so it must never be listed
/// here.
pub const SCANNED_EXTENSIONS: &[&str] = &[
    "pu", "pml", "puml", "plantuml", "iuml", "wsd", //
    "md", "markdown", "mdown", "mkdn", "mkd", "mdwn",
];

/// A changed file's repository path and text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: String,
    pub contents: String,
}

impl SourceFile {
    pub fn new(path: impl Into<String>, contents: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            contents: contents.into(),
        }
    }
}

/// Whether `path` has one of the [`SCANNED_EXTENSIONS`].
pub fn is_scannable(path: &str) -> bool {
    let file = path.rsplit('/').next().unwrap_or(path);
    match file.rfind('.') {
        Some(i) if i > 0 => {
            let ext = file[i + 1..].to_ascii_lowercase();
            SCANNED_EXTENSIONS.contains(&ext.as_str())
        }
        _ => false,
    }
}

/// Read each scannable path below `workspace`, keeping input order.
///
/// Files that no longer exist or are not UTF-8 text are skipped. Any other
/// read failure is an error.
pub fn load_sources(workspace: &Path, paths: &[String]) -> Result<Vec<SourceFile>, ExtractError> {
    let mut files = Vec::new();
    for path in paths {
        if !is_scannable(path) {
            tracing::debug!("not a diagram source: {path}");
            continue;
        }
        let full = workspace.join(path);
        let bytes = match std::fs::read(&full) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                tracing::debug!("no longer present: {path}");
                continue;
            }
            Err(source) => return Err(ExtractError::Io { path: full, source }),
        };
        match String::from_utf8(bytes) {
            Ok(contents) => files.push(SourceFile::new(path.as_str(), contents)),
            Err(_) => tracing::debug!("not UTF-8, skipped: {path}"),
        }
    }
    Ok(files)
}
