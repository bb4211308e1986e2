//! Marker scanning.
//!
//! Markers are matched per line: the trimmed line must start with the marker
//! (ASCII case-insensitive) and the marker must be followed by whitespace or
//! the end of the line, so `@startuml flow` opens a block but
//! `@startumlx` does not.
//!
//! Blocks do not nest. Once a block is open, further start markers are plain
//! content and the first end marker closes it. End markers outside a block
//! are ignored, and a block that is never closed emits nothing.
//!
//! Artifacts are named after the containing file; a name after the start
//! marker is ignored. Every block of a file therefore maps to the same
//! `<file>.svg`, and only the first block that renders produces an artifact.

use umlsync_core::DiagramBlock;

use crate::sources::SourceFile;

pub const START_MARKER: &str = "@startuml";
pub const END_MARKER: &str = "@enduml";

/// Extract blocks from every file, in file order then document order.
pub fn extract(files: &[SourceFile]) -> Vec<DiagramBlock> {
    files
        .iter()
        .flat_map(|file| extract_file(&file.path, &file.contents))
        .collect()
}

/// Extract the blocks of one file. `path` is repository-relative.
pub fn extract_file(path: &str, text: &str) -> Vec<DiagramBlock> {
    let (source_dir, base_name) = split_repo_path(path);
    let mut blocks = Vec::new();

    // Byte offset where the open block's code starts.
    let mut open: Option<usize> = None;
    let mut offset = 0;
    for line in text.split_inclusive('\n') {
        let line_start = offset;
        offset += line.len();
        match open {
            None if is_marker(line, START_MARKER) => open = Some(offset),
            Some(code_start) if is_marker(line, END_MARKER) => {
                blocks.push(DiagramBlock {
                    source_dir: source_dir.clone(),
                    base_name: base_name.clone(),
                    code: text[code_start..line_start].to_string(),
                });
                open = None;
            }
            _ => {}
        }
    }

    if open.is_some() {
        tracing::debug!("unterminated {START_MARKER} block in {path}; ignored");
    }
    blocks
}

fn is_marker(line: &str, marker: &str) -> bool {
    let trimmed = line.trim();
    let Some(head) = trimmed.get(..marker.len()) else {
        return false;
    };
    if !head.eq_ignore_ascii_case(marker) {
        return false;
    }
    trimmed[marker.len()..]
        .chars()
        .next()
        .map_or(true, char::is_whitespace)
}

/// `docs/flow.md` → (`docs`, `flow`); `README.md` → (``, `README`).
fn split_repo_path(path: &str) -> (String, String) {
    let (dir, file) = match path.rfind('/') {
        Some(i) => (&path[..i], &path[i + 1..]),
        None => ("", path),
    };
    let base = match file.rfind('.') {
        Some(i) if i > 0 => &file[..i],
        _ => file,
    };
    (dir.to_string(), base.to_string())
}
