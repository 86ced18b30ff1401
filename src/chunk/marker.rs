//! Code chunk marker detection.
//!
//! A chunk is either a fenced code block whose info string carries a `cmd`
//! attribute or an `@import` directive carrying one. Chunks have no
//! identity beyond their ordinal position in the document.

use std::sync::LazyLock;

use regex::Regex;

use super::output::OUTPUT_OPEN;

static FENCED_CHUNK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^```(.+)"?cmd"?\s*[=\s]"#).expect("valid fenced chunk regex"));

static IMPORT_CHUNK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"@import\s+(.+)"?cmd"?\s*[=\s]"#).expect("valid import chunk regex")
});

/// Kind of line that opens a code chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    /// ```` ```lang {cmd=...} ```` opener
    Fenced,
    /// `@import "file" {cmd=...}` directive
    Import,
}

/// Where a located chunk ends; output blocks are searched for after it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkAnchor {
    pub kind: MarkerKind,
    /// Line of the marker itself
    pub marker_line: usize,
    /// Closing fence for fenced chunks, the directive line for imports
    pub anchor_line: usize,
}

/// Classify a line as a chunk marker
pub fn classify(line: &str) -> Option<MarkerKind> {
    if FENCED_CHUNK.is_match(line) {
        Some(MarkerKind::Fenced)
    } else if IMPORT_CHUNK.is_match(line) {
        Some(MarkerKind::Import)
    } else {
        None
    }
}

fn is_closing_fence(line: &str) -> bool {
    line.starts_with("```")
}

/// Last line of the fenced chunk opened at `marker`.
///
/// An unclosed chunk runs up to its output block, or to the end of the
/// document when it has none yet.
fn fenced_chunk_end<S: AsRef<str>>(lines: &[S], marker: usize) -> usize {
    for (j, line) in lines.iter().enumerate().skip(marker + 1) {
        let line = line.as_ref();
        if is_closing_fence(line) {
            return j;
        }
        if line.starts_with(OUTPUT_OPEN) {
            return j - 1;
        }
    }
    lines.len() - 1
}

/// Find the chunk with the given ordinal.
///
/// Returns `None` when fewer chunks exist. A fenced chunk that is never
/// closed runs to the end of the document and anchors on its last line.
pub fn locate_chunk<S: AsRef<str>>(lines: &[S], ordinal: usize) -> Option<ChunkAnchor> {
    let mut seen = 0;

    for (i, line) in lines.iter().enumerate() {
        let Some(kind) = classify(line.as_ref()) else {
            continue;
        };

        if seen != ordinal {
            seen += 1;
            continue;
        }

        let anchor_line = match kind {
            MarkerKind::Fenced => fenced_chunk_end(lines, i),
            MarkerKind::Import => i,
        };

        return Some(ChunkAnchor {
            kind,
            marker_line: i,
            anchor_line,
        });
    }

    None
}
