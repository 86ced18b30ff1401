//! Editor Host Contract
//!
//! The handful of buffer operations the output synchronizer needs from
//! whatever editor is hosting it, plus an in-memory host.

use std::ops::Range;
use std::path::{Path, PathBuf};

/// An open document as reported by the host
#[derive(Debug, Clone, PartialEq)]
pub struct OpenDocument<Id> {
    pub id: Id,
    pub path: Option<PathBuf>,
}

/// Buffer operations required from the hosting editor.
///
/// Positions are whole lines: `set_text_in_range(doc, 2..4, text)` replaces
/// everything from the start of line 2 up to the start of line 4.
pub trait EditorHost {
    type DocumentId: Clone;

    /// All open documents, in host order
    fn open_documents(&self) -> Vec<OpenDocument<Self::DocumentId>>;

    /// Line sequence of a document, without line terminators
    fn lines(&self, doc: &Self::DocumentId) -> Vec<String>;

    /// Replace the span `lines.start..lines.end` with `text`
    fn set_text_in_range(&mut self, doc: &Self::DocumentId, lines: Range<usize>, text: &str);

    /// Insert `text` at the start of `line`
    fn insert(&mut self, doc: &Self::DocumentId, line: usize, text: &str);
}

/// Host keeping every document as a vector of lines.
#[derive(Debug, Default, Clone)]
pub struct MemoryHost {
    documents: Vec<(PathBuf, Vec<String>)>,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a document and return its id
    pub fn open<P, I, S>(&mut self, path: P, lines: I) -> usize
    where
        P: Into<PathBuf>,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.documents
            .push((path.into(), lines.into_iter().map(Into::into).collect()));
        self.documents.len() - 1
    }

    /// Lines of the first document opened at `path`
    pub fn document(&self, path: &Path) -> Option<&[String]> {
        self.documents
            .iter()
            .find(|(p, _)| p == path)
            .map(|(_, lines)| lines.as_slice())
    }

    /// Lines of the document with the given id
    pub fn lines_of(&self, id: usize) -> &[String] {
        self.documents
            .get(id)
            .map(|(_, lines)| lines.as_slice())
            .unwrap_or_default()
    }
}

impl EditorHost for MemoryHost {
    type DocumentId = usize;

    fn open_documents(&self) -> Vec<OpenDocument<usize>> {
        self.documents
            .iter()
            .enumerate()
            .map(|(id, (path, _))| OpenDocument {
                id,
                path: Some(path.clone()),
            })
            .collect()
    }

    fn lines(&self, doc: &usize) -> Vec<String> {
        self.lines_of(*doc).to_vec()
    }

    fn set_text_in_range(&mut self, doc: &usize, lines: Range<usize>, text: &str) {
        if let Some((_, buffer)) = self.documents.get_mut(*doc) {
            splice_lines(buffer, lines, text);
        }
    }

    fn insert(&mut self, doc: &usize, line: usize, text: &str) {
        self.set_text_in_range(doc, line..line, text);
    }
}

/// Replace the line span `range` of `buffer` with `text`.
///
/// A `text` that does not end in a newline is joined to the line at
/// `range.end`, the way an editor splices text at a position.
pub fn splice_lines(buffer: &mut Vec<String>, range: Range<usize>, text: &str) {
    let len = buffer.len();
    let start = range.start.min(len);
    let end = range.end.clamp(start, len);

    let mut pieces: Vec<String> = text.split('\n').map(str::to_string).collect();
    let last = pieces.pop().unwrap_or_default();

    if end < len {
        let joined = format!("{}{}", last, buffer[end]);
        pieces.push(joined);
        buffer.splice(start..=end, pieces);
    } else {
        if !last.is_empty() {
            pieces.push(last);
        }
        buffer.splice(start..end, pieces);
    }
}
