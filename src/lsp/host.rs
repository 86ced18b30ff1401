//! `EditorHost` over the documents mirrored from the client.
//!
//! Edits are applied to the mirror right away and collected so they can be
//! sent to the client as one `workspace/applyEdit`. The documents as they
//! were before are kept until the client answers, so a rejected edit can be
//! rolled back.

use std::collections::HashMap;
use std::ops::Range;

use tower_lsp::lsp_types::{TextEdit, Url, WorkspaceEdit};

use crate::host::{EditorHost, OpenDocument};
use crate::lsp::document::DocumentState;

/// Edits applied to the mirror that the client has not accepted yet
#[derive(Debug, Clone)]
pub struct PendingEdit {
    pub edit: WorkspaceEdit,
    originals: HashMap<Url, DocumentState>,
}

impl PendingEdit {
    /// A single edit to `uri`, made on top of `original`
    pub fn single(uri: Url, original: DocumentState, edit: TextEdit) -> Self {
        Self {
            edit: WorkspaceEdit::new(HashMap::from([(uri.clone(), vec![edit])])),
            originals: HashMap::from([(uri, original)]),
        }
    }

    /// Put back the documents as they were before the edit.
    ///
    /// Documents the client changed in the meantime already hold the
    /// client's text and are left alone. Returns how many were restored.
    pub fn restore(self, documents: &mut HashMap<Url, DocumentState>) -> usize {
        let mut restored = 0;
        for (uri, original) in self.originals {
            if let Some(current) = documents.get_mut(&uri) {
                if current.version == original.version {
                    *current = original;
                    restored += 1;
                }
            }
        }
        restored
    }
}

pub struct WorkspaceHost<'a> {
    documents: &'a mut HashMap<Url, DocumentState>,
    edits: HashMap<Url, Vec<TextEdit>>,
    originals: HashMap<Url, DocumentState>,
}

impl<'a> WorkspaceHost<'a> {
    pub fn new(documents: &'a mut HashMap<Url, DocumentState>) -> Self {
        Self {
            documents,
            edits: HashMap::new(),
            originals: HashMap::new(),
        }
    }

    /// The collected edits, if any
    pub fn into_pending_edit(self) -> Option<PendingEdit> {
        if self.edits.is_empty() {
            None
        } else {
            Some(PendingEdit {
                edit: WorkspaceEdit::new(self.edits),
                originals: self.originals,
            })
        }
    }
}

impl EditorHost for WorkspaceHost<'_> {
    type DocumentId = Url;

    fn open_documents(&self) -> Vec<OpenDocument<Url>> {
        let mut uris: Vec<&Url> = self.documents.keys().collect();
        uris.sort();
        uris.into_iter()
            .map(|uri| OpenDocument {
                id: uri.clone(),
                path: uri.to_file_path().ok(),
            })
            .collect()
    }

    fn lines(&self, doc: &Url) -> Vec<String> {
        self.documents
            .get(doc)
            .map(DocumentState::lines)
            .unwrap_or_default()
    }

    fn set_text_in_range(&mut self, doc: &Url, lines: Range<usize>, text: &str) {
        let Some(state) = self.documents.get_mut(doc) else {
            return;
        };
        let edit = state.line_edit(lines, text);
        self.originals
            .entry(doc.clone())
            .or_insert_with(|| state.clone());
        state.apply(&edit);
        self.edits.entry(doc.clone()).or_default().push(edit);
    }

    fn insert(&mut self, doc: &Url, line: usize, text: &str) {
        self.set_text_in_range(doc, line..line, text);
    }
}
