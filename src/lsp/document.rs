use std::ops::Range;

use tower_lsp::lsp_types::{Position, Range as LspRange, TextEdit};

/// State for each open document
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentState {
    pub content: String,
    pub version: i32,
}

impl DocumentState {
    pub fn new(content: String, version: i32) -> Self {
        Self { content, version }
    }

    pub fn lines(&self) -> Vec<String> {
        self.content.lines().map(str::to_string).collect()
    }

    pub fn line_count(&self) -> usize {
        self.content.lines().count()
    }

    /// Line terminator used by the document, `\r\n` when its first line
    /// ends that way
    pub fn line_ending(&self) -> &'static str {
        match self.content.find('\n') {
            Some(i) if self.content[..i].ends_with('\r') => "\r\n",
            _ => "\n",
        }
    }

    /// `text` with its newlines converted to the document's line ending
    pub fn with_line_ending(&self, text: &str) -> String {
        match self.line_ending() {
            "\n" => text.to_string(),
            ending => text.replace("\r\n", "\n").replace('\n', ending),
        }
    }

    /// Byte offset of the start of `line`, or the end of the content
    fn line_offset(&self, line: usize) -> usize {
        if line == 0 {
            return 0;
        }
        self.content
            .match_indices('\n')
            .nth(line - 1)
            .map(|(i, _)| i + 1)
            .unwrap_or(self.content.len())
    }

    /// Byte offset of an LSP position (UTF-16 columns)
    pub fn offset_at(&self, position: Position) -> usize {
        let start = self.line_offset(position.line as usize);
        let rest = &self.content[start..];
        let line = rest.split('\n').next().unwrap_or("");

        let mut units = 0;
        for (i, c) in line.char_indices() {
            if units >= position.character as usize {
                return start + i;
            }
            units += c.len_utf16();
        }
        start + line.len()
    }

    /// Position just past the last character
    fn end_position(&self) -> Position {
        let last_line = self.content.rsplit('\n').next().unwrap_or("");
        let line = self.content.matches('\n').count();
        Position::new(line as u32, last_line.encode_utf16().count() as u32)
    }

    /// Edit replacing whole lines `lines` with `text`.
    ///
    /// Text inserted past the last line of a document that does not end
    /// in a newline starts on a line of its own.
    pub fn line_edit(&self, lines: Range<usize>, text: &str) -> TextEdit {
        let needs_break = !self.content.is_empty() && !self.content.ends_with('\n');
        let text = self.with_line_ending(text);

        if lines.start >= self.line_count() && needs_break {
            let end = self.end_position();
            let text = format!("{}{}", self.line_ending(), text);
            return TextEdit::new(LspRange::new(end, end), text);
        }

        let start = Position::new(lines.start as u32, 0);
        let end = if lines.end >= self.line_count() && needs_break {
            self.end_position()
        } else {
            Position::new(lines.end as u32, 0)
        };
        TextEdit::new(LspRange::new(start, end), text)
    }

    /// Apply an edit to the content
    pub fn apply(&mut self, edit: &TextEdit) {
        let start = self.offset_at(edit.range.start);
        let end = self.offset_at(edit.range.end).max(start);
        self.content.replace_range(start..end, &edit.new_text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offsets() {
        let doc = DocumentState::new("ab\ncd\n".to_string(), 1);
        assert_eq!(doc.offset_at(Position::new(0, 0)), 0);
        assert_eq!(doc.offset_at(Position::new(1, 1)), 4);
        assert_eq!(doc.offset_at(Position::new(2, 0)), 6);
        assert_eq!(doc.offset_at(Position::new(9, 0)), 6);
    }

    #[test]
    fn test_utf16_columns() {
        let doc = DocumentState::new("é😀x".to_string(), 1);
        // é is one UTF-16 unit, 😀 is two
        assert_eq!(doc.offset_at(Position::new(0, 3)), "é😀".len());
    }

    #[test]
    fn test_line_edit_replaces_whole_lines() {
        let mut doc = DocumentState::new("a\nb\nc\n".to_string(), 1);
        let edit = doc.line_edit(1..2, "x\n");
        doc.apply(&edit);
        assert_eq!(doc.content, "a\nx\nc\n");
    }

    #[test]
    fn test_crlf_documents_keep_their_line_ending() {
        let mut doc = DocumentState::new("a\r\nb\r\n".to_string(), 1);
        assert_eq!(doc.line_ending(), "\r\n");
        assert_eq!(doc.lines(), vec!["a", "b"]);

        let edit = doc.line_edit(1..1, "x\n\ny\n");
        doc.apply(&edit);
        assert_eq!(doc.content, "a\r\nx\r\n\r\ny\r\nb\r\n");

        let mut doc = DocumentState::new("a\r\nb".to_string(), 1);
        let edit = doc.line_edit(2..2, "x\n");
        doc.apply(&edit);
        assert_eq!(doc.content, "a\r\nb\r\nx\r\n");
    }

    #[test]
    fn test_insert_after_unterminated_last_line() {
        let mut doc = DocumentState::new("```".to_string(), 1);
        let edit = doc.line_edit(1..1, "out\n");
        assert_eq!(edit.range.start, Position::new(0, 3));
        doc.apply(&edit);
        assert_eq!(doc.content, "```\nout\n");
    }
}
