//! Output-block synchronization.
//!
//! When the engine reports that chunk N produced a result, the block
//! between the output sentinels that follows chunk N is created or has its
//! interior replaced. Unchanged output leaves the buffer untouched, so a
//! re-render triggered by our own edit does not loop.

use std::ops::Range;
use std::path::Path;

use super::marker::locate_chunk;
use crate::host::EditorHost;

/// Opening sentinel of an output block
pub const OUTPUT_OPEN: &str = "<!-- code_chunk_output -->";
/// Closing sentinel of an output block
pub const OUTPUT_CLOSE: &str = "<!-- /code_chunk_output -->";

/// Lines after a chunk searched for an existing opening sentinel
const LOOKAHEAD: usize = 5;

/// A line-based edit to a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceEdit {
    /// Replace the whole lines in `lines` with `text`
    Replace { lines: Range<usize>, text: String },
    /// Insert `text` at the start of `line`
    Insert { line: usize, text: String },
}

/// Compute the edit that brings the output of chunk `ordinal` up to date.
///
/// `None` means the buffer already holds `result`, or the chunk cannot be
/// found (a stale result), or its output block is unterminated.
pub fn plan_output_edit<S: AsRef<str>>(
    lines: &[S],
    ordinal: usize,
    result: &str,
) -> Option<SourceEdit> {
    let Some(anchor) = locate_chunk(lines, ordinal) else {
        log::debug!("code chunk {} not found, ignoring result", ordinal);
        return None;
    };

    let after = anchor.anchor_line + 1;
    let window_end = (after + LOOKAHEAD).min(lines.len());
    let existing = (after..window_end).find(|&j| lines[j].as_ref().starts_with(OUTPUT_OPEN));

    let Some(start) = existing else {
        return Some(SourceEdit::Insert {
            line: after,
            text: format!("{OUTPUT_OPEN}\n\n{result}\n\n{OUTPUT_CLOSE}\n"),
        });
    };

    let Some(end) =
        (start + 1..lines.len()).find(|&j| lines[j].as_ref().starts_with(OUTPUT_CLOSE))
    else {
        log::warn!(
            "output block of code chunk {} at line {} is not closed, leaving it alone",
            ordinal,
            start + 1
        );
        return None;
    };

    // The padding lines after the opener and before the closer are missing.
    if end < start + 3 {
        return Some(SourceEdit::Replace {
            lines: start + 1..end,
            text: format!("\n{result}\n\n"),
        });
    }

    let body = start + 2..end - 1;
    let current: String = lines[body.clone()]
        .iter()
        .map(|line| format!("{}\n", line.as_ref()))
        .collect();
    let expected = format!("{result}\n");

    if current == expected {
        return None;
    }

    Some(SourceEdit::Replace {
        lines: body,
        text: expected,
    })
}

/// Handle a `modify_source` event from the engine.
///
/// Patches the first open document at `path`. Always acknowledges with an
/// empty string, whether or not anything was edited.
pub fn modify_source<H: EditorHost>(
    host: &mut H,
    path: &Path,
    ordinal: usize,
    result: &str,
) -> String {
    let Some(doc) = host
        .open_documents()
        .into_iter()
        .find(|doc| doc.path.as_deref() == Some(path))
    else {
        log::debug!("no open document at {}", path.display());
        return String::new();
    };

    let lines = host.lines(&doc.id);
    match plan_output_edit(&lines, ordinal, result) {
        Some(SourceEdit::Replace { lines, text }) => {
            log::debug!("replacing output of chunk {} in {}", ordinal, path.display());
            host.set_text_in_range(&doc.id, lines, &text);
        }
        Some(SourceEdit::Insert { line, text }) => {
            log::debug!("creating output of chunk {} in {}", ordinal, path.display());
            host.insert(&doc.id, line, &text);
        }
        None => {}
    }

    String::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk_with_output_at(gap: usize) -> Vec<String> {
        let mut lines = vec!["```js {cmd=true}".to_string(), "1+1".into(), "```".into()];
        lines.extend(std::iter::repeat_n(String::new(), gap));
        lines.extend([
            OUTPUT_OPEN.to_string(),
            String::new(),
            "old".into(),
            String::new(),
            OUTPUT_CLOSE.into(),
        ]);
        lines
    }

    #[test]
    fn test_insert_when_no_output_block() {
        let lines = ["```js {cmd=true}", "1+1", "```"];
        let edit = plan_output_edit(&lines, 0, "2");
        assert_eq!(
            edit,
            Some(SourceEdit::Insert {
                line: 3,
                text: "<!-- code_chunk_output -->\n\n2\n\n<!-- /code_chunk_output -->\n"
                    .to_string(),
            })
        );
    }

    #[test]
    fn test_sentinel_within_lookahead_is_reused() {
        // sentinel lands on anchor + 5
        let lines = chunk_with_output_at(4);
        let edit = plan_output_edit(&lines, 0, "new");
        assert_eq!(
            edit,
            Some(SourceEdit::Replace {
                lines: 9..10,
                text: "new\n".to_string(),
            })
        );
    }

    #[test]
    fn test_sentinel_beyond_lookahead_is_ignored() {
        // sentinel lands on anchor + 6
        let lines = chunk_with_output_at(5);
        let edit = plan_output_edit(&lines, 0, "new");
        assert!(matches!(edit, Some(SourceEdit::Insert { line: 3, .. })));
    }

    #[test]
    fn test_unchanged_output_plans_nothing() {
        let lines = chunk_with_output_at(0);
        assert_eq!(plan_output_edit(&lines, 0, "old"), None);
    }

    #[test]
    fn test_multiline_result_compares_whole_interior() {
        let lines = [
            "@import \"run.sh\" {cmd=bash}",
            OUTPUT_OPEN,
            "",
            "a",
            "b",
            "",
            OUTPUT_CLOSE,
        ];
        assert_eq!(plan_output_edit(&lines, 0, "a\nb"), None);
        assert_eq!(
            plan_output_edit(&lines, 0, "a"),
            Some(SourceEdit::Replace {
                lines: 3..5,
                text: "a\n".to_string(),
            })
        );
    }

    #[test]
    fn test_unterminated_output_block_is_left_alone() {
        let lines = ["```js {cmd=true}", "1", "```", OUTPUT_OPEN, "", "stale"];
        assert_eq!(plan_output_edit(&lines, 0, "2"), None);
    }

    #[test]
    fn test_cramped_output_block_is_rewritten() {
        let lines = ["```js {cmd=true}", "1", "```", OUTPUT_OPEN, OUTPUT_CLOSE];
        assert_eq!(
            plan_output_edit(&lines, 0, "2"),
            Some(SourceEdit::Replace {
                lines: 4..4,
                text: "\n2\n\n".to_string(),
            })
        );
    }
}
