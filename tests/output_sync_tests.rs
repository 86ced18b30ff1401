//! Integration tests for writing code chunk output back into documents
use std::path::Path;

use markdown_preview_ls::chunk::{OUTPUT_CLOSE, OUTPUT_OPEN};
use markdown_preview_ls::{modify_source, MemoryHost};
use pretty_assertions::assert_eq;

fn lines(raw: &[&str]) -> Vec<String> {
    raw.iter().map(|line| line.to_string()).collect()
}

fn three_chunks() -> Vec<String> {
    lines(&[
        "# Notes",
        "```js {cmd=true}",
        "console.log('first')",
        "```",
        "",
        "```python {cmd=true}",
        "print('second')",
        "```",
        "",
        "```bash {cmd=true}",
        "echo third",
        "```",
        "end",
    ])
}

#[test]
fn test_creates_output_block_after_chunk() {
    let mut host = MemoryHost::new();
    let doc = host.open("/notes/run.md", ["```js {cmd=true}", "1+1", "```", "", "text"]);

    let ack = modify_source(&mut host, Path::new("/notes/run.md"), 0, "2");

    assert_eq!(ack, "");
    assert_eq!(
        host.lines_of(doc),
        lines(&[
            "```js {cmd=true}",
            "1+1",
            "```",
            OUTPUT_OPEN,
            "",
            "2",
            "",
            OUTPUT_CLOSE,
            "",
            "text",
        ])
    );
}

#[test]
fn test_same_result_twice_is_idempotent() {
    let mut host = MemoryHost::new();
    let doc = host.open("/notes/run.md", three_chunks());

    modify_source(&mut host, Path::new("/notes/run.md"), 1, "second\nline two");
    let after_first = host.lines_of(doc).to_vec();

    modify_source(&mut host, Path::new("/notes/run.md"), 1, "second\nline two");

    assert_eq!(host.lines_of(doc), after_first);
    let openers = after_first.iter().filter(|l| l.as_str() == OUTPUT_OPEN).count();
    assert_eq!(openers, 1);
}

#[test]
fn test_result_patches_only_targeted_chunk() {
    let mut host = MemoryHost::new();
    let doc = host.open("/notes/run.md", three_chunks());

    modify_source(&mut host, Path::new("/notes/run.md"), 1, "second");

    assert_eq!(
        host.lines_of(doc),
        lines(&[
            "# Notes",
            "```js {cmd=true}",
            "console.log('first')",
            "```",
            "",
            "```python {cmd=true}",
            "print('second')",
            "```",
            OUTPUT_OPEN,
            "",
            "second",
            "",
            OUTPUT_CLOSE,
            "",
            "```bash {cmd=true}",
            "echo third",
            "```",
            "end",
        ])
    );
}

#[test]
fn test_stale_output_is_replaced_in_place() {
    let before = lines(&[
        "intro",
        "```js {cmd=true}",
        "1+1",
        "```",
        "",
        OUTPUT_OPEN,
        "",
        "stale line one",
        "stale line two",
        "",
        OUTPUT_CLOSE,
        "outro",
    ]);
    let mut host = MemoryHost::new();
    let doc = host.open("/notes/run.md", before.clone());

    modify_source(&mut host, Path::new("/notes/run.md"), 0, "fresh");

    let after = host.lines_of(doc);
    assert_eq!(after[..7], before[..7]);
    assert_eq!(after[7], "fresh");
    assert_eq!(after[8..], before[9..]);
}

#[test]
fn test_import_chunk_gets_output() {
    let mut host = MemoryHost::new();
    let doc = host.open(
        "/notes/import.md",
        ["```js {cmd=true}", "1", "```", "@import \"plot.py\" {cmd=\"python3\"}", "after"],
    );

    modify_source(&mut host, Path::new("/notes/import.md"), 1, "<img>");

    assert_eq!(
        host.lines_of(doc),
        lines(&[
            "```js {cmd=true}",
            "1",
            "```",
            "@import \"plot.py\" {cmd=\"python3\"}",
            OUTPUT_OPEN,
            "",
            "<img>",
            "",
            OUTPUT_CLOSE,
            "after",
        ])
    );
}

#[test]
fn test_unknown_ordinal_leaves_buffer_unchanged() {
    let original = lines(&["```js {cmd=true}", "1", "```", "```sh {cmd=true}", "ls", "```"]);
    let mut host = MemoryHost::new();
    let doc = host.open("/notes/run.md", original.clone());

    let ack = modify_source(&mut host, Path::new("/notes/run.md"), 5, "nothing");

    assert_eq!(ack, "");
    assert_eq!(host.lines_of(doc), original);
}

#[test]
fn test_unknown_document_is_ignored() {
    let mut host = MemoryHost::new();
    let doc = host.open("/notes/run.md", ["```js {cmd=true}", "1", "```"]);

    let ack = modify_source(&mut host, Path::new("/notes/other.md"), 0, "2");

    assert_eq!(ack, "");
    assert_eq!(host.lines_of(doc), lines(&["```js {cmd=true}", "1", "```"]));
}

#[test]
fn test_only_first_document_with_path_is_edited() {
    let mut host = MemoryHost::new();
    let first = host.open("/notes/run.md", ["```js {cmd=true}", "1", "```"]);
    let second = host.open("/notes/run.md", ["```js {cmd=true}", "1", "```"]);

    modify_source(&mut host, Path::new("/notes/run.md"), 0, "1");

    assert_eq!(host.lines_of(first).len(), 8);
    assert_eq!(host.lines_of(second), lines(&["```js {cmd=true}", "1", "```"]));
}

#[test]
fn test_unclosed_chunk_output_goes_to_end_of_document() {
    let mut host = MemoryHost::new();
    let doc = host.open("/notes/open.md", ["text", "```sh {cmd=true}", "echo hi"]);

    modify_source(&mut host, Path::new("/notes/open.md"), 0, "hi");

    assert_eq!(
        host.lines_of(doc),
        lines(&[
            "text",
            "```sh {cmd=true}",
            "echo hi",
            OUTPUT_OPEN,
            "",
            "hi",
            "",
            OUTPUT_CLOSE,
        ])
    );

    let after_first = host.lines_of(doc).to_vec();
    modify_source(&mut host, Path::new("/notes/open.md"), 0, "hi");
    assert_eq!(host.lines_of(doc), after_first);

    modify_source(&mut host, Path::new("/notes/open.md"), 0, "bye");
    assert_eq!(host.lines_of(doc)[5], "bye");
    assert_eq!(host.lines_of(doc).len(), 8);
}
