//! Integration tests for preview lifecycle in per-document and single modes
use markdown_preview_ls::preview::{PreviewChange, PREVIEW_SCHEME};
use markdown_preview_ls::{PreviewRegistry, PreviewSettings};
use tower_lsp::lsp_types::Url;

fn source(path: &str) -> Url {
    Url::parse(&format!("file://{}", path)).expect("url")
}

fn single_preview_settings() -> PreviewSettings {
    PreviewSettings {
        single_preview: true,
        ..PreviewSettings::default()
    }
}

#[test]
fn test_one_preview_per_document() {
    let settings = PreviewSettings::default();
    let mut registry = PreviewRegistry::new();

    let a = registry.start_preview(&source("/notes/a.md"), &settings);
    let b = registry.start_preview(&source("/notes/b.md"), &settings);

    assert!(matches!(a, PreviewChange::Opened(ref view) if view.uri() == "mpe:///notes/a.md"));
    assert!(matches!(b, PreviewChange::Opened(_)));
    assert_eq!(registry.len(), 2);

    let again = registry.start_preview(&source("/notes/a.md"), &settings);
    assert!(matches!(again, PreviewChange::Unchanged(_)));
    assert_eq!(registry.len(), 2);
}

#[test]
fn test_non_markdown_documents_are_ignored() {
    let settings = PreviewSettings::default();
    let mut registry = PreviewRegistry::new();

    let change = registry.start_preview(&source("/src/main.rs"), &settings);

    assert_eq!(change, PreviewChange::Ignored);
    assert!(registry.is_empty());
}

#[test]
fn test_single_preview_follows_documents() {
    let settings = single_preview_settings();
    let mut registry = PreviewRegistry::new();

    registry.start_preview(&source("/notes/a.md"), &settings);
    let change = registry.start_preview(&source("/notes/b.md"), &settings);

    let PreviewChange::Rebound(view) = change else {
        panic!("expected the shared preview to be rebound, got {:?}", change);
    };
    assert_eq!(view.uri(), format!("{}single_preview", PREVIEW_SCHEME));
    assert_eq!(view.source(), Some(&source("/notes/b.md")));
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_toggle_closes_and_reopens() {
    let settings = PreviewSettings::default();
    let mut registry = PreviewRegistry::new();
    let doc = source("/notes/a.md");

    assert!(matches!(registry.toggle_preview(&doc, &settings), PreviewChange::Opened(_)));
    assert!(matches!(registry.toggle_preview(&doc, &settings), PreviewChange::Closed(_)));
    assert!(registry.is_empty());
    assert!(matches!(registry.toggle_preview(&doc, &settings), PreviewChange::Opened(_)));
}

#[test]
fn test_closing_document_removes_its_preview() {
    let settings = PreviewSettings::default();
    let mut registry = PreviewRegistry::new();
    registry.start_preview(&source("/notes/a.md"), &settings);
    registry.start_preview(&source("/notes/b.md"), &settings);

    let removed = registry.remove_for_source(&source("/notes/a.md"));

    assert_eq!(removed.len(), 1);
    assert!(registry.preview_for(&source("/notes/a.md"), false).is_none());
    assert!(registry.preview_for(&source("/notes/b.md"), false).is_some());
}

#[test]
fn test_open_resolves_preview_uris() {
    let settings = PreviewSettings::default();
    let mut registry = PreviewRegistry::new();
    registry.start_preview(&source("/notes/a.md"), &settings);

    assert!(registry.open("mpe:///notes/a.md", false).is_some());
    assert!(registry.open("mpe:///notes/b.md", false).is_none());
    assert!(registry.open("file:///notes/a.md", false).is_none());

    let removed = registry.remove("mpe:///notes/a.md");
    assert!(removed.is_some());
    assert!(registry.is_empty());
}

#[test]
fn test_active_editor_rebinds_shared_preview() {
    let mut settings = single_preview_settings();
    settings.automatically_show_preview_of_markdown_being_edited = true;
    let mut registry = PreviewRegistry::new();
    registry.start_preview(&source("/notes/a.md"), &settings);

    let outcome = registry
        .active_editor_changed(&source("/notes/b.md"), &settings)
        .expect("shared preview exists");
    assert!(outcome.rebound);
    assert!(outcome.reveal);
    assert_eq!(outcome.preview.source(), Some(&source("/notes/b.md")));

    let outcome = registry
        .active_editor_changed(&source("/notes/b.md"), &settings)
        .expect("shared preview exists");
    assert!(!outcome.rebound);

    assert!(registry
        .active_editor_changed(&source("/notes/c.txt"), &settings)
        .is_none());
}

#[test]
fn test_active_editor_without_preview() {
    let settings = PreviewSettings::default();
    let mut registry = PreviewRegistry::new();

    assert!(registry
        .active_editor_changed(&source("/notes/a.md"), &settings)
        .is_none());
}

#[test]
fn test_refresh_pushes_settings() {
    let mut registry = PreviewRegistry::new();
    registry.start_preview(&source("/notes/a.md"), &PreviewSettings::default());

    let settings = PreviewSettings {
        preview_theme: "night.css".to_string(),
        ..PreviewSettings::default()
    };
    let refreshed = registry.refresh_all(&settings);

    assert_eq!(refreshed.len(), 1);
    assert_eq!(refreshed[0].settings().preview_theme, "night.css");
    assert_eq!(refreshed[0].generation(), 2);
}
