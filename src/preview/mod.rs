//! Preview Registry
//!
//! Tracks which preview surface belongs to which markdown document. In
//! single-preview mode one shared preview follows whichever document it was
//! last bound to.

use std::collections::HashMap;
use std::path::Path;

use tower_lsp::lsp_types::Url;

use crate::settings::PreviewSettings;

/// Scheme of preview URIs
pub const PREVIEW_SCHEME: &str = "mpe://";
/// Registry key of the shared preview
pub const SINGLE_PREVIEW_KEY: &str = "single_preview";

/// Check whether `path` names a markdown file under the configured
/// extensions. Preview URIs never do.
pub fn is_markdown_file(path: &str, extensions: &[String]) -> bool {
    if path.starts_with(PREVIEW_SCHEME) {
        return false;
    }

    match Path::new(path).extension() {
        Some(ext) => {
            let ext = format!(".{}", ext.to_string_lossy());
            extensions.iter().any(|known| *known == ext)
        }
        None => false,
    }
}

/// A preview surface
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewView {
    uri: String,
    source: Option<Url>,
    settings: PreviewSettings,
    generation: u64,
}

impl PreviewView {
    pub fn new(uri: impl Into<String>, settings: PreviewSettings) -> Self {
        Self {
            uri: uri.into(),
            source: None,
            settings,
            generation: 0,
        }
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Document currently shown
    pub fn source(&self) -> Option<&Url> {
        self.source.as_ref()
    }

    pub fn settings(&self) -> &PreviewSettings {
        &self.settings
    }

    /// Incremented on every (re)load
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn bind_source(&mut self, source: Url) {
        self.source = Some(source);
        self.load_preview();
    }

    pub fn update_configuration(&mut self, settings: &PreviewSettings) {
        self.settings = settings.clone();
    }

    pub fn load_preview(&mut self) {
        self.generation += 1;
    }
}

/// What a registry operation did to a preview
#[derive(Debug, Clone, PartialEq)]
pub enum PreviewChange {
    /// A new preview was created and bound
    Opened(PreviewView),
    /// An existing preview was bound to another document
    Rebound(PreviewView),
    /// The preview was removed
    Closed(PreviewView),
    /// The preview already showed the document
    Unchanged(PreviewView),
    /// The document is not markdown
    Ignored,
}

/// Outcome of the active editor switching to a markdown document
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveEditorOutcome {
    pub preview: PreviewView,
    pub rebound: bool,
    pub reveal: bool,
}

/// Previews keyed by source document path, or by `SINGLE_PREVIEW_KEY`
#[derive(Debug, Default, Clone)]
pub struct PreviewRegistry {
    previews: HashMap<String, PreviewView>,
}

impl PreviewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.previews.len()
    }

    pub fn is_empty(&self) -> bool {
        self.previews.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PreviewView> {
        self.previews.values()
    }

    fn key_for(source: &Url, single: bool) -> String {
        if single {
            SINGLE_PREVIEW_KEY.to_string()
        } else {
            source.path().to_string()
        }
    }

    /// Preview that shows (or would show) `source`
    pub fn preview_for(&self, source: &Url, single: bool) -> Option<&PreviewView> {
        self.previews.get(&Self::key_for(source, single))
    }

    /// Resolve a preview URI, as the workspace opener does
    pub fn open(&self, uri: &str, single: bool) -> Option<&PreviewView> {
        let key = uri.strip_prefix(PREVIEW_SCHEME)?;
        if single {
            self.previews.get(SINGLE_PREVIEW_KEY)
        } else {
            self.previews.get(key)
        }
    }

    /// Show `source` in its preview, creating the preview when needed
    pub fn start_preview(&mut self, source: &Url, settings: &PreviewSettings) -> PreviewChange {
        if !is_markdown_file(source.path(), &settings.file_extension) {
            return PreviewChange::Ignored;
        }

        let key = Self::key_for(source, settings.single_preview);

        if let Some(preview) = self.previews.get_mut(&key) {
            if preview.source() == Some(source) {
                return PreviewChange::Unchanged(preview.clone());
            }
            preview.bind_source(source.clone());
            return PreviewChange::Rebound(preview.clone());
        }

        let mut preview = PreviewView::new(format!("{}{}", PREVIEW_SCHEME, key), settings.clone());
        preview.bind_source(source.clone());
        log::debug!("opened preview {}", preview.uri());
        self.previews.insert(key, preview.clone());
        PreviewChange::Opened(preview)
    }

    /// Close the preview of `source` if it is showing something, otherwise
    /// start it
    pub fn toggle_preview(&mut self, source: &Url, settings: &PreviewSettings) -> PreviewChange {
        let key = Self::key_for(source, settings.single_preview);
        let bound = self
            .previews
            .get(&key)
            .is_some_and(|preview| preview.source().is_some());

        if bound {
            if let Some(preview) = self.previews.remove(&key) {
                log::debug!("closed preview {}", preview.uri());
                return PreviewChange::Closed(preview);
            }
        }

        self.start_preview(source, settings)
    }

    /// Remove a preview by its URI
    pub fn remove(&mut self, preview_uri: &str) -> Option<PreviewView> {
        let key = self
            .previews
            .iter()
            .find(|(_, preview)| preview.uri() == preview_uri)
            .map(|(key, _)| key.clone())?;
        self.previews.remove(&key)
    }

    /// Remove every preview showing `source`
    pub fn remove_for_source(&mut self, source: &Url) -> Vec<PreviewView> {
        let keys: Vec<String> = self
            .previews
            .iter()
            .filter(|(_, preview)| preview.source() == Some(source))
            .map(|(key, _)| key.clone())
            .collect();

        keys.iter()
            .filter_map(|key| self.previews.remove(key))
            .collect()
    }

    /// Remove every preview
    pub fn close_all(&mut self) -> Vec<PreviewView> {
        self.previews.drain().map(|(_, preview)| preview).collect()
    }

    /// Push new settings into every preview and reload it
    pub fn refresh_all(&mut self, settings: &PreviewSettings) -> Vec<PreviewView> {
        self.previews
            .values_mut()
            .map(|preview| {
                preview.update_configuration(settings);
                preview.load_preview();
                preview.clone()
            })
            .collect()
    }

    /// The active editor switched to `source`
    pub fn active_editor_changed(
        &mut self,
        source: &Url,
        settings: &PreviewSettings,
    ) -> Option<ActiveEditorOutcome> {
        if !is_markdown_file(source.path(), &settings.file_extension) {
            return None;
        }

        let single = settings.single_preview;
        let preview = self.previews.get_mut(&Self::key_for(source, single))?;

        let rebound = single && preview.source() != Some(source);
        if rebound {
            preview.bind_source(source.clone());
        }

        Some(ActiveEditorOutcome {
            preview: preview.clone(),
            rebound,
            reveal: settings.automatically_show_preview_of_markdown_being_edited,
        })
    }
}
