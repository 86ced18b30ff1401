//! Preview Settings
//!
//! One typed record mirroring every configuration key of the preview,
//! updated through a declarative table of setters. Settings come from a
//! TOML file (watched for changes) and from the client's
//! `workspace/didChangeConfiguration`.

pub mod file;
pub mod table;
pub mod watcher;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::drop::ImageDropAction;

pub use file::{load_settings_file, parse_settings_toml};
pub use table::{apply_changes, Applied, SettingEntry, SettingsDiff, SETTINGS};
pub use watcher::{SettingsEvent, SettingsWatcher};

/// Name of the settings section, in files and in client configuration
pub const SETTINGS_SECTION: &str = "markdown-preview-enhanced";

/// Extensions treated as markdown when none are configured
pub const DEFAULT_FILE_EXTENSIONS: [&str; 3] = [".md", ".mmark", ".markdown"];

/// Math renderer used by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MathRenderingOption {
    #[serde(rename = "KaTeX")]
    KaTeX,
    #[serde(rename = "MathJax")]
    MathJax,
    #[serde(rename = "None")]
    None,
}

/// An opening/closing delimiter pair such as `["$", "$"]`
pub type Delimiter = [String; 2];

pub fn default_inline_delimiters() -> Vec<Delimiter> {
    delimiters(&[("$", "$"), ("\\(", "\\)")])
}

pub fn default_block_delimiters() -> Vec<Delimiter> {
    delimiters(&[("$$", "$$"), ("\\[", "\\]")])
}

fn delimiters(pairs: &[(&str, &str)]) -> Vec<Delimiter> {
    pairs
        .iter()
        .map(|(open, close)| [open.to_string(), close.to_string()])
        .collect()
}

/// Every setting of the preview, engine options included.
///
/// Serializes with the camelCase keys used in configuration.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewSettings {
    // Engine options
    pub use_pandoc_parser: bool,
    pub break_on_single_new_line: bool,
    pub enable_typographer: bool,
    pub enable_wiki_link_syntax: bool,
    pub wiki_link_file_extension: String,
    pub enable_emoji_syntax: bool,
    pub enable_extended_table_syntax: bool,
    pub enable_critic_markup_syntax: bool,
    pub protocols_white_list: String,
    pub math_rendering_option: MathRenderingOption,
    pub math_inline_delimiters: Vec<Delimiter>,
    pub math_block_delimiters: Vec<Delimiter>,
    pub code_block_theme: String,
    pub preview_theme: String,
    pub revealjs_theme: String,
    pub mermaid_theme: String,
    pub front_matter_rendering_option: String,
    pub image_folder_path: String,
    pub print_background: bool,
    pub phantom_path: String,
    pub pandoc_path: String,
    pub pandoc_markdown_flavor: String,
    pub pandoc_arguments: Vec<String>,
    pub latex_engine: String,
    pub enable_script_execution: bool,

    // Editor integration
    pub file_extension: Vec<String>,
    pub single_preview: bool,
    pub scroll_sync: bool,
    pub live_update: bool,
    pub preview_pane_position: String,
    pub open_preview_pane_automatically: bool,
    pub automatically_show_preview_of_markdown_being_edited: bool,
    pub close_preview_automatically: bool,
    pub enable_zen_mode: bool,
    pub image_uploader: String,
    pub image_drop_action: ImageDropAction,
}

impl Default for PreviewSettings {
    fn default() -> Self {
        Self {
            use_pandoc_parser: false,
            break_on_single_new_line: true,
            enable_typographer: false,
            enable_wiki_link_syntax: true,
            wiki_link_file_extension: ".md".to_string(),
            enable_emoji_syntax: true,
            enable_extended_table_syntax: false,
            enable_critic_markup_syntax: false,
            protocols_white_list: "http://, https://, atom://, file://, mailto:, tel:".to_string(),
            math_rendering_option: MathRenderingOption::KaTeX,
            math_inline_delimiters: default_inline_delimiters(),
            math_block_delimiters: default_block_delimiters(),
            code_block_theme: "auto.css".to_string(),
            preview_theme: "github-light.css".to_string(),
            revealjs_theme: "white.css".to_string(),
            mermaid_theme: "mermaid.css".to_string(),
            front_matter_rendering_option: "table".to_string(),
            image_folder_path: "/assets".to_string(),
            print_background: false,
            phantom_path: "phantomjs".to_string(),
            pandoc_path: "pandoc".to_string(),
            pandoc_markdown_flavor: "markdown-raw_tex+tex_math_single_backslash".to_string(),
            pandoc_arguments: Vec::new(),
            latex_engine: "pdflatex".to_string(),
            enable_script_execution: false,

            file_extension: DEFAULT_FILE_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            single_preview: false,
            scroll_sync: true,
            live_update: true,
            preview_pane_position: "right".to_string(),
            open_preview_pane_automatically: false,
            automatically_show_preview_of_markdown_being_edited: false,
            close_preview_automatically: true,
            enable_zen_mode: false,
            image_uploader: "imgur".to_string(),
            image_drop_action: ImageDropAction::InsertRelativePath,
        }
    }
}

impl PreviewSettings {
    /// Defaults overridden by whatever valid values `values` carries
    pub fn from_values(values: &Map<String, Value>) -> Self {
        let mut settings = Self::default();
        apply_changes(&mut settings, values);
        settings
    }

    /// Settings as a JSON object keyed like the configuration
    pub fn snapshot(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    /// Current value of a boolean setting
    pub fn flag(&self, key: &str) -> Option<bool> {
        self.snapshot().get(key).and_then(Value::as_bool)
    }
}

/// Pick our section out of a client configuration payload.
///
/// Accepts `{"markdown-preview-enhanced": {...}}` or the bare section.
pub fn section_values(settings: &Value) -> Option<&Map<String, Value>> {
    match settings.get(SETTINGS_SECTION) {
        Some(Value::Object(section)) => Some(section),
        _ => settings.as_object(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_snapshot_uses_configuration_keys() {
        let snapshot = PreviewSettings::default().snapshot();
        assert_eq!(snapshot["scrollSync"], json!(true));
        assert_eq!(snapshot["mathRenderingOption"], json!("KaTeX"));
        assert_eq!(snapshot["imageDropAction"], json!("insert relative image path"));
        assert_eq!(snapshot["mathInlineDelimiters"], json!([["$", "$"], ["\\(", "\\)"]]));
        assert!(snapshot.get("automaticallyShowPreviewOfMarkdownBeingEdited").is_some());
    }

    #[test]
    fn test_flag_reads_boolean_settings() {
        let settings = PreviewSettings::default();
        assert_eq!(settings.flag("liveUpdate"), Some(true));
        assert_eq!(settings.flag("previewTheme"), None);
        assert_eq!(settings.flag("noSuchKey"), None);
    }

    #[test]
    fn test_section_values_accepts_wrapped_and_bare_payloads() {
        let wrapped = json!({ "markdown-preview-enhanced": { "scrollSync": false } });
        let bare = json!({ "scrollSync": false });

        assert_eq!(section_values(&wrapped), bare.as_object());
        assert_eq!(section_values(&bare), bare.as_object());
        assert_eq!(section_values(&json!(null)), None);
    }
}
