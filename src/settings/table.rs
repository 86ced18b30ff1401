//! Declarative settings table.
//!
//! Each entry names a configuration key, how to parse a value into the
//! typed record, and whether a change to it should refresh open previews.
//! `apply_changes` is the single diff-and-notify pass over the table.

use serde_json::{Map, Value};

use super::{Delimiter, MathRenderingOption, PreviewSettings, DEFAULT_FILE_EXTENSIONS};
use crate::drop::ImageDropAction;

/// Outcome of applying one value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Changed,
    Unchanged,
    /// The value could not be parsed; the field keeps its value
    Rejected,
}

/// One configuration key
pub struct SettingEntry {
    pub key: &'static str,
    pub apply: fn(&mut PreviewSettings, &Value) -> Applied,
    /// Whether a change refreshes open previews
    pub notify: bool,
}

/// Keys that changed in one pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsDiff {
    pub changed: Vec<&'static str>,
    pub notify: bool,
}

impl SettingsDiff {
    pub fn is_empty(&self) -> bool {
        self.changed.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.changed.contains(&key)
    }
}

pub static SETTINGS: &[SettingEntry] = &[
    SettingEntry {
        key: "usePandocParser",
        apply: |s, v| set_bool(&mut s.use_pandoc_parser, v),
        notify: true,
    },
    SettingEntry {
        key: "breakOnSingleNewLine",
        apply: |s, v| set_bool(&mut s.break_on_single_new_line, v),
        notify: true,
    },
    SettingEntry {
        key: "enableTypographer",
        apply: |s, v| set_bool(&mut s.enable_typographer, v),
        notify: true,
    },
    SettingEntry {
        key: "enableWikiLinkSyntax",
        apply: |s, v| set_bool(&mut s.enable_wiki_link_syntax, v),
        notify: true,
    },
    SettingEntry {
        key: "wikiLinkFileExtension",
        apply: |s, v| set_string(&mut s.wiki_link_file_extension, v),
        notify: true,
    },
    SettingEntry {
        key: "enableEmojiSyntax",
        apply: |s, v| set_bool(&mut s.enable_emoji_syntax, v),
        notify: true,
    },
    SettingEntry {
        key: "enableExtendedTableSyntax",
        apply: |s, v| set_bool(&mut s.enable_extended_table_syntax, v),
        notify: true,
    },
    SettingEntry {
        key: "enableCriticMarkupSyntax",
        apply: |s, v| set_bool(&mut s.enable_critic_markup_syntax, v),
        notify: true,
    },
    SettingEntry {
        key: "protocolsWhiteList",
        apply: |s, v| set_string(&mut s.protocols_white_list, v),
        notify: true,
    },
    SettingEntry {
        key: "mathRenderingOption",
        apply: |s, v| set_math_rendering(&mut s.math_rendering_option, v),
        notify: true,
    },
    SettingEntry {
        key: "mathInlineDelimiters",
        apply: |s, v| set_delimiters(&mut s.math_inline_delimiters, v),
        notify: true,
    },
    SettingEntry {
        key: "mathBlockDelimiters",
        apply: |s, v| set_delimiters(&mut s.math_block_delimiters, v),
        notify: true,
    },
    SettingEntry {
        key: "codeBlockTheme",
        apply: |s, v| set_string(&mut s.code_block_theme, v),
        notify: true,
    },
    SettingEntry {
        key: "previewTheme",
        apply: |s, v| set_string(&mut s.preview_theme, v),
        notify: true,
    },
    SettingEntry {
        key: "revealjsTheme",
        apply: |s, v| set_string(&mut s.revealjs_theme, v),
        notify: true,
    },
    SettingEntry {
        key: "mermaidTheme",
        apply: |s, v| set_string(&mut s.mermaid_theme, v),
        notify: true,
    },
    SettingEntry {
        key: "frontMatterRenderingOption",
        apply: |s, v| set_string(&mut s.front_matter_rendering_option, v),
        notify: true,
    },
    SettingEntry {
        key: "imageFolderPath",
        apply: |s, v| set_string(&mut s.image_folder_path, v),
        notify: true,
    },
    SettingEntry {
        key: "printBackground",
        apply: |s, v| set_bool(&mut s.print_background, v),
        notify: true,
    },
    SettingEntry {
        key: "phantomPath",
        apply: |s, v| set_string(&mut s.phantom_path, v),
        notify: true,
    },
    SettingEntry {
        key: "pandocPath",
        apply: |s, v| set_string(&mut s.pandoc_path, v),
        notify: true,
    },
    SettingEntry {
        key: "pandocMarkdownFlavor",
        apply: |s, v| set_string(&mut s.pandoc_markdown_flavor, v),
        notify: true,
    },
    SettingEntry {
        key: "pandocArguments",
        apply: |s, v| set_list(&mut s.pandoc_arguments, v),
        notify: true,
    },
    SettingEntry {
        key: "latexEngine",
        apply: |s, v| set_string(&mut s.latex_engine, v),
        notify: true,
    },
    SettingEntry {
        key: "enableScriptExecution",
        apply: |s, v| set_bool(&mut s.enable_script_execution, v),
        notify: true,
    },
    SettingEntry {
        key: "fileExtension",
        apply: |s, v| set_file_extensions(&mut s.file_extension, v),
        notify: true,
    },
    SettingEntry {
        key: "singlePreview",
        apply: |s, v| set_bool(&mut s.single_preview, v),
        notify: false,
    },
    SettingEntry {
        key: "scrollSync",
        apply: |s, v| set_bool(&mut s.scroll_sync, v),
        notify: true,
    },
    SettingEntry {
        key: "liveUpdate",
        apply: |s, v| set_bool(&mut s.live_update, v),
        notify: false,
    },
    SettingEntry {
        key: "previewPanePosition",
        apply: |s, v| set_string(&mut s.preview_pane_position, v),
        notify: false,
    },
    SettingEntry {
        key: "openPreviewPaneAutomatically",
        apply: |s, v| set_bool(&mut s.open_preview_pane_automatically, v),
        notify: true,
    },
    SettingEntry {
        key: "automaticallyShowPreviewOfMarkdownBeingEdited",
        apply: |s, v| set_bool(&mut s.automatically_show_preview_of_markdown_being_edited, v),
        notify: true,
    },
    SettingEntry {
        key: "closePreviewAutomatically",
        apply: |s, v| set_bool(&mut s.close_preview_automatically, v),
        notify: true,
    },
    SettingEntry {
        key: "enableZenMode",
        apply: |s, v| set_bool(&mut s.enable_zen_mode, v),
        notify: false,
    },
    SettingEntry {
        key: "imageUploader",
        apply: |s, v| set_string(&mut s.image_uploader, v),
        notify: true,
    },
    SettingEntry {
        key: "imageDropAction",
        apply: |s, v| set_drop_action(&mut s.image_drop_action, v),
        notify: false,
    },
];

/// Look up a table entry by key
pub fn entry(key: &str) -> Option<&'static SettingEntry> {
    SETTINGS.iter().find(|entry| entry.key == key)
}

/// Apply every known key present in `values` and report what changed.
///
/// Unknown keys are ignored and invalid values are dropped silently.
pub fn apply_changes(settings: &mut PreviewSettings, values: &Map<String, Value>) -> SettingsDiff {
    let mut diff = SettingsDiff::default();

    for entry in SETTINGS {
        let Some(value) = values.get(entry.key) else {
            continue;
        };

        match (entry.apply)(settings, value) {
            Applied::Changed => {
                diff.changed.push(entry.key);
                diff.notify |= entry.notify;
            }
            Applied::Unchanged => {}
            Applied::Rejected => {
                log::debug!("ignoring invalid value for {}: {}", entry.key, value);
            }
        }
    }

    diff
}

fn assign<T: PartialEq>(field: &mut T, value: T) -> Applied {
    if *field == value {
        Applied::Unchanged
    } else {
        *field = value;
        Applied::Changed
    }
}

fn set_bool(field: &mut bool, value: &Value) -> Applied {
    match value.as_bool() {
        Some(flag) => assign(field, flag),
        None => Applied::Rejected,
    }
}

fn set_string(field: &mut String, value: &Value) -> Applied {
    match value.as_str() {
        Some(text) => assign(field, text.to_string()),
        None => Applied::Rejected,
    }
}

/// Comma-separated string or array of strings, trimmed, empties dropped
fn parse_list(value: &Value) -> Option<Vec<String>> {
    let items: Vec<String> = match value {
        Value::String(text) => text.split(',').map(|item| item.trim().to_string()).collect(),
        Value::Array(items) => items
            .iter()
            .map(|item| item.as_str().map(|s| s.trim().to_string()))
            .collect::<Option<_>>()?,
        _ => return None,
    };
    Some(items.into_iter().filter(|item| !item.is_empty()).collect())
}

fn set_list(field: &mut Vec<String>, value: &Value) -> Applied {
    match parse_list(value) {
        Some(items) => assign(field, items),
        None => Applied::Rejected,
    }
}

fn set_file_extensions(field: &mut Vec<String>, value: &Value) -> Applied {
    match parse_list(value) {
        Some(items) if items.is_empty() => assign(
            field,
            DEFAULT_FILE_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
        ),
        Some(items) => assign(field, items),
        None => Applied::Rejected,
    }
}

/// JSON text such as `[["$","$"]]`, or the same structure as a value
fn set_delimiters(field: &mut Vec<Delimiter>, value: &Value) -> Applied {
    let parsed = match value {
        Value::String(text) => serde_json::from_str::<Vec<Delimiter>>(text).ok(),
        other => serde_json::from_value::<Vec<Delimiter>>(other.clone()).ok(),
    };
    match parsed {
        Some(delimiters) => assign(field, delimiters),
        None => Applied::Rejected,
    }
}

fn set_math_rendering(field: &mut MathRenderingOption, value: &Value) -> Applied {
    match serde_json::from_value::<MathRenderingOption>(value.clone()) {
        Ok(option) => assign(field, option),
        Err(_) => Applied::Rejected,
    }
}

fn set_drop_action(field: &mut ImageDropAction, value: &Value) -> Applied {
    match value.as_str().and_then(ImageDropAction::parse) {
        Some(action) => assign(field, action),
        None => Applied::Rejected,
    }
}
