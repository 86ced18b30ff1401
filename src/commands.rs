//! Editor Commands
//!
//! The command table exposed through `workspace/executeCommand`.

use std::path::PathBuf;

use serde_json::Value;
use tower_lsp::lsp_types::{Position, Url};

/// Prefix shared by every command id
pub const COMMAND_PREFIX: &str = "markdown-preview-enhanced.";

pub const TOC_SNIPPET: &str =
    "\n<!-- @import \"[TOC]\" {cmd=\"toc\" depthFrom=1 depthTo=6 orderedList=false} -->\n";
pub const TABLE_SNIPPET: &str = "|   |   |\n|---|---|\n|   |   |\n";
pub const SLIDE_SNIPPET: &str = "<!-- slide -->\n";
pub const PAGE_BREAK_SNIPPET: &str = "<!-- pagebreak -->\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorCommand {
    TogglePreview,
    CustomizeCss,
    CreateToc,
    ToggleScrollSync,
    ToggleLiveUpdate,
    ToggleBreakOnSingleNewLine,
    InsertTable,
    ImageHelper,
    OpenMermaidConfig,
    OpenMathjaxConfig,
    OpenKatexConfig,
    ExtendParser,
    InsertNewSlide,
    InsertPageBreak,
    ToggleZenMode,
    RunCodeChunk,
    RunAllCodeChunks,
    ShowUploadedImages,
    DropImage,
}

/// Requests answered by the engine behind an open preview
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewRequest {
    RunCodeChunk,
    RunAllCodeChunks,
    StartImageHelper,
}

/// How a command is carried out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandAction {
    TogglePreview,
    InsertSnippet(&'static str),
    ToggleSetting {
        key: &'static str,
        enabled: &'static str,
        disabled: &'static str,
    },
    /// Show a file from the engine's configuration directory
    OpenConfigFile(&'static str),
    Preview(PreviewRequest),
    DropImage,
}

impl EditorCommand {
    pub const ALL: [EditorCommand; 19] = [
        EditorCommand::TogglePreview,
        EditorCommand::CustomizeCss,
        EditorCommand::CreateToc,
        EditorCommand::ToggleScrollSync,
        EditorCommand::ToggleLiveUpdate,
        EditorCommand::ToggleBreakOnSingleNewLine,
        EditorCommand::InsertTable,
        EditorCommand::ImageHelper,
        EditorCommand::OpenMermaidConfig,
        EditorCommand::OpenMathjaxConfig,
        EditorCommand::OpenKatexConfig,
        EditorCommand::ExtendParser,
        EditorCommand::InsertNewSlide,
        EditorCommand::InsertPageBreak,
        EditorCommand::ToggleZenMode,
        EditorCommand::RunCodeChunk,
        EditorCommand::RunAllCodeChunks,
        EditorCommand::ShowUploadedImages,
        EditorCommand::DropImage,
    ];

    pub fn name(self) -> &'static str {
        match self {
            EditorCommand::TogglePreview => "toggle",
            EditorCommand::CustomizeCss => "customize-css",
            EditorCommand::CreateToc => "create-toc",
            EditorCommand::ToggleScrollSync => "toggle-scroll-sync",
            EditorCommand::ToggleLiveUpdate => "toggle-live-update",
            EditorCommand::ToggleBreakOnSingleNewLine => "toggle-break-on-single-newline",
            EditorCommand::InsertTable => "insert-table",
            EditorCommand::ImageHelper => "image-helper",
            EditorCommand::OpenMermaidConfig => "open-mermaid-config",
            EditorCommand::OpenMathjaxConfig => "open-mathjax-config",
            EditorCommand::OpenKatexConfig => "open-katex-config",
            EditorCommand::ExtendParser => "extend-parser",
            EditorCommand::InsertNewSlide => "insert-new-slide",
            EditorCommand::InsertPageBreak => "insert-page-break",
            EditorCommand::ToggleZenMode => "toggle-zen-mode",
            EditorCommand::RunCodeChunk => "run-code-chunk",
            EditorCommand::RunAllCodeChunks => "run-all-code-chunks",
            EditorCommand::ShowUploadedImages => "show-uploaded-images",
            EditorCommand::DropImage => "drop-image",
        }
    }

    /// Full command id, e.g. `markdown-preview-enhanced.toggle`
    pub fn command_id(self) -> String {
        format!("{}{}", COMMAND_PREFIX, self.name())
    }

    pub fn parse(command: &str) -> Option<Self> {
        let name = command.strip_prefix(COMMAND_PREFIX)?;
        Self::ALL.into_iter().find(|cmd| cmd.name() == name)
    }

    pub fn action(self) -> CommandAction {
        match self {
            EditorCommand::TogglePreview => CommandAction::TogglePreview,
            EditorCommand::CreateToc => CommandAction::InsertSnippet(TOC_SNIPPET),
            EditorCommand::InsertTable => CommandAction::InsertSnippet(TABLE_SNIPPET),
            EditorCommand::InsertNewSlide => CommandAction::InsertSnippet(SLIDE_SNIPPET),
            EditorCommand::InsertPageBreak => CommandAction::InsertSnippet(PAGE_BREAK_SNIPPET),
            EditorCommand::ToggleScrollSync => CommandAction::ToggleSetting {
                key: "scrollSync",
                enabled: "Scroll Sync enabled",
                disabled: "Scroll Sync disabled",
            },
            EditorCommand::ToggleLiveUpdate => CommandAction::ToggleSetting {
                key: "liveUpdate",
                enabled: "Live Update enabled",
                disabled: "Live Update disabled",
            },
            EditorCommand::ToggleBreakOnSingleNewLine => CommandAction::ToggleSetting {
                key: "breakOnSingleNewLine",
                enabled: "Enabled breaking on single newline",
                disabled: "Disabled breaking on single newline",
            },
            EditorCommand::ToggleZenMode => CommandAction::ToggleSetting {
                key: "enableZenMode",
                enabled: "zen mode enabled",
                disabled: "zen mode disabled",
            },
            EditorCommand::CustomizeCss => CommandAction::OpenConfigFile("style.less"),
            EditorCommand::OpenMermaidConfig => CommandAction::OpenConfigFile("mermaid_config.js"),
            EditorCommand::OpenMathjaxConfig => CommandAction::OpenConfigFile("mathjax_config.js"),
            EditorCommand::OpenKatexConfig => CommandAction::OpenConfigFile("katex_config.js"),
            EditorCommand::ExtendParser => CommandAction::OpenConfigFile("parser.js"),
            EditorCommand::ShowUploadedImages => CommandAction::OpenConfigFile("image_history.md"),
            EditorCommand::RunCodeChunk => CommandAction::Preview(PreviewRequest::RunCodeChunk),
            EditorCommand::RunAllCodeChunks => {
                CommandAction::Preview(PreviewRequest::RunAllCodeChunks)
            }
            EditorCommand::ImageHelper => CommandAction::Preview(PreviewRequest::StartImageHelper),
            EditorCommand::DropImage => CommandAction::DropImage,
        }
    }

    /// All command ids, for the server capabilities
    pub fn command_ids() -> Vec<String> {
        Self::ALL.into_iter().map(Self::command_id).collect()
    }
}

/// Positional command arguments: `[uri, position, path]`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandArgs {
    pub uri: Option<Url>,
    pub position: Option<Position>,
    pub path: Option<PathBuf>,
}

impl CommandArgs {
    pub fn parse(arguments: &[Value]) -> Self {
        let uri = arguments
            .first()
            .and_then(|value| value.as_str())
            .and_then(|uri| Url::parse(uri).ok());
        let position = arguments
            .get(1)
            .and_then(|value| serde_json::from_value::<Position>(value.clone()).ok());
        let path = arguments
            .get(2)
            .and_then(|value| value.as_str())
            .map(PathBuf::from);

        Self {
            uri,
            position,
            path,
        }
    }
}

/// Directory holding the engine's user configuration files
pub fn engine_config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".mume"))
}
