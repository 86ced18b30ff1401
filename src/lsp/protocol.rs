//! Custom protocol messages between the server, the editor plugin and the
//! rendering engine behind it.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tower_lsp::lsp_types::notification::Notification;
use tower_lsp::lsp_types::Url;

use crate::commands::PreviewRequest;
use crate::preview::PreviewView;

/// Engine request: a code chunk produced output for a document
pub const MODIFY_SOURCE_METHOD: &str = "mpe/modifySource";
/// Client notification: the active editor changed
pub const ACTIVE_EDITOR_CHANGED_METHOD: &str = "mpe/activeEditorChanged";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModifySourceParams {
    pub code_chunk_data: CodeChunkData,
    pub result: String,
    pub file_path: PathBuf,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeChunkData {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub normalized_info: NormalizedInfo,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedInfo {
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub attributes: Map<String, Value>,
}

impl CodeChunkData {
    /// Ordinal of the chunk among all chunks of its document
    pub fn offset(&self) -> Option<usize> {
        self.normalized_info
            .attributes
            .get("code_chunk_offset")?
            .as_u64()
            .and_then(|offset| usize::try_from(offset).ok())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveEditorParams {
    pub uri: Url,
}

/// Identifies a preview and the document it shows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewParams {
    pub preview_uri: String,
    pub source_uri: Option<Url>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<Value>,
}

impl PreviewParams {
    pub fn from_view(view: &PreviewView) -> Self {
        Self {
            preview_uri: view.uri().to_string(),
            source_uri: view.source().cloned(),
            settings: None,
        }
    }

    /// Include the preview's settings snapshot
    pub fn with_settings(view: &PreviewView) -> Self {
        Self {
            settings: Some(view.settings().snapshot()),
            ..Self::from_view(view)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadImageParams {
    pub source_uri: Url,
    pub image_path: PathBuf,
    pub uploader: String,
}

macro_rules! preview_notification {
    ($name:ident, $method:literal) => {
        #[derive(Debug)]
        pub enum $name {}

        impl Notification for $name {
            type Params = PreviewParams;
            const METHOD: &'static str = $method;
        }
    };
}

preview_notification!(OpenPreview, "mpe/openPreview");
preview_notification!(ClosePreview, "mpe/closePreview");
preview_notification!(RefreshPreview, "mpe/refreshPreview");
preview_notification!(RevealPreview, "mpe/revealPreview");
preview_notification!(RunCodeChunk, "mpe/runCodeChunk");
preview_notification!(RunAllCodeChunks, "mpe/runAllCodeChunks");
preview_notification!(StartImageHelper, "mpe/startImageHelper");

#[derive(Debug)]
pub enum UploadImage {}

impl Notification for UploadImage {
    type Params = UploadImageParams;
    const METHOD: &'static str = "mpe/uploadImage";
}

/// Method name of the notification carrying a preview request
pub fn preview_request_method(request: PreviewRequest) -> &'static str {
    match request {
        PreviewRequest::RunCodeChunk => RunCodeChunk::METHOD,
        PreviewRequest::RunAllCodeChunks => RunAllCodeChunks::METHOD,
        PreviewRequest::StartImageHelper => StartImageHelper::METHOD,
    }
}
