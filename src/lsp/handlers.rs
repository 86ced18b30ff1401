use std::path::Path;

use serde_json::{Map, Value};
use tokio::sync::mpsc::UnboundedReceiver;
use tower_lsp::jsonrpc::{Error as LspError, Result as LspResult};
use tower_lsp::lsp_types::*;

use crate::chunk;
use crate::commands::{engine_config_dir, CommandAction, CommandArgs, EditorCommand, PreviewRequest};
use crate::drop::{copy_image, plan_image_drop, DropPlan};
use crate::lsp::backend::Backend;
use crate::lsp::host::{PendingEdit, WorkspaceHost};
use crate::lsp::protocol::{
    preview_request_method, ActiveEditorParams, ClosePreview, ModifySourceParams, OpenPreview,
    PreviewParams, RefreshPreview, RevealPreview, RunAllCodeChunks, RunCodeChunk,
    StartImageHelper, UploadImage, UploadImageParams,
};
use crate::preview::PreviewChange;
use crate::session::SessionUpdate;
use crate::settings::{load_settings_file, SettingsEvent};

/// Trait for handling `workspace/executeCommand`
#[tower_lsp::async_trait]
pub trait HandleCommand {
    async fn handle_execute_command(&self, params: ExecuteCommandParams) -> LspResult<Option<Value>>;
}

/// Trait for reacting to documents opening and closing
#[tower_lsp::async_trait]
pub trait HandleDocumentLifecycle {
    async fn handle_document_opened(&self, uri: Url);
    async fn handle_document_closed(&self, uri: Url);
}

/// Trait for settings updates from the client or the settings file
#[tower_lsp::async_trait]
pub trait HandleSettings {
    async fn update_settings(&self, values: &Map<String, Value>);
    async fn reload_settings_file(&self);
    async fn watch_settings(&self, events: UnboundedReceiver<SettingsEvent>);
    async fn publish_session_update(&self, update: SessionUpdate);
}

#[tower_lsp::async_trait]
impl HandleCommand for Backend {
    async fn handle_execute_command(&self, params: ExecuteCommandParams) -> LspResult<Option<Value>> {
        let Some(command) = EditorCommand::parse(&params.command) else {
            return Err(LspError::invalid_params(format!(
                "Unknown command: {}",
                params.command
            )));
        };
        let args = CommandArgs::parse(&params.arguments);
        log::debug!("executing {}", command.command_id());

        match command.action() {
            CommandAction::TogglePreview => {
                if let Some(uri) = args.uri {
                    self.toggle_preview(uri).await;
                }
            }
            CommandAction::InsertSnippet(snippet) => {
                if let (Some(uri), Some(position)) = (args.uri, args.position) {
                    self.insert_text(&uri, position, snippet).await;
                }
            }
            CommandAction::ToggleSetting {
                key,
                enabled,
                disabled,
            } => {
                self.toggle_setting(key, enabled, disabled).await;
            }
            CommandAction::OpenConfigFile(file_name) => {
                self.open_config_file(file_name).await;
            }
            CommandAction::Preview(request) => {
                self.forward_preview_request(args.uri.as_ref(), request).await;
            }
            CommandAction::DropImage => {
                if let (Some(uri), Some(position), Some(image)) = (args.uri, args.position, args.path)
                {
                    self.drop_image(&uri, position, &image).await;
                }
            }
        }

        Ok(None)
    }
}

#[tower_lsp::async_trait]
impl HandleDocumentLifecycle for Backend {
    /// Open the preview automatically when configured to
    async fn handle_document_opened(&self, uri: Url) {
        let change = {
            let mut guard = self.session.lock().await;
            let session = &mut *guard;
            if !session.settings.open_preview_pane_automatically {
                return;
            }
            session.previews.start_preview(&uri, &session.settings)
        };

        self.notify_preview_change(change).await;
    }

    /// Close previews of the document when configured to
    async fn handle_document_closed(&self, uri: Url) {
        let closed = {
            let mut session = self.session.lock().await;
            if !session.settings.close_preview_automatically {
                return;
            }
            session.previews.remove_for_source(&uri)
        };

        for preview in closed {
            self.client
                .send_notification::<ClosePreview>(PreviewParams::from_view(&preview))
                .await;
        }
    }
}

#[tower_lsp::async_trait]
impl HandleSettings for Backend {
    async fn update_settings(&self, values: &Map<String, Value>) {
        let update = self.session.lock().await.apply_settings(values);

        if !update.diff.is_empty() {
            log::info!("settings changed: {}", update.diff.changed.join(", "));
        }

        self.publish_session_update(update).await;
    }

    async fn reload_settings_file(&self) {
        let Some(path) = self.config.settings_path.as_deref() else {
            return;
        };

        match load_settings_file(path).await {
            Ok(values) => self.update_settings(&values).await,
            Err(e) => {
                log::warn!("{:#}", e);
                self.client
                    .log_message(MessageType::WARNING, format!("{:#}", e))
                    .await;
            }
        }
    }

    async fn watch_settings(&self, mut events: UnboundedReceiver<SettingsEvent>) {
        while let Some(event) = events.recv().await {
            match event {
                SettingsEvent::Changed(path) => {
                    self.client
                        .log_message(
                            MessageType::INFO,
                            format!("Settings file changed: {}", path.display()),
                        )
                        .await;
                    self.reload_settings_file().await;
                }
                SettingsEvent::Error(e) => {
                    self.client
                        .log_message(
                            MessageType::ERROR,
                            format!("Settings file watcher error: {}", e),
                        )
                        .await;
                }
            }
        }
    }

    async fn publish_session_update(&self, update: SessionUpdate) {
        for preview in &update.closed {
            self.client
                .send_notification::<ClosePreview>(PreviewParams::from_view(preview))
                .await;
        }

        for preview in &update.refreshed {
            self.client
                .send_notification::<RefreshPreview>(PreviewParams::with_settings(preview))
                .await;
        }
    }
}

impl Backend {
    /// `mpe/modifySource`: write a code chunk's output into its document.
    ///
    /// Always acknowledges with an empty string.
    pub async fn modify_source(&self, params: ModifySourceParams) -> LspResult<String> {
        let Some(ordinal) = params.code_chunk_data.offset() else {
            log::debug!("modify_source without code_chunk_offset, ignoring");
            return Ok(String::new());
        };

        let edit = {
            let mut docs = self.documents.lock().await;
            let mut host = WorkspaceHost::new(&mut docs);
            chunk::modify_source(&mut host, &params.file_path, ordinal, &params.result);
            host.into_pending_edit()
        };

        if let Some(pending) = edit {
            self.apply_workspace_edit(pending).await;
        }

        Ok(String::new())
    }

    /// `mpe/activeEditorChanged`: keep the shared preview on the active
    /// markdown document
    pub async fn active_editor_changed(&self, params: ActiveEditorParams) {
        let outcome = {
            let mut guard = self.session.lock().await;
            let session = &mut *guard;
            session
                .previews
                .active_editor_changed(&params.uri, &session.settings)
        };

        let Some(outcome) = outcome else {
            return;
        };

        if outcome.rebound {
            self.client
                .send_notification::<RefreshPreview>(PreviewParams::with_settings(&outcome.preview))
                .await;
        }
        if outcome.reveal {
            self.client
                .send_notification::<RevealPreview>(PreviewParams::from_view(&outcome.preview))
                .await;
        }
    }

    async fn toggle_preview(&self, uri: Url) {
        let change = {
            let mut guard = self.session.lock().await;
            let session = &mut *guard;
            session.previews.toggle_preview(&uri, &session.settings)
        };

        self.notify_preview_change(change).await;
    }

    async fn notify_preview_change(&self, change: PreviewChange) {
        match change {
            PreviewChange::Opened(preview) => {
                self.client
                    .send_notification::<OpenPreview>(PreviewParams::with_settings(&preview))
                    .await;
            }
            PreviewChange::Rebound(preview) => {
                self.client
                    .send_notification::<RefreshPreview>(PreviewParams::with_settings(&preview))
                    .await;
            }
            PreviewChange::Closed(preview) => {
                self.client
                    .send_notification::<ClosePreview>(PreviewParams::from_view(&preview))
                    .await;
            }
            PreviewChange::Unchanged(_) | PreviewChange::Ignored => {}
        }
    }

    async fn insert_text(&self, uri: &Url, position: Position, text: &str) {
        let edit = TextEdit::new(Range::new(position, position), text.to_string());

        let mut docs = self.documents.lock().await;
        let Some(doc) = docs.get_mut(uri) else {
            log::debug!("insert into unknown document {}", uri);
            return;
        };
        let edit = TextEdit::new(edit.range, doc.with_line_ending(&edit.new_text));
        let original = doc.clone();
        doc.apply(&edit);
        drop(docs);

        let pending = PendingEdit::single(uri.clone(), original, edit);
        self.apply_workspace_edit(pending).await;
    }

    /// Send edits already made to the mirror; roll the mirror back when the
    /// client does not apply them
    async fn apply_workspace_edit(&self, pending: PendingEdit) {
        let applied = match self.client.apply_edit(pending.edit.clone()).await {
            Ok(response) if !response.applied => {
                log::warn!(
                    "client rejected edit: {}",
                    response.failure_reason.unwrap_or_default()
                );
                false
            }
            Ok(_) => true,
            Err(e) => {
                log::warn!("failed to apply edit: {}", e);
                false
            }
        };

        if !applied {
            let restored = pending.restore(&mut *self.documents.lock().await);
            log::debug!("restored {} document(s) after failed edit", restored);
        }
    }

    async fn toggle_setting(&self, key: &str, enabled_message: &str, disabled_message: &str) {
        let toggled = self.session.lock().await.toggle_setting(key);
        let Some((enabled, update)) = toggled else {
            return;
        };

        self.publish_session_update(update).await;

        let message = if enabled {
            enabled_message
        } else {
            disabled_message
        };
        self.client.show_message(MessageType::INFO, message).await;
    }

    async fn open_config_file(&self, file_name: &str) {
        let Some(path) = engine_config_dir().map(|dir| dir.join(file_name)) else {
            self.client
                .show_message(MessageType::ERROR, "Could not determine home directory")
                .await;
            return;
        };
        let Ok(uri) = Url::from_file_path(&path) else {
            log::warn!("cannot express {} as a URI", path.display());
            return;
        };

        let params = ShowDocumentParams {
            uri,
            external: Some(false),
            take_focus: Some(true),
            selection: None,
        };
        match self.client.show_document(params).await {
            Ok(true) => {}
            Ok(false) => log::warn!("client did not show {}", path.display()),
            Err(e) => log::warn!("failed to show {}: {}", path.display(), e),
        }
    }

    async fn forward_preview_request(&self, uri: Option<&Url>, request: PreviewRequest) {
        let params = {
            let session = self.session.lock().await;
            uri.and_then(|uri| {
                session
                    .previews
                    .preview_for(uri, session.settings.single_preview)
            })
            .map(PreviewParams::from_view)
        };

        let Some(params) = params else {
            self.client
                .show_message(MessageType::ERROR, "Please open preview first.")
                .await;
            return;
        };

        log::debug!(
            "forwarding {} to {}",
            preview_request_method(request),
            params.preview_uri
        );

        match request {
            PreviewRequest::RunCodeChunk => {
                self.client.send_notification::<RunCodeChunk>(params).await
            }
            PreviewRequest::RunAllCodeChunks => {
                self.client.send_notification::<RunAllCodeChunks>(params).await
            }
            PreviewRequest::StartImageHelper => {
                self.client.send_notification::<StartImageHelper>(params).await
            }
        }
    }

    async fn drop_image(&self, uri: &Url, position: Position, image: &Path) {
        let Ok(document) = uri.to_file_path() else {
            return;
        };

        let (plan, uploader) = {
            let session = self.session.lock().await;
            let settings = &session.settings;
            (
                plan_image_drop(
                    &document,
                    image,
                    settings.image_drop_action,
                    &settings.image_folder_path,
                    session.workspace_root.as_deref(),
                ),
                settings.image_uploader.clone(),
            )
        };

        let Some(plan) = plan else {
            log::debug!("ignoring drop of non-image {}", image.display());
            return;
        };

        match plan {
            DropPlan::Insert { text } => self.insert_text(uri, position, &text).await,
            DropPlan::Copy { from, to, text } => match copy_image(&from, &to).await {
                Ok(()) => self.insert_text(uri, position, &text).await,
                Err(e) => {
                    self.client
                        .show_message(MessageType::ERROR, format!("{:#}", e))
                        .await;
                }
            },
            DropPlan::Upload { image } => {
                let params = UploadImageParams {
                    source_uri: uri.clone(),
                    image_path: image,
                    uploader,
                };
                self.client.send_notification::<UploadImage>(params).await;
            }
        }
    }
}
