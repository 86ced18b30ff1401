use anyhow::Result;
use tokio::io::{stdin, stdout};
use tower_lsp::{LspService, Server};

use crate::lsp::backend::Backend;
use crate::lsp::handlers::HandleSettings;
use crate::lsp::protocol::{ACTIVE_EDITOR_CHANGED_METHOD, MODIFY_SOURCE_METHOD};
use crate::session::Session;
use crate::settings::{load_settings_file, PreviewSettings, SettingsWatcher};
use crate::Config;

/// Start the LSP server
pub async fn serve() -> Result<()> {
    let config = Config::from_args_and_env()?;

    env_logger::Builder::from_default_env()
        .parse_filters(&config.log_level)
        .init();

    let settings = initial_settings(&config).await;

    // The watcher must outlive the server loop
    let mut watcher = None;
    let mut events = None;
    if config.watch_settings {
        if let Some(path) = config.settings_path.as_deref() {
            match SettingsWatcher::start(path) {
                Ok((w, rx)) => {
                    watcher = Some(w);
                    events = Some(rx);
                }
                Err(e) => log::warn!("Failed to watch settings file: {:#}", e),
            }
        }
    }

    let (service, socket) = LspService::build(move |client| {
        let backend = Backend::new(client, config, Session::new(settings));

        if let Some(rx) = events {
            let watching = backend.clone();
            tokio::spawn(async move { watching.watch_settings(rx).await });
        }

        backend
    })
    .custom_method(MODIFY_SOURCE_METHOD, Backend::modify_source)
    .custom_method(ACTIVE_EDITOR_CHANGED_METHOD, Backend::active_editor_changed)
    .finish();

    Server::new(stdin(), stdout(), socket).serve(service).await;

    drop(watcher);
    Ok(())
}

/// Settings from the settings file, defaults when it is missing or invalid
async fn initial_settings(config: &Config) -> PreviewSettings {
    let Some(path) = config.settings_path.as_deref() else {
        return PreviewSettings::default();
    };

    if !path.exists() {
        log::debug!("no settings file at {}", path.display());
        return PreviewSettings::default();
    }

    match load_settings_file(path).await {
        Ok(values) => PreviewSettings::from_values(&values),
        Err(e) => {
            log::warn!("{:#}", e);
            PreviewSettings::default()
        }
    }
}
