//! Settings file watching.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

/// Events from the settings file watcher
#[derive(Debug)]
pub enum SettingsEvent {
    Changed(PathBuf),
    Error(notify::Error),
}

/// Watches the directory holding the settings file and reports changes to
/// that file only. Watching stops when this is dropped.
pub struct SettingsWatcher {
    _watcher: RecommendedWatcher,
    path: PathBuf,
}

impl SettingsWatcher {
    /// Start watching `path`; its parent directory must exist
    pub fn start(path: &Path) -> Result<(Self, mpsc::UnboundedReceiver<SettingsEvent>)> {
        let dir = path
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        let file_name: OsString = path
            .file_name()
            .ok_or_else(|| anyhow!("Settings path has no file name: {}", path.display()))?
            .to_os_string();

        let (tx, rx) = mpsc::unbounded_channel();

        let mut watcher = RecommendedWatcher::new(
            move |res: Result<Event, notify::Error>| match res {
                Ok(event) => {
                    if let EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_) =
                        event.kind
                    {
                        for changed in event.paths {
                            if changed.file_name() == Some(file_name.as_os_str()) {
                                let _ = tx.send(SettingsEvent::Changed(changed));
                            }
                        }
                    }
                }
                Err(e) => {
                    let _ = tx.send(SettingsEvent::Error(e));
                }
            },
            notify::Config::default().with_poll_interval(Duration::from_secs(1)),
        )?;

        watcher
            .watch(dir, RecursiveMode::NonRecursive)
            .with_context(|| format!("Failed to watch {}", dir.display()))?;

        log::info!("Watching settings file {}", path.display());

        Ok((
            Self {
                _watcher: watcher,
                path: path.to_path_buf(),
            },
            rx,
        ))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
