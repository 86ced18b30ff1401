//! Image Drop
//!
//! Decides what dropping an image file onto a markdown document does: link
//! it in place, copy it into the image folder first, or hand it to the
//! engine's uploader.

use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

/// The `imageDropAction` setting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ImageDropAction {
    #[serde(rename = "upload")]
    Upload,
    #[serde(rename = "insert relative image path")]
    InsertRelativePath,
    #[serde(rename = "copy to image folder")]
    CopyToImageFolder,
}

impl ImageDropAction {
    /// Parse a setting value; only the leading word is significant
    pub fn parse(value: &str) -> Option<Self> {
        if value == "upload" {
            Some(Self::Upload)
        } else if value.starts_with("insert") {
            Some(Self::InsertRelativePath)
        } else if value.starts_with("copy") {
            Some(Self::CopyToImageFolder)
        } else {
            None
        }
    }
}

const IMAGE_EXTENSIONS: &[&str] = &[
    "apng", "avif", "bmp", "gif", "ico", "jpeg", "jpg", "png", "svg", "tif", "tiff", "webp",
];

pub fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
}

/// What to do with a dropped file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropPlan {
    /// Insert `text` at the drop position
    Insert { text: String },
    /// Copy `from` to `to`, then insert `text`
    Copy {
        from: PathBuf,
        to: PathBuf,
        text: String,
    },
    /// Ask the engine to upload the image
    Upload { image: PathBuf },
}

/// Where dropped images are copied to.
///
/// A folder starting with `/` is relative to the workspace root (the
/// document's directory without one); other relative folders are relative
/// to the document's directory.
pub fn resolve_image_folder(folder: &str, document_dir: &Path, root: Option<&Path>) -> PathBuf {
    if let Some(stripped) = folder.strip_prefix('/') {
        root.unwrap_or(document_dir).join(stripped)
    } else if Path::new(folder).is_absolute() {
        PathBuf::from(folder)
    } else {
        document_dir.join(folder)
    }
}

/// Plan the drop of `image` onto the document at `document`.
///
/// Returns `None` for files that are not images.
pub fn plan_image_drop(
    document: &Path,
    image: &Path,
    action: ImageDropAction,
    image_folder: &str,
    root: Option<&Path>,
) -> Option<DropPlan> {
    if !is_image_file(image) {
        return None;
    }

    let document_dir = document.parent().unwrap_or(Path::new(""));

    let plan = match action {
        ImageDropAction::Upload => DropPlan::Upload {
            image: image.to_path_buf(),
        },
        ImageDropAction::InsertRelativePath => DropPlan::Insert {
            text: image_link(image, &relative_path(document_dir, image)),
        },
        ImageDropAction::CopyToImageFolder => {
            let folder = resolve_image_folder(image_folder, document_dir, root);
            let to = folder.join(image.file_name()?);
            DropPlan::Copy {
                from: image.to_path_buf(),
                text: image_link(image, &relative_path(document_dir, &to)),
                to,
            }
        }
    };

    Some(plan)
}

/// Copy a dropped image into place, creating the destination folder
pub async fn copy_image(from: &Path, to: &Path) -> Result<()> {
    if let Some(dir) = to.parent() {
        tokio::fs::create_dir_all(dir)
            .await
            .with_context(|| format!("Failed to create image folder {}", dir.display()))?;
    }

    tokio::fs::copy(from, to)
        .await
        .with_context(|| format!("Failed to copy {} to {}", from.display(), to.display()))?;

    log::info!("copied image {} to {}", from.display(), to.display());
    Ok(())
}

/// Markdown image link, described by the file stem
pub fn image_link(image: &Path, target: &Path) -> String {
    let description = image
        .file_stem()
        .map(|stem| stem.to_string_lossy())
        .unwrap_or_default();
    let target = target.to_string_lossy().replace('\\', "/");
    format!("![{}]({})", description, target)
}

/// Path of `to` relative to the directory `from_dir`
pub fn relative_path(from_dir: &Path, to: &Path) -> PathBuf {
    let from: Vec<Component> = from_dir.components().collect();
    let target: Vec<Component> = to.components().collect();

    let common = from
        .iter()
        .zip(&target)
        .take_while(|(a, b)| a == b)
        .count();

    let mut relative = PathBuf::new();
    for component in &from[common..] {
        if !matches!(component, Component::CurDir) {
            relative.push("..");
        }
    }
    for component in &target[common..] {
        relative.push(component.as_os_str());
    }
    relative
}
