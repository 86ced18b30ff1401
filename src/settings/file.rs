//! Settings file loading.

use std::path::Path;

use anyhow::{Context, Result};
use serde_json::{Map, Value};

use super::SETTINGS_SECTION;

/// Parse settings TOML into configuration values.
///
/// Values are read from the `[markdown-preview-enhanced]` table, or from
/// the top level when the file has no such table.
pub fn parse_settings_toml(content: &str) -> Result<Map<String, Value>> {
    let mut table: toml::Table = toml::from_str(content).context("Failed to parse settings TOML")?;

    let section = match table.remove(SETTINGS_SECTION) {
        Some(toml::Value::Table(section)) => section,
        _ => table,
    };

    match serde_json::to_value(section).context("Failed to convert settings")? {
        Value::Object(values) => Ok(values),
        _ => Ok(Map::new()),
    }
}

/// Read and parse a settings file
pub async fn load_settings_file(path: &Path) -> Result<Map<String, Value>> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read settings file: {}", path.display()))?;

    parse_settings_toml(&content)
        .with_context(|| format!("Invalid settings file: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_section_table_is_preferred() {
        let values = parse_settings_toml(
            r#"
            other = 1

            [markdown-preview-enhanced]
            scrollSync = false
            previewTheme = "one-dark.css"
            "#,
        )
        .expect("parse settings");

        assert_eq!(values.get("scrollSync"), Some(&json!(false)));
        assert_eq!(values.get("previewTheme"), Some(&json!("one-dark.css")));
        assert!(values.get("other").is_none());
    }

    #[test]
    fn test_top_level_keys_without_section() {
        let values = parse_settings_toml("singlePreview = true\nfileExtension = \".md, .txt\"")
            .expect("parse settings");
        assert_eq!(values.get("singlePreview"), Some(&json!(true)));
        assert_eq!(values.get("fileExtension"), Some(&json!(".md, .txt")));
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        assert!(parse_settings_toml("scrollSync = ").is_err());
    }
}
