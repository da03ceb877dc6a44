//! 📂 Previously, on "Things That Could Go Wrong With An Export File"...
//!
//! The file didn't exist. Then it existed but was empty. Then it was 400MB of
//! JSON with the entries hiding under a key nobody documented. This source
//! reads a Contentful export from disk, parses it with serde_json, and pulls
//! the entry array out from under the configured top-level key.
//!
//! 🚰 path ──▶ tokio::fs::read ──▶ serde_json::Value ──▶ [item_selector] ──▶ Vec<Record>
//! 💀 Missing file / bad JSON / missing key / not an array ──▶ anyhow error with context
//! 🦆 (mandatory, no notes)

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::trace;

use super::RecordSource;
use crate::common::Record;

/// 🔌 Urls may arrive as `file:///exports/x.json`. We only want the path part.
const FILE_SCHEME: &str = "file://";

// -- 📂 FileSourceConfig lives next to the FileSource that uses it. Config where the code is.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct FileSourceConfig {
    /// 🎯 Top-level key holding the entry array (Contentful exports use `entries`).
    /// `None` means the document root is the array.
    #[serde(default)]
    pub item_selector: Option<String>,
}

/// 📂 Reads one JSON export per url from the local filesystem.
#[derive(Debug, Clone)]
pub struct FileSource {
    source_config: FileSourceConfig,
}

impl FileSource {
    pub fn new(source_config: FileSourceConfig) -> Self {
        Self { source_config }
    }

    // -- 🎯 walk one key down (or none) and insist on an array. nested selectors are not our business.
    fn select_items(&self, document: Value, path: &str) -> Result<Vec<Value>> {
        let the_items = match &self.source_config.item_selector {
            Some(the_selector) => match document {
                Value::Object(mut the_root) => the_root.remove(the_selector).with_context(|| {
                    format!(
                        "💀 Export '{path}' has no top-level '{the_selector}' key. \
                         The entries are in there somewhere, just not where the config said."
                    )
                })?,
                _ => bail!(
                    "💀 Export '{path}' is not a JSON object, so there is no '{the_selector}' key to look under."
                ),
            },
            None => document,
        };

        match the_items {
            Value::Array(the_items) => Ok(the_items),
            the_other_thing => bail!(
                "💀 Expected an array of entries in '{path}', found {}. \
                 A list was promised. A list was not delivered.",
                json_kind(&the_other_thing)
            ),
        }
    }
}

#[async_trait]
impl RecordSource for FileSource {
    async fn fetch_records(&self, url: &str) -> Result<Vec<Record>> {
        let the_path = url.strip_prefix(FILE_SCHEME).unwrap_or(url);

        let the_bytes = tokio::fs::read(the_path).await.with_context(|| {
            format!(
                "💀 The door to '{the_path}' would not budge. We knocked. We pleaded. \
                 It might not exist, or the permissions might be wrong."
            )
        })?;
        trace!("📖 read {} bytes from '{}'", the_bytes.len(), the_path);

        let the_document: Value = serde_json::from_slice(&the_bytes)
            .with_context(|| format!("💀 '{the_path}' is not valid JSON. The export has opinions about syntax."))?;

        let the_items = self.select_items(the_document, the_path)?;
        Ok(the_items.into_iter().map(Record::new).collect())
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_export(contents: &str) -> tempfile::NamedTempFile {
        let mut the_file = tempfile::NamedTempFile::new()
            .expect("💀 Failed to create a temp file. The filesystem said 'new phone who dis'.");
        the_file
            .write_all(contents.as_bytes())
            .expect("💀 Failed to write the test export.");
        the_file
    }

    fn path_of(file: &tempfile::NamedTempFile) -> String {
        file.path().display().to_string()
    }

    #[tokio::test]
    async fn the_one_where_entries_hide_under_a_selector() -> Result<()> {
        let the_export = write_export(
            r#"{"contentTypes": [], "entries": [{"sys": {"id": "n1"}}, {"sys": {"id": "n2"}}]}"#,
        );
        let the_source = FileSource::new(FileSourceConfig {
            item_selector: Some("entries".to_string()),
        });

        let the_records = the_source.fetch_records(&path_of(&the_export)).await?;

        assert_eq!(the_records.iter().filter_map(Record::id).collect::<Vec<_>>(), vec!["n1", "n2"]);
        Ok(())
    }

    #[tokio::test]
    async fn the_one_where_the_root_is_already_the_list() -> Result<()> {
        let the_export = write_export(r#"[{"sys": {"id": "only"}}]"#);
        let the_source = FileSource::new(FileSourceConfig::default());

        let the_url = format!("file://{}", path_of(&the_export));
        let the_records = the_source.fetch_records(&the_url).await?;

        assert_eq!(the_records.len(), 1);
        assert_eq!(the_records[0].id(), Some("only"));
        Ok(())
    }

    #[tokio::test]
    async fn the_one_where_the_selector_points_at_nothing() {
        let the_export = write_export(r#"{"items": []}"#);
        let the_source = FileSource::new(FileSourceConfig {
            item_selector: Some("entries".to_string()),
        });

        let the_error = the_source
            .fetch_records(&path_of(&the_export))
            .await
            .expect_err("💀 a missing selector key should be an error");
        assert!(the_error.to_string().contains("entries"));
    }

    #[tokio::test]
    async fn the_one_where_the_entries_are_not_a_list() {
        let the_export = write_export(r#"{"entries": {"sys": {"id": "n1"}}}"#);
        let the_source = FileSource::new(FileSourceConfig {
            item_selector: Some("entries".to_string()),
        });

        let the_error = the_source
            .fetch_records(&path_of(&the_export))
            .await
            .expect_err("💀 an object where a list should be is an error");
        assert!(the_error.to_string().contains("an object"));
    }

    #[tokio::test]
    async fn the_one_where_the_json_is_broken() {
        let the_export = write_export(r#"{"entries": [ {"sys": "#);
        let the_source = FileSource::new(FileSourceConfig::default());
        assert!(the_source.fetch_records(&path_of(&the_export)).await.is_err());
    }

    #[tokio::test]
    async fn the_one_where_the_file_is_not_there() {
        let the_source = FileSource::new(FileSourceConfig::default());
        let the_result = the_source
            .fetch_records("/definitely/not/a/real/export/cfx-nope.json")
            .await;
        assert!(the_result.is_err());
    }
}
