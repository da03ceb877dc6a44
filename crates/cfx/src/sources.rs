//! 🚰 Sources: where the records come from before anyone filters them.
//!
//! A source takes a url, does whatever I/O it takes, and hands back every
//! record it found. No filtering, no joining, no opinions about content types.
//! That's the parser's job (see `parsers`), which wraps a source instead of
//! inheriting from one.
//!
//! ```text
//!   url ──▶ SourceBackend::fetch_records ──▶ Vec<Record> ──▶ ContentfulParser ──▶ filtered Vec<Record>
//! ```
//!
//! 🦆 The duck is here because every file must have one. This is law.

use anyhow::Result;
use async_trait::async_trait;

use crate::app_config::SourceConfig;
use crate::common::Record;

mod file;
mod in_mem;

pub use file::{FileSource, FileSourceConfig};
pub use in_mem::InMemorySource;

/// 🚰 Fetches and parses every record behind a url.
///
/// # Contract 📜
/// - Returns the records in the order the export lists them.
/// - Does not filter. A source that starts having opinions becomes a parser.
/// - `Err(...)` is for I/O and parse failures. An empty export is `Ok(vec![])`.
#[async_trait]
pub trait RecordSource: std::fmt::Debug + Send + Sync {
    /// 📄 Fetch everything behind `url`, parsed into records.
    async fn fetch_records(&self, url: &str) -> Result<Vec<Record>>;
}

/// 🎭 The many faces of a source. Callers hold this and never ask which one it is.
#[derive(Debug)]
pub enum SourceBackend {
    InMemory(InMemorySource),
    File(FileSource),
}

impl SourceBackend {
    /// 🔧 Build the backend a config asks for.
    pub fn from_config(source_config: &SourceConfig) -> Self {
        match source_config {
            SourceConfig::File(file_config) => Self::File(FileSource::new(file_config.clone())),
        }
    }
}

#[async_trait]
impl RecordSource for SourceBackend {
    async fn fetch_records(&self, url: &str) -> Result<Vec<Record>> {
        match self {
            SourceBackend::InMemory(source) => source.fetch_records(url).await,
            SourceBackend::File(source) => source.fetch_records(url).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn the_one_where_file_config_resolves_to_a_file_source() {
        let the_config = SourceConfig::File(FileSourceConfig {
            item_selector: Some("entries".to_string()),
        });
        let the_backend = SourceBackend::from_config(&the_config);
        assert!(matches!(the_backend, SourceBackend::File(_)));
    }

    #[tokio::test]
    async fn the_one_where_the_enum_forwards_to_the_in_memory_source() -> Result<()> {
        let the_records = vec![Record::new(serde_json::json!({ "sys": { "id": "x" } }))];
        let the_backend =
            SourceBackend::InMemory(InMemorySource::new().with_records("mem://one", the_records));
        let the_records = the_backend.fetch_records("mem://one").await?;
        assert_eq!(the_records.len(), 1);
        Ok(())
    }
}
