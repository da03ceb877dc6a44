//! 🎭 Parsers: a source in a trench coat, with opinions about content types.
//!
//! 🎬 The JSON selectors could walk to the `entries` array just fine. What
//! they couldn't do was say "only the news, please". You could filter later,
//! at migrate time, but then every count upstream would be a lie: 40,000
//! records reported, 312 actually migrated, one very confused dashboard.
//!
//! So the filtering happens here, at the source. [`ContentfulParser`] wraps
//! any [`RecordSource`], fetches once, and hands the records to a
//! [`TypedRecordFilterJoiner`]. It is itself a `RecordSource`, so downstream
//! code can't tell (and shouldn't care) that a filter is in the way.
//!
//! ## Knowledge Graph 🧠
//! - Wraps: `sources::RecordSource` (composition, not inheritance)
//! - Delegates to: `joiner::TypedRecordFilterJoiner` (the actual logic)
//! - Config: `ContentfulParserConfig`, co-located here because this is where it's used
//! - Errors: only ever the wrapped source's. The joiner cannot fail.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::info;

use crate::common::Record;
use crate::joiner::{DEFAULT_ALERTS_LOCALE, TypedRecordFilterJoiner};
use crate::sources::RecordSource;

/// 🔧 The knobs the migration framework turns on this parser.
///
/// ```toml
/// [parser_config]
/// content_type = "news"
/// with_alerts = true
/// alerts_locale = "en-GB"
/// ```
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ContentfulParserConfig {
    /// 🏷️ Content type id to keep. Empty only keeps entries whose content type is also empty.
    #[serde(default)]
    pub content_type: String,
    /// 🚨 Join referenced alerts into each kept record.
    #[serde(default)]
    pub with_alerts: bool,
    /// 🌍 Locale key under `fields.alertsInline` holding the alert references.
    #[serde(default = "default_alerts_locale")]
    pub alerts_locale: String,
}

fn default_alerts_locale() -> String {
    DEFAULT_ALERTS_LOCALE.to_string()
}

impl Default for ContentfulParserConfig {
    fn default() -> Self {
        Self {
            content_type: String::new(),
            with_alerts: false,
            alerts_locale: default_alerts_locale(),
        }
    }
}

impl From<&ContentfulParserConfig> for TypedRecordFilterJoiner {
    fn from(config: &ContentfulParserConfig) -> Self {
        TypedRecordFilterJoiner::new(config.content_type.clone(), config.with_alerts)
            .with_alerts_locale(config.alerts_locale.clone())
    }
}

/// 🎭 Fetch through the wrapped source, then filter to one content type (and join alerts).
#[derive(Debug)]
pub struct ContentfulParser<S> {
    source: S,
    joiner: TypedRecordFilterJoiner,
}

impl<S: RecordSource> ContentfulParser<S> {
    pub fn new(source: S, parser_config: &ContentfulParserConfig) -> Self {
        Self {
            source,
            joiner: TypedRecordFilterJoiner::from(parser_config),
        }
    }

    pub fn joiner(&self) -> &TypedRecordFilterJoiner {
        &self.joiner
    }

    pub fn into_inner(self) -> S {
        self.source
    }

    /// 📊 How many records `url` yields after filtering. The honest count.
    pub async fn count(&self, url: &str) -> Result<usize> {
        Ok(self.fetch_records(url).await?.len())
    }

    /// 📚 Fetch every url in order and concatenate the filtered results.
    ///
    /// Stops at the first url that fails. A half-migrated list is worse than none.
    pub async fn fetch_all<U: AsRef<str>>(&self, urls: &[U]) -> Result<Vec<Record>> {
        let mut the_records = Vec::new();
        for the_url in urls {
            let the_url = the_url.as_ref();
            let the_batch = self
                .fetch_records(the_url)
                .await
                .with_context(|| format!("💀 Failed to parse Contentful export at '{the_url}'"))?;
            the_records.extend(the_batch);
        }
        Ok(the_records)
    }
}

#[async_trait]
impl<S: RecordSource> RecordSource for ContentfulParser<S> {
    async fn fetch_records(&self, url: &str) -> Result<Vec<Record>> {
        let the_raw_records = self.source.fetch_records(url).await?;
        let the_raw_count = the_raw_records.len();

        let the_records = self.joiner.process(the_raw_records);

        info!(
            "🎯 '{}': kept {} of {} records as '{}' (alerts: {})",
            url,
            the_records.len(),
            the_raw_count,
            self.joiner.target_type(),
            self.joiner.include_alerts()
        );
        Ok(the_records)
    }
}
