//! 🚀 cfx: Contentful exports in, one content type (plus its alerts) out.
//!
//! The crate is a data parser for content migrations. A [`sources::RecordSource`]
//! fetches every entry in an export, a [`parsers::ContentfulParser`] wraps it and
//! keeps only the configured content type, optionally joining referenced alert
//! entries onto each record. The filter/join itself lives in [`joiner`] and
//! never fails; everything that can fail is I/O or config.
//!
//! ```text
//!   AppConfig ──▶ SourceBackend ──▶ ContentfulParser ──▶ Vec<Record> ──▶ (your migration)
//! ```

pub mod app_config;
pub mod common;
pub mod joiner;
pub mod parsers;
pub mod sources;

use anyhow::{Context, Result};
use tracing::info;

use crate::app_config::AppConfig;
use crate::common::Record;
use crate::parsers::ContentfulParser;
use crate::sources::SourceBackend;

/// 🚀 Parse every configured url and return the filtered, maybe-enriched records.
pub async fn run(app_config: AppConfig) -> Result<Vec<Record>> {
    let the_source = SourceBackend::from_config(&app_config.source_config);
    let the_parser = ContentfulParser::new(the_source, &app_config.parser_config);

    let the_records = the_parser
        .fetch_all(app_config.urls.as_slice())
        .await
        .context("💀 Failed to parse the configured Contentful exports")?;

    info!(
        "✅ parsed {} url(s) into {} '{}' records",
        app_config.urls.len(),
        the_records.len(),
        app_config.parser_config.content_type
    );
    Ok(the_records)
}
