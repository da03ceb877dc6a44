//! 🧠 In-memory source: an export that never touched a disk.
//!
//! Handy for tests, and for embedders who already have the parsed records
//! and just want the filter/join on top.

use std::collections::HashMap;

use anyhow::{Context, Result};
use async_trait::async_trait;

use super::RecordSource;
use crate::common::Record;

/// 📦 A url-to-records lookup table pretending to be a CMS.
///
/// Asking for a url it doesn't know is an error, same as a missing file would be.
#[derive(Debug, Default, Clone)]
pub struct InMemorySource {
    exports: HashMap<String, Vec<Record>>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// 📥 Register the records served for `url`. Replaces anything already there.
    pub fn with_records(mut self, url: impl Into<String>, records: Vec<Record>) -> Self {
        self.exports.insert(url.into(), records);
        self
    }
}

#[async_trait]
impl RecordSource for InMemorySource {
    async fn fetch_records(&self, url: &str) -> Result<Vec<Record>> {
        // -- 📋 clone because the same url may be fetched again. RAM is cheap, flakiness isn't.
        self.exports
            .get(url)
            .cloned()
            .with_context(|| format!("💀 No in-memory export registered for '{url}'. We checked every drawer."))
    }
}
