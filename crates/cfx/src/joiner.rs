//! 🔀 The Typed Record Filter-Joiner: two scans and a dictionary walk into a bar.
//!
//! 🎬 COLD OPEN: INT. MIGRATION WAR ROOM - THE NIGHT BEFORE GO-LIVE
//!
//! "We only want the news items," said the product owner.
//! "And the alerts attached to them," said the other product owner.
//! "The alerts are in the same export," said the export. Nobody had asked it.
//!
//! This module is the whole reason the crate exists. Everything else is
//! plumbing to get a `Vec<Record>` in front of [`TypedRecordFilterJoiner::process`].
//!
//! ```text
//!   records ──┬──▶ [alert pass] ── type == "alert" ──▶ AlertIndex { id -> alert }
//!             │                                              │
//!             └──▶ [type pass] ── type == target ──▶ retained │
//!                                                      │      │
//!                                   (with_alerts) ─────┴──────┘
//!                                        for each ref in alertsInline.<locale>:
//!                                            alerts[ref] = index[ref]  (if any)
//! ```
//!
//! ## The permissive policy 🧘
//! Nothing in here returns an error. Missing classification: dropped. Missing
//! alert id: not indexed. Missing `alertsInline`: empty `alerts`. Dangling
//! reference: skipped. A bulk export with a few broken entries should not
//! take the whole migration down with it.
//!
//! ## Knowledge Graph 🧠
//! - Depends on: `common::Record` (path accessors)
//! - Used by: `parsers::ContentfulParser` (after the source has fetched)
//! - Both scans read the same input snapshot, never each other's output.
//! - With alerts off, there is exactly one pass over the input.

use std::collections::HashMap;

use serde_json::{Map, Value};
use tracing::{debug, trace, warn};

use crate::common::Record;

/// 🚨 The content type id that marks an entry as an alert.
pub const ALERT_CONTENT_TYPE: &str = "alert";

/// 🌍 The locale `alertsInline` is read from when nobody says otherwise.
pub const DEFAULT_ALERTS_LOCALE: &str = "en-GB";

/// 📇 Alert records by `sys.id`. Alerts without an id can't be referenced, so they don't get in.
///
/// Duplicate ids: last one in scan order wins. Same as any map insert.
#[derive(Debug, Default, Clone)]
pub struct AlertIndex {
    by_id: HashMap<String, Value>,
}

impl AlertIndex {
    /// 🔍 Scan every record once and index the ones classified as alerts.
    pub fn build(records: &[Record]) -> Self {
        let mut by_id = HashMap::new();
        for the_candidate in records {
            if the_candidate.content_type_id() != Some(ALERT_CONTENT_TYPE) {
                continue;
            }
            match the_candidate.id() {
                Some(the_id) => {
                    by_id.insert(the_id.to_string(), the_candidate.as_value().clone());
                }
                None => trace!("🚨 alert without a sys.id, nobody can reference it, skipping"),
            }
        }
        Self { by_id }
    }

    pub fn get(&self, alert_id: &str) -> Option<&Value> {
        self.by_id.get(alert_id)
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

/// 🔀 Keeps the records of one content type and, optionally, joins their alerts in.
///
/// Built once per parser from config, then [`process`](Self::process) is called
/// once per fetched url. Holds no state between calls.
#[derive(Debug, Clone)]
pub struct TypedRecordFilterJoiner {
    target_type: String,
    include_alerts: bool,
    alerts_locale: String,
}

impl TypedRecordFilterJoiner {
    pub fn new(target_type: impl Into<String>, include_alerts: bool) -> Self {
        Self {
            target_type: target_type.into(),
            include_alerts,
            alerts_locale: DEFAULT_ALERTS_LOCALE.to_string(),
        }
    }

    /// 🌍 Read `alertsInline` under a different locale key.
    pub fn with_alerts_locale(mut self, locale: impl Into<String>) -> Self {
        self.alerts_locale = locale.into();
        self
    }

    pub fn target_type(&self) -> &str {
        &self.target_type
    }

    pub fn include_alerts(&self) -> bool {
        self.include_alerts
    }

    pub fn alerts_locale(&self) -> &str {
        &self.alerts_locale
    }

    /// 🎯 Filter to the target type, then (maybe) attach alerts. Never fails.
    ///
    /// - Output order is input order.
    /// - An empty target type only matches records whose classification is also `""`.
    /// - With alerts off, no record gets an `alerts` key and the input is scanned once.
    /// - With alerts on, every retained record gets an `alerts` map, possibly empty.
    pub fn process(&self, records: Vec<Record>) -> Vec<Record> {
        if self.target_type.is_empty() {
            warn!("⚠️ no content_type configured. only entries with an empty content type will match.");
        }

        let the_scanned_count = records.len();

        // -- 📇 alert pass first, against the untouched input. The type pass consumes it.
        let the_alert_index = self.include_alerts.then(|| AlertIndex::build(&records));

        let mut the_retained: Vec<Record> = records
            .into_iter()
            .filter(|record| record.content_type_id() == Some(self.target_type.as_str()))
            .collect();

        debug!(
            "🔀 kept {} of {} records with content type '{}'",
            the_retained.len(),
            the_scanned_count,
            self.target_type
        );

        let Some(the_alert_index) = the_alert_index else {
            // -- ✅ not concerned with alerts. that's all we need to do.
            return the_retained;
        };

        debug!("📇 indexed {} alerts for cross-referencing", the_alert_index.len());

        for the_record in &mut the_retained {
            let the_alerts = self.collect_alerts(the_record, &the_alert_index);
            the_record.attach_alerts(the_alerts);
        }

        the_retained
    }

    // -- 🔗 resolve one record's alertsInline refs against the index. dangling refs just fall out.
    fn collect_alerts(&self, record: &Record, index: &AlertIndex) -> Map<String, Value> {
        let mut the_alerts = Map::new();
        let Some(the_references) = record.alert_references(&self.alerts_locale) else {
            return the_alerts;
        };
        for the_alert_id in the_references {
            match index.get(the_alert_id) {
                Some(the_alert) => {
                    the_alerts.insert(the_alert_id.to_string(), the_alert.clone());
                }
                None => trace!(
                    "🔗 record {:?} points at alert '{}', which isn't in the export",
                    record.id(),
                    the_alert_id
                ),
            }
        }
        the_alerts
    }
}

/// 🎯 One-shot filter/join with the default alerts locale.
pub fn process(records: Vec<Record>, target_type: &str, include_alerts: bool) -> Vec<Record> {
    TypedRecordFilterJoiner::new(target_type, include_alerts).process(records)
}
