//! 📦 Common data structures: the humble `Record`.
//!
//! ---
//!
//! 🎬 COLD OPEN: INT. CONTENTFUL EXPORT FILE - 11:58 PM
//!
//! Forty thousand entries sit in one JSON array. News items. Events. Alerts.
//! A landing page someone made in 2019 and never touched again. They all look
//! the same from a distance: a `sys` block, a `fields` block, and the quiet
//! confidence of data that has never been validated.
//!
//! ✅ A `Record` is one of those entries. We don't model the fields. We don't
//! want to. Field mapping lives downstream in the migration framework, and it
//! has its own problems. We only ever look at three paths:
//!
//! ```text
//! sys.id                                   -> Record::id
//! sys.contentType.sys.id                   -> Record::content_type_id
//! fields.alertsInline.<locale>[*].sys.id   -> Record::alert_references
//! ```
//!
//! Everything else rides along untouched inside the wrapped `serde_json::Value`.
//! 🦆

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// 🏷️ The key we hang the joined alerts on. Top-level, next to `sys` and `fields`.
pub const ALERTS_KEY: &str = "alerts";

/// 🎯 One entry from a Contentful export.
///
/// A thin, transparent wrapper around the parsed JSON value. Serializes and
/// deserializes exactly like the value it holds, so a `Vec<Record>` reads and
/// writes the same JSON as a `Vec<Value>`.
///
/// Accessors return `Option` because the export is allowed to be weird. A
/// path only counts as present if it holds a JSON string: `null`, numbers and
/// friends are treated as missing. Numeric ids like `42` are missing too, which
/// is stricter than the Drupal JSON parser's `isset` plus loose `!=` comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Value);

impl Record {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// 🔑 `sys.id`, the entry's identity. Alerts get indexed by this.
    pub fn id(&self) -> Option<&str> {
        sys_id(&self.0)
    }

    /// 🏷️ `sys.contentType.sys.id`, the classification. `news`, `event`, `alert`...
    pub fn content_type_id(&self) -> Option<&str> {
        self.0
            .get("sys")
            .and_then(|sys| sys.get("contentType"))
            .and_then(sys_id)
    }

    /// 🔗 The alert ids referenced under `fields.alertsInline.<locale>`, in listed order.
    ///
    /// `None` when the locale entry is missing or isn't an array. References
    /// without a string `sys.id` are skipped, not reported.
    pub fn alert_references<'a>(
        &'a self,
        locale: &str,
    ) -> Option<impl Iterator<Item = &'a str> + use<'a>> {
        let the_reference_list = self
            .0
            .get("fields")
            .and_then(|fields| fields.get("alertsInline"))
            .and_then(|alerts_inline| alerts_inline.get(locale))
            .and_then(Value::as_array)?;
        Some(the_reference_list.iter().filter_map(sys_id))
    }

    /// 🚨 The joined alerts map, if this record has been through alert enrichment.
    pub fn alerts(&self) -> Option<&Map<String, Value>> {
        self.0.get(ALERTS_KEY).and_then(Value::as_object)
    }

    /// 📎 Hang an alerts map on this record, replacing any previous one.
    ///
    /// No-op for non-object records. Those never survive the type filter anyway.
    pub(crate) fn attach_alerts(&mut self, alerts: Map<String, Value>) {
        if let Value::Object(ref mut the_body) = self.0 {
            the_body.insert(ALERTS_KEY.to_string(), Value::Object(alerts));
        }
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }
}

impl From<Value> for Record {
    fn from(value: Value) -> Self {
        Self::new(value)
    }
}

// -- 🔍 `<value>.sys.id` as a string. The one path every Contentful link shares.
fn sys_id(value: &Value) -> Option<&str> {
    value.get("sys")?.get("id")?.as_str()
}
