//! Untyped input records.
//!
//! A [`RawRecord`] is whatever the ingestion step produced for one row: a CSV
//! line keyed by header, or one object of a JSON claims payload. Nothing about
//! it is trusted until it has passed the field validator.

use std::borrow::Cow;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A single untyped cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    /// Empty CSV cell or JSON `null`.
    Missing,
    Bool(bool),
    Number(serde_json::Number),
    Text(String),
    /// JSON array or object. Kept so the field validator can reject it for
    /// this record alone.
    Nested(serde_json::Value),
}

impl RawValue {
    pub fn text(value: impl Into<String>) -> Self {
        RawValue::Text(value.into())
    }

    /// String form of the value, `None` for [`RawValue::Missing`].
    pub fn as_text(&self) -> Option<Cow<'_, str>> {
        match self {
            RawValue::Missing => None,
            RawValue::Bool(value) => Some(Cow::Owned(value.to_string())),
            RawValue::Number(value) => Some(Cow::Owned(value.to_string())),
            RawValue::Text(value) => Some(Cow::Borrowed(value.as_str())),
            RawValue::Nested(value) => Some(Cow::Owned(value.to_string())),
        }
    }

    /// JSON type name, as used in validation messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            RawValue::Missing => "null",
            RawValue::Bool(_) => "boolean",
            RawValue::Number(_) => "number",
            RawValue::Text(_) => "string",
            RawValue::Nested(value) if value.is_array() => "array",
            RawValue::Nested(_) => "object",
        }
    }

    /// True for missing values and whitespace-only text.
    pub fn is_blank(&self) -> bool {
        match self {
            RawValue::Missing => true,
            RawValue::Text(value) => value.trim().is_empty(),
            RawValue::Bool(_) | RawValue::Number(_) | RawValue::Nested(_) => false,
        }
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Text(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        RawValue::Text(value)
    }
}

/// Field name to value mapping for one input row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRecord {
    fields: BTreeMap<String, RawValue>,
}

impl RawRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&RawValue> {
        self.fields.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<RawValue>) {
        self.fields.insert(name.into(), value.into());
    }

    /// Builder-style insert, mostly for tests and fixtures.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<RawValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn remove(&mut self, name: &str) -> Option<RawValue> {
        self.fields.remove(name)
    }

    /// Overlay `patch` on top of this record; keys in the patch win.
    pub fn merge(&mut self, patch: &RawRecord) {
        for (name, value) in &patch.fields {
            self.fields.insert(name.clone(), value.clone());
        }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RawValue)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }
}

impl<K: Into<String>, V: Into<RawValue>> FromIterator<(K, V)> for RawRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        }
    }
}
