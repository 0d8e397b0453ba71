//! Application-level records.

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

use crate::{error::MapperResult, value::FieldValue};

/// A flat, application-side record: named field values plus the remote document identifier.
///
/// The identifier lives outside [`Record::fields`] so it can never be mistaken for a
/// property. A record without an `id` has not been created in the store yet.
///
/// # Example
///
/// ```ignore
/// use notionlayer_core::record::Record;
///
/// let record = Record::new()
///     .with("name", "Coffee")
///     .with("amount", 4.5);
///
/// assert!(record.id.is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Record {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(flatten)]
    pub fields: BTreeMap<String, FieldValue>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty record bound to an existing document.
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            fields: BTreeMap::new(),
        }
    }

    /// Sets a field and returns the record, for chained construction.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(field, value);
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<FieldValue>) -> Option<FieldValue> {
        self.fields.insert(field.into(), value.into())
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    pub fn remove(&mut self, field: &str) -> Option<FieldValue> {
        self.fields.remove(field)
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Renders the record as a JSON object, with dates as ISO-8601 strings.
    pub fn to_json(&self) -> MapperResult<Value> {
        Ok(serde_json::to_value(self)?)
    }
}
