//! The remote schema and the alias table that bridges it to application field names.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::{
    client::CollectionDescription,
    error::{MapperError, MapperResult},
};

/// Static mapping from application field name to remote property name.
///
/// The table defines the complete field surface of a mapper: fields it does not list are
/// rejected on write and never produced on read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AliasTable(BTreeMap<String, String>);

impl AliasTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an alias and returns the table, for chained construction.
    pub fn alias(mut self, field: impl Into<String>, property: impl Into<String>) -> Self {
        self.0.insert(field.into(), property.into());
        self
    }

    /// The remote property name for an application field, if aliased.
    pub fn property(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    /// Like [`AliasTable::property`], failing with [`MapperError::UnmappedField`].
    pub fn resolve(&self, field: &str) -> MapperResult<&str> {
        self.property(field)
            .ok_or_else(|| MapperError::UnmappedField(field.to_string()))
    }

    /// Iterates `(field, property)` pairs in field order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(f, p)| (f.as_str(), p.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<F, P> FromIterator<(F, P)> for AliasTable
where
    F: Into<String>,
    P: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (F, P)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(f, p)| (f.into(), p.into()))
                .collect(),
        )
    }
}

/// Remote property name to declared type name, as described by the store.
///
/// Type names are kept verbatim: a collection may declare properties of types this crate
/// cannot convert, which is only an error once such a property is actually aliased and used.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoteSchema {
    properties: HashMap<String, String>,
}

impl RemoteSchema {
    /// The declared type of a remote property, failing with [`MapperError::UnmappedProperty`].
    pub fn declared_type(&self, property: &str) -> MapperResult<&str> {
        self.properties
            .get(property)
            .map(String::as_str)
            .ok_or_else(|| MapperError::UnmappedProperty(property.to_string()))
    }

    pub fn contains(&self, property: &str) -> bool {
        self.properties.contains_key(property)
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

impl From<CollectionDescription> for RemoteSchema {
    fn from(description: CollectionDescription) -> Self {
        Self {
            properties: description
                .properties
                .into_iter()
                .map(|(name, property)| (name, property.property_type))
                .collect(),
        }
    }
}

impl<N, T> FromIterator<(N, T)> for RemoteSchema
where
    N: Into<String>,
    T: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (N, T)>>(iter: I) -> Self {
        Self {
            properties: iter
                .into_iter()
                .map(|(n, t)| (n.into(), t.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn resolves_aliases() {
        let aliases = AliasTable::new()
            .alias("name", "Name")
            .alias("amount", "Amount");

        assert_eq!(aliases.resolve("name").unwrap(), "Name");
        assert!(matches!(
            aliases.resolve("note"),
            Err(MapperError::UnmappedField(f)) if f == "note"
        ));
        assert_eq!(
            aliases.iter().collect::<Vec<_>>(),
            vec![("amount", "Amount"), ("name", "Name")]
        );
    }

    #[test]
    fn builds_schema_from_description() {
        let description: CollectionDescription = serde_json::from_value(json!({
            "id": "db-1",
            "properties": {
                "Name": { "id": "title", "name": "Name", "type": "title", "title": {} },
                "Amount": { "id": "a%3F", "name": "Amount", "type": "number", "number": { "format": "dollar" } },
                "Owner": { "id": "o", "name": "Owner", "type": "people", "people": {} }
            }
        }))
        .unwrap();
        let schema = RemoteSchema::from(description);

        assert_eq!(schema.len(), 3);
        assert_eq!(schema.declared_type("Amount").unwrap(), "number");
        assert_eq!(schema.declared_type("Owner").unwrap(), "people");
        assert!(matches!(
            schema.declared_type("Note"),
            Err(MapperError::UnmappedProperty(p)) if p == "Note"
        ));
    }

    #[test]
    fn deserializes_alias_table_from_json_object() {
        let aliases: AliasTable =
            serde_json::from_value(json!({ "name": "Name", "created_at": "Created at" })).unwrap();

        assert_eq!(aliases.len(), 2);
        assert_eq!(aliases.property("created_at"), Some("Created at"));
    }
}
