//! Construction-time configuration for a mapper.
//!
//! A [`MapperConfig`] carries the three recognized options: the secret key handed to the
//! store client, the target collection, and the alias table. It can be built explicitly,
//! read from the environment, or deserialized from JSON using the option names `secretKey`,
//! `collectionId` and `aliasTable`.

use serde::Deserialize;
use std::{env, fmt};

use notionlayer_core::{
    error::{MapperError, MapperResult},
    schema::AliasTable,
};

/// Environment variable holding the store credential.
pub const SECRET_KEY_VAR: &str = "NOTION_SECRET_KEY";
/// Environment variable holding the target collection id.
pub const COLLECTION_ID_VAR: &str = "NOTION_DATABASE_ID";

#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapperConfig {
    pub secret_key: String,
    pub collection_id: String,
    pub alias_table: AliasTable,
}

impl MapperConfig {
    pub fn new(
        secret_key: impl Into<String>,
        collection_id: impl Into<String>,
        alias_table: AliasTable,
    ) -> Self {
        Self {
            secret_key: secret_key.into(),
            collection_id: collection_id.into(),
            alias_table,
        }
    }

    /// Reads the secret key and collection id from the environment.
    ///
    /// # Errors
    ///
    /// Returns [`MapperError::Configuration`] naming the first variable that is unset or empty.
    pub fn from_env(alias_table: AliasTable) -> MapperResult<Self> {
        Self::from_lookup(alias_table, |name| env::var(name).ok())
    }

    /// Parses a JSON configuration document.
    pub fn from_json(json: &str) -> MapperResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    fn from_lookup(
        alias_table: AliasTable,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> MapperResult<Self> {
        let require = |name: &str| {
            lookup(name)
                .filter(|value| !value.is_empty())
                .ok_or_else(|| MapperError::Configuration(format!("{name} is not set")))
        };

        Ok(Self {
            secret_key: require(SECRET_KEY_VAR)?,
            collection_id: require(COLLECTION_ID_VAR)?,
            alias_table,
        })
    }
}

impl fmt::Debug for MapperConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapperConfig")
            .field("secret_key", &"<redacted>")
            .field("collection_id", &self.collection_id)
            .field("alias_table", &self.alias_table)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn aliases() -> AliasTable {
        AliasTable::new().alias("name", "Name")
    }

    #[test]
    fn reads_required_variables() {
        let vars = HashMap::from([
            (SECRET_KEY_VAR, "secret_abc"),
            (COLLECTION_ID_VAR, "db-1"),
        ]);
        let config =
            MapperConfig::from_lookup(aliases(), |name| vars.get(name).map(|v| v.to_string())).unwrap();

        assert_eq!(config.secret_key, "secret_abc");
        assert_eq!(config.collection_id, "db-1");
        assert!(!format!("{config:?}").contains("secret_abc"));
    }

    #[test]
    fn names_the_missing_variable() {
        let vars = HashMap::from([(SECRET_KEY_VAR, "secret_abc"), (COLLECTION_ID_VAR, "")]);
        let err = MapperConfig::from_lookup(aliases(), |name| vars.get(name).map(|v| v.to_string()))
            .unwrap_err();

        assert_eq!(err.to_string(), "Configuration error: NOTION_DATABASE_ID is not set");
    }

    #[test]
    fn parses_camel_case_options() {
        let config = MapperConfig::from_json(
            r#"{
                "secretKey": "secret_abc",
                "collectionId": "db-1",
                "aliasTable": { "name": "Name", "amount": "Amount" }
            }"#,
        )
        .unwrap();

        assert_eq!(config.collection_id, "db-1");
        assert_eq!(config.alias_table.property("amount"), Some("Amount"));
    }
}
