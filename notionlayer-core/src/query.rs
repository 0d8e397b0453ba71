//! Query arguments forwarded to the store.
//!
//! Filter and sort expressions use the store's own grammar and are never inspected here:
//! whatever JSON the caller builds is sent verbatim.
//!
//! ```ignore
//! use notionlayer_core::query::QueryArgs;
//! use serde_json::json;
//!
//! let args = QueryArgs::builder()
//!     .filter(json!({ "property": "Amount", "number": { "greater_than": 0 } }))
//!     .sorts(json!([{ "property": "Created at", "direction": "descending" }]))
//!     .build();
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Optional filter and sort expressions for a collection query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryArgs {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sorts: Option<Value>,
}

impl QueryArgs {
    /// Arguments that match every document in store order.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn builder() -> QueryArgsBuilder {
        QueryArgsBuilder::default()
    }
}

/// Builder for [`QueryArgs`].
#[derive(Debug, Default)]
pub struct QueryArgsBuilder {
    filter: Option<Value>,
    sorts: Option<Value>,
}

impl QueryArgsBuilder {
    pub fn filter(mut self, filter: Value) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn sorts(mut self, sorts: Value) -> Self {
        self.sorts = Some(sorts);
        self
    }

    pub fn build(self) -> QueryArgs {
        QueryArgs {
            filter: self.filter,
            sorts: self.sorts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn omits_absent_members() {
        assert_eq!(serde_json::to_value(QueryArgs::all()).unwrap(), json!({}));

        let args = QueryArgs::builder()
            .sorts(json!([{ "property": "Amount", "direction": "ascending" }]))
            .build();
        assert_eq!(
            serde_json::to_value(&args).unwrap(),
            json!({ "sorts": [{ "property": "Amount", "direction": "ascending" }] })
        );
    }
}
