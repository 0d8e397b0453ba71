//! Store client abstraction.
//!
//! The mapper never talks to the network itself. Everything it needs from the remote store
//! goes through the [`StoreClient`] trait, which backends implement:
//!
//! - `notionlayer-memory` keeps collections in memory for development and tests
//! - `notionlayer-http` talks to the store's REST API
//!
//! # Error Handling
//!
//! Implementations report their own failures through
//! [`MapperError::Transport`](crate::error::MapperError::Transport), built with
//! [`MapperError::transport`](crate::error::MapperError::transport). The mapper forwards
//! these unchanged and never retries.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::{collections::BTreeMap, fmt::Debug, sync::Arc};

use crate::{error::MapperResult, property::WireProperty, query::QueryArgs};

/// Outgoing property payload, keyed by remote property name.
pub type Properties = BTreeMap<String, WireProperty>;

/// Description of a collection as returned by the store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CollectionDescription {
    pub properties: BTreeMap<String, PropertyDescriptor>,
}

/// Declared type of a single property in a [`CollectionDescription`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyDescriptor {
    #[serde(rename = "type")]
    pub property_type: String,
}

impl PropertyDescriptor {
    pub fn new(property_type: impl Into<String>) -> Self {
        Self {
            property_type: property_type.into(),
        }
    }
}

/// A document as returned by the store.
///
/// Properties stay raw JSON until the mapper decodes the ones it has aliased, so documents
/// may freely carry properties of types the codec does not support.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub id: String,
    #[serde(default)]
    pub properties: Map<String, Value>,
    #[serde(default)]
    pub archived: bool,
}

/// One page of query results.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryResponse {
    pub results: Vec<Page>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub next_cursor: Option<String>,
}

/// Abstract interface to the remote document store.
///
/// All implementations must be thread-safe. Each method maps to exactly one remote call.
#[async_trait]
pub trait StoreClient: Send + Sync + Debug {
    /// Fetches the property schema of a collection.
    async fn describe_collection(&self, collection_id: &str) -> MapperResult<CollectionDescription>;

    /// Creates a document in a collection and returns it, including its new identifier.
    async fn create_document(&self, collection_id: &str, properties: Properties) -> MapperResult<Page>;

    /// Overwrites the given properties of an existing document. Other properties are untouched.
    async fn update_document(&self, id: &str, properties: Properties) -> MapperResult<()>;

    /// Marks a document archived.
    async fn archive_document(&self, id: &str) -> MapperResult<()>;

    /// Fetches a single document by identifier.
    async fn get_document(&self, id: &str) -> MapperResult<Page>;

    /// Runs one query against a collection and returns the first page of results.
    async fn query_collection(&self, collection_id: &str, args: QueryArgs) -> MapperResult<QueryResponse>;
}

#[async_trait]
impl<C> StoreClient for &C
where
    C: StoreClient,
{
    async fn describe_collection(&self, collection_id: &str) -> MapperResult<CollectionDescription> {
        (*self).describe_collection(collection_id).await
    }

    async fn create_document(&self, collection_id: &str, properties: Properties) -> MapperResult<Page> {
        (*self)
            .create_document(collection_id, properties)
            .await
    }

    async fn update_document(&self, id: &str, properties: Properties) -> MapperResult<()> {
        (*self).update_document(id, properties).await
    }

    async fn archive_document(&self, id: &str) -> MapperResult<()> {
        (*self).archive_document(id).await
    }

    async fn get_document(&self, id: &str) -> MapperResult<Page> {
        (*self).get_document(id).await
    }

    async fn query_collection(&self, collection_id: &str, args: QueryArgs) -> MapperResult<QueryResponse> {
        (*self)
            .query_collection(collection_id, args)
            .await
    }
}

#[async_trait]
impl<C> StoreClient for Arc<C>
where
    C: StoreClient + ?Sized,
{
    async fn describe_collection(&self, collection_id: &str) -> MapperResult<CollectionDescription> {
        (**self).describe_collection(collection_id).await
    }

    async fn create_document(&self, collection_id: &str, properties: Properties) -> MapperResult<Page> {
        (**self)
            .create_document(collection_id, properties)
            .await
    }

    async fn update_document(&self, id: &str, properties: Properties) -> MapperResult<()> {
        (**self).update_document(id, properties).await
    }

    async fn archive_document(&self, id: &str) -> MapperResult<()> {
        (**self).archive_document(id).await
    }

    async fn get_document(&self, id: &str) -> MapperResult<Page> {
        (**self).get_document(id).await
    }

    async fn query_collection(&self, collection_id: &str, args: QueryArgs) -> MapperResult<QueryResponse> {
        (**self)
            .query_collection(collection_id, args)
            .await
    }
}

/// Factory trait for creating store clients.
#[async_trait]
pub trait StoreClientBuilder {
    type Client: StoreClient;

    async fn build(self) -> MapperResult<Self::Client>;
}
