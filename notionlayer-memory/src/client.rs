//! In-memory storage implementation of the store client.
//!
//! Collections are kept in a `HashMap` behind an async-safe read-write lock. Each collection
//! remembers its declared schema and its documents in creation order.

use async_trait::async_trait;
use mea::rwlock::RwLock;
use serde_json::{Map, Value, json};
use std::{collections::HashMap, sync::Arc};
use thiserror::Error;
use uuid::Uuid;

use notionlayer_core::{
    client::{
        CollectionDescription, Page, Properties, PropertyDescriptor, QueryResponse, StoreClient,
        StoreClientBuilder,
    },
    error::{MapperError, MapperResult},
    query::QueryArgs,
};

/// Failures reported by [`InMemoryClient`], surfaced through `MapperError::Transport`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MemoryError {
    #[error("Collection not found: {0}")]
    CollectionNotFound(String),
    #[error("Document not found: {0}")]
    DocumentNotFound(String),
    /// The payload names a property the collection does not declare.
    /// The first argument is the property name, the second is the collection ID.
    #[error("{0} is not a property that exists in collection {1}")]
    UnknownProperty(String, String),
}

#[derive(Debug, Default)]
struct CollectionState {
    description: CollectionDescription,
    pages: Vec<Page>,
}

impl CollectionState {
    fn check_properties<'a>(
        &self,
        collection_id: &str,
        mut names: impl Iterator<Item = &'a String>,
    ) -> Result<(), MemoryError> {
        match names.find(|name| !self.description.properties.contains_key(*name)) {
            Some(name) => Err(MemoryError::UnknownProperty(name.clone(), collection_id.to_string())),
            None => Ok(()),
        }
    }
}

type StoreMap = HashMap<String, CollectionState>;

/// Thread-safe in-memory store client.
///
/// `InMemoryClient` is cloneable; clones share the same underlying collections, so a test can
/// hand one clone to a mapper and inspect the store through another.
#[derive(Default, Clone, Debug)]
pub struct InMemoryClient {
    store: Arc<RwLock<StoreMap>>,
}

impl InMemoryClient {
    /// Creates a client with no collections.
    pub fn new() -> Self {
        Self {
            store: Arc::new(RwLock::new(StoreMap::new())),
        }
    }

    pub fn builder() -> InMemoryClientBuilder {
        InMemoryClientBuilder::default()
    }

    /// Registers a collection, replacing any existing collection with the same id.
    pub async fn add_collection(&self, collection_id: &str, description: CollectionDescription) {
        self.store.write().await.insert(
            collection_id.to_string(),
            CollectionState {
                description,
                pages: Vec::new(),
            },
        );
    }

    /// Stores a document with raw property JSON, bypassing payload validation.
    ///
    /// Useful for seeding shapes the mapper itself never writes, such as empty titles.
    pub async fn insert_raw(
        &self,
        collection_id: &str,
        properties: Map<String, Value>,
    ) -> MapperResult<String> {
        let mut store = self.store.write().await;
        let collection = store
            .get_mut(collection_id)
            .ok_or_else(|| MapperError::transport(MemoryError::CollectionNotFound(collection_id.to_string())))?;

        let id = Uuid::new_v4().to_string();
        collection.pages.push(Page {
            id: id.clone(),
            properties,
            archived: false,
        });

        Ok(id)
    }

    /// Number of documents in a collection, archived ones included.
    pub async fn document_count(&self, collection_id: &str) -> usize {
        self.store
            .read()
            .await
            .get(collection_id)
            .map(|c| c.pages.len())
            .unwrap_or(0)
    }
}

/// Value the store reports for a declared property that was never set.
fn empty_property(property_type: &str) -> Value {
    let body = match property_type {
        "checkbox" => json!(false),
        "title" | "rich_text" => json!([]),
        _ => Value::Null,
    };

    json!({ "type": property_type, property_type: body })
}

fn to_json_map(properties: Properties) -> MapperResult<Map<String, Value>> {
    properties
        .into_iter()
        .map(|(name, wire)| -> MapperResult<(String, Value)> { Ok((name, wire.to_json()?)) })
        .collect()
}

fn get_page<'a>(store: &'a StoreMap, id: &str) -> MapperResult<&'a Page> {
    store
        .values()
        .find_map(|collection| collection.pages.iter().find(|p| p.id == id))
        .ok_or_else(|| MapperError::transport(MemoryError::DocumentNotFound(id.to_string())))
}

fn find_page<'a>(store: &'a mut StoreMap, id: &str) -> MapperResult<(&'a str, &'a mut CollectionState, usize)> {
    for (collection_id, collection) in store.iter_mut() {
        if let Some(index) = collection.pages.iter().position(|p| p.id == id) {
            return Ok((collection_id.as_str(), collection, index));
        }
    }

    Err(MapperError::transport(MemoryError::DocumentNotFound(id.to_string())))
}

#[async_trait]
impl StoreClient for InMemoryClient {
    async fn describe_collection(&self, collection_id: &str) -> MapperResult<CollectionDescription> {
        self.store
            .read()
            .await
            .get(collection_id)
            .map(|c| c.description.clone())
            .ok_or_else(|| MapperError::transport(MemoryError::CollectionNotFound(collection_id.to_string())))
    }

    async fn create_document(&self, collection_id: &str, properties: Properties) -> MapperResult<Page> {
        let mut store = self.store.write().await;
        let collection = store
            .get_mut(collection_id)
            .ok_or_else(|| MapperError::transport(MemoryError::CollectionNotFound(collection_id.to_string())))?;

        collection
            .check_properties(collection_id, properties.keys())
            .map_err(MapperError::transport)?;

        // Every declared property is present on a stored page, set or not
        let mut stored = collection
            .description
            .properties
            .iter()
            .map(|(name, descriptor)| (name.clone(), empty_property(&descriptor.property_type)))
            .collect::<Map<String, Value>>();
        stored.extend(to_json_map(properties)?);

        let page = Page {
            id: Uuid::new_v4().to_string(),
            properties: stored,
            archived: false,
        };
        collection.pages.push(page.clone());

        Ok(page)
    }

    async fn update_document(&self, id: &str, properties: Properties) -> MapperResult<()> {
        let mut store = self.store.write().await;
        let (collection_id, collection, index) = find_page(&mut store, id)?;

        collection
            .check_properties(collection_id, properties.keys())
            .map_err(MapperError::transport)?;

        // Only the given properties are replaced
        collection.pages[index]
            .properties
            .extend(to_json_map(properties)?);

        Ok(())
    }

    async fn archive_document(&self, id: &str) -> MapperResult<()> {
        let mut store = self.store.write().await;
        let (_, collection, index) = find_page(&mut store, id)?;
        collection.pages[index].archived = true;

        Ok(())
    }

    async fn get_document(&self, id: &str) -> MapperResult<Page> {
        let store = self.store.read().await;
        get_page(&store, id).cloned()
    }

    async fn query_collection(&self, collection_id: &str, _args: QueryArgs) -> MapperResult<QueryResponse> {
        // Filters and sorts are opaque to this client and are not evaluated
        let store = self.store.read().await;
        let collection = store
            .get(collection_id)
            .ok_or_else(|| MapperError::transport(MemoryError::CollectionNotFound(collection_id.to_string())))?;

        Ok(QueryResponse {
            results: collection
                .pages
                .iter()
                .filter(|p| !p.archived)
                .cloned()
                .collect(),
            has_more: false,
            next_cursor: None,
        })
    }
}

/// Builder for constructing [`InMemoryClient`] instances with pre-registered collections.
#[derive(Default, Debug)]
pub struct InMemoryClientBuilder {
    collections: Vec<(String, CollectionDescription)>,
}

impl InMemoryClientBuilder {
    /// Registers a collection from `(property, declared type)` pairs.
    pub fn collection<I, N, T>(mut self, collection_id: &str, properties: I) -> Self
    where
        I: IntoIterator<Item = (N, T)>,
        N: Into<String>,
        T: Into<String>,
    {
        let description = CollectionDescription {
            properties: properties
                .into_iter()
                .map(|(name, property_type)| (name.into(), PropertyDescriptor::new(property_type)))
                .collect(),
        };
        self.collections.push((collection_id.to_string(), description));
        self
    }
}

#[async_trait]
impl StoreClientBuilder for InMemoryClientBuilder {
    type Client = InMemoryClient;

    async fn build(self) -> MapperResult<Self::Client> {
        let client = InMemoryClient::new();

        for (collection_id, description) in self.collections {
            client.add_collection(&collection_id, description).await;
        }

        Ok(client)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notionlayer_core::property::WireProperty;

    async fn client() -> InMemoryClient {
        InMemoryClient::builder()
            .collection("expenses", [("Name", "title"), ("Amount", "number")])
            .build()
            .await
            .unwrap()
    }

    fn amount(value: f64) -> Properties {
        Properties::from([(
            "Amount".to_string(),
            WireProperty::Number { number: Some(value) },
        )])
    }

    fn memory_error(err: MapperError) -> MemoryError {
        match err {
            MapperError::Transport(inner) => inner.downcast_ref::<MemoryError>().unwrap().clone(),
            other => panic!("Expected transport error, got: {other:?}"),
        }
    }

    #[tokio::test]
    async fn merges_updates_into_existing_properties() {
        let client = client().await;
        let page = client.create_document("expenses", amount(1.0)).await.unwrap();

        client.update_document(&page.id, amount(2.0)).await.unwrap();

        let stored = client.get_document(&page.id).await.unwrap();
        assert_eq!(stored.properties["Amount"]["number"], 2.0);
        assert_eq!(client.document_count("expenses").await, 1);
    }

    #[tokio::test]
    async fn fills_unset_properties_with_empty_values() {
        let client = client().await;
        let page = client.create_document("expenses", amount(3.0)).await.unwrap();

        assert_eq!(page.properties["Name"], json!({ "type": "title", "title": [] }));
        assert_eq!(page.properties["Amount"]["number"], 3.0);
    }

    #[tokio::test]
    async fn archived_documents_drop_out_of_queries() {
        let client = client().await;
        let first = client.create_document("expenses", amount(1.0)).await.unwrap();
        let second = client.create_document("expenses", amount(2.0)).await.unwrap();

        client.archive_document(&first.id).await.unwrap();

        let response = client.query_collection("expenses", QueryArgs::all()).await.unwrap();
        assert_eq!(response.results.len(), 1);
        assert_eq!(response.results[0].id, second.id);
        assert!(client.get_document(&first.id).await.unwrap().archived);
    }

    #[tokio::test]
    async fn rejects_undeclared_properties() {
        let client = client().await;
        let payload = Properties::from([(
            "Note".to_string(),
            WireProperty::RichText { rich_text: vec![] },
        )]);

        let err = client.create_document("expenses", payload).await.unwrap_err();
        assert_eq!(
            memory_error(err),
            MemoryError::UnknownProperty("Note".into(), "expenses".into())
        );
    }

    #[tokio::test]
    async fn reports_missing_collections_and_documents() {
        let client = client().await;

        let err = client.describe_collection("missing").await.unwrap_err();
        assert_eq!(memory_error(err), MemoryError::CollectionNotFound("missing".into()));

        let err = client.archive_document("nope").await.unwrap_err();
        assert_eq!(memory_error(err), MemoryError::DocumentNotFound("nope".into()));

        let err = client.get_document("nope").await.unwrap_err();
        assert_eq!(memory_error(err), MemoryError::DocumentNotFound("nope".into()));
    }

    #[tokio::test]
    async fn concurrent_reads_see_the_same_document() {
        let client = client().await;
        let page = client.create_document("expenses", amount(7.0)).await.unwrap();

        let (first, second) = tokio::join!(client.get_document(&page.id), client.get_document(&page.id));
        assert_eq!(first.unwrap(), page);
        assert_eq!(second.unwrap(), page);
    }
}
