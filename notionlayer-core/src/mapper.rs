//! Schema-driven object mapper.
//!
//! [`ObjectMapper`] converts whole [`Record`]s to and from the store's property payloads. It
//! loads the collection schema lazily on the first operation, then uses the alias table and
//! the property codec to translate each field.
//!
//! # Schema loading
//!
//! The schema slot starts empty and is filled exactly once. Loading happens while holding an
//! async mutex, so concurrent first calls wait for the in-flight fetch instead of issuing
//! their own. A failed load leaves the slot empty and surfaces the error; the next operation
//! tries again. Once loaded, the schema is never refreshed.
//!
//! # Example
//!
//! ```ignore
//! use notionlayer_core::{mapper::ObjectMapper, query::QueryArgs, schema::AliasTable};
//!
//! let mapper = ObjectMapper::new(
//!     client,
//!     "database-id",
//!     AliasTable::new().alias("name", "Name").alias("amount", "Amount"),
//! );
//!
//! for expense in mapper.query(QueryArgs::all()).await? {
//!     println!("{:?}", expense);
//! }
//! ```

use mea::mutex::Mutex;
use serde_json::{Map, Value};
use std::{fmt, sync::Arc};
use tracing::{debug, info};

use crate::{
    client::{Page, Properties, StoreClient},
    error::{MapperError, MapperResult},
    property::{self, WireProperty},
    query::QueryArgs,
    record::Record,
    schema::{AliasTable, RemoteSchema},
};

/// Maps application records onto documents of one remote collection.
pub struct ObjectMapper<C: StoreClient> {
    client: C,
    collection_id: String,
    aliases: AliasTable,
    schema: Mutex<Option<Arc<RemoteSchema>>>,
}

impl<C: StoreClient> ObjectMapper<C> {
    /// Creates a mapper over `collection_id`. No remote call is made until the first operation.
    pub fn new(client: C, collection_id: impl Into<String>, aliases: AliasTable) -> Self {
        Self {
            client,
            collection_id: collection_id.into(),
            aliases,
            schema: Mutex::new(None),
        }
    }

    pub fn collection_id(&self) -> &str {
        &self.collection_id
    }

    pub fn aliases(&self) -> &AliasTable {
        &self.aliases
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Returns the remote schema, loading it first if needed.
    pub async fn schema(&self) -> MapperResult<Arc<RemoteSchema>> {
        self.ensure_schema().await
    }

    async fn ensure_schema(&self) -> MapperResult<Arc<RemoteSchema>> {
        let mut slot = self.schema.lock().await;

        if let Some(schema) = slot.as_ref() {
            return Ok(schema.clone());
        }

        debug!(collection = %self.collection_id, "loading remote schema");
        let schema = Arc::new(RemoteSchema::from(
            self.client
                .describe_collection(&self.collection_id)
                .await?,
        ));
        info!(
            collection = %self.collection_id,
            properties = schema.len(),
            "remote schema loaded"
        );

        *slot = Some(schema.clone());
        Ok(schema)
    }

    /// Creates or updates the document backing `record`.
    ///
    /// Every field is serialized before anything is sent. A record with an `id` updates that
    /// document in place with only the fields it carries; a record without one creates a new
    /// document and receives the identifier the store assigned.
    ///
    /// # Errors
    ///
    /// - [`MapperError::UnmappedField`] if a field is not in the alias table
    /// - [`MapperError::UnmappedProperty`] if an aliased property is not in the schema
    /// - [`MapperError::UnsupportedType`] or [`MapperError::TypeMismatch`] from the codec
    /// - any transport error from the client
    pub async fn persist(&self, mut record: Record) -> MapperResult<Record> {
        let schema = self.ensure_schema().await?;
        let properties = self.encode(&schema, &record)?;

        match record.id.as_deref() {
            Some(id) => {
                self.client
                    .update_document(id, properties)
                    .await?;
                debug!(collection = %self.collection_id, id, "document updated");
            }
            None => {
                let page = self
                    .client
                    .create_document(&self.collection_id, properties)
                    .await?;
                debug!(collection = %self.collection_id, id = %page.id, "document created");
                record.id = Some(page.id);
            }
        }

        Ok(record)
    }

    /// Fetches a document and maps every aliased property into a fresh record.
    ///
    /// # Errors
    ///
    /// Returns [`MapperError::MissingProperty`] if the document lacks an aliased property,
    /// plus the schema, codec and transport errors described on [`ObjectMapper::persist`].
    pub async fn retrieve(&self, id: &str) -> MapperResult<Record> {
        let schema = self.ensure_schema().await?;
        let page = self.client.get_document(id).await?;

        self.decode(&schema, page)
    }

    /// Runs one query and maps each result, preserving the store's order.
    ///
    /// Only the first page of results is returned.
    pub async fn query(&self, args: QueryArgs) -> MapperResult<Vec<Record>> {
        let schema = self.ensure_schema().await?;
        let response = self
            .client
            .query_collection(&self.collection_id, args)
            .await?;

        debug!(
            collection = %self.collection_id,
            results = response.results.len(),
            has_more = response.has_more,
            "query returned"
        );

        response
            .results
            .into_iter()
            .map(|page| self.decode(&schema, page))
            .collect()
    }

    /// Archives a document. The document stays retrievable but drops out of queries.
    pub async fn delete(&self, id: &str) -> MapperResult<()> {
        self.ensure_schema().await?;
        self.client.archive_document(id).await?;
        debug!(collection = %self.collection_id, id, "document archived");

        Ok(())
    }

    fn encode(&self, schema: &RemoteSchema, record: &Record) -> MapperResult<Properties> {
        record
            .fields
            .iter()
            .map(|(field, value)| -> MapperResult<(String, WireProperty)> {
                let name = self.aliases.resolve(field)?;
                let declared_type = schema.declared_type(name)?;

                Ok((name.to_string(), property::serialize(declared_type, value)?))
            })
            .collect()
    }

    fn decode(&self, schema: &RemoteSchema, page: Page) -> MapperResult<Record> {
        let mut record = Record::with_id(page.id.clone());

        for (field, name) in self.aliases.iter() {
            let declared_type = schema.declared_type(name)?;
            let wire = wire_property(&page.properties, name, &page.id)?;

            record.insert(field, property::deserialize(declared_type, &wire)?);
        }

        Ok(record)
    }
}

fn wire_property(properties: &Map<String, Value>, name: &str, id: &str) -> MapperResult<WireProperty> {
    let value = properties
        .get(name)
        .ok_or_else(|| MapperError::MissingProperty(name.to_string(), id.to_string()))?;

    WireProperty::from_json(value)
}

impl<C: StoreClient> fmt::Debug for ObjectMapper<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectMapper")
            .field("client", &self.client)
            .field("collection_id", &self.collection_id)
            .field("aliases", &self.aliases)
            .finish_non_exhaustive()
    }
}
