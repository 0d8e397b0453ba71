//! Schema-driven mapping between application records and typed Notion database properties.
//!
//! This crate is the core of the notionlayer project and provides:
//!
//! - **Field values and records** ([`value`], [`record`]) - The application-side shape of a row
//! - **Property codec** ([`property`]) - Per-type converters between field values and wire properties
//! - **Schema and aliases** ([`schema`]) - The remote schema and the field-name alias table
//! - **Store client abstraction** ([`client`]) - The interface the mapper uses to reach the remote store
//! - **Query arguments** ([`query`]) - Opaque filter and sort expressions forwarded to the store
//! - **Object mapper** ([`mapper`]) - Persist, retrieve, query and archive records
//! - **Error handling** ([`error`]) - Error and result types shared by every crate in the workspace
//!
//! # Example
//!
//! ```ignore
//! use notionlayer_core::{mapper::ObjectMapper, record::Record, schema::AliasTable};
//!
//! let aliases = AliasTable::from_iter([("name", "Name"), ("amount", "Amount")]);
//! let mapper = ObjectMapper::new(client, "database-id", aliases);
//!
//! let expense = mapper
//!     .persist(Record::new().with("name", "Coffee").with("amount", 4.5))
//!     .await?;
//!
//! println!("created {:?}", expense.id);
//! ```

#[allow(unused_extern_crates)]
extern crate self as notionlayer_core;

pub mod client;
pub mod error;
pub mod mapper;
pub mod property;
pub mod query;
pub mod record;
pub mod schema;
pub mod value;
