//! In-memory store client for notionlayer.
//!
//! This crate provides a thread-safe, in-memory implementation of the `StoreClient` trait.
//! It uses async-aware read-write locks for concurrent access and is meant for development
//! and tests.
//!
//! # Behavior
//!
//! - **Collections** - Registered up front with their declared property types
//! - **Creation** - Assigns a random UUID to every new document
//! - **Updates** - Merge the given properties into the stored document
//! - **Archiving** - Hides a document from queries; it stays retrievable by id
//! - **Queries** - Return live documents in creation order; filters and sorts are not evaluated
//!
//! # Quick Start
//!
//! ```ignore
//! use notionlayer::{prelude::*, memory::InMemoryClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = InMemoryClient::builder()
//!         .collection("expenses", [("Name", "title"), ("Amount", "number")])
//!         .build()
//!         .await?;
//!
//!     let mapper = ObjectMapper::new(
//!         client,
//!         "expenses",
//!         AliasTable::new().alias("name", "Name").alias("amount", "Amount"),
//!     );
//!
//!     let expense = mapper
//!         .persist(Record::new().with("name", "Coffee").with("amount", 4.5))
//!         .await?;
//!
//!     println!("{:?}", mapper.retrieve(expense.id().unwrap()).await?);
//!
//!     Ok(())
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as notionlayer_memory;

pub mod client;

pub use client::{InMemoryClient, InMemoryClientBuilder, MemoryError};
