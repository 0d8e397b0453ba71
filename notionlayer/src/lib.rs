//! Main notionlayer crate: map plain records onto typed Notion database properties.
//!
//! This crate is the primary entry point for users of notionlayer. It re-exports the core
//! types from the sub-crates and provides access to the available store clients.
//!
//! # Features
//!
//! - **Schema-driven mapping** - Property types come from the remote schema, loaded once per mapper
//! - **Field aliases** - Application field names are decoupled from remote property names
//! - **Pluggable clients** - In-memory client for tests, HTTP client behind the `http` feature
//! - **Strict conversions** - Unsupported types and unmapped fields fail instead of losing data
//!
//! # Quick Start
//!
//! ```ignore
//! use notionlayer::{prelude::*, memory::InMemoryClient};
//!
//! #[tokio::main]
//! async fn main() {
//!     let client = InMemoryClient::builder()
//!         .collection("expenses", [("Name", "title"), ("Amount", "number")])
//!         .build()
//!         .await
//!         .unwrap();
//!
//!     let mapper = ObjectMapper::new(
//!         client,
//!         "expenses",
//!         AliasTable::new().alias("name", "Name").alias("amount", "Amount"),
//!     );
//!
//!     // Create a document; the record comes back with its new id
//!     let expense = mapper
//!         .persist(Record::new().with("name", "Coffee").with("amount", 4.5))
//!         .await
//!         .unwrap();
//!
//!     // Update it in place
//!     mapper
//!         .persist(Record::with_id(expense.id().unwrap()).with("amount", 5.0))
//!         .await
//!         .unwrap();
//!
//!     // Query; filter and sorts are forwarded to the store verbatim
//!     let all = mapper.query(QueryArgs::all()).await.unwrap();
//!     println!("{:?}", all);
//!
//!     // Archive it
//!     mapper.delete(expense.id().unwrap()).await.unwrap();
//! }
//! ```
//!
//! # Connecting to the API
//!
//! With the `http` feature enabled, [`connect`] builds an HTTP client from a
//! [`MapperConfig`](config::MapperConfig) and returns a ready mapper:
//!
//! ```ignore
//! use notionlayer::{prelude::*, connect};
//!
//! let aliases = AliasTable::new().alias("name", "Name").alias("amount", "Amount");
//! let mapper = connect(MapperConfig::from_env(aliases)?).await?;
//! ```
//!
//! # Clients
//!
//! - [`memory`] - In-memory client for development and testing
//! - [`http`] - REST API client (requires `http` feature)

pub mod config;
pub mod prelude;

pub use notionlayer_core::{client, error, mapper, property, query, record, schema, value};

// Re-export chrono for building date values
pub use chrono;

/// In-memory store client.
pub mod memory {
    pub use notionlayer_memory::{InMemoryClient, InMemoryClientBuilder, MemoryError};
}

/// REST API store client.
///
/// This module is only available when the `http` feature is enabled.
#[cfg(feature = "http")]
pub mod http {
    pub use notionlayer_http::{NotionClient, NotionClientBuilder, NotionError};
}

/// Builds an HTTP client from `config` and wraps it in a mapper for the configured collection.
#[cfg(feature = "http")]
pub async fn connect(
    config: config::MapperConfig,
) -> error::MapperResult<mapper::ObjectMapper<notionlayer_http::NotionClient>> {
    use client::StoreClientBuilder;

    let client = notionlayer_http::NotionClient::builder(&config.secret_key)
        .build()
        .await?;

    Ok(mapper::ObjectMapper::new(
        client,
        config.collection_id,
        config.alias_table,
    ))
}

/// Installs a formatting `tracing` subscriber filtered by `RUST_LOG`, defaulting to `info`.
///
/// Libraries never install a subscriber themselves; binaries and examples call this once.
pub fn init_tracing() {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt().with_env_filter(filter).try_init();
}
