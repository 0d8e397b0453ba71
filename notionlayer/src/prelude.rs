//! Convenient re-exports of commonly used types from notionlayer.
//!
//! ```ignore
//! use notionlayer::prelude::*;
//! ```
//!
//! This provides access to:
//! - Records, field values and the alias table
//! - The object mapper and query arguments
//! - Store client traits and builders
//! - Error types and configuration

pub use notionlayer_core::{
    client::{StoreClient, StoreClientBuilder},
    error::{MapperError, MapperResult},
    mapper::ObjectMapper,
    property::{PropertyType, WireProperty},
    query::{QueryArgs, QueryArgsBuilder},
    record::Record,
    schema::{AliasTable, RemoteSchema},
    value::FieldValue,
};

pub use crate::config::MapperConfig;
