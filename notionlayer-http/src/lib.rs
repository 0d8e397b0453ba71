//! HTTP store client for notionlayer.
//!
//! This crate implements `StoreClient` on top of the Notion REST API using `reqwest`.
//! Every trait method issues exactly one request; there is no retry or pagination layer.
//!
//! To use this client, enable the `http` feature of the facade crate:
//!
//! ```toml
//! [dependencies]
//! notionlayer = { version = "x.y.z", features = ["http"] }
//! ```
//!
//! # Example
//!
//! ```ignore
//! use notionlayer::{client::StoreClientBuilder, http::NotionClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = NotionClient::builder("secret_...")
//!         .build()
//!         .await?;
//!
//!     Ok(())
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as notionlayer_http;

pub mod client;
pub mod error;

pub use client::{NotionClient, NotionClientBuilder};
pub use error::NotionError;
