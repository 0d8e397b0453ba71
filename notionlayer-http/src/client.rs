//! REST implementation of the store client.
//!
//! Each `StoreClient` method maps onto one API endpoint:
//!
//! | Method               | Request                          |
//! |----------------------|----------------------------------|
//! | `describe_collection`| `GET databases/{id}`             |
//! | `create_document`    | `POST pages`                     |
//! | `update_document`    | `PATCH pages/{id}` (properties)  |
//! | `archive_document`   | `PATCH pages/{id}` (archived)    |
//! | `get_document`       | `GET pages/{id}`                 |
//! | `query_collection`   | `POST databases/{id}/query`      |
//!
//! Non-success responses are decoded into [`NotionError::Api`] and surface through
//! `MapperError::Transport`.

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::{fmt, time::Duration};
use tracing::debug;

use notionlayer_core::{
    client::{CollectionDescription, Page, Properties, QueryResponse, StoreClient, StoreClientBuilder},
    error::{MapperError, MapperResult},
    query::QueryArgs,
};

use crate::error::{ApiErrorBody, NotionError};

/// API root used unless the builder overrides it.
pub const DEFAULT_BASE_URL: &str = "https://api.notion.com/v1";
/// Value of the `Notion-Version` header sent with every request.
pub const NOTION_VERSION: &str = "2022-06-28";

/// Store client backed by the Notion REST API.
///
/// Requests carry the secret key as a bearer token. The key never appears in `Debug` output.
/// Cloning is cheap; clones share the underlying connection pool.
///
/// # Example
///
/// ```ignore
/// use notionlayer_core::client::{StoreClient, StoreClientBuilder};
/// use notionlayer_http::NotionClient;
///
/// let client = NotionClient::builder("secret_...").build().await?;
/// let description = client.describe_collection("database-id").await?;
/// ```
#[derive(Clone)]
pub struct NotionClient {
    http: Client,
    base_url: String,
    secret_key: String,
}

impl NotionClient {
    /// Wraps an existing `reqwest` client.
    ///
    /// A trailing slash on `base_url` is dropped. Prefer [`NotionClient::builder`] unless the
    /// `reqwest` client needs settings the builder does not expose.
    pub fn new(http: Client, base_url: impl Into<String>, secret_key: impl Into<String>) -> Self {
        let base_url: String = base_url.into();

        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            secret_key: secret_key.into(),
        }
    }

    /// Starts a builder for a client authenticated with `secret_key`.
    pub fn builder(secret_key: &str) -> NotionClientBuilder {
        NotionClientBuilder::new(secret_key)
    }

    /// The API root requests are sent to, without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http
            .request(method, self.url(path))
            .bearer_auth(&self.secret_key)
            .header("Notion-Version", NOTION_VERSION)
    }

    /// Sends `request`, decoding a success body as `T` and anything else as an API error.
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> MapperResult<T> {
        let response = request
            .send()
            .await
            .map_err(NotionError::from)?;
        let status = response.status();

        if !status.is_success() {
            let body = response
                .json::<ApiErrorBody>()
                .await
                .unwrap_or_default();
            return Err(body.into_error(status.as_u16()).into());
        }

        Ok(response
            .json::<T>()
            .await
            .map_err(NotionError::from)?)
    }
}

impl fmt::Debug for NotionClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotionClient")
            .field("base_url", &self.base_url)
            .field("secret_key", &"<redacted>")
            .finish()
    }
}

fn create_body(collection_id: &str, properties: &Properties) -> Value {
    json!({
        "parent": { "database_id": collection_id },
        "properties": properties,
    })
}

fn update_body(properties: &Properties) -> Value {
    json!({ "properties": properties })
}

fn archive_body() -> Value {
    json!({ "archived": true })
}

#[async_trait]
impl StoreClient for NotionClient {
    async fn describe_collection(&self, collection_id: &str) -> MapperResult<CollectionDescription> {
        self.send(self.request(Method::GET, &format!("databases/{collection_id}")))
            .await
    }

    async fn create_document(&self, collection_id: &str, properties: Properties) -> MapperResult<Page> {
        debug!(collection = collection_id, properties = properties.len(), "creating page");
        self.send(
            self.request(Method::POST, "pages")
                .json(&create_body(collection_id, &properties)),
        )
        .await
    }

    async fn update_document(&self, id: &str, properties: Properties) -> MapperResult<()> {
        debug!(id, properties = properties.len(), "updating page");
        self.send::<Value>(
            self.request(Method::PATCH, &format!("pages/{id}"))
                .json(&update_body(&properties)),
        )
        .await?;

        Ok(())
    }

    async fn archive_document(&self, id: &str) -> MapperResult<()> {
        self.send::<Value>(
            self.request(Method::PATCH, &format!("pages/{id}"))
                .json(&archive_body()),
        )
        .await?;

        Ok(())
    }

    async fn get_document(&self, id: &str) -> MapperResult<Page> {
        self.send(self.request(Method::GET, &format!("pages/{id}")))
            .await
    }

    async fn query_collection(&self, collection_id: &str, args: QueryArgs) -> MapperResult<QueryResponse> {
        self.send(
            self.request(Method::POST, &format!("databases/{collection_id}/query"))
                .json(&args),
        )
        .await
    }
}

/// Builder for [`NotionClient`].
///
/// # Errors
///
/// `build` fails with `MapperError::Configuration` if the secret key is empty or the
/// underlying HTTP client cannot be constructed.
///
/// # Example
///
/// ```ignore
/// use std::time::Duration;
/// use notionlayer_core::client::StoreClientBuilder;
/// use notionlayer_http::NotionClient;
///
/// let client = NotionClient::builder("secret_...")
///     .base_url("http://localhost:8080/v1")
///     .timeout(Duration::from_secs(10))
///     .build()
///     .await?;
/// ```
pub struct NotionClientBuilder {
    secret_key: String,
    base_url: String,
    timeout: Option<Duration>,
}

impl NotionClientBuilder {
    /// Creates a builder pointed at [`DEFAULT_BASE_URL`] with no timeout.
    pub fn new(secret_key: &str) -> Self {
        Self {
            secret_key: secret_key.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: None,
        }
    }

    /// Points the client at a different API root, e.g. a local mock server.
    pub fn base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.to_string();
        self
    }

    /// Per-request timeout. Unset by default.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

#[async_trait]
impl StoreClientBuilder for NotionClientBuilder {
    type Client = NotionClient;

    async fn build(self) -> MapperResult<Self::Client> {
        if self.secret_key.is_empty() {
            return Err(MapperError::Configuration("secret key is empty".into()));
        }

        let mut http = Client::builder();
        if let Some(timeout) = self.timeout {
            http = http.timeout(timeout);
        }

        let http = http
            .build()
            .map_err(|e| MapperError::Configuration(e.to_string()))?;

        Ok(NotionClient::new(http, self.base_url, self.secret_key))
    }
}
