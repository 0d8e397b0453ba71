//! Errors raised by the HTTP client.

use serde::Deserialize;
use thiserror::Error;

use notionlayer_core::error::MapperError;

#[derive(Error, Debug)]
pub enum NotionError {
    /// The request could not be sent or the response body could not be read.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// The API answered with a non-success status.
    #[error("API error {status} ({code}): {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },
}

impl NotionError {
    /// HTTP status of an API error, if this is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            NotionError::Api { status, .. } => Some(*status),
            NotionError::Http(err) => err.status().map(|s| s.as_u16()),
        }
    }
}

impl From<NotionError> for MapperError {
    fn from(err: NotionError) -> Self {
        MapperError::transport(err)
    }
}

/// Error body returned by the API alongside a non-success status.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ApiErrorBody {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
}

impl ApiErrorBody {
    pub(crate) fn into_error(self, status: u16) -> NotionError {
        NotionError::Api {
            status,
            code: self.code,
            message: self.message,
        }
    }
}
