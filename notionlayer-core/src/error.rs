//! Error types and result types for mapper operations.
//!
//! Every fallible operation in the workspace returns [`MapperResult<T>`]. Errors raised by a
//! [`StoreClient`](crate::client::StoreClient) travel through [`MapperError::Transport`] untouched.

use serde_json::Error as SerdeJsonError;
use thiserror::Error;

/// Represents all possible errors that can occur while mapping records to and from the store.
#[derive(Error, Debug)]
pub enum MapperError {
    /// The remote schema declares a property type that has no registered converter.
    #[error("Unsupported property type [{0}]")]
    UnsupportedType(String),
    /// A record field has no entry in the alias table.
    #[error("Field [{0}] not found in alias table")]
    UnmappedField(String),
    /// An alias table entry points at a property the remote schema does not declare.
    #[error("Property [{0}] not found in remote schema")]
    UnmappedProperty(String),
    /// A fetched document does not carry an aliased property.
    /// The first argument is the property name, the second is the document ID.
    #[error("Property [{0}] missing from document {1}")]
    MissingProperty(String, String),
    /// A value or wire property does not fit the declared type it is converted with.
    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: String,
        found: String,
    },
    /// Serialization/deserialization error when converting to or from JSON.
    #[error("Serialization error: {0}")]
    Serialization(String),
    /// Missing or invalid construction-time configuration.
    #[error("Configuration error: {0}")]
    Configuration(String),
    /// Failure reported by the store client, forwarded as-is.
    #[error(transparent)]
    Transport(Box<dyn std::error::Error + Send + Sync>),
}

impl MapperError {
    /// Wraps a store client error without altering it.
    pub fn transport<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        MapperError::Transport(Box::new(err))
    }

    pub(crate) fn mismatch(expected: impl Into<String>, found: impl Into<String>) -> Self {
        MapperError::TypeMismatch {
            expected: expected.into(),
            found: found.into(),
        }
    }
}

/// A specialized `Result` type for mapper operations.
pub type MapperResult<T> = Result<T, MapperError>;

impl From<SerdeJsonError> for MapperError {
    fn from(err: SerdeJsonError) -> Self {
        MapperError::Serialization(err.to_string())
    }
}
