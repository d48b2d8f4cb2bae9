//! Error types for phonebook-core.

/// Message reported when a submission lacks a name or a number.
pub const MISSING_FIELDS: &str = "name or number missing";

/// Message reported when a submitted name clashes with a stored one.
pub const NAME_NOT_UNIQUE: &str = "name must be unique";

/// Message reported when an identifier cannot be parsed by the store.
pub const MALFORMATTED_ID: &str = "malformatted id";

/// Errors raised by directory stores and the reconciler.
///
/// The first four variants are client errors: the caller has to change its
/// input or refresh its view. Everything else is an operational failure.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// A required field is missing or empty.
    #[error("Validation error: {message}")]
    Validation {
        /// What went wrong
        message: String,
    },

    /// The submitted name clashes with an existing record.
    #[error("Duplicate name: {name}")]
    DuplicateName {
        /// Name that was submitted
        name: String,
    },

    /// No live record carries the identifier.
    #[error("Contact not found: {id}")]
    NotFound {
        /// Identifier that was not found
        id: String,
    },

    /// The store cannot parse the identifier.
    #[error("Malformed identifier: {id}")]
    MalformedId {
        /// Identifier as supplied by the caller
        id: String,
    },

    /// The underlying storage failed.
    #[error("Storage error: {message}")]
    Storage {
        /// Human-readable error message
        message: String,
        /// Source error if available
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A stored document could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Convenience `Result` type alias for phonebook-core operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Creates a new validation error.
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Error::Validation {
            message: message.into(),
        }
    }

    /// The validation error for an empty name or number.
    pub fn missing_fields() -> Self {
        Error::validation(MISSING_FIELDS)
    }

    /// Creates a not-found error for an identifier.
    pub fn not_found<S: Into<String>>(id: S) -> Self {
        Error::NotFound { id: id.into() }
    }

    /// Creates a malformed-identifier error.
    pub fn malformed_id<S: Into<String>>(id: S) -> Self {
        Error::MalformedId { id: id.into() }
    }

    /// Creates a storage error with a message.
    pub fn storage<S: Into<String>>(message: S) -> Self {
        Error::Storage {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a storage error with a message and source error.
    pub fn storage_with_source<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Error::Storage {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Returns whether the caller caused this error (a 4xx condition).
    pub fn is_client_error(&self) -> bool {
        match self {
            Error::Validation { .. } => true,
            Error::DuplicateName { .. } => true,
            Error::NotFound { .. } => true,
            Error::MalformedId { .. } => true,
            Error::Storage { .. } => false,
            Error::Serialization(_) => false,
        }
    }

    /// The short message shown to end users and sent over the wire.
    pub fn user_message(&self) -> String {
        match self {
            Error::Validation { message } => message.clone(),
            Error::DuplicateName { .. } => NAME_NOT_UNIQUE.to_string(),
            Error::MalformedId { .. } => MALFORMATTED_ID.to_string(),
            Error::NotFound { .. } => "not found".to_string(),
            Error::Storage { .. } | Error::Serialization(_) => "operation failed".to_string(),
        }
    }
}
