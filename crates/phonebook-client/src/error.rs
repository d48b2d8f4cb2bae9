//! Error types for phonebook-client

use phonebook_core::ContactId;
use phonebook_core::error::{MALFORMATTED_ID, NAME_NOT_UNIQUE};
use thiserror::Error;

/// Result type alias for phonebook-client operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in phonebook-client
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Error from phonebook-core
    #[error("Core error: {0}")]
    Core(#[from] phonebook_core::Error),

    /// HTTP client error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// The `error` field of the response body, or empty
        message: String,
    },

    /// The base URL could not be parsed.
    #[error("Invalid URL '{url}': {message}")]
    InvalidUrl {
        /// URL as supplied
        url: String,
        /// Parser message
        message: String,
    },
}

impl Error {
    /// HTTP status of an API error, if this is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api { status, .. } => Some(*status),
            Error::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Returns `true` for a 404 from the server.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Maps this error onto the core taxonomy.
    ///
    /// `id` names the record the request addressed, if any.
    pub fn into_core(self, id: Option<&ContactId>) -> phonebook_core::Error {
        let addressed = || id.map(ContactId::to_string).unwrap_or_default();
        match self {
            Error::Core(e) => e,
            Error::Api { status: 404, .. } => phonebook_core::Error::not_found(addressed()),
            Error::Api {
                status: 400,
                message,
            } => match message.as_str() {
                MALFORMATTED_ID => phonebook_core::Error::malformed_id(addressed()),
                NAME_NOT_UNIQUE => phonebook_core::Error::DuplicateName {
                    name: String::new(),
                },
                _ => phonebook_core::Error::validation(message),
            },
            Error::Api { status, message } => {
                phonebook_core::Error::storage(format!("server returned {status}: {message}"))
            }
            Error::Http(e) => phonebook_core::Error::storage_with_source("request failed", e),
            Error::InvalidUrl { url, message } => {
                phonebook_core::Error::storage(format!("invalid URL '{url}': {message}"))
            }
        }
    }

    /// The short message shown to end users.
    pub fn user_message(&self) -> String {
        match self {
            Error::Core(e) => e.user_message(),
            Error::Api { message, .. } if !message.is_empty() => message.clone(),
            Error::Api { status, .. } => format!("request failed with status {status}"),
            Error::Http(_) => "server unreachable".to_string(),
            Error::InvalidUrl { .. } => self.to_string(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn api(status: u16, message: &str) -> Error {
        Error::Api {
            status,
            message: message.to_string(),
        }
    }

    #[test]
    fn test_not_found_maps_with_id() {
        let id = ContactId::new("7");
        let err = api(404, "").into_core(Some(&id));
        assert!(matches!(err, phonebook_core::Error::NotFound { ref id } if id == "7"));
    }

    #[test]
    fn test_bad_request_messages_map_to_core_variants() {
        let id = ContactId::new("zzz");
        assert!(matches!(
            api(400, "malformatted id").into_core(Some(&id)),
            phonebook_core::Error::MalformedId { .. }
        ));
        assert!(matches!(
            api(400, "name must be unique").into_core(None),
            phonebook_core::Error::DuplicateName { .. }
        ));

        let err = api(400, "name or number missing").into_core(None);
        assert!(matches!(err, phonebook_core::Error::Validation { .. }));
        assert_eq!(err.user_message(), "name or number missing");
    }

    #[test]
    fn test_server_failure_is_storage() {
        let err = api(500, "operation failed").into_core(None);
        assert!(!err.is_client_error());
    }

    #[test]
    fn test_user_message() {
        assert_eq!(api(400, "name must be unique").user_message(), "name must be unique");
        assert_eq!(api(502, "").user_message(), "request failed with status 502");
        assert!(api(404, "").is_not_found());
    }
}
