//! Contact records and their identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};

/// Opaque identifier assigned to a contact by its store.
///
/// The format belongs to the store that allocated it: decimal counters for
/// the in-memory store, UUIDs for the document store. Callers must not
/// assume either.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContactId(String);

impl ContactId {
    /// Creates an identifier from a raw token.
    ///
    /// # Examples
    ///
    /// ```
    /// use phonebook_core::ContactId;
    ///
    /// let id = ContactId::new("1");
    /// assert_eq!(id.as_str(), "1");
    /// ```
    pub fn new<S: Into<String>>(id: S) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ContactId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ContactId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl AsRef<str> for ContactId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// One entry of the directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    /// Store-assigned identifier, immutable once allocated
    pub id: ContactId,
    /// Display name, unique across live records
    pub name: String,
    /// Phone number, free-form
    pub number: String,
}

impl Contact {
    /// Creates a contact record.
    pub fn new(id: impl Into<ContactId>, name: impl Into<String>, number: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            number: number.into(),
        }
    }

    /// Case-insensitive substring test used by the list filter.
    ///
    /// An empty filter shows every contact.
    pub fn matches_filter(&self, filter: &str) -> bool {
        self.name.to_lowercase().contains(&filter.to_lowercase())
    }
}

/// Checks that both fields of a submission are present.
pub fn validate_fields(name: &str, number: &str) -> Result<()> {
    if name.is_empty() || number.is_empty() {
        return Err(Error::missing_fields());
    }
    Ok(())
}

/// The four contacts a fresh in-memory directory starts with.
pub fn sample_contacts() -> Vec<Contact> {
    vec![
        Contact::new("1", "Arto Hellas", "040-123456"),
        Contact::new("2", "Ada Lovelace", "39-44-5323523"),
        Contact::new("3", "Dan Abramov", "12-43-234345"),
        Contact::new("4", "Mary Poppendieck", "39-23-6423122"),
    ]
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_contact_wire_format() {
        let contact = Contact::new("1", "Arto Hellas", "040-123456");
        let json = serde_json::to_value(&contact).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"id": "1", "name": "Arto Hellas", "number": "040-123456"})
        );
    }

    #[test]
    fn test_contact_id_is_transparent() {
        let id: ContactId = serde_json::from_str("\"64f1c0ffee\"").unwrap();
        assert_eq!(id.as_str(), "64f1c0ffee");
        assert_eq!(id.to_string(), "64f1c0ffee");
    }

    #[test]
    fn test_filter_is_case_insensitive() {
        let contact = Contact::new("1", "Arto Hellas", "040-123456");
        assert!(contact.matches_filter("arto"));
        assert!(contact.matches_filter("HELL"));
        assert!(contact.matches_filter(""));
        assert!(!contact.matches_filter("ada"));
    }

    #[test]
    fn test_validate_fields() {
        assert!(validate_fields("Ada", "39-44").is_ok());
        assert!(validate_fields("", "39-44").is_err());
        assert!(validate_fields("Ada", "").is_err());
    }

    #[test]
    fn test_sample_contacts_have_unique_ids() {
        let contacts = sample_contacts();
        let mut ids: Vec<_> = contacts.iter().map(|c| c.id.clone()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 4);
    }
}
