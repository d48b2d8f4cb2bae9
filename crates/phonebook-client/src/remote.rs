//! `DirectoryStore` backed by a remote Phonebook server.

use async_trait::async_trait;
use phonebook_core::{Contact, ContactId, DirectoryStore, Error, NameMatch, Result};

use crate::client::PhonebookClient;

/// Directory store that forwards every operation to the HTTP API.
///
/// Identifiers are allocated by the server. Failures are mapped back onto
/// the core error taxonomy so the reconciler sees the same errors it would
/// see from a local store.
#[derive(Debug, Clone)]
pub struct RemoteStore {
    client: PhonebookClient,
    name_match: NameMatch,
}

impl RemoteStore {
    /// Create a store over `client`.
    pub fn new(client: PhonebookClient) -> Self {
        Self {
            client,
            name_match: NameMatch::default(),
        }
    }

    /// Use a different name matching policy for local clash checks.
    pub fn with_name_match(mut self, name_match: NameMatch) -> Self {
        self.name_match = name_match;
        self
    }
}

#[async_trait]
impl DirectoryStore for RemoteStore {
    async fn find_all(&self) -> Result<Vec<Contact>> {
        self.client.get_all().await.map_err(|e| e.into_core(None))
    }

    async fn find_by_id(&self, id: &ContactId) -> Result<Option<Contact>> {
        self.client.get(id).await.map_err(|e| e.into_core(Some(id)))
    }

    async fn insert(&self, name: &str, number: &str) -> Result<Contact> {
        self.client
            .create(name, number)
            .await
            .map_err(|e| naming(e.into_core(None), name))
    }

    async fn replace(&self, id: &ContactId, name: &str, number: &str) -> Result<Contact> {
        self.client
            .update(id, name, number)
            .await
            .map_err(|e| naming(e.into_core(Some(id)), name))
    }

    /// The server answers 204 either way, so presence is checked first.
    async fn delete_by_id(&self, id: &ContactId) -> Result<bool> {
        let existed = self.find_by_id(id).await?.is_some();
        self.client
            .delete(id)
            .await
            .map_err(|e| e.into_core(Some(id)))?;
        Ok(existed)
    }

    fn name_match(&self) -> NameMatch {
        self.name_match
    }

    fn name(&self) -> &str {
        "remote"
    }
}

/// The server's uniqueness error carries no name; restore the submitted one.
fn naming(err: Error, name: &str) -> Error {
    match err {
        Error::DuplicateName { .. } => Error::DuplicateName {
            name: name.to_string(),
        },
        other => other,
    }
}
