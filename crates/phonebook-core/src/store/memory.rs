//! In-memory directory store.

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::DirectoryStore;
use crate::contact::{Contact, ContactId, sample_contacts, validate_fields};
use crate::error::{Error, Result};
use crate::matching::NameMatch;

/// Directory held in a vector behind a read-write lock.
///
/// Identifiers come from a monotonic counter rendered in decimal. A store
/// built from existing records continues after the largest numeric id among
/// them. Any token is a well-formed identifier here; unknown ones are simply
/// absent.
pub struct MemoryStore {
    inner: RwLock<Inner>,
    name_match: NameMatch,
}

struct Inner {
    contacts: Vec<Contact>,
    // None once u64::MAX has been handed out
    next_id: Option<u64>,
}

impl Inner {
    fn allocate_id(&mut self) -> Result<ContactId> {
        let id = self
            .next_id
            .ok_or_else(|| Error::storage("identifier space exhausted"))?;
        self.next_id = id.checked_add(1);
        Ok(ContactId::new(id.to_string()))
    }
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::with_contacts(Vec::new())
    }

    /// Creates a store holding `contacts`.
    pub fn with_contacts(contacts: Vec<Contact>) -> Self {
        let next_id = contacts
            .iter()
            .filter_map(|c| c.id.as_str().parse::<u64>().ok())
            .max()
            .map_or(Some(1), |max| max.checked_add(1));

        Self {
            inner: RwLock::new(Inner { contacts, next_id }),
            name_match: NameMatch::default(),
        }
    }

    /// Creates a store seeded with the sample directory.
    pub fn with_sample_contacts() -> Self {
        Self::with_contacts(sample_contacts())
    }

    /// Sets the name matching policy.
    pub fn with_name_match(mut self, name_match: NameMatch) -> Self {
        self.name_match = name_match;
        self
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DirectoryStore for MemoryStore {
    async fn find_all(&self) -> Result<Vec<Contact>> {
        Ok(self.inner.read().await.contacts.clone())
    }

    async fn find_by_id(&self, id: &ContactId) -> Result<Option<Contact>> {
        let inner = self.inner.read().await;
        Ok(inner.contacts.iter().find(|c| &c.id == id).cloned())
    }

    async fn insert(&self, name: &str, number: &str) -> Result<Contact> {
        validate_fields(name, number)?;

        let mut inner = self.inner.write().await;
        let id = inner.allocate_id()?;
        let contact = Contact::new(id, name, number);
        inner.contacts.push(contact.clone());

        log::debug!("Inserted contact {} ({})", contact.id, contact.name);
        Ok(contact)
    }

    async fn replace(&self, id: &ContactId, name: &str, number: &str) -> Result<Contact> {
        validate_fields(name, number)?;

        let mut inner = self.inner.write().await;
        let slot = inner
            .contacts
            .iter_mut()
            .find(|c| &c.id == id)
            .ok_or_else(|| Error::not_found(id.as_str()))?;

        slot.name = name.to_string();
        slot.number = number.to_string();

        log::debug!("Replaced contact {id}");
        Ok(slot.clone())
    }

    async fn delete_by_id(&self, id: &ContactId) -> Result<bool> {
        let mut inner = self.inner.write().await;
        let before = inner.contacts.len();
        inner.contacts.retain(|c| &c.id != id);
        let removed = inner.contacts.len() < before;

        if removed {
            log::debug!("Deleted contact {id}");
        }
        Ok(removed)
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.inner.read().await.contacts.len())
    }

    fn name_match(&self) -> NameMatch {
        self.name_match
    }

    fn name(&self) -> &str {
        "memory"
    }
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore")
            .field("name_match", &self.name_match)
            .finish_non_exhaustive()
    }
}
