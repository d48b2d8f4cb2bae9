//! Directory store trait and implementations.
//!
//! # Backends
//!
//! - [`MemoryStore`]: vector behind a lock, decimal counter identifiers
//! - [`RedbStore`]: JSON documents in a single redb file, UUID identifiers
//!
//! The reconciler and the HTTP layer only see `Arc<dyn DirectoryStore>`.

mod document;
mod memory;

#[cfg(test)]
mod proptests;

pub use document::RedbStore;
pub use memory::MemoryStore;

use async_trait::async_trait;

use crate::contact::{Contact, ContactId};
use crate::error::Result;
use crate::matching::NameMatch;

/// Authoritative holder of the contact set.
///
/// Every method is one atomic operation: concurrent readers see either the
/// state before or after a write, never a partial record.
#[async_trait]
pub trait DirectoryStore: Send + Sync {
    /// All live records. Order is backend-defined but stable per snapshot.
    async fn find_all(&self) -> Result<Vec<Contact>>;

    /// The record with `id`, if it is live.
    ///
    /// Fails with [`Error::MalformedId`](crate::Error::MalformedId) when the
    /// backend cannot parse `id`.
    async fn find_by_id(&self, id: &ContactId) -> Result<Option<Contact>>;

    /// The first record whose name clashes with `name` under
    /// [`name_match`](Self::name_match).
    async fn find_by_name(&self, name: &str) -> Result<Option<Contact>> {
        let policy = self.name_match();
        Ok(self
            .find_all()
            .await?
            .into_iter()
            .find(|contact| policy.matches(&contact.name, name)))
    }

    /// Allocates a fresh identifier and stores a new record.
    async fn insert(&self, name: &str, number: &str) -> Result<Contact>;

    /// Overwrites the name and number of an existing record.
    ///
    /// Fails with [`Error::NotFound`](crate::Error::NotFound) if `id` is not live.
    async fn replace(&self, id: &ContactId, name: &str, number: &str) -> Result<Contact>;

    /// Removes a record. Returns `false` when nothing was removed.
    async fn delete_by_id(&self, id: &ContactId) -> Result<bool>;

    /// Number of live records.
    async fn count(&self) -> Result<usize> {
        Ok(self.find_all().await?.len())
    }

    /// Policy used by [`find_by_name`](Self::find_by_name).
    fn name_match(&self) -> NameMatch;

    /// Backend name for diagnostics.
    fn name(&self) -> &str;
}
