//! UI session: cached record list, name filter, and the submit/delete flows.

use std::sync::Arc;

use phonebook_core::{
    Conflict, Contact, ContactId, Decider, DirectoryStore, Error, Outcome, Proposal, Reconciler,
    Result,
};

use crate::notify::Notifier;

/// State behind one phonebook view.
///
/// The session keeps a local copy of the record set, refreshed on demand and
/// patched after each mutation, and reports every outcome on its
/// [`Notifier`].
#[derive(Debug)]
pub struct Session {
    reconciler: Reconciler,
    contacts: Vec<Contact>,
    filter: String,
    notifier: Notifier,
}

impl Session {
    /// A session over `store` with the default notifier.
    pub fn new(store: Arc<dyn DirectoryStore>) -> Self {
        Self::with_notifier(store, Notifier::new())
    }

    /// A session with a caller-supplied notifier.
    pub fn with_notifier(store: Arc<dyn DirectoryStore>, notifier: Notifier) -> Self {
        Self {
            reconciler: Reconciler::new(store),
            contacts: Vec::new(),
            filter: String::new(),
            notifier,
        }
    }

    /// Reloads the cached record set from the store.
    pub async fn refresh(&mut self) -> Result<()> {
        match self.reconciler.store().find_all().await {
            Ok(contacts) => {
                self.contacts = contacts;
                Ok(())
            }
            Err(e) => Err(self.report(e)),
        }
    }

    /// Every cached record.
    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    /// Cached records whose name contains the filter, ignoring case.
    pub fn visible(&self) -> Vec<&Contact> {
        self.contacts
            .iter()
            .filter(|c| c.matches_filter(&self.filter))
            .collect()
    }

    /// Current name filter.
    pub fn filter(&self) -> &str {
        &self.filter
    }

    /// Replaces the name filter.
    pub fn set_filter(&mut self, filter: impl Into<String>) {
        self.filter = filter.into();
    }

    /// The notification banner.
    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    /// First phase of a submission; failures are reported on the banner.
    pub async fn propose(&mut self, name: &str, number: &str) -> Result<Proposal> {
        match self.reconciler.propose(name, number).await {
            Ok(proposal) => Ok(proposal),
            Err(e) => Err(self.report(e)),
        }
    }

    /// Second phase: applies the user's answer to a conflict.
    pub async fn resolve(&mut self, conflict: Conflict, accepted: bool) -> Result<Outcome> {
        let result = self.reconciler.apply_decision(conflict, accepted).await;
        self.settle(result)
    }

    /// Creates a submission that had no conflict.
    pub async fn create(&mut self, proposal: Proposal) -> Result<Outcome> {
        let result = match proposal {
            Proposal::NoConflict(submission) => self.reconciler.create(submission).await,
            Proposal::Conflict(conflict) => Err(Error::DuplicateName {
                name: conflict.submission.name().to_string(),
            }),
        };
        self.settle(result)
    }

    /// Runs a whole submission, asking `decider` on a name clash.
    pub async fn submit<D>(&mut self, name: &str, number: &str, decider: &mut D) -> Result<Outcome>
    where
        D: Decider + ?Sized,
    {
        match self.propose(name, number).await? {
            proposal @ Proposal::NoConflict(_) => self.create(proposal).await,
            Proposal::Conflict(conflict) => {
                let accepted = decider.confirm_replace(&conflict.existing, &conflict.submission);
                self.resolve(conflict, accepted).await
            }
        }
    }

    /// Removes a record and drops it from the cached view.
    pub async fn delete(&mut self, id: &ContactId) -> Result<()> {
        match self.reconciler.store().delete_by_id(id).await {
            Ok(removed) => {
                log::debug!("Deleted {} (present: {})", id, removed);
                self.contacts.retain(|c| &c.id != id);
                Ok(())
            }
            Err(e) => Err(self.report(e)),
        }
    }

    fn settle(&mut self, result: Result<Outcome>) -> Result<Outcome> {
        match &result {
            Ok(Outcome::Created(contact)) => {
                self.notifier.confirm(format!("Added {}", contact.name));
                self.contacts.push(contact.clone());
            }
            Ok(Outcome::Updated(contact)) => {
                self.notifier.confirm(format!(
                    "Updated {} to {}",
                    contact.name, contact.number
                ));
                for cached in self.contacts.iter_mut().filter(|c| c.id == contact.id) {
                    *cached = contact.clone();
                }
            }
            Ok(Outcome::StaleReference(contact)) => {
                self.notifier.info(format!(
                    "Information of {} has already been removed from the server",
                    contact.name
                ));
                self.contacts.retain(|c| c.id != contact.id);
            }
            Ok(Outcome::Cancelled) => {}
            Err(e) => self.notifier.error(e.user_message()),
        }
        result
    }

    fn report(&self, error: Error) -> Error {
        self.notifier.error(error.user_message());
        error
    }
}
