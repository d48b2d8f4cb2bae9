//! Create-or-update reconciliation.
//!
//! A submitted `(name, number)` pair becomes at most one store mutation.
//! The decision runs in two phases so the confirmation step can live
//! anywhere (a terminal prompt, a browser dialog, a test):
//!
//! ```text
//! propose(name, number)
//!   ├── NoConflict(submission) ── create ──────────────► Created
//!   └── Conflict(existing, submission)
//!         └── apply_decision(accepted)
//!               ├── declined ───────────────────────────► Cancelled
//!               ├── replace ok ─────────────────────────► Updated
//!               └── record vanished since propose ──────► StaleReference
//! ```
//!
//! The reconciler keeps no state between calls; every phase re-reads the
//! store.

use std::sync::Arc;

use crate::contact::{Contact, ContactId, validate_fields};
use crate::error::{Error, Result};
use crate::store::DirectoryStore;

/// A validated name/number pair awaiting a decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    name: String,
    number: String,
}

impl Submission {
    /// Validates and wraps a submitted pair.
    pub fn new(name: impl Into<String>, number: impl Into<String>) -> Result<Self> {
        let name = name.into();
        let number = number.into();
        validate_fields(&name, &number)?;
        Ok(Self { name, number })
    }

    /// Submitted name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Submitted number.
    pub fn number(&self) -> &str {
        &self.number
    }
}

/// An existing record that clashes with a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    /// The stored record the submission matched
    pub existing: Contact,
    /// What the caller submitted
    pub submission: Submission,
}

/// Result of the first phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Proposal {
    /// Nothing clashes; the submission can be created.
    NoConflict(Submission),
    /// A record already carries this name; confirmation is needed.
    Conflict(Conflict),
}

/// Terminal outcome of a reconciliation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A new record was inserted.
    Created(Contact),
    /// The existing record's number was replaced.
    Updated(Contact),
    /// The caller declined to replace; nothing changed.
    Cancelled,
    /// The record to replace disappeared after it was proposed.
    ///
    /// Callers should purge it from any cached view.
    StaleReference(Contact),
}

impl Outcome {
    /// Returns `true` if the store was mutated.
    pub fn is_mutation(&self) -> bool {
        matches!(self, Outcome::Created(_) | Outcome::Updated(_))
    }
}

/// Answers "replace the old number with a new one?" for a conflict.
pub trait Decider {
    /// Returns `true` to replace `existing`'s number with the submission's.
    fn confirm_replace(&mut self, existing: &Contact, submission: &Submission) -> bool;
}

/// A fixed answer, for callers that decided up front.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Confirm(pub bool);

impl Decider for Confirm {
    fn confirm_replace(&mut self, _existing: &Contact, _submission: &Submission) -> bool {
        self.0
    }
}

/// Maps submissions onto store mutations.
#[derive(Clone)]
pub struct Reconciler {
    store: Arc<dyn DirectoryStore>,
}

impl Reconciler {
    /// Creates a reconciler over `store`.
    pub fn new(store: Arc<dyn DirectoryStore>) -> Self {
        Self { store }
    }

    /// The store this reconciler mutates.
    pub fn store(&self) -> &Arc<dyn DirectoryStore> {
        &self.store
    }

    /// Phase one: validate and look for a clashing record.
    pub async fn propose(&self, name: &str, number: &str) -> Result<Proposal> {
        let submission = Submission::new(name, number)?;

        match self.store.find_by_name(submission.name()).await? {
            Some(existing) => Ok(Proposal::Conflict(Conflict {
                existing,
                submission,
            })),
            None => Ok(Proposal::NoConflict(submission)),
        }
    }

    /// Inserts a submission that had no conflict.
    pub async fn create(&self, submission: Submission) -> Result<Outcome> {
        let contact = self
            .store
            .insert(submission.name(), submission.number())
            .await?;
        log::info!("Created contact {} ({})", contact.id, contact.name);
        Ok(Outcome::Created(contact))
    }

    /// Phase two: act on the caller's answer to a conflict.
    ///
    /// The existing record keeps its name; only the number changes.
    pub async fn apply_decision(&self, conflict: Conflict, accepted: bool) -> Result<Outcome> {
        if !accepted {
            log::debug!("Replacement of {} declined", conflict.existing.id);
            return Ok(Outcome::Cancelled);
        }

        let Conflict {
            existing,
            submission,
        } = conflict;

        match self
            .store
            .replace(&existing.id, &existing.name, submission.number())
            .await
        {
            Ok(updated) => {
                log::info!("Updated contact {} to {}", updated.id, updated.number);
                Ok(Outcome::Updated(updated))
            }
            Err(Error::NotFound { .. }) => {
                log::info!("Contact {} was removed before update", existing.id);
                Ok(Outcome::StaleReference(existing))
            }
            Err(e) => Err(e),
        }
    }

    /// Runs both phases, asking `decider` when a conflict is found.
    pub async fn reconcile<D>(&self, name: &str, number: &str, decider: &mut D) -> Result<Outcome>
    where
        D: Decider + ?Sized,
    {
        match self.propose(name, number).await? {
            Proposal::NoConflict(submission) => self.create(submission).await,
            Proposal::Conflict(conflict) => {
                let accepted = decider.confirm_replace(&conflict.existing, &conflict.submission);
                self.apply_decision(conflict, accepted).await
            }
        }
    }

    /// Creates a record, treating any name clash as an error.
    ///
    /// This is the server-side rule: there is nobody to ask, so a clash is
    /// reported as [`Error::DuplicateName`].
    pub async fn create_unique(&self, name: &str, number: &str) -> Result<Contact> {
        match self.propose(name, number).await? {
            Proposal::NoConflict(submission) => match self.create(submission).await? {
                Outcome::Created(contact) => Ok(contact),
                other => Err(Error::storage(format!("unexpected outcome {other:?}"))),
            },
            Proposal::Conflict(conflict) => Err(Error::DuplicateName {
                name: conflict.submission.name,
            }),
        }
    }

    /// Overwrites a record, refusing a name another record already carries.
    ///
    /// The record at `id` itself never counts as a clash, so resubmitting
    /// its own name is fine.
    pub async fn update_unique(&self, id: &ContactId, name: &str, number: &str) -> Result<Contact> {
        let submission = Submission::new(name, number)?;
        let policy = self.store.name_match();

        let clash = self
            .store
            .find_all()
            .await?
            .into_iter()
            .find(|c| &c.id != id && policy.matches(&c.name, submission.name()));
        if let Some(other) = clash {
            log::debug!("Rename of {} clashes with {}", id, other.id);
            return Err(Error::DuplicateName {
                name: submission.name,
            });
        }

        self.store
            .replace(id, submission.name(), submission.number())
            .await
    }
}

impl std::fmt::Debug for Reconciler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reconciler")
            .field("store", &self.store.name())
            .finish()
    }
}
