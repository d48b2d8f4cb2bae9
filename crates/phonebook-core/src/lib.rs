//! Phonebook Core — contact records, directory stores, and reconciliation.
//!
//! This crate holds everything the HTTP server and the client share. It has
//! no internal Phonebook dependencies.
//!
//! # Modules
//!
//! - [`contact`]: Record and identifier types, field validation, sample data
//! - [`error`]: Error taxonomy and Result alias
//! - [`matching`]: Name matching policy for the uniqueness check
//! - [`reconcile`]: Create-or-update decision logic
//! - [`store`]: `DirectoryStore` trait with in-memory and redb backends

#![forbid(unsafe_code)]

pub mod contact;
pub mod error;
pub mod matching;
pub mod reconcile;
pub mod store;

#[cfg(test)]
mod proptests;

// Re-export key types at crate root for convenience
pub use contact::{Contact, ContactId, sample_contacts};
pub use error::{Error, Result};
pub use matching::NameMatch;
pub use reconcile::{Confirm, Conflict, Decider, Outcome, Proposal, Reconciler, Submission};
pub use store::{DirectoryStore, MemoryStore, RedbStore};
