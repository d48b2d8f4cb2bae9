//! # phonebook-client
//!
//! Rust client library for the Phonebook API.
//!
//! This crate provides everything a front end needs:
//! - Async HTTP client for the `/api/persons` endpoints
//! - `RemoteStore`, a `DirectoryStore` backed by the server
//! - `Session`, the cached record view with filter and submit/delete flows
//! - `Notifier`, the self-clearing notification banner

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod client;
pub mod error;
pub mod notify;
pub mod remote;
pub mod session;

pub use client::{DEFAULT_URL, PhonebookClient};
pub use error::{Error, Result};
pub use notify::{Notification, NotificationKind, Notifier};
pub use remote::RemoteStore;
pub use session::Session;
