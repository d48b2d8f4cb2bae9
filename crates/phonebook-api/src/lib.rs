//! # phonebook-api
//!
//! HTTP API server for the Phonebook contact directory.
//!
//! This crate provides the HTTP server:
//! - RESTful endpoints for listing, creating, updating, and deleting contacts
//! - Error-to-response mapping for the core error taxonomy
//! - Request logging middleware and permissive CORS
//! - Configuration from TOML, environment, and flags
//! - Optional static file serving for a built UI bundle

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;

pub use config::ServerConfig;
pub use error::{ApiError, Error, Result};
pub use server::Server;
pub use state::AppState;
