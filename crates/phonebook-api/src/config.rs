//! Server configuration.
//!
//! Values are resolved in order: built-in defaults, an optional TOML file,
//! environment variables, then command-line flags (applied by the binary).
//!
//! ```toml
//! host = "0.0.0.0"
//! port = 3001
//! backend = "redb"
//! db_path = "data/contacts.redb"
//! seed = false
//! name_match = "containment"
//! static_dir = "frontend/dist"
//! ```

use phonebook_core::NameMatch;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{Error, Result};

/// Environment variable overriding [`ServerConfig::port`].
pub const ENV_PORT: &str = "PORT";
/// Environment variable overriding [`ServerConfig::backend`].
pub const ENV_BACKEND: &str = "PHONEBOOK_BACKEND";
/// Environment variable overriding [`ServerConfig::db_path`].
pub const ENV_DB_PATH: &str = "PHONEBOOK_DB_PATH";
/// Environment variable overriding [`ServerConfig::static_dir`].
pub const ENV_STATIC_DIR: &str = "PHONEBOOK_STATIC_DIR";

/// Which directory store the server runs on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Process-local, lost on restart.
    #[default]
    Memory,
    /// Persistent redb document store.
    Redb,
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::Memory => write!(f, "memory"),
            Backend::Redb => write!(f, "redb"),
        }
    }
}

impl FromStr for Backend {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "memory" => Ok(Backend::Memory),
            "redb" => Ok(Backend::Redb),
            other => Err(Error::config(format!(
                "unknown backend '{other}' (expected 'memory' or 'redb')"
            ))),
        }
    }
}

/// Everything the server needs to start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind
    pub host: String,
    /// TCP port to listen on
    pub port: u16,
    /// Directory store backend
    pub backend: Backend,
    /// Database file for the redb backend
    pub db_path: PathBuf,
    /// Seed the memory backend with the sample contacts
    pub seed: bool,
    /// Name matching policy for the uniqueness check
    pub name_match: NameMatch,
    /// Directory of a built UI bundle served for unknown paths
    pub static_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3001,
            backend: Backend::Memory,
            db_path: PathBuf::from("data/contacts.redb"),
            seed: true,
            name_match: NameMatch::Containment,
            static_dir: None,
        }
    }
}

impl ServerConfig {
    /// Loads defaults, the optional file at `path`, then the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Reads a TOML file; missing keys keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
            .map_err(|e| Error::config(format!("failed to parse {}: {e}", path.display())))
    }

    /// Parses TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::config(e.to_string()))
    }

    /// Applies environment-style overrides looked up through `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup(ENV_PORT) {
            self.port = port
                .trim()
                .parse()
                .map_err(|_| Error::config(format!("invalid {ENV_PORT} '{port}'")))?;
        }
        if let Some(backend) = lookup(ENV_BACKEND) {
            self.backend = backend.parse()?;
        }
        if let Some(path) = lookup(ENV_DB_PATH) {
            self.db_path = PathBuf::from(path);
        }
        if let Some(dir) = lookup(ENV_STATIC_DIR) {
            self.static_dir = Some(PathBuf::from(dir));
        }
        Ok(())
    }

    /// Address to bind.
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| Error::config(format!("invalid listen address: {e}")))
    }
}
