//! Document store backed by a single redb file.
//!
//! Each contact is a JSON document keyed by its UUID. Every operation runs
//! in one redb transaction on the blocking pool, so readers always see a
//! committed snapshot.

use async_trait::async_trait;
use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use uuid::Uuid;

use super::DirectoryStore;
use crate::contact::{Contact, ContactId, validate_fields};
use crate::error::{Error, Result};
use crate::matching::NameMatch;

const CONTACTS: TableDefinition<&str, &str> = TableDefinition::new("contacts");

/// Stored form of a contact; the identifier lives in the key.
#[derive(Serialize, Deserialize)]
struct ContactDocument {
    name: String,
    number: String,
}

impl ContactDocument {
    fn encode(name: &str, number: &str) -> Result<String> {
        let doc = ContactDocument {
            name: name.to_string(),
            number: number.to_string(),
        };
        Ok(serde_json::to_string(&doc)?)
    }

    fn decode(key: &str, raw: &str) -> Result<Contact> {
        let doc: ContactDocument = serde_json::from_str(raw)?;
        Ok(Contact::new(key, doc.name, doc.number))
    }
}

fn storage_err<E: Into<redb::Error>>(context: &'static str) -> impl FnOnce(E) -> Error {
    move |e| Error::storage_with_source(context, e.into())
}

/// Canonical table key for an identifier, or `MalformedId`.
fn parse_key(id: &ContactId) -> Result<String> {
    Uuid::parse_str(id.as_str())
        .map(|uuid| uuid.to_string())
        .map_err(|_| Error::malformed_id(id.as_str()))
}

/// Persistent directory store.
///
/// Identifiers are UUID v4 tokens; anything that does not parse as a UUID
/// is rejected as malformed before the database is touched.
pub struct RedbStore {
    db: Arc<Database>,
    path: PathBuf,
    name_match: NameMatch,
}

impl RedbStore {
    /// Opens (or creates) the database at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    Error::storage_with_source(
                        format!("failed to create {}", parent.display()),
                        e,
                    )
                })?;
            }
        }

        let db = Database::create(path).map_err(storage_err("failed to open contacts database"))?;

        // Create the table up front so read transactions never miss it.
        let txn = db
            .begin_write()
            .map_err(storage_err("failed to begin transaction"))?;
        txn.open_table(CONTACTS)
            .map_err(storage_err("failed to open contacts table"))?;
        txn.commit()
            .map_err(storage_err("failed to commit transaction"))?;

        log::info!("Opened contacts database at {}", path.display());

        Ok(Self {
            db: Arc::new(db),
            path: path.to_path_buf(),
            name_match: NameMatch::default(),
        })
    }

    /// Sets the name matching policy.
    pub fn with_name_match(mut self, name_match: NameMatch) -> Self {
        self.name_match = name_match;
        self
    }

    /// Location of the database file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn run<T, F>(&self, op: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&Database) -> Result<T> + Send + 'static,
    {
        let db = Arc::clone(&self.db);
        tokio::task::spawn_blocking(move || op(&db))
            .await
            .map_err(|e| Error::storage_with_source("storage task failed", e))?
    }
}

#[async_trait]
impl DirectoryStore for RedbStore {
    async fn find_all(&self) -> Result<Vec<Contact>> {
        self.run(|db| {
            let txn = db
                .begin_read()
                .map_err(storage_err("failed to begin read"))?;
            let table = txn
                .open_table(CONTACTS)
                .map_err(storage_err("failed to open contacts table"))?;

            let mut contacts = Vec::new();
            for entry in table.iter().map_err(storage_err("failed to scan contacts"))? {
                let (key, value) = entry.map_err(storage_err("failed to read contact"))?;
                contacts.push(ContactDocument::decode(key.value(), value.value())?);
            }
            Ok(contacts)
        })
        .await
    }

    async fn find_by_id(&self, id: &ContactId) -> Result<Option<Contact>> {
        let key = parse_key(id)?;
        self.run(move |db| {
            let txn = db
                .begin_read()
                .map_err(storage_err("failed to begin read"))?;
            let table = txn
                .open_table(CONTACTS)
                .map_err(storage_err("failed to open contacts table"))?;

            match table.get(key.as_str()).map_err(storage_err("failed to read contact"))? {
                Some(value) => Ok(Some(ContactDocument::decode(&key, value.value())?)),
                None => Ok(None),
            }
        })
        .await
    }

    async fn insert(&self, name: &str, number: &str) -> Result<Contact> {
        validate_fields(name, number)?;

        let key = Uuid::new_v4().to_string();
        let raw = ContactDocument::encode(name, number)?;
        let contact = Contact::new(key.as_str(), name, number);

        self.run(move |db| {
            let txn = db
                .begin_write()
                .map_err(storage_err("failed to begin transaction"))?;
            {
                let mut table = txn
                    .open_table(CONTACTS)
                    .map_err(storage_err("failed to open contacts table"))?;
                table
                    .insert(key.as_str(), raw.as_str())
                    .map_err(storage_err("failed to write contact"))?;
            }
            txn.commit()
                .map_err(storage_err("failed to commit transaction"))?;
            Ok(())
        })
        .await?;

        log::debug!("Inserted contact {} ({})", contact.id, contact.name);
        Ok(contact)
    }

    async fn replace(&self, id: &ContactId, name: &str, number: &str) -> Result<Contact> {
        let key = parse_key(id)?;
        validate_fields(name, number)?;

        let raw = ContactDocument::encode(name, number)?;
        let contact = Contact::new(key.as_str(), name, number);

        self.run(move |db| {
            let txn = db
                .begin_write()
                .map_err(storage_err("failed to begin transaction"))?;
            {
                let mut table = txn
                    .open_table(CONTACTS)
                    .map_err(storage_err("failed to open contacts table"))?;
                let exists = table
                    .get(key.as_str())
                    .map_err(storage_err("failed to read contact"))?
                    .is_some();
                if !exists {
                    return Err(Error::not_found(key));
                }
                table
                    .insert(key.as_str(), raw.as_str())
                    .map_err(storage_err("failed to write contact"))?;
            }
            txn.commit()
                .map_err(storage_err("failed to commit transaction"))?;
            Ok(())
        })
        .await?;

        log::debug!("Replaced contact {}", contact.id);
        Ok(contact)
    }

    async fn delete_by_id(&self, id: &ContactId) -> Result<bool> {
        let key = parse_key(id)?;
        self.run(move |db| {
            let txn = db
                .begin_write()
                .map_err(storage_err("failed to begin transaction"))?;
            let removed = {
                let mut table = txn
                    .open_table(CONTACTS)
                    .map_err(storage_err("failed to open contacts table"))?;
                table
                    .remove(key.as_str())
                    .map_err(storage_err("failed to delete contact"))?
                    .is_some()
            };
            txn.commit()
                .map_err(storage_err("failed to commit transaction"))?;

            if removed {
                log::debug!("Deleted contact {key}");
            }
            Ok(removed)
        })
        .await
    }

    fn name_match(&self) -> NameMatch {
        self.name_match
    }

    fn name(&self) -> &str {
        "redb"
    }
}

impl std::fmt::Debug for RedbStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedbStore")
            .field("path", &self.path)
            .field("name_match", &self.name_match)
            .finish()
    }
}
