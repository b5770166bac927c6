//! Contact book facade.
//!
//! # Responsibility
//! - Own the single SQLite connection for the process lifetime.
//! - Offer the narrow insert/update/fetch surface the UI layer calls.
//! - Log storage failures and degrade to absent/empty results.
//!
//! # Invariants
//! - One connection per book, guarded by a mutex; each call holds the lock
//!   for exactly one repository operation.
//! - Degraded methods (`insert`, `update`, `fetch_one`, `fetch_all`) never
//!   return errors; the `try_*` variants return the same failures typed.
//! - The database file is only destroyed when `reset_on_open` is set.

use crate::config::ContactBookConfig;
use crate::db::{open_db, open_db_in_memory, reset_db, DbError, DbResult};
use crate::model::contact::{Contact, ContactId};
use crate::repo::contact_repo::{ContactRepository, SqliteContactRepository};
use log::{debug, error, info, warn};
use once_cell::sync::OnceCell;
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use std::time::Instant;

static GLOBAL_BOOK: OnceCell<ContactBook> = OnceCell::new();

/// Process-wide handle over one storage engine instance.
#[derive(Debug)]
pub struct ContactBook {
    conn: Mutex<Connection>,
    db_path: Option<PathBuf>,
}

impl ContactBook {
    /// Opens (creating if needed) the database at `config.db_path`.
    ///
    /// When `config.reset_on_open` is set the file is deleted first, so the
    /// book starts from an empty schema.
    pub fn open(config: &ContactBookConfig) -> DbResult<Self> {
        if config.reset_on_open {
            warn!("event=contact_book_open module=service status=reset reason=reset_on_open");
            Self::reset(&config.db_path)?;
        }

        let conn = open_db(&config.db_path)?;
        info!("event=contact_book_open module=service status=ok mode=file");
        Ok(Self {
            conn: Mutex::new(conn),
            db_path: Some(config.db_path.clone()),
        })
    }

    /// Opens a throwaway in-memory book.
    pub fn open_in_memory() -> DbResult<Self> {
        let conn = open_db_in_memory()?;
        info!("event=contact_book_open module=service status=ok mode=memory");
        Ok(Self {
            conn: Mutex::new(conn),
            db_path: None,
        })
    }

    /// Deletes the database file at `path` if present.
    ///
    /// Maintenance only: call it before opening, never while a book holds
    /// the file. Returns whether a file was removed.
    pub fn reset(path: impl AsRef<Path>) -> DbResult<bool> {
        reset_db(path)
    }

    /// Database file backing this book, `None` for in-memory books.
    pub fn db_path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }

    /// Installs `book` as the process-wide instance.
    ///
    /// Returns the installed reference, or gives `book` back when another
    /// instance is already installed.
    pub fn install_global(book: ContactBook) -> Result<&'static ContactBook, ContactBook> {
        GLOBAL_BOOK
            .try_insert(book)
            .map_err(|(_, rejected)| rejected)
    }

    /// Returns the process-wide instance, `None` before [`Self::install_global`].
    pub fn global() -> Option<&'static ContactBook> {
        GLOBAL_BOOK.get()
    }

    /// Closes the connection explicitly instead of waiting for drop.
    pub fn close(self) -> DbResult<()> {
        let conn = self
            .conn
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);
        conn.close().map_err(|(_, err)| DbError::Step(err))
    }

    /// Inserts a new contact.
    ///
    /// Returns `None` when the store rejected the write; the failure is
    /// logged and callers should show a generic "failed to insert" message.
    pub fn insert(&self, contact: &Contact) -> Option<Contact> {
        self.try_insert(contact).ok()
    }

    /// Updates an existing contact.
    ///
    /// Failures are logged only; callers are not told the update failed.
    /// Use [`Self::try_update`] when the outcome matters.
    pub fn update(&self, contact: &Contact) {
        let _ = self.try_update(contact);
    }

    /// Loads one contact; `None` when missing or when the read failed.
    pub fn fetch_one(&self, id: ContactId) -> Option<Contact> {
        self.try_fetch_one(id).ok().flatten()
    }

    /// Loads all contacts ordered by name; empty when the read failed.
    pub fn fetch_all(&self) -> Vec<Contact> {
        self.try_fetch_all().unwrap_or_default()
    }

    pub fn try_insert(&self, contact: &Contact) -> DbResult<Contact> {
        let saved = self.run("contact_insert", |repo| repo.insert(contact))?;
        debug!(
            "event=contact_insert module=service status=ok id={}",
            saved.id.unwrap_or_default()
        );
        Ok(saved)
    }

    /// Returns the number of rows affected (0 for an unknown id).
    pub fn try_update(&self, contact: &Contact) -> DbResult<usize> {
        let changed = self.run("contact_update", |repo| repo.update(contact))?;
        debug!(
            "event=contact_update module=service status=ok id={} rows={}",
            contact.id.unwrap_or_default(),
            changed
        );
        Ok(changed)
    }

    pub fn try_fetch_one(&self, id: ContactId) -> DbResult<Option<Contact>> {
        let found = self.run("contact_fetch_one", |repo| repo.fetch_one(id))?;
        debug!(
            "event=contact_fetch_one module=service status=ok id={} found={}",
            id,
            found.is_some()
        );
        Ok(found)
    }

    pub fn try_fetch_all(&self) -> DbResult<Vec<Contact>> {
        let contacts = self.run("contact_fetch_all", |repo| repo.fetch_all())?;
        debug!(
            "event=contact_fetch_all module=service status=ok count={}",
            contacts.len()
        );
        Ok(contacts)
    }

    fn run<T>(
        &self,
        event: &str,
        operation: impl FnOnce(&SqliteContactRepository<'_>) -> DbResult<T>,
    ) -> DbResult<T> {
        let started_at = Instant::now();
        // Poisoning is ignored; the connection holds no Rust-side invariants.
        let conn = self.conn.lock().unwrap_or_else(PoisonError::into_inner);
        let repo = SqliteContactRepository::new(&conn);

        operation(&repo).map_err(|err| {
            error!(
                "event={} module=service status=error duration_ms={} error_code={} error={}",
                event,
                started_at.elapsed().as_millis(),
                err.error_code(),
                err
            );
            err
        })
    }
}

#[cfg(test)]
mod tests {
    use super::ContactBook;
    use crate::model::contact::Contact;

    #[test]
    fn in_memory_book_has_no_path() {
        let book = ContactBook::open_in_memory().unwrap();
        assert!(book.db_path().is_none());
    }

    #[test]
    fn close_releases_connection() {
        let book = ContactBook::open_in_memory().unwrap();
        assert!(book.insert(&Contact::new("Jonny", "90767")).is_some());
        book.close().unwrap();
    }

    #[test]
    fn global_instance_is_installed_once() {
        let first = ContactBook::open_in_memory().unwrap();
        let installed = ContactBook::install_global(first).expect("first install succeeds");
        assert!(std::ptr::eq(
            installed,
            ContactBook::global().expect("global is set")
        ));

        let second = ContactBook::open_in_memory().unwrap();
        assert!(ContactBook::install_global(second).is_err());
    }
}
