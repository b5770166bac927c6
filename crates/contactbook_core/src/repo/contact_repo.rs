//! Contact repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide the four storage operations over the `Contact` table.
//! - Keep SQL text and positional binding inside the persistence boundary.
//!
//! # Invariants
//! - Every call prepares a fresh statement; it is dropped on every exit path.
//! - Parameter and column positions come from [`ContactField::index`], so
//!   encode and decode cannot drift apart.
//! - Absent optional fields bind SQL `NULL`, never an empty string.
//! - Writes are not pre-validated here; the schema `CHECK`s are the last line
//!   of defense and surface as [`DbError::Step`].

use crate::db::{DbError, DbResult};
use crate::model::contact::{
    Contact, ContactField, ContactId, CONTACT_TABLE, ID_COLUMN, ID_INDEX,
};
use once_cell::sync::Lazy;
use rusqlite::{Connection, Row, Statement};

/// Bind position of the key in the update statement, right after the fields.
const UPDATE_ID_POSITION: usize = ContactField::ALL.len() + 1;

static SELECT_COLUMNS: Lazy<String> = Lazy::new(|| {
    std::iter::once(ID_COLUMN)
        .chain(ContactField::ALL.iter().map(|field| field.column()))
        .collect::<Vec<_>>()
        .join(", ")
});

static INSERT_SQL: Lazy<String> = Lazy::new(|| {
    let columns = ContactField::ALL
        .iter()
        .map(|field| field.column())
        .collect::<Vec<_>>()
        .join(", ");
    let placeholders = ContactField::ALL
        .iter()
        .map(|field| format!("?{}", field.index()))
        .collect::<Vec<_>>()
        .join(", ");
    format!("INSERT INTO {CONTACT_TABLE} ({columns}) VALUES ({placeholders});")
});

static UPDATE_SQL: Lazy<String> = Lazy::new(|| {
    let assignments = ContactField::ALL
        .iter()
        .map(|field| format!("{} = ?{}", field.column(), field.index()))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "UPDATE {CONTACT_TABLE} SET {assignments} WHERE {ID_COLUMN} = ?{UPDATE_ID_POSITION};"
    )
});

static SELECT_ONE_SQL: Lazy<String> = Lazy::new(|| {
    format!(
        "SELECT {} FROM {CONTACT_TABLE} WHERE {ID_COLUMN} = ?1;",
        SELECT_COLUMNS.as_str()
    )
});

static SELECT_ALL_SQL: Lazy<String> = Lazy::new(|| {
    format!(
        "SELECT {} FROM {CONTACT_TABLE} ORDER BY {};",
        SELECT_COLUMNS.as_str(),
        ContactField::Name.column()
    )
});

/// Repository interface for contact persistence.
pub trait ContactRepository {
    /// Inserts a new row and returns the contact with its store-assigned id.
    ///
    /// An `id` already present on the input is ignored.
    fn insert(&self, contact: &Contact) -> DbResult<Contact>;

    /// Overwrites the five data fields of the row keyed by `contact.id`.
    ///
    /// Returns the number of rows affected; an unknown id affects zero rows
    /// and is not an error. A missing id fails with [`DbError::Bind`].
    fn update(&self, contact: &Contact) -> DbResult<usize>;

    /// Loads one contact, `None` when no row has this id.
    fn fetch_one(&self, id: ContactId) -> DbResult<Option<Contact>>;

    /// Loads every contact ordered by name (SQLite default collation).
    fn fetch_all(&self) -> DbResult<Vec<Contact>>;
}

/// SQLite-backed contact repository.
pub struct SqliteContactRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteContactRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn prepare(&self, sql: &str) -> DbResult<Statement<'conn>> {
        self.conn.prepare(sql).map_err(DbError::Prepare)
    }
}

impl ContactRepository for SqliteContactRepository<'_> {
    fn insert(&self, contact: &Contact) -> DbResult<Contact> {
        let mut stmt = self.prepare(INSERT_SQL.as_str())?;
        bind_fields(&mut stmt, contact)?;
        stmt.raw_execute().map_err(DbError::Step)?;

        let id = self.conn.last_insert_rowid();
        Ok(Contact {
            id: Some(id),
            ..contact.clone()
        })
    }

    fn update(&self, contact: &Contact) -> DbResult<usize> {
        let id = contact.id.ok_or(DbError::Bind {
            field: ID_COLUMN,
            source: None,
        })?;

        let mut stmt = self.prepare(UPDATE_SQL.as_str())?;
        bind_fields(&mut stmt, contact)?;
        bind_id(&mut stmt, UPDATE_ID_POSITION, id)?;
        stmt.raw_execute().map_err(DbError::Step)
    }

    fn fetch_one(&self, id: ContactId) -> DbResult<Option<Contact>> {
        let mut stmt = self.prepare(SELECT_ONE_SQL.as_str())?;
        bind_id(&mut stmt, 1, id)?;

        let mut rows = stmt.raw_query();
        match rows.next().map_err(DbError::Step)? {
            Some(row) => Ok(Some(parse_contact_row(row).map_err(DbError::Step)?)),
            None => Ok(None),
        }
    }

    fn fetch_all(&self) -> DbResult<Vec<Contact>> {
        let mut stmt = self.prepare(SELECT_ALL_SQL.as_str())?;

        let mut rows = stmt.raw_query();
        let mut contacts = Vec::new();
        while let Some(row) = rows.next().map_err(DbError::Step)? {
            contacts.push(parse_contact_row(row).map_err(DbError::Step)?);
        }

        Ok(contacts)
    }
}

fn bind_fields(stmt: &mut Statement<'_>, contact: &Contact) -> DbResult<()> {
    for field in ContactField::ALL {
        stmt.raw_bind_parameter(field.index(), contact.field(field))
            .map_err(|err| DbError::Bind {
                field: field.column(),
                source: Some(err),
            })?;
    }
    Ok(())
}

fn bind_id(stmt: &mut Statement<'_>, position: usize, id: ContactId) -> DbResult<()> {
    stmt.raw_bind_parameter(position, id)
        .map_err(|err| DbError::Bind {
            field: ID_COLUMN,
            source: Some(err),
        })
}

fn parse_contact_row(row: &Row<'_>) -> rusqlite::Result<Contact> {
    Ok(Contact {
        id: Some(row.get(ID_INDEX)?),
        name: row.get(ContactField::Name.index())?,
        nickname: row.get(ContactField::Nickname.index())?,
        email: row.get(ContactField::Email.index())?,
        phone: row.get(ContactField::Phone.index())?,
        address: row.get(ContactField::Address.index())?,
    })
}
