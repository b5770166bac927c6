//! SQLite storage bootstrap, schema migration and error taxonomy.
//!
//! # Responsibility
//! - Open and configure the SQLite connection backing the contact book.
//! - Apply schema migrations in deterministic order.
//! - Define the typed failures every storage operation can report.
//!
//! # Invariants
//! - Migration version is tracked via `PRAGMA user_version`.
//! - Core code must not read/write contacts before migrations succeed.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io;
use std::path::PathBuf;

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory, reset_db};

pub type DbResult<T> = Result<T, DbError>;

/// Typed storage failure, ordered from connection setup to execution.
#[derive(Debug)]
pub enum DbError {
    /// Database file could not be opened, created or bootstrapped.
    Open {
        path: PathBuf,
        source: rusqlite::Error,
    },
    /// Statement text failed to compile.
    Prepare(rusqlite::Error),
    /// A parameter failed to bind, or a required id was absent.
    Bind {
        field: &'static str,
        source: Option<rusqlite::Error>,
    },
    /// Statement execution was rejected or a result row failed to decode.
    Step(rusqlite::Error),
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
    /// Maintenance delete of the database file failed.
    Reset { path: PathBuf, source: io::Error },
}

impl DbError {
    /// Stable code used in `error_code=` log fields.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Open { .. } => "open_error",
            Self::Prepare(_) => "prepare_error",
            Self::Bind { .. } => "bind_error",
            Self::Step(_) => "step_error",
            Self::UnsupportedSchemaVersion { .. } => "unsupported_schema_version",
            Self::Reset { .. } => "reset_error",
        }
    }

    /// Returns whether this is a step failure caused by a SQLite constraint
    /// (`NOT NULL`, `CHECK`, ...).
    pub fn is_constraint_violation(&self) -> bool {
        match self {
            Self::Step(rusqlite::Error::SqliteFailure(err, _)) => {
                err.code == rusqlite::ErrorCode::ConstraintViolation
            }
            _ => false,
        }
    }
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open { path, source } => {
                write!(f, "failed to open database `{}`: {source}", path.display())
            }
            Self::Prepare(err) => write!(f, "failed to prepare statement: {err}"),
            Self::Bind {
                field,
                source: Some(err),
            } => write!(f, "bind failed for {field}: {err}"),
            Self::Bind {
                field,
                source: None,
            } => write!(f, "bind failed for {field}: value is absent"),
            Self::Step(err) => write!(f, "execution failed: {err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "database schema version {db_version} is newer than supported {latest_supported}"
            ),
            Self::Reset { path, source } => {
                write!(f, "could not destroy database `{}`: {source}", path.display())
            }
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Open { source, .. } => Some(source),
            Self::Prepare(err) | Self::Step(err) => Some(err),
            Self::Bind { source, .. } => source.as_ref().map(|err| err as &(dyn Error + 'static)),
            Self::UnsupportedSchemaVersion { .. } => None,
            Self::Reset { source, .. } => Some(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::DbError;
    use rusqlite::Connection;

    #[test]
    fn error_codes_are_stable() {
        let bind = DbError::Bind {
            field: "id",
            source: None,
        };
        assert_eq!(bind.error_code(), "bind_error");
        assert_eq!(bind.to_string(), "bind failed for id: value is absent");

        let schema = DbError::UnsupportedSchemaVersion {
            db_version: 9,
            latest_supported: 1,
        };
        assert_eq!(schema.error_code(), "unsupported_schema_version");
    }

    #[test]
    fn constraint_violation_is_detected_on_step_errors() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE t (v TEXT NOT NULL CHECK (LENGTH(v) > 0));")
            .unwrap();
        let err = conn
            .execute("INSERT INTO t (v) VALUES ('');", [])
            .unwrap_err();

        let step = DbError::Step(err);
        assert!(step.is_constraint_violation());
        assert_eq!(step.error_code(), "step_error");

        let prepare = DbError::Prepare(rusqlite::Error::InvalidQuery);
        assert!(!prepare.is_constraint_violation());
    }
}
