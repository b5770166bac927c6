//! Connection bootstrap utilities for SQLite.
//!
//! # Responsibility
//! - Open file or in-memory SQLite connections.
//! - Configure connection pragmas required by core behavior.
//! - Trigger schema migrations before returning a usable connection.
//! - Destroy the database file for maintenance resets.
//!
//! # Invariants
//! - Returned connections have `foreign_keys=ON`.
//! - Returned connections have migrations fully applied.

use super::migrations::apply_migrations;
use super::{DbError, DbResult};
use log::{error, info, warn};
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);
const IN_MEMORY_PATH: &str = ":memory:";

/// Opens a SQLite database file and applies all pending migrations.
///
/// Missing parent directories are created first, so a fresh per-user data
/// directory works on first launch.
///
/// # Side effects
/// - Performs connection bootstrap and migration checks.
/// - Emits `db_open` logging events with duration and status.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    let path = path.as_ref();
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode=file");

    if let Some(parent) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        if let Err(err) = std::fs::create_dir_all(parent) {
            // Connection::open reports the real failure below.
            warn!(
                "event=db_open module=db status=warn mode=file error_code=create_dir_failed error={}",
                err
            );
        }
    }

    let conn = match Connection::open(path) {
        Ok(conn) => conn,
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode=file duration_ms={} error_code=open_error error={}",
                started_at.elapsed().as_millis(),
                err
            );
            return Err(DbError::Open {
                path: path.to_path_buf(),
                source: err,
            });
        }
    };

    finish_open(conn, path.to_path_buf(), "file", started_at)
}

/// Opens an in-memory SQLite database and applies all pending migrations.
///
/// # Side effects
/// - Performs connection bootstrap and migration checks.
/// - Emits `db_open` logging events with duration and status.
pub fn open_db_in_memory() -> DbResult<Connection> {
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode=memory");

    let conn = match Connection::open_in_memory() {
        Ok(conn) => conn,
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode=memory duration_ms={} error_code=open_error error={}",
                started_at.elapsed().as_millis(),
                err
            );
            return Err(DbError::Open {
                path: PathBuf::from(IN_MEMORY_PATH),
                source: err,
            });
        }
    };

    finish_open(conn, PathBuf::from(IN_MEMORY_PATH), "memory", started_at)
}

/// Deletes the database file at `path` if present.
///
/// Returns `true` when a file was removed and `false` when there was nothing
/// to delete. SQLite side files (`-wal`, `-shm`, `-journal`) are removed too.
/// Must not be called while a connection to `path` is open.
pub fn reset_db(path: impl AsRef<Path>) -> DbResult<bool> {
    let path = path.as_ref();
    if !path.exists() {
        info!("event=db_reset module=db status=ok removed=false");
        return Ok(false);
    }

    if let Err(err) = std::fs::remove_file(path) {
        error!(
            "event=db_reset module=db status=error error_code=reset_error error={}",
            err
        );
        return Err(DbError::Reset {
            path: path.to_path_buf(),
            source: err,
        });
    }

    for suffix in ["-wal", "-shm", "-journal"] {
        let mut side_file = path.as_os_str().to_owned();
        side_file.push(suffix);
        let _ = std::fs::remove_file(PathBuf::from(side_file));
    }

    warn!("event=db_reset module=db status=ok removed=true");
    Ok(true)
}

fn finish_open(
    mut conn: Connection,
    path: PathBuf,
    mode: &str,
    started_at: Instant,
) -> DbResult<Connection> {
    match bootstrap_connection(&mut conn, &path) {
        Ok(()) => {
            info!(
                "event=db_open module=db status=ok mode={} duration_ms={}",
                mode,
                started_at.elapsed().as_millis()
            );
            Ok(conn)
        }
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={} duration_ms={} error_code={} error={}",
                mode,
                started_at.elapsed().as_millis(),
                err.error_code(),
                err
            );
            Err(err)
        }
    }
}

fn bootstrap_connection(conn: &mut Connection, path: &Path) -> DbResult<()> {
    let to_open_error = |source: rusqlite::Error| DbError::Open {
        path: path.to_path_buf(),
        source,
    };
    conn.execute_batch("PRAGMA foreign_keys = ON;")
        .map_err(to_open_error)?;
    conn.busy_timeout(BUSY_TIMEOUT).map_err(to_open_error)?;
    apply_migrations(conn)?;
    Ok(())
}
