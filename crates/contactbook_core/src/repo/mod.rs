//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the storage contract for contacts.
//! - Isolate SQLite query details from the facade and its callers.
//!
//! # Invariants
//! - Repository APIs return typed [`crate::db::DbError`] values and never log
//!   or swallow failures; degrading is the facade's decision.
//! - Absence (`fetch_one` miss, empty table) is a value, not an error.

pub mod contact_repo;
