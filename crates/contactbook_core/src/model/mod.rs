//! Domain model for the contact book.
//!
//! # Responsibility
//! - Define canonical data structures used by core persistence logic.
//!
//! # Invariants
//! - Every persisted contact is identified by a stable store-assigned id.
//! - There is no delete; records live until the database file is reset.

pub mod contact;
