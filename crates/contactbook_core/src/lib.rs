//! Core persistence and domain logic for the contact book.
//! This crate is the single source of truth for contact invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::ContactBookConfig;
pub use db::{DbError, DbResult};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::contact::{Contact, ContactField, ContactId, ContactValidationError};
pub use repo::contact_repo::{ContactRepository, SqliteContactRepository};
pub use service::contact_book::ContactBook;
pub use service::contact_form::{ContactForm, SubmitError};
