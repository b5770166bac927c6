//! Core use-case services.
//!
//! # Responsibility
//! - Wrap the storage engine in the facade the UI layer talks to.
//! - Keep form handling decoupled from storage details.

pub mod contact_book;
pub mod contact_form;
