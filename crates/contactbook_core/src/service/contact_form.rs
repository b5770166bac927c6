//! Add/edit form state for contact screens.
//!
//! # Responsibility
//! - Hold raw text input the way a form shows it (empty string, not `None`).
//! - Validate before submission so most bad input never reaches the store.
//! - Route a submission to insert or update and phrase the outcome for UI.
//!
//! # Invariants
//! - Input is trimmed; an empty optional field becomes `None`.
//! - A form with an id always updates; without one it always inserts.

use crate::db::DbError;
use crate::model::contact::{Contact, ContactId, ContactValidationError};
use crate::service::contact_book::ContactBook;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Editable form fields, one text box each.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactForm {
    pub id: Option<ContactId>,
    pub name: String,
    pub nickname: String,
    pub email: String,
    pub phone: String,
    pub address: String,
}

/// Why a form submission produced no saved contact.
#[derive(Debug)]
pub enum SubmitError {
    Invalid(ContactValidationError),
    /// The facade returned no contact for a new entry.
    InsertFailed,
    /// The store rejected an update.
    SaveFailed(DbError),
}

impl Display for SubmitError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Invalid(err) => write!(f, "{err}"),
            Self::InsertFailed => f.write_str("Failed to insert contact."),
            Self::SaveFailed(err) => write!(f, "Failed to save contact: {err}"),
        }
    }
}

impl Error for SubmitError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Invalid(err) => Some(err),
            Self::InsertFailed => None,
            Self::SaveFailed(err) => Some(err),
        }
    }
}

impl From<ContactValidationError> for SubmitError {
    fn from(value: ContactValidationError) -> Self {
        Self::Invalid(value)
    }
}

impl ContactForm {
    /// Prefills the form for editing an existing contact.
    pub fn from_contact(contact: &Contact) -> Self {
        Self {
            id: contact.id,
            name: contact.name.clone(),
            nickname: contact.nickname.clone().unwrap_or_default(),
            email: contact.email.clone().unwrap_or_default(),
            phone: contact.phone.clone(),
            address: contact.address.clone().unwrap_or_default(),
        }
    }

    pub fn title(&self) -> &'static str {
        if self.id.is_some() {
            "Update Contact"
        } else {
            "Add New Contact"
        }
    }

    /// Whether the save action should be enabled.
    pub fn is_submittable(&self) -> bool {
        !self.name.trim().is_empty() && !self.phone.trim().is_empty()
    }

    /// Builds the contact this form describes, or the first rule it breaks.
    pub fn to_contact(&self) -> Result<Contact, ContactValidationError> {
        let contact = Contact {
            id: self.id,
            name: self.name.trim().to_string(),
            nickname: optional_text(&self.nickname),
            email: optional_text(&self.email),
            phone: self.phone.trim().to_string(),
            address: optional_text(&self.address),
        };
        contact.validate()?;
        Ok(contact)
    }

    /// Validates, then inserts or updates through `book`.
    ///
    /// Returns the saved contact; a successful insert carries its new id.
    pub fn submit(&self, book: &ContactBook) -> Result<Contact, SubmitError> {
        let contact = self.to_contact()?;
        if contact.is_persisted() {
            book.try_update(&contact).map_err(SubmitError::SaveFailed)?;
            return Ok(contact);
        }

        book.insert(&contact).ok_or(SubmitError::InsertFailed)
    }
}

fn optional_text(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
