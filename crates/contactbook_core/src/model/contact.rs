//! Contact domain model.
//!
//! # Responsibility
//! - Define the canonical contact record shared by list/detail/form views.
//! - Own the field table (column name, position, length bound) used by
//!   both the SQL encode and decode paths.
//!
//! # Invariants
//! - `id` is `None` until the store assigns one and never changes after.
//! - `name` and `phone` are required; optional fields use `None`, never `""`,
//!   for "no value".
//! - Length bounds are counted in Unicode scalar values, matching SQLite
//!   `LENGTH()` on TEXT.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store-assigned row identifier.
pub type ContactId = i64;

/// Name of the single contact table.
pub const CONTACT_TABLE: &str = "Contact";
/// Column name of the surrogate key.
pub const ID_COLUMN: &str = "id";
/// Column position of the surrogate key in `SELECT` results.
pub const ID_INDEX: usize = 0;

/// One of the five user-editable contact fields.
///
/// Column positions are fixed: `id` is 0, data fields follow in declaration
/// order. Insert and update bind each field at the same position as its
/// column, so the table below is the only place the order is spelled out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContactField {
    Name,
    Nickname,
    Email,
    Phone,
    Address,
}

impl ContactField {
    /// All data fields in column order.
    pub const ALL: [ContactField; 5] = [
        ContactField::Name,
        ContactField::Nickname,
        ContactField::Email,
        ContactField::Phone,
        ContactField::Address,
    ];

    /// SQL column name.
    pub fn column(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Nickname => "nickname",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Address => "address",
        }
    }

    /// Column position in `SELECT` results and one-based bind position in
    /// insert/update statements.
    pub fn index(self) -> usize {
        match self {
            Self::Name => 1,
            Self::Nickname => 2,
            Self::Email => 3,
            Self::Phone => 4,
            Self::Address => 5,
        }
    }

    /// Maximum length in characters.
    pub fn max_len(self) -> usize {
        match self {
            Self::Name | Self::Nickname | Self::Email => 50,
            Self::Phone => 15,
            Self::Address => 150,
        }
    }

    pub fn is_required(self) -> bool {
        matches!(self, Self::Name | Self::Phone)
    }

    /// Human-readable label for UI messages.
    pub fn label(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Nickname => "Nickname",
            Self::Email => "Email",
            Self::Phone => "Phone",
            Self::Address => "Address",
        }
    }
}

impl Display for ContactField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.column())
    }
}

/// A personal contact record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    /// `None` for a contact that has not been persisted yet.
    pub id: Option<ContactId>,
    pub name: String,
    pub nickname: Option<String>,
    pub email: Option<String>,
    pub phone: String,
    pub address: Option<String>,
}

impl Contact {
    /// Creates a transient contact with only the required fields set.
    pub fn new(name: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            nickname: None,
            email: None,
            phone: phone.into(),
            address: None,
        }
    }

    pub fn with_nickname(mut self, nickname: impl Into<String>) -> Self {
        self.nickname = Some(nickname.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// Returns whether the store has assigned an id.
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    /// Returns the value of `field`, `None` when an optional field is absent.
    pub fn field(&self, field: ContactField) -> Option<&str> {
        match field {
            ContactField::Name => Some(self.name.as_str()),
            ContactField::Nickname => self.nickname.as_deref(),
            ContactField::Email => self.email.as_deref(),
            ContactField::Phone => Some(self.phone.as_str()),
            ContactField::Address => self.address.as_deref(),
        }
    }

    /// Checks required fields and length bounds.
    ///
    /// The store enforces the same rules; this lets callers reject bad input
    /// with a readable message before any SQL runs.
    pub fn validate(&self) -> Result<(), ContactValidationError> {
        if self.name.is_empty() {
            return Err(ContactValidationError::MissingName);
        }
        if self.phone.is_empty() {
            return Err(ContactValidationError::MissingPhone);
        }

        for field in ContactField::ALL {
            if let Some(value) = self.field(field) {
                let actual = value.chars().count();
                if actual > field.max_len() {
                    return Err(ContactValidationError::TooLong {
                        field,
                        max: field.max_len(),
                        actual,
                    });
                }
            }
        }

        Ok(())
    }
}

/// Rule violation found by [`Contact::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactValidationError {
    MissingName,
    MissingPhone,
    TooLong {
        field: ContactField,
        max: usize,
        actual: usize,
    },
}

impl Display for ContactValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingName | Self::MissingPhone => f.write_str("Name and phone are required."),
            Self::TooLong { field, max, .. } => {
                write!(f, "{} must be at most {max} characters.", field.label())
            }
        }
    }
}

impl Error for ContactValidationError {}

#[cfg(test)]
mod tests {
    use super::{Contact, ContactField, ContactValidationError, ID_INDEX};
    use std::collections::HashSet;

    #[test]
    fn field_positions_follow_id_and_are_unique() {
        let positions: HashSet<usize> = ContactField::ALL.iter().map(|f| f.index()).collect();
        assert_eq!(positions.len(), ContactField::ALL.len());
        assert!(!positions.contains(&ID_INDEX));
        for (offset, field) in ContactField::ALL.iter().enumerate() {
            assert_eq!(field.index(), offset + 1);
        }
    }

    #[test]
    fn only_name_and_phone_are_required() {
        let required: Vec<_> = ContactField::ALL
            .into_iter()
            .filter(|field| field.is_required())
            .collect();
        assert_eq!(required, vec![ContactField::Name, ContactField::Phone]);
    }

    #[test]
    fn new_contact_is_transient_with_absent_optionals() {
        let contact = Contact::new("Jonny", "90767");
        assert!(!contact.is_persisted());
        assert_eq!(contact.field(ContactField::Nickname), None);
        assert_eq!(contact.field(ContactField::Email), None);
        assert_eq!(contact.field(ContactField::Address), None);
        assert!(contact.validate().is_ok());
    }

    #[test]
    fn validate_rejects_missing_required_fields() {
        assert_eq!(
            Contact::new("", "123").validate(),
            Err(ContactValidationError::MissingName)
        );
        assert_eq!(
            Contact::new("Olaf", "").validate(),
            Err(ContactValidationError::MissingPhone)
        );
    }

    #[test]
    fn validate_counts_characters_not_bytes() {
        let name = "é".repeat(50);
        assert!(Contact::new(name, "1").validate().is_ok());

        let err = Contact::new("Elon", "1".repeat(16)).validate().unwrap_err();
        assert_eq!(
            err,
            ContactValidationError::TooLong {
                field: ContactField::Phone,
                max: 15,
                actual: 16,
            }
        );
        assert_eq!(err.to_string(), "Phone must be at most 15 characters.");
    }

    #[test]
    fn validate_checks_optional_field_bounds() {
        let contact = Contact::new("Elon", "12345").with_address("a".repeat(151));
        assert!(matches!(
            contact.validate(),
            Err(ContactValidationError::TooLong {
                field: ContactField::Address,
                max: 150,
                ..
            })
        ));

        let empty_optional = Contact::new("Elon", "12345").with_email("");
        assert!(empty_optional.validate().is_ok());
    }
}
