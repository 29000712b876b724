//! Directory domain model.
//!
//! # Responsibility
//! - Define the persisted record types and the draft (input) types used by
//!   create and format operations.
//! - Own blank-vs-absent normalization: a whitespace-only field is the same
//!   thing as a missing field everywhere in core.
//!
//! # Invariants
//! - Records are append-only; there is no update or delete in the domain.
//! - Persisted optional fields are either absent or non-blank, never an empty
//!   string.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod address;
pub mod party;

pub use address::{Address, AddressDraft};
pub use party::{
    Entrepreneur, EntrepreneurDraft, Organization, OrganizationDraft, Person, PersonDraft,
};

/// Rejection of a create call before any persistence is attempted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field was missing or blank.
    BlankField(&'static str),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankField(name) => write!(f, "required field `{name}` is missing or blank"),
        }
    }
}

impl Error for ValidationError {}

/// Trims a draft field and collapses blank input to absent.
pub(crate) fn normalize_field(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|trimmed| !trimmed.is_empty())
        .map(str::to_owned)
}

/// Extracts a required field from an already-normalized draft.
pub(crate) fn required_field<'a>(
    value: &'a Option<String>,
    name: &'static str,
) -> Result<&'a str, ValidationError> {
    value.as_deref().ok_or(ValidationError::BlankField(name))
}
