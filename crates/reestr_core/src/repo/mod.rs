//! Repository layer: persistence contracts and SQLite implementations.
//!
//! # Responsibility
//! - Define create/list contracts for the four directory entity kinds.
//! - Isolate SQL details from the boundary layer.
//!
//! # Invariants
//! - Create paths normalize and validate drafts before any SQL mutation.
//! - Party creates verify the referenced address exists; the store never
//!   auto-creates addresses.
//! - Identifier assignment is delegated to SQLite rowids, which are atomic
//!   and strictly increasing per table.

use crate::db::DbError;
use crate::model::ValidationError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod address_repo;
pub mod party_repo;

pub use address_repo::{AddressRepository, SqliteAddressRepository};
pub use party_repo::{
    EntrepreneurRepository, OrganizationRepository, PersonRepository,
    SqliteEntrepreneurRepository, SqliteOrganizationRepository, SqlitePersonRepository,
};

pub type RepoResult<T> = Result<T, RepoError>;

/// Failure of a single store operation.
#[derive(Debug)]
pub enum RepoError {
    /// A required field was missing or blank; nothing was persisted.
    Validation(ValidationError),
    /// `address_id` does not reference an existing address.
    MissingAddress(i64),
    /// Underlying storage failure.
    Db(DbError),
    /// A persisted row could not be read back into a record.
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::MissingAddress(id) => write!(f, "address {id} does not exist"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::MissingAddress(_) => None,
            Self::InvalidData(_) => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}
