//! Core domain logic for the reestr directory.
//! This crate is the single source of truth for business invariants.

pub mod db;
pub mod format;
pub mod logging;
pub mod model;
pub mod repo;

pub use db::runner::MigrationRunner;
pub use format::format_address;
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::{
    Address, AddressDraft, Entrepreneur, EntrepreneurDraft, Organization, OrganizationDraft,
    Person, PersonDraft, ValidationError,
};
pub use repo::{
    AddressRepository, EntrepreneurRepository, OrganizationRepository, PersonRepository,
    RepoError, RepoResult, SqliteAddressRepository, SqliteEntrepreneurRepository,
    SqliteOrganizationRepository, SqlitePersonRepository,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
