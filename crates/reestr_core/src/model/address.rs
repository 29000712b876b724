//! Postal address record and draft.

use super::normalize_field;
use serde::{Deserialize, Serialize};

/// Persisted postal address.
///
/// Serialized field names are part of the boundary contract: lower-case with
/// underscores, matching the column names exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// Store-assigned identifier, strictly increasing per created address.
    pub id: i64,
    /// Postal/region designator. Always present and non-blank.
    pub region_code: String,
    pub note: Option<String>,
    pub country: Option<String>,
    pub district: Option<String>,
    pub city: Option<String>,
    pub settlement: Option<String>,
    pub street: Option<String>,
    pub building: Option<String>,
    pub room: Option<String>,
}

/// Sparse address input for create and format operations.
///
/// Every slot is optional at this stage; `region_code` presence is enforced
/// when the draft is persisted, not when it is constructed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressDraft {
    pub region_code: Option<String>,
    pub note: Option<String>,
    pub country: Option<String>,
    pub district: Option<String>,
    pub city: Option<String>,
    pub settlement: Option<String>,
    pub street: Option<String>,
    pub building: Option<String>,
    pub room: Option<String>,
}

impl AddressDraft {
    /// Returns a copy with every slot trimmed and blank slots collapsed to
    /// absent.
    pub fn normalized(&self) -> Self {
        Self {
            region_code: normalize_field(&self.region_code),
            note: normalize_field(&self.note),
            country: normalize_field(&self.country),
            district: normalize_field(&self.district),
            city: normalize_field(&self.city),
            settlement: normalize_field(&self.settlement),
            street: normalize_field(&self.street),
            building: normalize_field(&self.building),
            room: normalize_field(&self.room),
        }
    }
}
