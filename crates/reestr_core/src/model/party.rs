//! Address-linked parties: organizations, individual entrepreneurs and
//! physical persons.
//!
//! Each party references exactly one address by id; the store never creates
//! or removes addresses on a party's behalf.

use super::normalize_field;
use serde::{Deserialize, Serialize};

/// Persisted legal entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    pub id: i64,
    pub full_name: String,
    pub abbreviated_name: String,
    pub ogrn: Option<String>,
    pub rafp: Option<String>,
    pub inn: String,
    pub kpp: String,
    pub address_id: i64,
    pub email: String,
}

/// Organization input for a single create call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrganizationDraft {
    pub full_name: Option<String>,
    pub abbreviated_name: Option<String>,
    pub ogrn: Option<String>,
    pub rafp: Option<String>,
    pub inn: Option<String>,
    pub kpp: Option<String>,
    pub address_id: i64,
    pub email: Option<String>,
}

impl OrganizationDraft {
    pub fn normalized(&self) -> Self {
        Self {
            full_name: normalize_field(&self.full_name),
            abbreviated_name: normalize_field(&self.abbreviated_name),
            ogrn: normalize_field(&self.ogrn),
            rafp: normalize_field(&self.rafp),
            inn: normalize_field(&self.inn),
            kpp: normalize_field(&self.kpp),
            address_id: self.address_id,
            email: normalize_field(&self.email),
        }
    }
}

/// Persisted individual entrepreneur.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entrepreneur {
    pub id: i64,
    pub surname: String,
    pub name: String,
    pub patronymic: Option<String>,
    pub ogrnip: String,
    pub inn: String,
    pub address_id: i64,
    pub email: Option<String>,
}

/// Entrepreneur input for a single create call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntrepreneurDraft {
    pub surname: Option<String>,
    pub name: Option<String>,
    pub patronymic: Option<String>,
    pub ogrnip: Option<String>,
    pub inn: Option<String>,
    pub address_id: i64,
    pub email: Option<String>,
}

impl EntrepreneurDraft {
    pub fn normalized(&self) -> Self {
        Self {
            surname: normalize_field(&self.surname),
            name: normalize_field(&self.name),
            patronymic: normalize_field(&self.patronymic),
            ogrnip: normalize_field(&self.ogrnip),
            inn: normalize_field(&self.inn),
            address_id: self.address_id,
            email: normalize_field(&self.email),
        }
    }
}

/// Persisted physical person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub id: i64,
    pub name: String,
    pub patronymic: Option<String>,
    pub surname: String,
    pub snils: String,
    pub email: String,
    pub address_id: i64,
}

/// Person input for a single create call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonDraft {
    pub name: Option<String>,
    pub patronymic: Option<String>,
    pub surname: Option<String>,
    pub snils: Option<String>,
    pub email: Option<String>,
    pub address_id: i64,
}

impl PersonDraft {
    pub fn normalized(&self) -> Self {
        Self {
            name: normalize_field(&self.name),
            patronymic: normalize_field(&self.patronymic),
            surname: normalize_field(&self.surname),
            snils: normalize_field(&self.snils),
            email: normalize_field(&self.email),
            address_id: self.address_id,
        }
    }
}
