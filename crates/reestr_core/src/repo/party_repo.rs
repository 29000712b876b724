//! Party persistence contracts and SQLite implementations.
//!
//! # Invariants
//! - Every create verifies the referenced address exists before inserting.
//!   The domain has no delete operation, so the existence check cannot be
//!   invalidated between check and insert.

use crate::model::{
    required_field, Entrepreneur, EntrepreneurDraft, Organization, OrganizationDraft, Person,
    PersonDraft,
};
use crate::repo::{RepoError, RepoResult};
use rusqlite::{params, Connection, Row};

/// Store contract for legal entities.
pub trait OrganizationRepository {
    fn create(&self, draft: &OrganizationDraft) -> RepoResult<i64>;
    fn list(&self) -> RepoResult<Vec<Organization>>;
}

/// Store contract for individual entrepreneurs.
pub trait EntrepreneurRepository {
    fn create(&self, draft: &EntrepreneurDraft) -> RepoResult<i64>;
    fn list(&self) -> RepoResult<Vec<Entrepreneur>>;
}

/// Store contract for physical persons.
pub trait PersonRepository {
    fn create(&self, draft: &PersonDraft) -> RepoResult<i64>;
    fn list(&self) -> RepoResult<Vec<Person>>;
}

fn check_address_exists(conn: &Connection, address_id: i64) -> RepoResult<()> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM address WHERE id = ?1);",
        [address_id],
        |row| row.get(0),
    )?;

    if exists == 0 {
        return Err(RepoError::MissingAddress(address_id));
    }
    Ok(())
}

/// SQLite-backed organization repository.
pub struct SqliteOrganizationRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteOrganizationRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl OrganizationRepository for SqliteOrganizationRepository<'_> {
    fn create(&self, draft: &OrganizationDraft) -> RepoResult<i64> {
        let draft = draft.normalized();
        let full_name = required_field(&draft.full_name, "full_name")?;
        let abbreviated_name = required_field(&draft.abbreviated_name, "abbreviated_name")?;
        let inn = required_field(&draft.inn, "inn")?;
        let kpp = required_field(&draft.kpp, "kpp")?;
        let email = required_field(&draft.email, "email")?;
        check_address_exists(self.conn, draft.address_id)?;

        self.conn.execute(
            "INSERT INTO organization (
                full_name,
                abbreviated_name,
                ogrn,
                rafp,
                inn,
                kpp,
                address_id,
                email
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8);",
            params![
                full_name,
                abbreviated_name,
                draft.ogrn.as_deref(),
                draft.rafp.as_deref(),
                inn,
                kpp,
                draft.address_id,
                email,
            ],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn list(&self) -> RepoResult<Vec<Organization>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, full_name, abbreviated_name, ogrn, rafp, inn, kpp, address_id, email
             FROM organization
             ORDER BY id;",
        )?;

        let mut rows = stmt.query([])?;
        let mut organizations = Vec::new();
        while let Some(row) = rows.next()? {
            organizations.push(parse_organization_row(row)?);
        }

        Ok(organizations)
    }
}

/// SQLite-backed entrepreneur repository.
pub struct SqliteEntrepreneurRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteEntrepreneurRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl EntrepreneurRepository for SqliteEntrepreneurRepository<'_> {
    fn create(&self, draft: &EntrepreneurDraft) -> RepoResult<i64> {
        let draft = draft.normalized();
        let surname = required_field(&draft.surname, "surname")?;
        let name = required_field(&draft.name, "name")?;
        let ogrnip = required_field(&draft.ogrnip, "ogrnip")?;
        let inn = required_field(&draft.inn, "inn")?;
        check_address_exists(self.conn, draft.address_id)?;

        self.conn.execute(
            "INSERT INTO entrepreneur (
                surname,
                name,
                patronymic,
                ogrnip,
                inn,
                address_id,
                email
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                surname,
                name,
                draft.patronymic.as_deref(),
                ogrnip,
                inn,
                draft.address_id,
                draft.email.as_deref(),
            ],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn list(&self) -> RepoResult<Vec<Entrepreneur>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, surname, name, patronymic, ogrnip, inn, address_id, email
             FROM entrepreneur
             ORDER BY id;",
        )?;

        let mut rows = stmt.query([])?;
        let mut entrepreneurs = Vec::new();
        while let Some(row) = rows.next()? {
            entrepreneurs.push(parse_entrepreneur_row(row)?);
        }

        Ok(entrepreneurs)
    }
}

/// SQLite-backed person repository.
pub struct SqlitePersonRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePersonRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl PersonRepository for SqlitePersonRepository<'_> {
    fn create(&self, draft: &PersonDraft) -> RepoResult<i64> {
        let draft = draft.normalized();
        let name = required_field(&draft.name, "name")?;
        let surname = required_field(&draft.surname, "surname")?;
        let snils = required_field(&draft.snils, "snils")?;
        let email = required_field(&draft.email, "email")?;
        check_address_exists(self.conn, draft.address_id)?;

        self.conn.execute(
            "INSERT INTO person (
                name,
                patronymic,
                surname,
                snils,
                email,
                address_id
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                name,
                draft.patronymic.as_deref(),
                surname,
                snils,
                email,
                draft.address_id,
            ],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn list(&self) -> RepoResult<Vec<Person>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, patronymic, surname, snils, email, address_id
             FROM person
             ORDER BY id;",
        )?;

        let mut rows = stmt.query([])?;
        let mut persons = Vec::new();
        while let Some(row) = rows.next()? {
            persons.push(parse_person_row(row)?);
        }

        Ok(persons)
    }
}

fn parse_organization_row(row: &Row<'_>) -> rusqlite::Result<Organization> {
    Ok(Organization {
        id: row.get("id")?,
        full_name: row.get("full_name")?,
        abbreviated_name: row.get("abbreviated_name")?,
        ogrn: row.get("ogrn")?,
        rafp: row.get("rafp")?,
        inn: row.get("inn")?,
        kpp: row.get("kpp")?,
        address_id: row.get("address_id")?,
        email: row.get("email")?,
    })
}

fn parse_entrepreneur_row(row: &Row<'_>) -> rusqlite::Result<Entrepreneur> {
    Ok(Entrepreneur {
        id: row.get("id")?,
        surname: row.get("surname")?,
        name: row.get("name")?,
        patronymic: row.get("patronymic")?,
        ogrnip: row.get("ogrnip")?,
        inn: row.get("inn")?,
        address_id: row.get("address_id")?,
        email: row.get("email")?,
    })
}

fn parse_person_row(row: &Row<'_>) -> rusqlite::Result<Person> {
    Ok(Person {
        id: row.get("id")?,
        name: row.get("name")?,
        patronymic: row.get("patronymic")?,
        surname: row.get("surname")?,
        snils: row.get("snils")?,
        email: row.get("email")?,
        address_id: row.get("address_id")?,
    })
}
