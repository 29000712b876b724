//! Address persistence contract and SQLite implementation.

use crate::model::{required_field, Address, AddressDraft};
use crate::repo::RepoResult;
use rusqlite::{params, Connection, Row};

const ADDRESS_SELECT_SQL: &str = "SELECT
    id,
    region_code,
    note,
    country,
    district,
    city,
    settlement,
    street,
    building,
    room
FROM address";

/// Store contract for postal addresses.
pub trait AddressRepository {
    /// Persists a draft and returns the freshly assigned identifier.
    fn create(&self, draft: &AddressDraft) -> RepoResult<i64>;
    /// Returns every persisted address in creation order.
    fn list(&self) -> RepoResult<Vec<Address>>;
}

/// SQLite-backed address repository.
pub struct SqliteAddressRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAddressRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl AddressRepository for SqliteAddressRepository<'_> {
    fn create(&self, draft: &AddressDraft) -> RepoResult<i64> {
        let draft = draft.normalized();
        let region_code = required_field(&draft.region_code, "region_code")?;

        self.conn.execute(
            "INSERT INTO address (
                region_code,
                note,
                country,
                district,
                city,
                settlement,
                street,
                building,
                room
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9);",
            params![
                region_code,
                draft.note.as_deref(),
                draft.country.as_deref(),
                draft.district.as_deref(),
                draft.city.as_deref(),
                draft.settlement.as_deref(),
                draft.street.as_deref(),
                draft.building.as_deref(),
                draft.room.as_deref(),
            ],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn list(&self) -> RepoResult<Vec<Address>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ADDRESS_SELECT_SQL} ORDER BY id;"))?;

        let mut rows = stmt.query([])?;
        let mut addresses = Vec::new();
        while let Some(row) = rows.next()? {
            addresses.push(parse_address_row(row)?);
        }

        Ok(addresses)
    }
}

fn parse_address_row(row: &Row<'_>) -> rusqlite::Result<Address> {
    Ok(Address {
        id: row.get("id")?,
        region_code: row.get("region_code")?,
        note: row.get("note")?,
        country: row.get("country")?,
        district: row.get("district")?,
        city: row.get("city")?,
        settlement: row.get("settlement")?,
        street: row.get("street")?,
        building: row.get("building")?,
        room: row.get("room")?,
    })
}
