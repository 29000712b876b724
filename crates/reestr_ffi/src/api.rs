//! Exported C ABI surface.
//!
//! # Responsibility
//! - Expose version, logging, migration, formatting, create and list
//!   operations as `extern "C"` functions.
//! - Own the cross-boundary memory protocol: inbound pointers are only read
//!   for the duration of a call; every returned string is allocated here and
//!   released by exactly one [`reestr_free_string`] call.
//!
//! # Invariants
//! - Exported functions must not panic across the boundary.
//! - Failure to allocate, encode or persist is signalled by the absent
//!   sentinel (null pointer or `false`), never by a partial buffer.
//! - Each call opens its own connection and releases it before returning.

use std::ffi::{c_char, CStr, CString};
use std::path::PathBuf;
use std::ptr;
use std::str::Utf8Error;
use std::sync::OnceLock;

use log::error;
use reestr_core::db::open_db;
use reestr_core::{
    format_address, init_logging, AddressDraft, AddressRepository, EntrepreneurDraft,
    EntrepreneurRepository, MigrationRunner, OrganizationDraft, OrganizationRepository,
    PersonDraft, PersonRepository, SqliteAddressRepository, SqliteEntrepreneurRepository,
    SqliteOrganizationRepository, SqlitePersonRepository,
};
use rusqlite::Connection;

const DB_FILE_NAME: &str = "reestr.sqlite3";
const DB_PATH_ENV: &str = "REESTR_DB_PATH";

static DB_PATH: OnceLock<PathBuf> = OnceLock::new();
static MIGRATIONS: MigrationRunner = MigrationRunner::new();

/// Errors that can occur while converting FFI data into safe Rust structures.
#[derive(Debug)]
pub enum FfiConversionError {
    InvalidUtf8,
}

impl From<Utf8Error> for FfiConversionError {
    fn from(_: Utf8Error) -> Self {
        Self::InvalidUtf8
    }
}

/// Reads one optional inbound string slot.
///
/// Null and empty buffers both mean "absent"; the caller is expected to have
/// collapsed whitespace-only input before crossing the boundary, and core
/// normalization covers it again regardless.
///
/// # Safety
/// `ptr` must be null or point to a null-terminated buffer valid for the
/// duration of the call.
unsafe fn read_field(ptr: *const c_char) -> Result<Option<String>, FfiConversionError> {
    if ptr.is_null() {
        return Ok(None);
    }

    let text = unsafe { CStr::from_ptr(ptr) }.to_str()?;
    if text.is_empty() {
        Ok(None)
    } else {
        Ok(Some(text.to_owned()))
    }
}

#[repr(C)]
pub struct AddressDtoFfi {
    pub region_code: *const c_char,
    pub note: *const c_char,
    pub country: *const c_char,
    pub district: *const c_char,
    pub city: *const c_char,
    pub settlement: *const c_char,
    pub street: *const c_char,
    pub building: *const c_char,
    pub room: *const c_char,
}

impl AddressDtoFfi {
    /// # Safety
    /// All pointer fields must be null or valid null-terminated UTF-8 buffers.
    unsafe fn try_into_draft(&self) -> Result<AddressDraft, FfiConversionError> {
        Ok(AddressDraft {
            region_code: unsafe { read_field(self.region_code) }?,
            note: unsafe { read_field(self.note) }?,
            country: unsafe { read_field(self.country) }?,
            district: unsafe { read_field(self.district) }?,
            city: unsafe { read_field(self.city) }?,
            settlement: unsafe { read_field(self.settlement) }?,
            street: unsafe { read_field(self.street) }?,
            building: unsafe { read_field(self.building) }?,
            room: unsafe { read_field(self.room) }?,
        })
    }
}

#[repr(C)]
pub struct OrganizationDtoFfi {
    pub full_name: *const c_char,
    pub abbreviated_name: *const c_char,
    pub ogrn: *const c_char,
    pub rafp: *const c_char,
    pub inn: *const c_char,
    pub kpp: *const c_char,
    pub email: *const c_char,
    pub address_id: i64,
}

impl OrganizationDtoFfi {
    /// # Safety
    /// All pointer fields must be null or valid null-terminated UTF-8 buffers.
    unsafe fn try_into_draft(&self) -> Result<OrganizationDraft, FfiConversionError> {
        Ok(OrganizationDraft {
            full_name: unsafe { read_field(self.full_name) }?,
            abbreviated_name: unsafe { read_field(self.abbreviated_name) }?,
            ogrn: unsafe { read_field(self.ogrn) }?,
            rafp: unsafe { read_field(self.rafp) }?,
            inn: unsafe { read_field(self.inn) }?,
            kpp: unsafe { read_field(self.kpp) }?,
            address_id: self.address_id,
            email: unsafe { read_field(self.email) }?,
        })
    }
}

#[repr(C)]
pub struct EntrepreneurDtoFfi {
    pub surname: *const c_char,
    pub name: *const c_char,
    pub patronymic: *const c_char,
    pub ogrnip: *const c_char,
    pub inn: *const c_char,
    pub email: *const c_char,
    pub address_id: i64,
}

impl EntrepreneurDtoFfi {
    /// # Safety
    /// All pointer fields must be null or valid null-terminated UTF-8 buffers.
    unsafe fn try_into_draft(&self) -> Result<EntrepreneurDraft, FfiConversionError> {
        Ok(EntrepreneurDraft {
            surname: unsafe { read_field(self.surname) }?,
            name: unsafe { read_field(self.name) }?,
            patronymic: unsafe { read_field(self.patronymic) }?,
            ogrnip: unsafe { read_field(self.ogrnip) }?,
            inn: unsafe { read_field(self.inn) }?,
            address_id: self.address_id,
            email: unsafe { read_field(self.email) }?,
        })
    }
}

#[repr(C)]
pub struct PersonDtoFfi {
    pub name: *const c_char,
    pub patronymic: *const c_char,
    pub surname: *const c_char,
    pub snils: *const c_char,
    pub email: *const c_char,
    pub address_id: i64,
}

impl PersonDtoFfi {
    /// # Safety
    /// All pointer fields must be null or valid null-terminated UTF-8 buffers.
    unsafe fn try_into_draft(&self) -> Result<PersonDraft, FfiConversionError> {
        Ok(PersonDraft {
            name: unsafe { read_field(self.name) }?,
            patronymic: unsafe { read_field(self.patronymic) }?,
            surname: unsafe { read_field(self.surname) }?,
            snils: unsafe { read_field(self.snils) }?,
            email: unsafe { read_field(self.email) }?,
            address_id: self.address_id,
        })
    }
}

/// Returns a pointer to a null-terminated static version string.
/// The caller must NOT free this pointer.
#[no_mangle]
pub extern "C" fn reestr_version() -> *const c_char {
    concat!(env!("CARGO_PKG_VERSION"), "\0").as_ptr() as *const c_char
}

/// Initializes rolling file logging once per process.
///
/// Returns null on success, or a newly allocated error message that must be
/// released with [`reestr_free_string`].
///
/// # Safety
/// `level` and `log_dir` must be null or valid null-terminated UTF-8 buffers.
#[no_mangle]
pub unsafe extern "C" fn reestr_init_logging(
    level: *const c_char,
    log_dir: *const c_char,
) -> *mut c_char {
    let level = match unsafe { read_field(level) } {
        Ok(value) => value.unwrap_or_default(),
        Err(_) => return into_c_string("log level is not valid UTF-8".to_string()),
    };
    let log_dir = match unsafe { read_field(log_dir) } {
        Ok(value) => value.unwrap_or_default(),
        Err(_) => return into_c_string("log directory is not valid UTF-8".to_string()),
    };

    match init_logging(&level, &log_dir) {
        Ok(()) => ptr::null_mut(),
        Err(message) => into_c_string(message),
    }
}

/// Brings the database schema up to date, at most once per process.
///
/// Safe to call repeatedly and from concurrent threads; exactly one caller
/// executes the migration work. Returns `false` on failure, in which case the
/// calling application must abort initialization.
#[no_mangle]
pub extern "C" fn reestr_ensure_migrations() -> bool {
    MIGRATIONS.ensure(resolve_db_path()).is_ok()
}

/// Formats the incoming address DTO and returns a newly allocated C string,
/// or null when there is nothing to display or the input cannot be decoded.
///
/// # Safety
/// `dto` must be null or point to a valid [`AddressDtoFfi`] whose fields obey
/// the [`read_field`] contract.
#[no_mangle]
pub unsafe extern "C" fn reestr_format_address(dto: *const AddressDtoFfi) -> *mut c_char {
    let dto = match unsafe { dto.as_ref() } {
        Some(dto) => dto,
        None => return ptr::null_mut(),
    };

    let draft = match unsafe { dto.try_into_draft() } {
        Ok(draft) => draft,
        Err(_) => return ptr::null_mut(),
    };

    match format_address(&draft) {
        Some(text) => into_c_string(text),
        None => ptr::null_mut(),
    }
}

/// Persists a new address. On success writes the assigned id to `out_id` and
/// returns `true`; on any failure writes -1 and returns `false`.
///
/// # Safety
/// `dto` must be null or a valid [`AddressDtoFfi`]; `out_id` must be null or
/// a valid writable `i64` slot.
#[no_mangle]
pub unsafe extern "C" fn reestr_create_address(
    dto: *const AddressDtoFfi,
    out_id: *mut i64,
) -> bool {
    unsafe { write_out_id(out_id, -1) };

    let dto = match unsafe { dto.as_ref() } {
        Some(dto) => dto,
        None => return false,
    };
    let draft = match unsafe { dto.try_into_draft() } {
        Ok(draft) => draft,
        Err(_) => return false,
    };

    let Some(conn) = open_directory() else {
        return false;
    };

    match SqliteAddressRepository::new(&conn).create(&draft) {
        Ok(id) => {
            unsafe { write_out_id(out_id, id) };
            true
        }
        Err(err) => {
            error!("event=create_address module=ffi status=error error={err}");
            false
        }
    }
}

/// Persists a new organization. Same contract as [`reestr_create_address`].
///
/// # Safety
/// `dto` must be null or a valid [`OrganizationDtoFfi`]; `out_id` must be
/// null or a valid writable `i64` slot.
#[no_mangle]
pub unsafe extern "C" fn reestr_create_organization(
    dto: *const OrganizationDtoFfi,
    out_id: *mut i64,
) -> bool {
    unsafe { write_out_id(out_id, -1) };

    let dto = match unsafe { dto.as_ref() } {
        Some(dto) => dto,
        None => return false,
    };
    let draft = match unsafe { dto.try_into_draft() } {
        Ok(draft) => draft,
        Err(_) => return false,
    };

    let Some(conn) = open_directory() else {
        return false;
    };

    match SqliteOrganizationRepository::new(&conn).create(&draft) {
        Ok(id) => {
            unsafe { write_out_id(out_id, id) };
            true
        }
        Err(err) => {
            error!("event=create_organization module=ffi status=error error={err}");
            false
        }
    }
}

/// Persists a new entrepreneur. Same contract as [`reestr_create_address`].
///
/// # Safety
/// `dto` must be null or a valid [`EntrepreneurDtoFfi`]; `out_id` must be
/// null or a valid writable `i64` slot.
#[no_mangle]
pub unsafe extern "C" fn reestr_create_entrepreneur(
    dto: *const EntrepreneurDtoFfi,
    out_id: *mut i64,
) -> bool {
    unsafe { write_out_id(out_id, -1) };

    let dto = match unsafe { dto.as_ref() } {
        Some(dto) => dto,
        None => return false,
    };
    let draft = match unsafe { dto.try_into_draft() } {
        Ok(draft) => draft,
        Err(_) => return false,
    };

    let Some(conn) = open_directory() else {
        return false;
    };

    match SqliteEntrepreneurRepository::new(&conn).create(&draft) {
        Ok(id) => {
            unsafe { write_out_id(out_id, id) };
            true
        }
        Err(err) => {
            error!("event=create_entrepreneur module=ffi status=error error={err}");
            false
        }
    }
}

/// Persists a new person. Same contract as [`reestr_create_address`].
///
/// # Safety
/// `dto` must be null or a valid [`PersonDtoFfi`]; `out_id` must be null or
/// a valid writable `i64` slot.
#[no_mangle]
pub unsafe extern "C" fn reestr_create_person(dto: *const PersonDtoFfi, out_id: *mut i64) -> bool {
    unsafe { write_out_id(out_id, -1) };

    let dto = match unsafe { dto.as_ref() } {
        Some(dto) => dto,
        None => return false,
    };
    let draft = match unsafe { dto.try_into_draft() } {
        Ok(draft) => draft,
        Err(_) => return false,
    };

    let Some(conn) = open_directory() else {
        return false;
    };

    match SqlitePersonRepository::new(&conn).create(&draft) {
        Ok(id) => {
            unsafe { write_out_id(out_id, id) };
            true
        }
        Err(err) => {
            error!("event=create_person module=ffi status=error error={err}");
            false
        }
    }
}

/// Returns all addresses as a newly allocated JSON array, or null on failure.
/// An empty store serializes as `[]`.
#[no_mangle]
pub extern "C" fn reestr_list_addresses() -> *mut c_char {
    list_as_json("list_addresses", |conn| {
        SqliteAddressRepository::new(conn).list()
    })
}

/// Returns all organizations as a newly allocated JSON array, or null on
/// failure.
#[no_mangle]
pub extern "C" fn reestr_list_organizations() -> *mut c_char {
    list_as_json("list_organizations", |conn| {
        SqliteOrganizationRepository::new(conn).list()
    })
}

/// Returns all entrepreneurs as a newly allocated JSON array, or null on
/// failure.
#[no_mangle]
pub extern "C" fn reestr_list_entrepreneurs() -> *mut c_char {
    list_as_json("list_entrepreneurs", |conn| {
        SqliteEntrepreneurRepository::new(conn).list()
    })
}

/// Returns all persons as a newly allocated JSON array, or null on failure.
#[no_mangle]
pub extern "C" fn reestr_list_persons() -> *mut c_char {
    list_as_json("list_persons", |conn| SqlitePersonRepository::new(conn).list())
}

/// Releases a string previously returned by this library.
///
/// Passing null is a no-op.
///
/// # Safety
/// `ptr` must be null or originate from this library and must not be freed
/// twice.
#[no_mangle]
pub unsafe extern "C" fn reestr_free_string(ptr: *mut c_char) {
    if ptr.is_null() {
        return;
    }

    unsafe {
        drop(CString::from_raw(ptr));
    }
}

/// # Safety
/// `out_id` must be null or a valid writable `i64` slot.
unsafe fn write_out_id(out_id: *mut i64, value: i64) {
    if let Some(slot) = unsafe { out_id.as_mut() } {
        *slot = value;
    }
}

fn into_c_string(text: String) -> *mut c_char {
    match CString::new(text) {
        Ok(c_string) => c_string.into_raw(),
        Err(_) => ptr::null_mut(),
    }
}

fn open_directory() -> Option<Connection> {
    match open_db(resolve_db_path()) {
        Ok(conn) => Some(conn),
        // open_db already logged the failure with details.
        Err(_) => None,
    }
}

fn list_as_json<T, F>(operation: &str, list: F) -> *mut c_char
where
    T: serde::Serialize,
    F: FnOnce(&Connection) -> reestr_core::RepoResult<Vec<T>>,
{
    let Some(conn) = open_directory() else {
        return ptr::null_mut();
    };

    let records = match list(&conn) {
        Ok(records) => records,
        Err(err) => {
            error!("event={operation} module=ffi status=error error={err}");
            return ptr::null_mut();
        }
    };

    match serde_json::to_string(&records) {
        Ok(json) => into_c_string(json),
        Err(err) => {
            error!("event={operation} module=ffi status=error error_code=encode_failed error={err}");
            ptr::null_mut()
        }
    }
}

fn resolve_db_path() -> PathBuf {
    DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var(DB_PATH_ENV) {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            if let Ok(exe) = std::env::current_exe() {
                if let Some(dir) = exe.parent() {
                    return dir.join(DB_FILE_NAME);
                }
            }
            std::env::temp_dir().join(DB_FILE_NAME)
        })
        .clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::{CStr, CString};
    use std::time::{SystemTime, UNIX_EPOCH};

    fn c(text: &str) -> CString {
        CString::new(text).expect("test string should not contain NUL")
    }

    fn unique_token(prefix: &str) -> String {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time went backwards")
            .as_nanos();
        format!("{prefix}-{nanos}")
    }

    fn empty_address_dto() -> AddressDtoFfi {
        AddressDtoFfi {
            region_code: ptr::null(),
            note: ptr::null(),
            country: ptr::null(),
            district: ptr::null(),
            city: ptr::null(),
            settlement: ptr::null(),
            street: ptr::null(),
            building: ptr::null(),
            room: ptr::null(),
        }
    }

    fn create_address_with_note(note: &CString) -> i64 {
        let region = c("77");
        let mut dto = empty_address_dto();
        dto.region_code = region.as_ptr();
        dto.note = note.as_ptr();

        let mut id: i64 = 0;
        assert!(unsafe { reestr_create_address(&dto, &mut id) });
        assert!(id > 0);
        id
    }

    fn take_json(ptr: *mut c_char) -> serde_json::Value {
        assert!(!ptr.is_null());
        let json = unsafe { CStr::from_ptr(ptr) }
            .to_str()
            .expect("payload should be UTF-8")
            .to_owned();
        unsafe { reestr_free_string(ptr) };
        serde_json::from_str(&json).expect("payload should be valid JSON")
    }

    #[test]
    fn version_is_static_and_non_empty() {
        let ptr = reestr_version();
        assert!(!ptr.is_null());
        let text = unsafe { CStr::from_ptr(ptr) }.to_str().expect("UTF-8");
        assert!(!text.is_empty());
    }

    #[test]
    fn ensure_migrations_is_idempotent() {
        assert!(reestr_ensure_migrations());
        assert!(reestr_ensure_migrations());
    }

    #[test]
    fn free_string_ignores_null() {
        unsafe { reestr_free_string(ptr::null_mut()) };
    }

    #[test]
    fn format_address_null_dto_returns_null() {
        assert!(unsafe { reestr_format_address(ptr::null()) }.is_null());
    }

    #[test]
    fn format_address_roundtrip() {
        let region = c("77");
        let city = c("Москва");
        let street = c("Тверская");
        let building = c("1");

        let mut dto = empty_address_dto();
        dto.region_code = region.as_ptr();
        dto.city = city.as_ptr();
        dto.street = street.as_ptr();
        dto.building = building.as_ptr();

        let out = unsafe { reestr_format_address(&dto) };
        assert!(!out.is_null());
        let text = unsafe { CStr::from_ptr(out) }.to_str().expect("UTF-8");
        assert_eq!(text, "77, Москва, Тверская, д. 1");
        unsafe { reestr_free_string(out) };
    }

    #[test]
    fn format_address_all_blank_returns_null() {
        let blank = c("   ");
        let mut dto = empty_address_dto();
        dto.region_code = blank.as_ptr();
        dto.city = blank.as_ptr();

        assert!(unsafe { reestr_format_address(&dto) }.is_null());
    }

    #[test]
    fn create_address_rejects_blank_region_code() {
        assert!(reestr_ensure_migrations());

        let blank = c("  ");
        let mut dto = empty_address_dto();
        dto.region_code = blank.as_ptr();

        let mut id: i64 = 0;
        assert!(!unsafe { reestr_create_address(&dto, &mut id) });
        assert_eq!(id, -1);
    }

    #[test]
    fn create_and_list_addresses_over_the_boundary() {
        assert!(reestr_ensure_migrations());

        let token = unique_token("addr");
        let note = c(&token);
        let id = create_address_with_note(&note);

        let payload = take_json(reestr_list_addresses());
        let records = payload.as_array().expect("payload should be an array");
        let found = records
            .iter()
            .find(|record| record["id"] == id)
            .expect("created address should be listed");
        assert_eq!(found["region_code"], "77");
        assert_eq!(found["note"], token.as_str());
        assert!(found["city"].is_null());
    }

    #[test]
    fn create_organization_requires_existing_address() {
        assert!(reestr_ensure_migrations());

        let full_name = c("ООО Ромашка");
        let abbreviated = c("Ромашка");
        let inn = c("7701234567");
        let kpp = c("770101001");
        let email = c("info@romashka.ru");

        let dto = OrganizationDtoFfi {
            full_name: full_name.as_ptr(),
            abbreviated_name: abbreviated.as_ptr(),
            ogrn: ptr::null(),
            rafp: ptr::null(),
            inn: inn.as_ptr(),
            kpp: kpp.as_ptr(),
            email: email.as_ptr(),
            address_id: i64::MAX,
        };

        let mut id: i64 = 0;
        assert!(!unsafe { reestr_create_organization(&dto, &mut id) });
        assert_eq!(id, -1);
    }

    #[test]
    fn create_and_list_organization() {
        assert!(reestr_ensure_migrations());

        let note = c(&unique_token("org-addr"));
        let address_id = create_address_with_note(&note);

        let token = unique_token("org");
        let full_name = c(&token);
        let abbreviated = c("Ромашка");
        let inn = c("7701234567");
        let kpp = c("770101001");
        let email = c("info@romashka.ru");

        let dto = OrganizationDtoFfi {
            full_name: full_name.as_ptr(),
            abbreviated_name: abbreviated.as_ptr(),
            ogrn: ptr::null(),
            rafp: ptr::null(),
            inn: inn.as_ptr(),
            kpp: kpp.as_ptr(),
            email: email.as_ptr(),
            address_id,
        };

        let mut id: i64 = 0;
        assert!(unsafe { reestr_create_organization(&dto, &mut id) });
        assert!(id > 0);

        let payload = take_json(reestr_list_organizations());
        let records = payload.as_array().expect("payload should be an array");
        let found = records
            .iter()
            .find(|record| record["id"] == id)
            .expect("created organization should be listed");
        assert_eq!(found["full_name"], token.as_str());
        assert_eq!(found["address_id"], address_id);
        assert!(found["ogrn"].is_null());
    }

    #[test]
    fn create_and_list_person() {
        assert!(reestr_ensure_migrations());

        let note = c(&unique_token("person-addr"));
        let address_id = create_address_with_note(&note);

        let token = unique_token("person");
        let name = c("Иван");
        let surname = c(&token);
        let snils = c("001-234-567 89");
        let email = c("ivan@example.com");

        let dto = PersonDtoFfi {
            name: name.as_ptr(),
            patronymic: ptr::null(),
            surname: surname.as_ptr(),
            snils: snils.as_ptr(),
            email: email.as_ptr(),
            address_id,
        };

        let mut id: i64 = 0;
        assert!(unsafe { reestr_create_person(&dto, &mut id) });
        assert!(id > 0);

        let payload = take_json(reestr_list_persons());
        let records = payload.as_array().expect("payload should be an array");
        let found = records
            .iter()
            .find(|record| record["id"] == id)
            .expect("created person should be listed");
        assert_eq!(found["surname"], token.as_str());
        assert_eq!(found["snils"], "001-234-567 89");
        assert!(found["patronymic"].is_null());
    }

    #[test]
    fn create_entrepreneur_with_blank_required_field_fails() {
        assert!(reestr_ensure_migrations());

        let note = c(&unique_token("ie-addr"));
        let address_id = create_address_with_note(&note);

        let surname = c("Петров");
        let name = c("  ");
        let ogrnip = c("304770000000123");
        let inn = c("770812345678");

        let dto = EntrepreneurDtoFfi {
            surname: surname.as_ptr(),
            name: name.as_ptr(),
            patronymic: ptr::null(),
            ogrnip: ogrnip.as_ptr(),
            inn: inn.as_ptr(),
            email: ptr::null(),
            address_id,
        };

        let mut id: i64 = 0;
        assert!(!unsafe { reestr_create_entrepreneur(&dto, &mut id) });
        assert_eq!(id, -1);
    }
}
