//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `reestr_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

use reestr_core::db::open_db_in_memory;
use reestr_core::{AddressDraft, AddressRepository, SqliteAddressRepository};

fn main() {
    println!("reestr_core version={}", reestr_core::core_version());

    let conn = match open_db_in_memory() {
        Ok(conn) => conn,
        Err(err) => {
            eprintln!("reestr_core schema=error {err}");
            std::process::exit(1);
        }
    };
    println!("reestr_core schema=ok");

    let draft = AddressDraft {
        region_code: Some("77".to_string()),
        ..AddressDraft::default()
    };
    match SqliteAddressRepository::new(&conn).create(&draft) {
        Ok(id) => println!("reestr_core smoke_address_id={id}"),
        Err(err) => {
            eprintln!("reestr_core smoke=error {err}");
            std::process::exit(1);
        }
    }
}
