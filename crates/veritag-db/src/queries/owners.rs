//! Ownership ledger query functions.
//!
//! Maps each owner to the serials they have claimed, preserving
//! acquisition order (rowid order). The authority service keeps this
//! table consistent with `products.current_owner` inside the claim
//! transaction.

use rusqlite::Connection;

use crate::Result;

/// Append a serial to an owner's list if not already present.
pub fn add_owned(conn: &Connection, owner: &str, serial: &str, claimed_at: u64) -> Result<()> {
    conn.execute(
        "INSERT OR IGNORE INTO owned_products (owner, serial, claimed_at)
         VALUES (?1, ?2, ?3)",
        rusqlite::params![owner, serial, claimed_at as i64],
    )?;
    Ok(())
}

/// List an owner's serials in acquisition order.
pub fn list_owned(conn: &Connection, owner: &str) -> Result<Vec<String>> {
    let mut stmt =
        conn.prepare("SELECT serial FROM owned_products WHERE owner = ?1 ORDER BY id ASC")?;
    let serials = stmt
        .query_map([owner], |row| row.get(0))?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(serials)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::products;
    use veritag_types::{Identity, ProductRecord, Serial};

    fn seed_product(conn: &Connection, serial: &str) {
        products::insert(
            conn,
            &ProductRecord {
                serial: Serial::parse(serial).expect("parse serial"),
                name: "Alpha".to_string(),
                manufacturer: "AcmeCo".to_string(),
                image_handle: String::new(),
                registered_at: 1_700_000_000,
                registrar: Identity::parse("0xA").expect("parse"),
                current_owner: None,
                claimed_at: None,
            },
        )
        .expect("insert product");
    }

    #[test]
    fn test_acquisition_order_preserved() {
        let conn = crate::open_memory().expect("open test db");
        for serial in ["SN-003", "SN-001", "SN-002"] {
            seed_product(&conn, serial);
            add_owned(&conn, "0xB", serial, 1_700_000_100).expect("add owned");
        }

        let owned = list_owned(&conn, "0xB").expect("list");
        assert_eq!(owned, vec!["SN-003", "SN-001", "SN-002"]);
    }

    #[test]
    fn test_add_owned_idempotent() {
        let conn = crate::open_memory().expect("open test db");
        seed_product(&conn, "SN-001");

        add_owned(&conn, "0xB", "SN-001", 1_700_000_100).expect("first add");
        add_owned(&conn, "0xB", "SN-001", 1_700_000_200).expect("second add");

        let owned = list_owned(&conn, "0xB").expect("list");
        assert_eq!(owned, vec!["SN-001"]);
    }

    #[test]
    fn test_unknown_owner_empty() {
        let conn = crate::open_memory().expect("open test db");
        let owned = list_owned(&conn, "0xZ").expect("list");
        assert!(owned.is_empty());
    }

    #[test]
    fn test_owners_are_independent() {
        let conn = crate::open_memory().expect("open test db");
        seed_product(&conn, "SN-001");
        seed_product(&conn, "SN-002");

        add_owned(&conn, "0xB", "SN-001", 1_700_000_100).expect("add");
        add_owned(&conn, "0xC", "SN-002", 1_700_000_100).expect("add");

        assert_eq!(list_owned(&conn, "0xB").expect("list"), vec!["SN-001"]);
        assert_eq!(list_owned(&conn, "0xC").expect("list"), vec!["SN-002"]);
    }
}
