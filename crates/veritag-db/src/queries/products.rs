//! Product store query functions (key = serial).

use rusqlite::{Connection, OptionalExtension};
use veritag_types::{Identity, ProductRecord, Serial};

use crate::{DbError, Result};

/// Insert a product record. Fails with [`DbError::Constraint`] if the
/// serial is already present.
pub fn insert(conn: &Connection, record: &ProductRecord) -> Result<()> {
    let result = conn.execute(
        "INSERT INTO products
         (serial, name, manufacturer, image_handle, registered_at, registrar,
          current_owner, claimed_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        rusqlite::params![
            record.serial.as_str(),
            record.name,
            record.manufacturer,
            record.image_handle,
            record.registered_at as i64,
            record.registrar.as_str(),
            record.current_owner.as_ref().map(|o| o.as_str()),
            record.claimed_at.map(|t| t as i64),
        ],
    );

    match result {
        Ok(_) => Ok(()),
        Err(rusqlite::Error::SqliteFailure(e, _))
            if e.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            Err(DbError::Constraint(format!(
                "serial '{}' already present",
                record.serial
            )))
        }
        Err(e) => Err(DbError::Sqlite(e)),
    }
}

/// Fetch a product by serial. `Ok(None)` if absent.
pub fn get(conn: &Connection, serial: &str) -> Result<Option<ProductRecord>> {
    let raw = conn
        .query_row(
            "SELECT serial, name, manufacturer, image_handle, registered_at,
                    registrar, current_owner, claimed_at
             FROM products WHERE serial = ?1",
            [serial],
            |row| {
                Ok(RawProduct {
                    serial: row.get(0)?,
                    name: row.get(1)?,
                    manufacturer: row.get(2)?,
                    image_handle: row.get(3)?,
                    registered_at: row.get::<_, i64>(4)? as u64,
                    registrar: row.get(5)?,
                    current_owner: row.get(6)?,
                    claimed_at: row.get::<_, Option<i64>>(7)?.map(|t| t as u64),
                })
            },
        )
        .optional()?;

    raw.map(RawProduct::into_record).transpose()
}

/// Whether a serial is present in the store.
pub fn exists(conn: &Connection, serial: &str) -> Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM products WHERE serial = ?1",
        [serial],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

/// Set the owner of a product. Fails with [`DbError::NotFound`] if the
/// serial is absent.
pub fn set_owner(conn: &Connection, serial: &str, owner: &Identity, claimed_at: u64) -> Result<()> {
    let updated = conn.execute(
        "UPDATE products SET current_owner = ?1, claimed_at = ?2 WHERE serial = ?3",
        rusqlite::params![owner.as_str(), claimed_at as i64, serial],
    )?;
    if updated == 0 {
        return Err(DbError::NotFound(format!("product '{serial}'")));
    }
    Ok(())
}

/// Number of products in the store.
pub fn count(conn: &Connection) -> Result<u64> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM products", [], |row| row.get(0))?;
    Ok(count as u64)
}

/// A raw product row before domain validation.
struct RawProduct {
    serial: String,
    name: String,
    manufacturer: String,
    image_handle: String,
    registered_at: u64,
    registrar: String,
    current_owner: Option<String>,
    claimed_at: Option<u64>,
}

impl RawProduct {
    /// Stored rows were validated on insert; a parse failure here means
    /// the database was modified out-of-band.
    fn into_record(self) -> Result<ProductRecord> {
        let serial = Serial::parse(&self.serial)
            .map_err(|e| DbError::CorruptRow(format!("serial: {e}")))?;
        let registrar = Identity::parse(&self.registrar)
            .map_err(|e| DbError::CorruptRow(format!("registrar: {e}")))?;
        let current_owner = self
            .current_owner
            .map(|o| Identity::parse(&o).map_err(|e| DbError::CorruptRow(format!("owner: {e}"))))
            .transpose()?;

        Ok(ProductRecord {
            serial,
            name: self.name,
            manufacturer: self.manufacturer,
            image_handle: self.image_handle,
            registered_at: self.registered_at,
            registrar,
            current_owner,
            claimed_at: self.claimed_at,
        })
    }
}
