//! # veritag-registry
//!
//! The authoritative product-registry state machine. Owns product
//! identity, ownership transfer, verification counters, and fraud
//! reports on behalf of mutually distrusting callers.
//!
//! ## Concurrency
//!
//! [`Registry`] is the single logical serializer of state mutations: it
//! holds the sole database connection behind a mutex, and every
//! operation runs as one SQL transaction under that lock. Mutations are
//! therefore totally ordered, each operation is all-or-nothing, and the
//! cross-store invariants (serial uniqueness, owner/ledger consistency,
//! counter monotonicity) hold between operations. No network I/O happens
//! inside the critical section; image handles arrive already pinned.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::{SystemTime, UNIX_EPOCH};

use rusqlite::Connection;
use veritag_db::queries::{owners, products, reports, stats};
use veritag_db::DbError;
use veritag_types::{
    Identity, ProductRecord, ProductView, RegistryError, RegistryStats, Report, Serial,
    MAX_FIELD_BYTES, MAX_IMAGE_HANDLE_BYTES, MAX_NOTE_BYTES,
};

pub type Result<T> = std::result::Result<T, RegistryError>;

/// The authority service over the product store, ownership ledger,
/// counter registry, and report log.
pub struct Registry {
    conn: Mutex<Connection>,
}

impl Registry {
    /// Open (or create) the registry database at the given path.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = veritag_db::open(path).map_err(storage)?;
        Ok(Self::from_connection(conn))
    }

    /// Open an in-memory registry (for testing).
    pub fn open_memory() -> Result<Self> {
        let conn = veritag_db::open_memory().map_err(storage)?;
        Ok(Self::from_connection(conn))
    }

    /// Wrap an already-opened registry database connection.
    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    /// Register a fresh serial. Any caller may register (demo mode); an
    /// authorization policy belongs in a layer above this core.
    ///
    /// Atomic: the insert and the `total_products` bump commit together.
    pub fn register(
        &self,
        caller: &Identity,
        serial: &str,
        name: &str,
        manufacturer: &str,
        image_handle: &str,
    ) -> Result<Serial> {
        let serial = Serial::parse(serial)?;
        validate_field("name", name, MAX_FIELD_BYTES, false)?;
        validate_field("manufacturer", manufacturer, MAX_FIELD_BYTES, false)?;
        validate_field("image handle", image_handle, MAX_IMAGE_HANDLE_BYTES, true)?;

        let mut conn = self.lock()?;
        let tx = transaction(&mut conn)?;

        if products::exists(&tx, serial.as_str()).map_err(storage)? {
            return Err(RegistryError::DuplicateSerial(serial));
        }

        let record = ProductRecord {
            serial: serial.clone(),
            name: name.to_string(),
            manufacturer: manufacturer.to_string(),
            image_handle: image_handle.to_string(),
            registered_at: unix_now(),
            registrar: caller.clone(),
            current_owner: None,
            claimed_at: None,
        };

        match products::insert(&tx, &record) {
            Ok(()) => {}
            // Raced only if the store is shared out-of-band; same answer.
            Err(DbError::Constraint(_)) => return Err(RegistryError::DuplicateSerial(serial)),
            Err(e) => return Err(storage(e)),
        }
        stats::bump_products(&tx).map_err(storage)?;
        commit(tx)?;

        tracing::info!(serial = %serial, registrar = %caller, "product registered");
        Ok(serial)
    }

    /// Look up a serial and count the scan.
    ///
    /// An unknown or malformed serial is a valid, observable result
    /// (`registered: false`), never an error, and does not touch
    /// `total_scans`. The counter bump commits atomically with the read.
    pub fn verify(&self, serial: &str) -> Result<ProductView> {
        if Serial::parse(serial).is_err() {
            return Ok(ProductView::absent(serial));
        }

        let mut conn = self.lock()?;
        let tx = transaction(&mut conn)?;

        match products::get(&tx, serial).map_err(storage)? {
            Some(record) => {
                stats::bump_scans(&tx).map_err(storage)?;
                commit(tx)?;
                tracing::debug!(serial, "product verified");
                Ok(record.view())
            }
            None => {
                tracing::debug!(serial, "verify miss");
                Ok(ProductView::absent(serial))
            }
        }
    }

    /// Claim ownership of an unclaimed product. First claim wins and is
    /// terminal; there is no transfer between owners.
    pub fn claim(&self, caller: &Identity, serial: &str) -> Result<()> {
        let serial = Serial::parse(serial)?;

        let mut conn = self.lock()?;
        let tx = transaction(&mut conn)?;

        let record = products::get(&tx, serial.as_str())
            .map_err(storage)?
            .ok_or_else(|| RegistryError::NotFound(serial.clone()))?;

        if let Some(owner) = record.current_owner {
            return Err(RegistryError::AlreadyClaimed { serial, owner });
        }

        let claimed_at = unix_now();
        products::set_owner(&tx, serial.as_str(), caller, claimed_at).map_err(storage)?;
        owners::add_owned(&tx, caller.as_str(), serial.as_str(), claimed_at).map_err(storage)?;
        commit(tx)?;

        tracing::info!(serial = %serial, owner = %caller, "ownership claimed");
        Ok(())
    }

    /// Append a fraud report. Accepted whether or not the serial is
    /// registered; a report against a registered product does not
    /// invalidate the registration.
    pub fn report_fake(&self, caller: &Identity, serial: &str, note: &str) -> Result<()> {
        let serial = Serial::parse(serial)?;
        if note.len() > MAX_NOTE_BYTES {
            return Err(RegistryError::InvalidArgument(format!(
                "note exceeds {MAX_NOTE_BYTES} bytes"
            )));
        }

        let report = Report {
            serial,
            reporter: caller.clone(),
            note: note.to_string(),
            reported_at: unix_now(),
        };

        let mut conn = self.lock()?;
        let tx = transaction(&mut conn)?;
        reports::append(&tx, &report).map_err(storage)?;
        stats::bump_reports(&tx).map_err(storage)?;
        commit(tx)?;

        tracing::info!(serial = %report.serial, reporter = %caller, "fake reported");
        Ok(())
    }

    /// Serials owned by `owner`, in acquisition order.
    pub fn user_products(&self, owner: &Identity) -> Result<Vec<Serial>> {
        let conn = self.lock()?;
        let raw = owners::list_owned(&conn, owner.as_str()).map_err(storage)?;
        raw.iter()
            .map(|s| {
                Serial::parse(s).map_err(|e| RegistryError::Storage(format!("ownership ledger: {e}")))
            })
            .collect()
    }

    /// The product view without counting a scan. Intended for UI
    /// re-fetches where the scan has already been counted.
    pub fn product_details(&self, serial: &str) -> Result<ProductView> {
        let serial = Serial::parse(serial)?;
        let conn = self.lock()?;
        let record = products::get(&conn, serial.as_str())
            .map_err(storage)?
            .ok_or(RegistryError::NotFound(serial))?;
        Ok(record.view())
    }

    /// Reports filed against one serial, in submission order.
    pub fn reports_for(&self, serial: &str) -> Result<Vec<Report>> {
        let serial = Serial::parse(serial)?;
        let conn = self.lock()?;
        reports::list_by_serial(&conn, serial.as_str()).map_err(storage)
    }

    /// The full report log in submission order.
    pub fn list_reports(&self) -> Result<Vec<Report>> {
        let conn = self.lock()?;
        reports::list(&conn).map_err(storage)
    }

    /// Current counter values. Reads under the same lock as mutations,
    /// so a torn snapshot is impossible.
    pub fn stats(&self) -> Result<RegistryStats> {
        let conn = self.lock()?;
        stats::read(&conn).map_err(storage)
    }

    /// Number of registered products.
    pub fn total_products(&self) -> Result<u64> {
        Ok(self.stats()?.total_products)
    }

    /// Number of successful verification scans.
    pub fn total_scans(&self) -> Result<u64> {
        Ok(self.stats()?.total_scans)
    }

    /// Number of fraud reports.
    pub fn total_reports(&self) -> Result<u64> {
        Ok(self.stats()?.total_reports)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| RegistryError::Storage("registry lock poisoned".to_string()))
    }
}

/// Validate a plain string field against a byte budget.
fn validate_field(
    field: &str,
    value: &str,
    max_bytes: usize,
    allow_empty: bool,
) -> Result<()> {
    if value.is_empty() && !allow_empty {
        return Err(RegistryError::InvalidArgument(format!(
            "{field} must not be empty"
        )));
    }
    if value.len() > max_bytes {
        return Err(RegistryError::InvalidArgument(format!(
            "{field} exceeds {max_bytes} bytes"
        )));
    }
    Ok(())
}

fn transaction(conn: &mut Connection) -> Result<rusqlite::Transaction<'_>> {
    conn.transaction()
        .map_err(|e| RegistryError::Storage(e.to_string()))
}

fn commit(tx: rusqlite::Transaction<'_>) -> Result<()> {
    tx.commit().map_err(|e| RegistryError::Storage(e.to_string()))
}

fn storage(e: DbError) -> RegistryError {
    RegistryError::Storage(e.to_string())
}

/// Current Unix time in seconds.
fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
