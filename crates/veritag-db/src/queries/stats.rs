//! Counter registry query functions (singleton row, id = 1).
//!
//! Counters are non-decreasing; there is no decrement or reset. Only the
//! authority service bumps them, inside the same transaction as the
//! operation's primary effect.

use rusqlite::Connection;
use veritag_types::RegistryStats;

use crate::Result;

/// Read the current counter values.
pub fn read(conn: &Connection) -> Result<RegistryStats> {
    let stats = conn.query_row(
        "SELECT total_products, total_scans, total_reports FROM registry_stats WHERE id = 1",
        [],
        |row| {
            Ok(RegistryStats {
                total_products: row.get::<_, i64>(0)? as u64,
                total_scans: row.get::<_, i64>(1)? as u64,
                total_reports: row.get::<_, i64>(2)? as u64,
            })
        },
    )?;
    Ok(stats)
}

/// Increment `total_products` by one.
pub fn bump_products(conn: &Connection) -> Result<()> {
    conn.execute(
        "UPDATE registry_stats SET total_products = total_products + 1 WHERE id = 1",
        [],
    )?;
    Ok(())
}

/// Increment `total_scans` by one.
pub fn bump_scans(conn: &Connection) -> Result<()> {
    conn.execute(
        "UPDATE registry_stats SET total_scans = total_scans + 1 WHERE id = 1",
        [],
    )?;
    Ok(())
}

/// Increment `total_reports` by one.
pub fn bump_reports(conn: &Connection) -> Result<()> {
    conn.execute(
        "UPDATE registry_stats SET total_reports = total_reports + 1 WHERE id = 1",
        [],
    )?;
    Ok(())
}
