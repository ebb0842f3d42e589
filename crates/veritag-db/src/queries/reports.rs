//! Report log query functions (append-only).

use rusqlite::Connection;
use veritag_types::{Identity, Report, Serial};

use crate::{DbError, Result};

/// Append a report to the log. No deduplication.
pub fn append(conn: &Connection, report: &Report) -> Result<()> {
    conn.execute(
        "INSERT INTO reports (serial, reporter, note, reported_at)
         VALUES (?1, ?2, ?3, ?4)",
        rusqlite::params![
            report.serial.as_str(),
            report.reporter.as_str(),
            report.note,
            report.reported_at as i64,
        ],
    )?;
    Ok(())
}

/// List the full report log in submission order.
pub fn list(conn: &Connection) -> Result<Vec<Report>> {
    let mut stmt = conn.prepare(
        "SELECT serial, reporter, note, reported_at FROM reports ORDER BY id ASC",
    )?;
    let reports = collect_reports(stmt.query_map([], row_to_raw)?);
    reports
}

/// List reports filed against one serial, in submission order.
pub fn list_by_serial(conn: &Connection, serial: &str) -> Result<Vec<Report>> {
    let mut stmt = conn.prepare(
        "SELECT serial, reporter, note, reported_at FROM reports
         WHERE serial = ?1 ORDER BY id ASC",
    )?;
    let reports = collect_reports(stmt.query_map([serial], row_to_raw)?);
    reports
}

/// Number of reports in the log.
pub fn count(conn: &Connection) -> Result<u64> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM reports", [], |row| row.get(0))?;
    Ok(count as u64)
}

type RawReport = (String, String, String, u64);

fn row_to_raw(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawReport> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get::<_, i64>(3)? as u64,
    ))
}

fn collect_reports(
    rows: impl Iterator<Item = rusqlite::Result<RawReport>>,
) -> Result<Vec<Report>> {
    rows.map(|row| {
        let (serial, reporter, note, reported_at) = row?;
        Ok(Report {
            serial: Serial::parse(&serial)
                .map_err(|e| DbError::CorruptRow(format!("serial: {e}")))?,
            reporter: Identity::parse(&reporter)
                .map_err(|e| DbError::CorruptRow(format!("reporter: {e}")))?,
            note,
            reported_at,
        })
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(serial: &str, reporter: &str, note: &str, at: u64) -> Report {
        Report {
            serial: Serial::parse(serial).expect("parse serial"),
            reporter: Identity::parse(reporter).expect("parse reporter"),
            note: note.to_string(),
            reported_at: at,
        }
    }

    #[test]
    fn test_append_and_list() {
        let conn = crate::open_memory().expect("open test db");
        append(&conn, &report("SN-999", "0xD", "Mobile Scan", 1000)).expect("append");
        append(&conn, &report("SN-001", "0xE", "looks fake", 2000)).expect("append");

        let all = list(&conn).expect("list");
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].serial.as_str(), "SN-999");
        assert_eq!(all[1].note, "looks fake");
    }

    #[test]
    fn test_no_deduplication() {
        let conn = crate::open_memory().expect("open test db");
        let r = report("SN-999", "0xD", "Mobile Scan", 1000);
        append(&conn, &r).expect("first");
        append(&conn, &r).expect("second");

        assert_eq!(count(&conn).expect("count"), 2);
    }

    #[test]
    fn test_list_by_serial() {
        let conn = crate::open_memory().expect("open test db");
        append(&conn, &report("SN-999", "0xD", "a", 1000)).expect("append");
        append(&conn, &report("SN-001", "0xD", "b", 2000)).expect("append");
        append(&conn, &report("SN-999", "0xE", "c", 3000)).expect("append");

        let filtered = list_by_serial(&conn, "SN-999").expect("list");
        assert_eq!(filtered.len(), 2);
        assert_eq!(filtered[0].note, "a");
        assert_eq!(filtered[1].note, "c");
    }

    #[test]
    fn test_empty_note_allowed() {
        let conn = crate::open_memory().expect("open test db");
        append(&conn, &report("SN-999", "0xD", "", 1000)).expect("append");
        assert_eq!(list(&conn).expect("list")[0].note, "");
    }
}
