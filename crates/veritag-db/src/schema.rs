//! SQL schema definitions.

/// Complete schema for the Veritag v1 database.
pub const SCHEMA_V1: &str = r#"
-- ============================================================
-- Product store (key = serial)
-- ============================================================

CREATE TABLE IF NOT EXISTS products (
    serial TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    manufacturer TEXT NOT NULL,
    image_handle TEXT NOT NULL DEFAULT '',
    registered_at INTEGER NOT NULL,
    registrar TEXT NOT NULL,
    current_owner TEXT,
    claimed_at INTEGER
);

-- ============================================================
-- Ownership ledger (acquisition order = rowid order)
-- ============================================================

CREATE TABLE IF NOT EXISTS owned_products (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    owner TEXT NOT NULL,
    serial TEXT NOT NULL REFERENCES products(serial),
    claimed_at INTEGER NOT NULL,
    UNIQUE (owner, serial)
);

CREATE INDEX IF NOT EXISTS idx_owned_owner ON owned_products(owner);

-- ============================================================
-- Report log (append-only, submission order = rowid order)
-- ============================================================

CREATE TABLE IF NOT EXISTS reports (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    serial TEXT NOT NULL,
    reporter TEXT NOT NULL,
    note TEXT NOT NULL DEFAULT '',
    reported_at INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_reports_serial ON reports(serial);

-- ============================================================
-- Counters (singleton row)
-- ============================================================

CREATE TABLE IF NOT EXISTS registry_stats (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    total_products INTEGER NOT NULL DEFAULT 0,
    total_scans INTEGER NOT NULL DEFAULT 0,
    total_reports INTEGER NOT NULL DEFAULT 0
);
"#;
