//! SQL schema for the Vigil SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! the `PRAGMA user_version` number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS devices (
    id         INTEGER PRIMARY KEY,
    device_id  TEXT NOT NULL UNIQUE,  -- opaque client-generated identifier
    last_seen  TEXT NOT NULL,         -- ISO 8601 UTC; updated on every contact
    admin      INTEGER NOT NULL DEFAULT 0
);

-- Lazily-created metric catalog. data_type and unit are fixed at first
-- sighting; re-declarations must match.
CREATE TABLE IF NOT EXISTS metric_types (
    id         INTEGER PRIMARY KEY,
    name       TEXT NOT NULL UNIQUE,
    data_type  TEXT NOT NULL,         -- 'float' | 'string'
    unit       TEXT
);

-- Facts are strictly append-only.
-- No UPDATE or DELETE is ever issued against this table.
CREATE TABLE IF NOT EXISTS facts (
    id              INTEGER PRIMARY KEY,
    device_id       INTEGER NOT NULL
                    REFERENCES devices(id) ON DELETE CASCADE,
    metric_type_id  INTEGER NOT NULL
                    REFERENCES metric_types(id) ON DELETE CASCADE,
    timestamp       TEXT NOT NULL,    -- ISO 8601 UTC, normalized on ingest
    value           TEXT NOT NULL     -- typed per the metric_types row
);

CREATE INDEX IF NOT EXISTS facts_type_time_idx
    ON facts(metric_type_id, timestamp);
CREATE INDEX IF NOT EXISTS facts_device_idx ON facts(device_id);
CREATE INDEX IF NOT EXISTS devices_seen_idx ON devices(last_seen);

PRAGMA user_version = 1;
";
