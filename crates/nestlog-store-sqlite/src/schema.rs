//! SQL schema for the nestlog SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS users (
    user_id     TEXT PRIMARY KEY,
    name        TEXT,
    created_at  TEXT NOT NULL    -- ISO 8601 UTC; server-assigned
);

-- Events are strictly append-only.
-- No UPDATE or DELETE is ever issued against this table.
CREATE TABLE IF NOT EXISTS events (
    event_id    TEXT PRIMARY KEY,
    user_id     TEXT NOT NULL REFERENCES users(user_id),
    event_type  TEXT NOT NULL,   -- 'FEED' | 'SLEEP' | 'DIAPER'
    start_time  TEXT NOT NULL,   -- ISO 8601 UTC, fixed width
    end_time    TEXT,
    metadata    TEXT,            -- JSON payload (no type tag) or NULL
    created_at  TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS events_start_idx      ON events(start_time);
CREATE INDEX IF NOT EXISTS events_type_start_idx ON events(event_type, start_time);

PRAGMA user_version = 1;
";
