//! SQL schema for the AQHI SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS users (
    user_id   TEXT PRIMARY KEY,
    username  TEXT NOT NULL UNIQUE,
    email     TEXT NOT NULL UNIQUE,
    password  TEXT NOT NULL,
    -- EWKT, longitude first: 'SRID=4326;POINT(lon lat)'
    location  TEXT NOT NULL CHECK (location LIKE 'SRID=4326;POINT(%)')
);

CREATE TABLE IF NOT EXISTS alerts (
    alert_id      TEXT PRIMARY KEY,
    user_id       TEXT NOT NULL REFERENCES users(user_id),
    alert_name    TEXT NOT NULL,
    threshold     INTEGER NOT NULL,
    alert_method  TEXT,
    mobile_number TEXT,
    is_active     INTEGER NOT NULL DEFAULT 1,
    created_at    TEXT NOT NULL,   -- ISO 8601 UTC; server-assigned
    location      TEXT NOT NULL CHECK (location LIKE 'SRID=4326;POINT(%)')
);

CREATE INDEX IF NOT EXISTS alerts_user_idx ON alerts(user_id);

PRAGMA user_version = 1;
";
