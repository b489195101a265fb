//! SQL schema for the diet tracker SQLite store.
//!
//! Executed once at connection startup. `PRAGMA user_version` records the
//! layout revision for future migrations.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS users (
    id          TEXT PRIMARY KEY,
    name        TEXT NOT NULL,
    email       TEXT NOT NULL,           -- not unique
    is_admin    INTEGER NOT NULL DEFAULT 0,
    created_at  TEXT NOT NULL            -- ISO 8601 UTC; server-assigned
);

-- One credential per identity. Only the SHA-256 digest is stored.
CREATE TABLE IF NOT EXISTS sessions (
    credential_digest TEXT PRIMARY KEY,
    user_id           TEXT NOT NULL UNIQUE REFERENCES users(id),
    issued_at         TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS meals (
    id          TEXT PRIMARY KEY,
    name        TEXT NOT NULL,
    description TEXT NOT NULL,
    is_on_diet  INTEGER NOT NULL,
    user_id     TEXT NOT NULL REFERENCES users(id),
    date        INTEGER NOT NULL         -- milliseconds since the epoch
);

CREATE INDEX IF NOT EXISTS meals_user_idx ON meals(user_id);
CREATE INDEX IF NOT EXISTS meals_date_idx ON meals(date);

PRAGMA user_version = 1;
";
