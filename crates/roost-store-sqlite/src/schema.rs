//! SQL schema for the Roost SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

use roost_core::role::{ADMIN, LANDLORD, LODGER};

/// Roles present in every fresh database.
pub const SEED_ROLES: &[&str] = &[ADMIN, LANDLORD, LODGER];

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS principals (
    principal_id  TEXT PRIMARY KEY,
    username      TEXT NOT NULL UNIQUE COLLATE NOCASE,
    email         TEXT NOT NULL,
    first_name    TEXT NOT NULL,
    last_name     TEXT NOT NULL,
    phone         TEXT,
    password_hash TEXT NOT NULL,   -- argon2 PHC string
    created_at    TEXT NOT NULL
);

-- Names are compared case-sensitively.
CREATE TABLE IF NOT EXISTS roles (
    role_id TEXT PRIMARY KEY,
    name    TEXT NOT NULL UNIQUE
);

-- role_name deliberately has no foreign key: deleting a role from the
-- registry leaves existing assignments in place.
CREATE TABLE IF NOT EXISTS principal_roles (
    principal_id TEXT NOT NULL REFERENCES principals(principal_id) ON DELETE CASCADE,
    role_name    TEXT NOT NULL,
    PRIMARY KEY (principal_id, role_name)
);

CREATE TABLE IF NOT EXISTS posts (
    post_id        TEXT PRIMARY KEY,
    owner          TEXT NOT NULL,
    address        TEXT NOT NULL,
    price          REAL NOT NULL,
    number_lodgers INTEGER NOT NULL,
    description    TEXT NOT NULL,
    images         TEXT NOT NULL DEFAULT '[]',   -- JSON array of URLs
    total_point    REAL NOT NULL DEFAULT 0,
    reviewer_count REAL NOT NULL DEFAULT 0,
    created_at     TEXT NOT NULL,
    last_update    TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS comments (
    comment_id TEXT PRIMARY KEY,
    post_id    TEXT NOT NULL REFERENCES posts(post_id) ON DELETE CASCADE,
    owner      TEXT NOT NULL,
    content    TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS favourites (
    owner      TEXT NOT NULL,
    post_id    TEXT NOT NULL REFERENCES posts(post_id) ON DELETE CASCADE,
    created_at TEXT NOT NULL,
    PRIMARY KEY (owner, post_id)
);

CREATE INDEX IF NOT EXISTS posts_owner_idx      ON posts(owner);
CREATE INDEX IF NOT EXISTS posts_created_idx    ON posts(created_at);
CREATE INDEX IF NOT EXISTS comments_post_idx    ON comments(post_id);

PRAGMA user_version = 1;
";
