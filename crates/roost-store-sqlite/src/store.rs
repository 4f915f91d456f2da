//! [`SqliteStore`]: the SQLite implementation of the Roost store traits.
//!
//! The trait impls live in `accounts`, `roles` and `posts`; this module owns
//! the connection and the synchronous helpers they share inside
//! `Connection::call` closures.

use std::{
  collections::{BTreeMap, BTreeSet},
  path::Path,
};

use rusqlite::OptionalExtension as _;
use roost_core::role::RoleName;
use uuid::Uuid;

use crate::{
  Result,
  encode::encode_uuid,
  schema::{SCHEMA, SEED_ROLES},
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Roost store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted. All calls are
/// serialised onto one connection thread.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path`, initialise the schema and seed the
  /// built-in roles.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store; useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    let seeds: Vec<(String, &'static str)> = SEED_ROLES
      .iter()
      .map(|name| (encode_uuid(Uuid::new_v4()), *name))
      .collect();

    let seeded = self
      .conn
      .call(move |conn| {
        conn.execute_batch(SCHEMA)?;
        let mut seeded = 0;
        for (role_id, name) in &seeds {
          seeded += conn.execute(
            "INSERT OR IGNORE INTO roles (role_id, name) VALUES (?1, ?2)",
            rusqlite::params![role_id, name],
          )?;
        }
        Ok(seeded)
      })
      .await?;

    if seeded > 0 {
      tracing::info!(seeded, "seeded built-in roles");
    }
    Ok(())
  }
}

// ─── Helpers shared by the trait impls ───────────────────────────────────────

pub(crate) fn principal_exists(
  conn: &rusqlite::Connection,
  principal_id: &str,
) -> rusqlite::Result<bool> {
  Ok(
    conn
      .query_row(
        "SELECT 1 FROM principals WHERE principal_id = ?1",
        rusqlite::params![principal_id],
        |_| Ok(()),
      )
      .optional()?
      .is_some(),
  )
}

pub(crate) fn roles_of(
  conn: &rusqlite::Connection,
  principal_id: &str,
) -> rusqlite::Result<BTreeSet<RoleName>> {
  let mut stmt =
    conn.prepare("SELECT role_name FROM principal_roles WHERE principal_id = ?1")?;
  stmt
    .query_map(rusqlite::params![principal_id], |row| {
      row.get::<_, String>(0).map(RoleName::new)
    })?
    .collect()
}

/// Every assignment, grouped by principal id.
pub(crate) fn all_assignments(
  conn: &rusqlite::Connection,
) -> rusqlite::Result<BTreeMap<String, BTreeSet<RoleName>>> {
  let mut stmt = conn.prepare("SELECT principal_id, role_name FROM principal_roles")?;
  let mut grouped: BTreeMap<String, BTreeSet<RoleName>> = BTreeMap::new();
  let rows = stmt.query_map([], |row| {
    Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
  })?;
  for row in rows {
    let (principal_id, role) = row?;
    grouped.entry(principal_id).or_default().insert(RoleName::new(role));
  }
  Ok(grouped)
}

/// The names from `names` absent from the registry, de-duplicated, in input
/// order.
pub(crate) fn missing_in(
  conn: &rusqlite::Connection,
  names: &[RoleName],
) -> rusqlite::Result<Vec<RoleName>> {
  let mut stmt = conn.prepare("SELECT 1 FROM roles WHERE name = ?1")?;
  let mut missing: Vec<RoleName> = Vec::new();
  for name in names {
    if missing.contains(name) {
      continue;
    }
    if !stmt.exists(rusqlite::params![name.as_str()])? {
      missing.push(name.clone());
    }
  }
  Ok(missing)
}

/// Replace the assignment rows of one principal. Callers own the transaction.
pub(crate) fn write_roles(
  conn: &rusqlite::Connection,
  principal_id: &str,
  roles: &[RoleName],
) -> rusqlite::Result<()> {
  conn.execute(
    "DELETE FROM principal_roles WHERE principal_id = ?1",
    rusqlite::params![principal_id],
  )?;
  let mut insert = conn.prepare(
    "INSERT OR IGNORE INTO principal_roles (principal_id, role_name) VALUES (?1, ?2)",
  )?;
  for role in roles {
    insert.execute(rusqlite::params![principal_id, role.as_str()])?;
  }
  Ok(())
}
