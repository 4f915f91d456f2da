//! [`CredentialStore`] for [`SqliteStore`].

use std::collections::BTreeSet;

use rusqlite::OptionalExtension as _;
use roost_core::{
  principal::{NewPrincipal, Principal, PrincipalId, Registration},
  role::RoleName,
  store::CredentialStore,
};

use crate::{
  Error, Result, SqliteStore,
  encode::{PRINCIPAL_COLUMNS, RawPrincipal, encode_dt, now},
  password::{hash_password, verify_against_dummy, verify_password},
  store::{all_assignments, missing_in, roles_of, write_roles},
};

impl SqliteStore {
  /// Load one principal with its roles, selected by `column = value`.
  async fn principal_where(
    &self,
    column: &'static str,
    value: String,
  ) -> Result<Option<(Principal, String)>> {
    let row = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "SELECT {PRINCIPAL_COLUMNS}, password_hash FROM principals WHERE {column} = ?1"
        );
        let raw = conn
          .query_row(&sql, rusqlite::params![value], |row| {
            Ok((RawPrincipal::from_row(row)?, row.get::<_, String>(7)?))
          })
          .optional()?;
        match raw {
          Some((raw, hash)) => {
            let roles = roles_of(conn, &raw.principal_id)?;
            Ok(Some((raw, roles, hash)))
          }
          None => Ok(None),
        }
      })
      .await?;

    row
      .map(|(raw, roles, hash)| Ok((raw.into_principal(roles)?, hash)))
      .transpose()
  }
}

impl CredentialStore for SqliteStore {
  type Error = Error;

  async fn authenticate(&self, username: &str, password: &str) -> Result<Option<Principal>> {
    let Some((principal, hash)) = self
      .principal_where("username", username.to_owned())
      .await?
    else {
      verify_against_dummy(password);
      return Ok(None);
    };

    if verify_password(password, &hash)? {
      Ok(Some(principal))
    } else {
      Ok(None)
    }
  }

  async fn register(
    &self,
    input: NewPrincipal,
    password: &str,
    roles: Vec<RoleName>,
  ) -> Result<Registration> {
    let hash = hash_password(password)?;
    let principal = Principal {
      principal_id: PrincipalId::generate(),
      username:     input.username,
      email:        input.email,
      first_name:   input.first_name,
      last_name:    input.last_name,
      phone:        input.phone,
      roles:        roles.iter().cloned().collect::<BTreeSet<_>>(),
      created_at:   now(),
    };
    let created_at = encode_dt(principal.created_at);

    let outcome = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let taken = tx
          .prepare("SELECT 1 FROM principals WHERE username = ?1")?
          .exists(rusqlite::params![principal.username])?;
        if taken {
          return Ok(Registration::UsernameTaken);
        }

        let missing = missing_in(&tx, &roles)?;
        if !missing.is_empty() {
          return Ok(Registration::MissingRoles(missing));
        }

        tx.execute(
          "INSERT INTO principals (
             principal_id, username, email, first_name, last_name, phone,
             password_hash, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
          rusqlite::params![
            principal.principal_id.as_str(),
            principal.username,
            principal.email,
            principal.first_name,
            principal.last_name,
            principal.phone,
            hash,
            created_at,
          ],
        )?;
        write_roles(&tx, principal.principal_id.as_str(), &roles)?;
        tx.commit()?;

        Ok(Registration::Created(principal))
      })
      .await?;

    Ok(outcome)
  }

  async fn get_principal(&self, id: &PrincipalId) -> Result<Option<Principal>> {
    Ok(
      self
        .principal_where("principal_id", id.as_str().to_owned())
        .await?
        .map(|(principal, _)| principal),
    )
  }

  async fn find_by_username(&self, username: &str) -> Result<Option<Principal>> {
    Ok(
      self
        .principal_where("username", username.to_owned())
        .await?
        .map(|(principal, _)| principal),
    )
  }

  async fn list_principals(&self) -> Result<Vec<Principal>> {
    let (raws, mut assignments) = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {PRINCIPAL_COLUMNS} FROM principals ORDER BY username"
        ))?;
        let raws = stmt
          .query_map([], RawPrincipal::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok((raws, all_assignments(conn)?))
      })
      .await?;

    raws
      .into_iter()
      .map(|raw| {
        let roles = assignments.remove(&raw.principal_id).unwrap_or_default();
        raw.into_principal(roles)
      })
      .collect()
  }

  async fn change_password(&self, id: &PrincipalId, old: &str, new: &str) -> Result<bool> {
    let Some((_, current)) = self
      .principal_where("principal_id", id.as_str().to_owned())
      .await?
    else {
      return Ok(false);
    };
    if !verify_password(old, &current)? {
      return Ok(false);
    }

    let replacement = hash_password(new)?;
    let principal_id = id.as_str().to_owned();
    // Only swap the hash that was verified; a concurrent change wins.
    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE principals SET password_hash = ?1
           WHERE principal_id = ?2 AND password_hash = ?3",
          rusqlite::params![replacement, principal_id, current],
        )?)
      })
      .await?;

    Ok(changed == 1)
  }
}
