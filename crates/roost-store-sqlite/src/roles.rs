//! [`RoleStore`] for [`SqliteStore`].

use rusqlite::OptionalExtension as _;
use roost_core::{
  principal::PrincipalId,
  role::{Role, RoleName, RoleReplace},
  store::RoleStore,
};
use uuid::Uuid;

use crate::{
  Error, Result, SqliteStore,
  encode::{RawRole, encode_uuid},
  store::{missing_in, principal_exists, roles_of, write_roles},
};

impl RoleStore for SqliteStore {
  type Error = Error;

  async fn list_roles(&self) -> Result<Vec<Role>> {
    let raws: Vec<RawRole> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare("SELECT role_id, name FROM roles ORDER BY name")?;
        let rows = stmt
          .query_map([], RawRole::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawRole::into_role).collect()
  }

  async fn get_role(&self, role_id: Uuid) -> Result<Option<Role>> {
    let id_str = encode_uuid(role_id);
    let raw: Option<RawRole> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT role_id, name FROM roles WHERE role_id = ?1",
              rusqlite::params![id_str],
              RawRole::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawRole::into_role).transpose()
  }

  async fn role_exists(&self, name: &str) -> Result<bool> {
    let name = name.to_owned();
    Ok(
      self
        .conn
        .call(move |conn| {
          Ok(
            conn
              .prepare("SELECT 1 FROM roles WHERE name = ?1")?
              .exists(rusqlite::params![name])?,
          )
        })
        .await?,
    )
  }

  async fn missing_roles(&self, names: &[RoleName]) -> Result<Vec<RoleName>> {
    let names = names.to_vec();
    Ok(self.conn.call(move |conn| Ok(missing_in(conn, &names)?)).await?)
  }

  async fn create_role(&self, name: RoleName) -> Result<Option<Role>> {
    let role = Role {
      role_id: Uuid::new_v4(),
      name,
    };
    let id_str = encode_uuid(role.role_id);
    let name_str = role.name.as_str().to_owned();

    let inserted = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "INSERT OR IGNORE INTO roles (role_id, name) VALUES (?1, ?2)",
          rusqlite::params![id_str, name_str],
        )?)
      })
      .await?;

    Ok((inserted == 1).then_some(role))
  }

  async fn delete_role(&self, role_id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(role_id);
    let deleted = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM roles WHERE role_id = ?1",
          rusqlite::params![id_str],
        )?)
      })
      .await?;

    Ok(deleted == 1)
  }

  async fn load_roles(&self, principal: &PrincipalId) -> Result<Option<Vec<RoleName>>> {
    let id = principal.as_str().to_owned();
    Ok(
      self
        .conn
        .call(move |conn| {
          if !principal_exists(conn, &id)? {
            return Ok(None);
          }
          Ok(Some(roles_of(conn, &id)?.into_iter().collect()))
        })
        .await?,
    )
  }

  async fn replace_roles(
    &self,
    principal: &PrincipalId,
    roles: Vec<RoleName>,
  ) -> Result<RoleReplace> {
    let id = principal.as_str().to_owned();
    Ok(
      self
        .conn
        .call(move |conn| {
          let tx = conn.transaction()?;

          if !principal_exists(&tx, &id)? {
            return Ok(RoleReplace::UnknownPrincipal);
          }
          let missing = missing_in(&tx, &roles)?;
          if !missing.is_empty() {
            return Ok(RoleReplace::Missing(missing));
          }

          let previous = roles_of(&tx, &id)?.into_iter().collect();
          write_roles(&tx, &id, &roles)?;
          tx.commit()?;

          Ok(RoleReplace::Replaced { previous })
        })
        .await?,
    )
  }
}
