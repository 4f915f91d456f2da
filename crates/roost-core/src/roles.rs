//! Role registry maintenance and all-or-nothing role assignment.

use uuid::Uuid;

use crate::{
  Error, Result,
  principal::PrincipalId,
  role::{Role, RoleName, RoleReplace},
  store::RoleStore,
};

/// Drop repeated names, keeping first occurrences in order.
pub(crate) fn dedup_names(names: Vec<RoleName>) -> Vec<RoleName> {
  let mut out: Vec<RoleName> = Vec::with_capacity(names.len());
  for name in names {
    if !out.contains(&name) {
      out.push(name);
    }
  }
  out
}

/// Replace a principal's role set with exactly `new_roles`.
///
/// Every name is validated before anything is written. The replacement itself
/// is a single store transaction, so callers never observe the principal with
/// the old roles removed and the new ones not yet added.
pub async fn assign_roles<S>(
  store: &S,
  principal: &PrincipalId,
  new_roles: Vec<RoleName>,
) -> Result<()>
where
  S: RoleStore,
{
  let roles = dedup_names(new_roles);

  store
    .load_roles(principal)
    .await
    .map_err(Error::store)?
    .ok_or_else(|| Error::PrincipalNotFound(principal.clone()))?;

  let missing = store.missing_roles(&roles).await.map_err(Error::store)?;
  if !missing.is_empty() {
    tracing::debug!(%principal, ?missing, "role assignment rejected");
    return Err(Error::UnknownRoles(missing));
  }

  match store
    .replace_roles(principal, roles.clone())
    .await
    .map_err(Error::store)?
  {
    RoleReplace::Replaced { previous } => {
      tracing::info!(%principal, ?previous, assigned = ?roles, "roles replaced");
      Ok(())
    }
    RoleReplace::UnknownPrincipal => {
      Err(Error::PrincipalNotFound(principal.clone()))
    }
    // A role vanished between validation and the transaction.
    RoleReplace::Missing(missing) => Err(Error::UnknownRoles(missing)),
  }
}

/// Add a role to the registry. Names are compared exactly.
pub async fn create_role<S>(store: &S, name: &str) -> Result<Role>
where
  S: RoleStore,
{
  if name.trim().is_empty() {
    return Err(Error::InvalidInput("role name is required".into()));
  }
  let name = RoleName::from(name);
  let role = store
    .create_role(name.clone())
    .await
    .map_err(Error::store)?
    .ok_or(Error::DuplicateRole(name))?;
  tracing::info!(role_id = %role.role_id, name = %role.name, "role created");
  Ok(role)
}

/// Remove a role from the registry.
///
/// Principals that already hold the role keep it; their tokens and later
/// grants continue to carry the name.
pub async fn delete_role<S>(store: &S, role_id: Uuid) -> Result<()>
where
  S: RoleStore,
{
  if !store.delete_role(role_id).await.map_err(Error::store)? {
    return Err(Error::RoleNotFound(role_id));
  }
  tracing::info!(%role_id, "role deleted");
  Ok(())
}

pub async fn get_role<S>(store: &S, role_id: Uuid) -> Result<Role>
where
  S: RoleStore,
{
  store
    .get_role(role_id)
    .await
    .map_err(Error::store)?
    .ok_or(Error::RoleNotFound(role_id))
}

pub async fn list_roles<S>(store: &S) -> Result<Vec<Role>>
where
  S: RoleStore,
{
  store.list_roles().await.map_err(Error::store)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn dedup_keeps_first_occurrence_order() {
    let names = vec!["Lodger".into(), "Admin".into(), "Lodger".into()];
    let out = dedup_names(names);
    assert_eq!(out, vec![RoleName::from("Lodger"), RoleName::from("Admin")]);
  }

  #[test]
  fn unknown_roles_message_lists_names() {
    let err = Error::UnknownRoles(vec!["Ghost".into(), "Phantom".into()]);
    assert_eq!(
      err.to_string(),
      "roles 'Ghost,Phantom' do not exist in the system"
    );
  }
}
