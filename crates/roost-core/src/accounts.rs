//! Registration and password changes, delegated to the credential store.

use crate::{
  Error, Result,
  principal::{NewPrincipal, Principal, PrincipalId, Registration, check_password},
  role::{ADMIN, RoleName},
  roles::dedup_names,
  store::{CredentialStore, RoleStore},
};

/// Create an account with its initial roles.
///
/// `Admin` cannot be self-assigned and is dropped from `requested`; at least
/// one other role must remain and every remaining role must exist. Nothing is
/// created unless all checks pass.
pub async fn register_principal<C, R>(
  credentials: &C,
  registry: &R,
  input: NewPrincipal,
  password: &str,
  requested: Vec<RoleName>,
) -> Result<Principal>
where
  C: CredentialStore,
  R: RoleStore,
{
  input.validate()?;
  check_password(password)?;

  let roles: Vec<RoleName> = dedup_names(requested)
    .into_iter()
    .filter(|r| r.as_str() != ADMIN)
    .collect();
  if roles.is_empty() {
    return Err(Error::InvalidInput(
      "at least one role other than Admin is required".into(),
    ));
  }

  let missing = registry.missing_roles(&roles).await.map_err(Error::store)?;
  if !missing.is_empty() {
    return Err(Error::UnknownRoles(missing));
  }

  let username = input.username.clone();
  match credentials
    .register(input, password, roles)
    .await
    .map_err(Error::store)?
  {
    Registration::Created(principal) => {
      tracing::info!(
        principal = %principal.principal_id,
        username = %principal.username,
        "principal registered"
      );
      Ok(principal)
    }
    Registration::UsernameTaken => Err(Error::UsernameTaken(username)),
    Registration::MissingRoles(missing) => Err(Error::UnknownRoles(missing)),
  }
}

/// Change a password after verifying the current one.
pub async fn change_password<C>(
  credentials: &C,
  principal: &PrincipalId,
  old: &str,
  new: &str,
) -> Result<()>
where
  C: CredentialStore,
{
  check_password(new)?;
  if credentials
    .change_password(principal, old, new)
    .await
    .map_err(Error::store)?
  {
    tracing::info!(%principal, "password changed");
    Ok(())
  } else {
    Err(Error::InvalidInput("current password is incorrect".into()))
  }
}

/// Look a principal up by id, falling back to the user name.
pub async fn find_principal<C>(credentials: &C, key: &str) -> Result<Principal>
where
  C: CredentialStore,
{
  let id = PrincipalId::from(key);
  if let Some(principal) = credentials.get_principal(&id).await.map_err(Error::store)? {
    return Ok(principal);
  }
  credentials
    .find_by_username(key)
    .await
    .map_err(Error::store)?
    .ok_or(Error::PrincipalNotFound(id))
}
