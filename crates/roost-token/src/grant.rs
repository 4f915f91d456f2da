//! The resource-owner password grant: credentials in, bearer token out.

use chrono::{DateTime, SubsecRound as _, Utc};
use roost_core::{
  principal::Principal,
  role::RoleName,
  store::{CredentialStore, RoleStore},
};
use serde::Serialize;
use thiserror::Error;

use crate::{TokenError, TokenIssuer};

/// Successful grant body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GrantResponse {
  pub access_token: String,
  pub token_type:   String,
  /// Token lifetime in seconds, as a string.
  pub expires_in:   String,
}

#[derive(Debug, Error)]
pub enum GrantError {
  /// Unknown user name or wrong password. Deliberately indistinguishable.
  #[error("The user name or password is incorrect.")]
  InvalidGrant,

  #[error(transparent)]
  Token(#[from] TokenError),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl GrantError {
  fn store<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(e))
  }
}

/// Authenticate `username`/`password` and issue a token carrying the
/// principal's current roles.
pub async fn grant<C, R>(
  credentials: &C,
  registry: &R,
  issuer: &TokenIssuer,
  username: &str,
  password: &str,
  now: DateTime<Utc>,
) -> Result<GrantResponse, GrantError>
where
  C: CredentialStore,
  R: RoleStore,
{
  let Some(principal) = credentials
    .authenticate(username, password)
    .await
    .map_err(GrantError::store)?
  else {
    tracing::info!(%username, "password grant rejected");
    return Err(GrantError::InvalidGrant);
  };

  // The principal can vanish between authentication and the role read.
  let roles = registry
    .load_roles(&principal.principal_id)
    .await
    .map_err(GrantError::store)?
    .ok_or(GrantError::InvalidGrant)?;

  let response = respond(issuer, &principal, &roles, now)?;
  tracing::info!(sub = %principal.principal_id, "password grant issued");
  Ok(response)
}

/// Mint a token for an already-known principal, using the roles it carries.
/// Used right after registration.
pub fn local_access_token(
  issuer: &TokenIssuer,
  principal: &Principal,
  now: DateTime<Utc>,
) -> Result<GrantResponse, TokenError> {
  let roles: Vec<RoleName> = principal.roles.iter().cloned().collect();
  respond(issuer, principal, &roles, now)
}

fn respond(
  issuer: &TokenIssuer,
  principal: &Principal,
  roles: &[RoleName],
  now: DateTime<Utc>,
) -> Result<GrantResponse, TokenError> {
  // `iat` is whole seconds; align `now` so `expires_in` is exact.
  let now = now.trunc_subsecs(0);
  let validity = issuer.validity();
  let access_token = issuer.issue(
    &principal.principal_id,
    Some(&principal.username),
    roles,
    now,
    validity,
  )?;
  Ok(GrantResponse {
    access_token,
    token_type: "bearer".to_owned(),
    expires_in: validity.num_seconds().to_string(),
  })
}
