//! Principals: the accounts tokens are issued to.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result, role::RoleName};

/// Password length bounds, in characters, for registration and password
/// change.
pub const MIN_PASSWORD_LEN: usize = 6;
pub const MAX_PASSWORD_LEN: usize = 100;

/// Opaque principal identifier. Carried verbatim as the token `sub` claim.
#[derive(
  Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PrincipalId(String);

impl PrincipalId {
  pub fn new(id: impl Into<String>) -> Self { Self(id.into()) }

  /// A fresh identifier for a newly registered principal.
  pub fn generate() -> Self { Self(Uuid::new_v4().hyphenated().to_string()) }

  pub fn as_str(&self) -> &str { &self.0 }

  pub fn is_empty(&self) -> bool { self.0.is_empty() }
}

impl std::fmt::Display for PrincipalId {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(&self.0)
  }
}

impl From<&str> for PrincipalId {
  fn from(value: &str) -> Self { Self(value.to_owned()) }
}

impl From<String> for PrincipalId {
  fn from(value: String) -> Self { Self(value) }
}

/// An account together with its currently assigned roles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Principal {
  pub principal_id: PrincipalId,
  pub username:     String,
  pub email:        String,
  pub first_name:   String,
  pub last_name:    String,
  pub phone:        Option<String>,
  pub roles:        BTreeSet<RoleName>,
  pub created_at:   DateTime<Utc>,
}

/// Profile fields supplied at registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPrincipal {
  pub username:   String,
  pub email:      String,
  pub first_name: String,
  pub last_name:  String,
  #[serde(default)]
  pub phone:      Option<String>,
}

impl NewPrincipal {
  pub fn validate(&self) -> Result<()> {
    if self.username.trim().is_empty() {
      return Err(Error::InvalidInput("username is required".into()));
    }
    if !self.email.contains('@') {
      return Err(Error::InvalidInput("email address is invalid".into()));
    }
    if self.first_name.trim().is_empty() || self.last_name.trim().is_empty() {
      return Err(Error::InvalidInput("first and last name are required".into()));
    }
    Ok(())
  }
}

/// Check a candidate password against the registration policy.
pub fn check_password(password: &str) -> Result<()> {
  if password.chars().count() < MIN_PASSWORD_LEN {
    return Err(Error::InvalidInput(format!(
      "password must be at least {MIN_PASSWORD_LEN} characters long"
    )));
  }
  if password.chars().count() > MAX_PASSWORD_LEN {
    return Err(Error::InvalidInput(format!(
      "password must be at most {MAX_PASSWORD_LEN} characters long"
    )));
  }
  Ok(())
}

/// Outcome of [`CredentialStore::register`](crate::store::CredentialStore::register).
#[derive(Debug, Clone)]
pub enum Registration {
  Created(Principal),
  UsernameTaken,
  /// Some requested roles were missing when the registration transaction ran.
  MissingRoles(Vec<RoleName>),
}
