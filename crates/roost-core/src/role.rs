//! Roles and role names.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Full administrative access; also the elevated role for ownership checks.
pub const ADMIN: &str = "Admin";
/// Publishes and maintains posts.
pub const LANDLORD: &str = "Landlord";
/// Rates, comments on and bookmarks posts.
pub const LODGER: &str = "Lodger";

/// A role name. Matching is exact and case-sensitive.
#[derive(
  Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct RoleName(String);

impl RoleName {
  pub fn new(name: impl Into<String>) -> Self { Self(name.into()) }

  pub fn as_str(&self) -> &str { &self.0 }
}

impl std::fmt::Display for RoleName {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(&self.0)
  }
}

impl From<&str> for RoleName {
  fn from(value: &str) -> Self { Self(value.to_owned()) }
}

impl From<String> for RoleName {
  fn from(value: String) -> Self { Self(value) }
}

impl PartialEq<str> for RoleName {
  fn eq(&self, other: &str) -> bool { self.0 == other }
}

impl PartialEq<&str> for RoleName {
  fn eq(&self, other: &&str) -> bool { self.0 == *other }
}

/// A registry entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
  pub role_id: Uuid,
  pub name:    RoleName,
}

/// Outcome of [`RoleStore::replace_roles`](crate::store::RoleStore::replace_roles).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleReplace {
  /// The role set now equals the requested one; carries the set it replaced.
  Replaced { previous: Vec<RoleName> },
  UnknownPrincipal,
  /// Nothing was changed because these names are not in the registry.
  Missing(Vec<RoleName>),
}
