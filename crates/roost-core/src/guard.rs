//! Authorization guard: role and ownership predicates over a verified claim
//! set.
//!
//! Both checks are pure. Callers must evaluate them before handing a mutation
//! to a store and must not proceed on `Err`.

use thiserror::Error;

use crate::{claims::Claims, principal::PrincipalId};

/// Negative guard result.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("forbidden")]
pub struct Forbidden;

/// Pass if the caller holds at least one of `one_of`.
pub fn require_role(claims: &Claims, one_of: &[&str]) -> Result<(), Forbidden> {
  if claims.has_any_role(one_of) {
    return Ok(());
  }
  tracing::warn!(
    subject = %claims.subject,
    required = ?one_of,
    "role check denied"
  );
  Err(Forbidden)
}

/// Pass if the caller is `owner` or holds one of `elevated`.
pub fn require_owner_or_role(
  claims: &Claims,
  owner: &PrincipalId,
  elevated: &[&str],
) -> Result<(), Forbidden> {
  if claims.is_subject(owner) || claims.has_any_role(elevated) {
    return Ok(());
  }
  tracing::warn!(
    subject = %claims.subject,
    %owner,
    "ownership check denied"
  );
  Err(Forbidden)
}

#[cfg(test)]
mod tests {
  use chrono::{Duration, Utc};

  use super::*;
  use crate::role::{ADMIN, LANDLORD, LODGER, RoleName};

  fn claims(subject: &str, roles: &[&str]) -> Claims {
    let now = Utc::now();
    Claims {
      subject:    PrincipalId::from(subject),
      name:       None,
      roles:      roles.iter().copied().map(RoleName::from).collect(),
      issuer:     "roost".into(),
      audience:   "roost-clients".into(),
      issued_at:  now,
      expires_at: now + Duration::hours(24),
    }
  }

  #[test]
  fn require_role_passes_on_intersection() {
    let c = claims("a", &[LODGER, LANDLORD]);
    assert!(require_role(&c, &[LANDLORD]).is_ok());
    assert!(require_role(&c, &[ADMIN, LODGER]).is_ok());
  }

  #[test]
  fn require_role_fails_without_intersection() {
    let c = claims("a", &[LODGER]);
    assert_eq!(require_role(&c, &[LANDLORD]), Err(Forbidden));
  }

  #[test]
  fn require_role_is_case_sensitive() {
    let c = claims("a", &["admin"]);
    assert_eq!(require_role(&c, &[ADMIN]), Err(Forbidden));
  }

  #[test]
  fn require_role_with_no_roles_fails() {
    let c = claims("a", &[]);
    assert_eq!(require_role(&c, &[LODGER]), Err(Forbidden));
    assert_eq!(require_role(&c, &[]), Err(Forbidden));
  }

  #[test]
  fn owner_passes() {
    let c = claims("user-a", &[LODGER]);
    let owner = PrincipalId::from("user-a");
    assert!(require_owner_or_role(&c, &owner, &[ADMIN]).is_ok());
  }

  #[test]
  fn non_owner_without_elevated_role_is_forbidden() {
    let c = claims("user-a", &[LODGER]);
    let owner = PrincipalId::from("user-b");
    assert_eq!(require_owner_or_role(&c, &owner, &[ADMIN]), Err(Forbidden));
  }

  #[test]
  fn non_owner_with_elevated_role_passes() {
    let c = claims("user-a", &[LODGER, ADMIN]);
    let owner = PrincipalId::from("user-b");
    assert!(require_owner_or_role(&c, &owner, &[ADMIN]).is_ok());
  }
}
