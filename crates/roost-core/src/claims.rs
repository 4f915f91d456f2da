//! The verified claim set carried by a bearer token.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{principal::PrincipalId, role::RoleName};

/// Decoded and verified token content.
///
/// Produced only by the token verifier; the authorization guard consumes it.
/// Roles reflect the principal's assignment at issue time, not now.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
  pub subject:    PrincipalId,
  /// User name of the subject, when the issuer embedded one.
  pub name:       Option<String>,
  pub roles:      Vec<RoleName>,
  pub issuer:     String,
  pub audience:   String,
  pub issued_at:  DateTime<Utc>,
  pub expires_at: DateTime<Utc>,
}

impl Claims {
  pub fn has_role(&self, role: &str) -> bool {
    self.roles.iter().any(|r| r.as_str() == role)
  }

  pub fn has_any_role(&self, one_of: &[&str]) -> bool {
    one_of.iter().any(|role| self.has_role(role))
  }

  pub fn is_subject(&self, principal: &PrincipalId) -> bool {
    &self.subject == principal
  }
}
