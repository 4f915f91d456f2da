//! JSON shapes of the token header and payload segments.

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct Header {
  pub alg: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub typ: Option<String>,
}

/// The `role` claim: a bare string for one role, an array for several.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub(crate) enum OneOrMany {
  One(String),
  Many(Vec<String>),
}

impl OneOrMany {
  pub fn from_roles(mut roles: Vec<String>) -> Option<Self> {
    match roles.len() {
      0 => None,
      1 => roles.pop().map(Self::One),
      _ => Some(Self::Many(roles)),
    }
  }

  pub fn into_vec(self) -> Vec<String> {
    match self {
      Self::One(role) => vec![role],
      Self::Many(roles) => roles,
    }
  }
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct Payload {
  pub sub:         String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub unique_name: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub role:        Option<OneOrMany>,
  pub iss:         String,
  pub aud:         String,
  pub iat:         i64,
  pub exp:         i64,
}
