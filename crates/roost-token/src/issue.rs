//! Minting signed bearer tokens.

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{DateTime, Duration, Utc};
use roost_core::{principal::PrincipalId, role::RoleName};

use crate::{
  Result, TokenError, TokenVerifier,
  key::SigningKey,
  wire::{Header, OneOrMany, Payload},
};

/// Issues tokens for one issuer/audience pair with an injected key.
///
/// Holds no mutable state and can be shared behind an `Arc` across request
/// handlers.
#[derive(Debug, Clone)]
pub struct TokenIssuer {
  key:      SigningKey,
  issuer:   String,
  audience: String,
  validity: Duration,
}

impl TokenIssuer {
  /// `validity` is the lifetime given to tokens minted through the grant
  /// flow. It must be at least one second.
  pub fn new(
    key: SigningKey,
    issuer: impl Into<String>,
    audience: impl Into<String>,
    validity: Duration,
  ) -> Result<Self> {
    check_validity(validity)?;
    Ok(Self {
      key,
      issuer: issuer.into(),
      audience: audience.into(),
      validity,
    })
  }

  pub fn validity(&self) -> Duration { self.validity }

  pub fn issuer(&self) -> &str { &self.issuer }

  pub fn audience(&self) -> &str { &self.audience }

  /// A verifier expecting this issuer's key, issuer and audience.
  pub fn verifier(&self) -> TokenVerifier {
    TokenVerifier::new(self.key.clone(), self.issuer.clone(), self.audience.clone())
  }

  /// Sign a token for `principal_id` carrying `roles`.
  ///
  /// `issued_at` is truncated to whole seconds and the token expires at
  /// `issued_at + validity`. Duplicate role names are written once.
  ///
  /// The effective lifetime measured from a sub-second `issued_at` is
  /// `validity` minus that fraction: a token issued at `12:00:00.750` with a
  /// ten second validity expires at `12:00:10`. Callers that report the
  /// lifetime to clients should pass a whole-second `issued_at`.
  pub fn issue(
    &self,
    principal_id: &PrincipalId,
    name: Option<&str>,
    roles: &[RoleName],
    issued_at: DateTime<Utc>,
    validity: Duration,
  ) -> Result<String> {
    if principal_id.is_empty() {
      return Err(TokenError::InvalidInput("principal id is empty".into()));
    }
    check_validity(validity)?;

    let iat = issued_at.timestamp();
    let exp = iat
      .checked_add(validity.num_seconds())
      .ok_or_else(|| TokenError::InvalidInput("validity overflows".into()))?;

    let mut role_names: Vec<String> = Vec::with_capacity(roles.len());
    for role in roles {
      if !role_names.iter().any(|r| r == role.as_str()) {
        role_names.push(role.as_str().to_owned());
      }
    }

    let header = Header {
      alg: self.key.algorithm().as_str().to_owned(),
      typ: Some("JWT".to_owned()),
    };
    let payload = Payload {
      sub: principal_id.as_str().to_owned(),
      unique_name: name.map(str::to_owned),
      role: OneOrMany::from_roles(role_names),
      iss: self.issuer.clone(),
      aud: self.audience.clone(),
      iat,
      exp,
    };

    let mut token = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&header)?);
    token.push('.');
    token.push_str(&URL_SAFE_NO_PAD.encode(serde_json::to_vec(&payload)?));
    let signature = self.key.sign(token.as_bytes())?;
    token.push('.');
    token.push_str(&URL_SAFE_NO_PAD.encode(signature));

    tracing::debug!(sub = %principal_id, exp, "token issued");
    Ok(token)
  }
}

fn check_validity(validity: Duration) -> Result<()> {
  if validity.num_seconds() < 1 {
    return Err(TokenError::InvalidInput(
      "validity must be at least one second".into(),
    ));
  }
  Ok(())
}
