//! Checking bearer tokens back into [`Claims`].

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{DateTime, Utc};
use roost_core::{claims::Claims, principal::PrincipalId, role::RoleName};

use crate::{
  Result, TokenError,
  key::SigningKey,
  wire::{Header, Payload},
};

#[derive(Debug, Clone)]
pub struct TokenVerifier {
  key:      SigningKey,
  issuer:   String,
  audience: String,
}

impl TokenVerifier {
  pub fn new(key: SigningKey, issuer: impl Into<String>, audience: impl Into<String>) -> Self {
    Self {
      key,
      issuer: issuer.into(),
      audience: audience.into(),
    }
  }

  /// Verify `token` as of `now`.
  ///
  /// The signature is checked before anything in the payload is read. A
  /// token is valid while `now < exp`.
  pub fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<Claims> {
    let mut parts = token.split('.');
    let (Some(header_b64), Some(payload_b64), Some(signature_b64), None) =
      (parts.next(), parts.next(), parts.next(), parts.next())
    else {
      return Err(TokenError::Malformed("expected three segments"));
    };

    let header: Header = URL_SAFE_NO_PAD
      .decode(header_b64)
      .ok()
      .and_then(|raw| serde_json::from_slice(&raw).ok())
      .ok_or(TokenError::SignatureInvalid)?;
    if header.alg != self.key.algorithm().as_str() {
      tracing::debug!(alg = %header.alg, "token algorithm rejected");
      return Err(TokenError::SignatureInvalid);
    }

    let signature = URL_SAFE_NO_PAD
      .decode(signature_b64)
      .map_err(|_| TokenError::SignatureInvalid)?;
    let signing_input = &token[..header_b64.len() + 1 + payload_b64.len()];
    if !self.key.verify(signing_input.as_bytes(), &signature)? {
      return Err(TokenError::SignatureInvalid);
    }

    let payload: Payload = URL_SAFE_NO_PAD
      .decode(payload_b64)
      .ok()
      .and_then(|raw| serde_json::from_slice(&raw).ok())
      .ok_or(TokenError::Malformed("payload is not a claim set"))?;

    if now.timestamp() >= payload.exp {
      return Err(TokenError::TokenExpired);
    }
    if payload.iss != self.issuer {
      return Err(TokenError::IssuerMismatch);
    }
    if payload.aud != self.audience {
      return Err(TokenError::AudienceMismatch);
    }

    let issued_at = DateTime::from_timestamp(payload.iat, 0)
      .ok_or(TokenError::Malformed("iat out of range"))?;
    let expires_at = DateTime::from_timestamp(payload.exp, 0)
      .ok_or(TokenError::Malformed("exp out of range"))?;

    Ok(Claims {
      subject: PrincipalId::new(payload.sub),
      name: payload.unique_name,
      roles: payload
        .role
        .map(|r| r.into_vec().into_iter().map(RoleName::new).collect())
        .unwrap_or_default(),
      issuer: payload.iss,
      audience: payload.aud,
      issued_at,
      expires_at,
    })
  }
}
