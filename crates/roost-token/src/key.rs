//! Symmetric signing keys.
//!
//! A key is always injected into the issuer and verifier; there is no
//! process-wide secret. Verification compares MACs in constant time through
//! [`Mac::verify_slice`].

use base64::{
  Engine as _,
  alphabet,
  engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
};
use hmac::{Hmac, Mac, digest::KeyInit};
use serde::{Deserialize, Serialize};
use sha2::{Sha256, Sha384, Sha512};

use crate::{Result, TokenError};

/// Accepts configured secrets with or without `=` padding.
const SECRET_B64: GeneralPurpose = GeneralPurpose::new(
  &alphabet::URL_SAFE,
  GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// HMAC variant named in the token header's `alg` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Algorithm {
  #[default]
  HS256,
  HS384,
  HS512,
}

impl Algorithm {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::HS256 => "HS256",
      Self::HS384 => "HS384",
      Self::HS512 => "HS512",
    }
  }
}

/// A shared secret plus the algorithm it signs with.
#[derive(Clone)]
pub struct SigningKey {
  algorithm: Algorithm,
  secret:    Vec<u8>,
}

impl std::fmt::Debug for SigningKey {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("SigningKey")
      .field("algorithm", &self.algorithm)
      .field("secret", &"<redacted>")
      .finish()
  }
}

impl SigningKey {
  /// Build a key from raw secret bytes. An empty secret is a configuration
  /// error.
  pub fn new(algorithm: Algorithm, secret: impl Into<Vec<u8>>) -> Result<Self> {
    let secret = secret.into();
    if secret.is_empty() {
      return Err(TokenError::Configuration("signing secret is empty".into()));
    }
    Ok(Self { algorithm, secret })
  }

  /// Build a key from a base64url-encoded secret, the form used in
  /// configuration files.
  pub fn from_base64url(algorithm: Algorithm, encoded: &str) -> Result<Self> {
    let secret = SECRET_B64.decode(encoded.trim()).map_err(|e| {
      TokenError::Configuration(format!("signing secret is not base64url: {e}"))
    })?;
    Self::new(algorithm, secret)
  }

  pub fn algorithm(&self) -> Algorithm { self.algorithm }

  pub(crate) fn sign(&self, message: &[u8]) -> Result<Vec<u8>> {
    match self.algorithm {
      Algorithm::HS256 => sign_with::<Hmac<Sha256>>(&self.secret, message),
      Algorithm::HS384 => sign_with::<Hmac<Sha384>>(&self.secret, message),
      Algorithm::HS512 => sign_with::<Hmac<Sha512>>(&self.secret, message),
    }
  }

  /// Constant-time check of `signature` over `message`.
  pub(crate) fn verify(&self, message: &[u8], signature: &[u8]) -> Result<bool> {
    match self.algorithm {
      Algorithm::HS256 => verify_with::<Hmac<Sha256>>(&self.secret, message, signature),
      Algorithm::HS384 => verify_with::<Hmac<Sha384>>(&self.secret, message, signature),
      Algorithm::HS512 => verify_with::<Hmac<Sha512>>(&self.secret, message, signature),
    }
  }
}

fn keyed<M: Mac + KeyInit>(secret: &[u8], message: &[u8]) -> Result<M> {
  let mut mac = <M as KeyInit>::new_from_slice(secret)
    .map_err(|e| TokenError::Configuration(e.to_string()))?;
  mac.update(message);
  Ok(mac)
}

fn sign_with<M: Mac + KeyInit>(secret: &[u8], message: &[u8]) -> Result<Vec<u8>> {
  Ok(keyed::<M>(secret, message)?.finalize().into_bytes().to_vec())
}

fn verify_with<M: Mac + KeyInit>(
  secret: &[u8],
  message: &[u8],
  signature: &[u8],
) -> Result<bool> {
  Ok(keyed::<M>(secret, message)?.verify_slice(signature).is_ok())
}
