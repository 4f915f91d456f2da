//! Error types for the roost-token codec.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TokenError {
  #[error("signing key is not configured: {0}")]
  Configuration(String),

  #[error("invalid token request: {0}")]
  InvalidInput(String),

  #[error("malformed token: {0}")]
  Malformed(&'static str),

  #[error("token signature is invalid")]
  SignatureInvalid,

  #[error("token has expired")]
  TokenExpired,

  #[error("token issuer does not match")]
  IssuerMismatch,

  #[error("token audience does not match")]
  AudienceMismatch,

  #[error("token serialization failed: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = TokenError> = std::result::Result<T, E>;
