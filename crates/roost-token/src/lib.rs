//! Bearer token codec for Roost.
//!
//! Issues and verifies HMAC-signed compact tokens (JWS, `typ: JWT`) and runs
//! the password grant on top of the [`roost_core`] store traits. Time is
//! always passed in, so verification is deterministic.
//!
//! # Quick start
//!
//! ```no_run
//! use chrono::{Duration, Utc};
//! use roost_core::{principal::PrincipalId, role::RoleName};
//! use roost_token::{Algorithm, SigningKey, TokenIssuer};
//!
//! let key = SigningKey::new(Algorithm::HS256, b"secret".to_vec()).unwrap();
//! let issuer = TokenIssuer::new(key, "roost", "roost-api", Duration::hours(24)).unwrap();
//! let now = Utc::now();
//! let token = issuer
//!   .issue(&PrincipalId::from("p-1"), None, &[RoleName::from("Lodger")], now, issuer.validity())
//!   .unwrap();
//! let claims = issuer.verifier().verify(&token, now).unwrap();
//! assert!(claims.has_role("Lodger"));
//! ```

pub mod error;
pub mod grant;
mod issue;
mod key;
mod verify;
mod wire;

pub use error::{Result, TokenError};
pub use grant::{GrantError, GrantResponse, grant, local_access_token};
pub use issue::TokenIssuer;
pub use key::{Algorithm, SigningKey};
pub use verify::TokenVerifier;

#[cfg(test)]
mod tests;
