//! Argon2 password hashing.

use std::sync::OnceLock;

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString,
};
use rand_core::OsRng;

use crate::{Error, Result};

/// Hash `password` into a PHC string with a fresh random salt.
pub fn hash_password(password: &str) -> Result<String> {
  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map(|hash| hash.to_string())
    .map_err(|e| Error::PasswordHash(e.to_string()))
}

pub fn verify_password(password: &str, phc: &str) -> Result<bool> {
  let parsed = PasswordHash::new(phc).map_err(|e| Error::PasswordHash(e.to_string()))?;
  Ok(
    Argon2::default()
      .verify_password(password.as_bytes(), &parsed)
      .is_ok(),
  )
}

/// Spend the same work as a real verification when the user name is unknown,
/// so response time does not reveal which accounts exist.
pub fn verify_against_dummy(password: &str) {
  static DUMMY: OnceLock<Option<String>> = OnceLock::new();
  if let Some(phc) = DUMMY.get_or_init(|| hash_password("roost-dummy-password").ok()) {
    let _ = verify_password(password, phc);
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn hash_then_verify() {
    let phc = hash_password("secret1").unwrap();
    assert!(phc.starts_with("$argon2"));
    assert!(verify_password("secret1", &phc).unwrap());
    assert!(!verify_password("secret2", &phc).unwrap());
  }

  #[test]
  fn garbage_hash_is_an_error() {
    assert!(verify_password("secret1", "not-a-phc-string").is_err());
  }
}
