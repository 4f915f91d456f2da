//! Bearer-token extractor.

use axum::{
  extract::FromRequestParts,
  http::{HeaderMap, header, request::Parts},
};
use chrono::Utc;
use roost_core::{claims::Claims, guard::require_role};

use crate::{AppState, Backend, error::ApiError};

/// The verified claims of the caller. Present in a handler means the request
/// carried a valid token.
#[derive(Debug, Clone)]
pub struct Authenticated(pub Claims);

impl Authenticated {
  /// Claims of a caller holding at least one of `one_of`.
  pub fn require(&self, one_of: &[&str]) -> Result<&Claims, ApiError> {
    require_role(&self.0, one_of)?;
    Ok(&self.0)
  }
}

/// The token from an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
  let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
  let (scheme, token) = value.split_once(' ')?;
  let token = token.trim();
  (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

impl<S> FromRequestParts<AppState<S>> for Authenticated
where
  S: Backend,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    let token = bearer_token(&parts.headers).ok_or(ApiError::Unauthenticated)?;
    match state.verifier.verify(token, Utc::now()) {
      Ok(claims) => Ok(Authenticated(claims)),
      Err(e) => {
        tracing::warn!(error = %e, "bearer token rejected");
        Err(ApiError::Unauthenticated)
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use axum::http::HeaderValue;

  use super::*;

  fn headers(value: &str) -> HeaderMap {
    let mut map = HeaderMap::new();
    map.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
    map
  }

  #[test]
  fn extracts_bearer_token() {
    assert_eq!(bearer_token(&headers("Bearer abc.def.ghi")), Some("abc.def.ghi"));
    assert_eq!(bearer_token(&headers("bearer abc")), Some("abc"));
  }

  #[test]
  fn rejects_other_schemes() {
    assert_eq!(bearer_token(&headers("Basic dXNlcjpwdw==")), None);
    assert_eq!(bearer_token(&headers("Bearer ")), None);
    assert_eq!(bearer_token(&headers("Bearer")), None);
    assert_eq!(bearer_token(&HeaderMap::new()), None);
  }
}
