//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::{HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use roost_core::{Error as CoreError, guard::Forbidden};
use roost_token::GrantError;
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  /// Missing, malformed, forged or expired bearer token. The cause is logged,
  /// never returned.
  #[error("unauthenticated")]
  Unauthenticated,

  #[error("forbidden")]
  Forbidden,

  /// An OAuth 2.0 token-endpoint error (RFC 6749 §5.2).
  #[error("{error}: {description}")]
  OAuth {
    error:       &'static str,
    description: String,
  },

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("not found: {0}")]
  NotFound(String),

  #[error("conflict: {0}")]
  Conflict(String),

  #[error("internal error: {0}")]
  Internal(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  pub fn invalid_grant() -> Self {
    Self::OAuth {
      error:       "invalid_grant",
      description: GrantError::InvalidGrant.to_string(),
    }
  }

  pub fn unsupported_grant_type() -> Self {
    Self::OAuth {
      error:       "unsupported_grant_type",
      description: "Only the password grant is supported.".to_owned(),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, body) = match &self {
      ApiError::Unauthenticated => {
        let mut res = (
          StatusCode::UNAUTHORIZED,
          Json(json!({ "error": "unauthenticated" })),
        )
          .into_response();
        res
          .headers_mut()
          .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        return res;
      }
      ApiError::Forbidden => (StatusCode::FORBIDDEN, json!({ "error": "forbidden" })),
      ApiError::OAuth { error, description } => (
        StatusCode::BAD_REQUEST,
        json!({ "error": error, "error_description": description }),
      ),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, json!({ "error": m })),
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, json!({ "error": m })),
      ApiError::Conflict(m) => (StatusCode::CONFLICT, json!({ "error": m })),
      ApiError::Internal(e) => {
        tracing::error!(error = %e, "request failed");
        (
          StatusCode::INTERNAL_SERVER_ERROR,
          json!({ "error": "internal server error" }),
        )
      }
    };
    (status, Json(body)).into_response()
  }
}

impl From<Forbidden> for ApiError {
  fn from(_: Forbidden) -> Self { Self::Forbidden }
}

impl From<CoreError> for ApiError {
  fn from(e: CoreError) -> Self {
    match e {
      CoreError::Forbidden => Self::Forbidden,
      CoreError::UnknownRoles(_)
      | CoreError::OutOfRange { .. }
      | CoreError::InvalidInput(_) => Self::BadRequest(e.to_string()),
      CoreError::DuplicateRole(_) | CoreError::UsernameTaken(_) => {
        Self::Conflict(e.to_string())
      }
      CoreError::RoleNotFound(_)
      | CoreError::PrincipalNotFound(_)
      | CoreError::PostNotFound(_)
      | CoreError::CommentNotFound(_)
      | CoreError::FavouriteNotFound(_) => Self::NotFound(e.to_string()),
      CoreError::Store(inner) => Self::Internal(inner),
    }
  }
}

impl From<GrantError> for ApiError {
  fn from(e: GrantError) -> Self {
    match e {
      GrantError::InvalidGrant => Self::invalid_grant(),
      GrantError::Token(e) => Self::Internal(Box::new(e)),
      GrantError::Store(e) => Self::Internal(e),
    }
  }
}

impl From<roost_token::TokenError> for ApiError {
  fn from(e: roost_token::TokenError) -> Self { Self::Internal(Box::new(e)) }
}
