//! `POST /oauth/token`: the resource-owner password grant.
//!
//! Form-encoded body: `grant_type=password&username=…&password=…`.

use axum::{
  Form, Json,
  extract::State,
};
use chrono::Utc;
use roost_token::{GrantResponse, grant};
use serde::Deserialize;

use crate::{AppState, Backend, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct TokenRequest {
  pub grant_type: String,
  pub username:   Option<String>,
  pub password:   Option<String>,
}

pub async fn issue<S>(
  State(state): State<AppState<S>>,
  Form(request): Form<TokenRequest>,
) -> Result<Json<GrantResponse>, ApiError>
where
  S: Backend,
{
  if request.grant_type != "password" {
    return Err(ApiError::unsupported_grant_type());
  }
  let (Some(username), Some(password)) = (request.username, request.password) else {
    return Err(ApiError::invalid_grant());
  };

  let response = grant(
    state.store.as_ref(),
    state.store.as_ref(),
    &state.issuer,
    &username,
    &password,
    Utc::now(),
  )
  .await?;
  Ok(Json(response))
}
