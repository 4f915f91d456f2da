//! Handlers for `/api/users` endpoints.
//!
//! | Method | Path | Gate |
//! |--------|------|------|
//! | `POST` | `/api/users` | anonymous; returns the account and a token |
//! | `GET`  | `/api/users` | `Admin` |
//! | `GET`  | `/api/users/{id}` | `Admin`; id or user name |
//! | `PUT`  | `/api/users/{id}/roles` | `Admin`; body `{"roles":[…]}` |
//! | `POST` | `/api/users/passwords` | any authenticated caller |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::Utc;
use roost_core::{
  accounts,
  principal::{NewPrincipal, Principal, PrincipalId},
  role::{ADMIN, RoleName},
  roles::assign_roles,
  store::CredentialStore,
};
use roost_token::{GrantResponse, local_access_token};
use serde::{Deserialize, Serialize};

use crate::{AppState, Backend, auth::Authenticated, error::ApiError};

// ─── Register ─────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RegisterBody {
  #[serde(flatten)]
  pub profile:  NewPrincipal,
  pub password: String,
  pub roles:    Vec<RoleName>,
}

#[derive(Debug, Serialize)]
pub struct Registered {
  pub user:  Principal,
  pub token: GrantResponse,
}

/// `POST /api/users`
pub async fn register<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<RegisterBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: Backend,
{
  let store = state.store.as_ref();
  let user =
    accounts::register_principal(store, store, body.profile, &body.password, body.roles)
      .await?;
  let token = local_access_token(&state.issuer, &user, Utc::now())?;
  Ok((StatusCode::CREATED, Json(Registered { user, token })))
}

// ─── Administration ───────────────────────────────────────────────────────────

/// `GET /api/users`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  caller: Authenticated,
) -> Result<Json<Vec<Principal>>, ApiError>
where
  S: Backend,
{
  caller.require(&[ADMIN])?;
  let users = state
    .store
    .list_principals()
    .await
    .map_err(|e| ApiError::Internal(Box::new(e)))?;
  Ok(Json(users))
}

/// `GET /api/users/{id}`: `id` is a principal id or a user name.
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  caller: Authenticated,
  Path(id): Path<String>,
) -> Result<Json<Principal>, ApiError>
where
  S: Backend,
{
  caller.require(&[ADMIN])?;
  let user = accounts::find_principal(state.store.as_ref(), &id).await?;
  Ok(Json(user))
}

#[derive(Debug, Deserialize)]
pub struct AssignBody {
  pub roles: Vec<RoleName>,
}

/// `PUT /api/users/{id}/roles`
pub async fn assign<S>(
  State(state): State<AppState<S>>,
  caller: Authenticated,
  Path(id): Path<String>,
  Json(body): Json<AssignBody>,
) -> Result<StatusCode, ApiError>
where
  S: Backend,
{
  caller.require(&[ADMIN])?;
  assign_roles(state.store.as_ref(), &PrincipalId::from(id), body.roles).await?;
  Ok(StatusCode::NO_CONTENT)
}

// ─── Password change ──────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ChangePasswordBody {
  pub old_password: String,
  pub new_password: String,
}

/// `POST /api/users/passwords`
pub async fn change_password<S>(
  State(state): State<AppState<S>>,
  Authenticated(claims): Authenticated,
  Json(body): Json<ChangePasswordBody>,
) -> Result<StatusCode, ApiError>
where
  S: Backend,
{
  accounts::change_password(
    state.store.as_ref(),
    &claims.subject,
    &body.old_password,
    &body.new_password,
  )
  .await?;
  Ok(StatusCode::NO_CONTENT)
}
