//! Handlers for `/api/roles` endpoints. All require `Admin`.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`    | `/api/roles` | |
//! | `POST`   | `/api/roles` | Body: `{"name":"Moderator"}`; 409 if taken |
//! | `GET`    | `/api/roles/{id}` | 404 if not found |
//! | `DELETE` | `/api/roles/{id}` | Holders keep the role |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use roost_core::{
  role::{ADMIN, Role},
  roles,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{AppState, Backend, auth::Authenticated, error::ApiError};

/// `GET /api/roles`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  caller: Authenticated,
) -> Result<Json<Vec<Role>>, ApiError>
where
  S: Backend,
{
  caller.require(&[ADMIN])?;
  Ok(Json(roles::list_roles(state.store.as_ref()).await?))
}

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub name: String,
}

/// `POST /api/roles`
pub async fn create<S>(
  State(state): State<AppState<S>>,
  caller: Authenticated,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: Backend,
{
  caller.require(&[ADMIN])?;
  let role = roles::create_role(state.store.as_ref(), &body.name).await?;
  Ok((StatusCode::CREATED, Json(role)))
}

/// `GET /api/roles/{id}`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  caller: Authenticated,
  Path(id): Path<Uuid>,
) -> Result<Json<Role>, ApiError>
where
  S: Backend,
{
  caller.require(&[ADMIN])?;
  Ok(Json(roles::get_role(state.store.as_ref(), id).await?))
}

/// `DELETE /api/roles/{id}`
pub async fn remove<S>(
  State(state): State<AppState<S>>,
  caller: Authenticated,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: Backend,
{
  caller.require(&[ADMIN])?;
  roles::delete_role(state.store.as_ref(), id).await?;
  Ok(StatusCode::NO_CONTENT)
}
