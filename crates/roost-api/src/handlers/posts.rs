//! Handlers for `/api/posts` endpoints.
//!
//! | Method | Path | Gate |
//! |--------|------|------|
//! | `GET`    | `/api/posts` | anonymous, paged |
//! | `GET`    | `/api/posts/{id}` | anonymous |
//! | `GET`    | `/api/posts/own` | `Landlord`, paged |
//! | `POST`   | `/api/posts/own` | `Landlord` |
//! | `PUT`    | `/api/posts/{id}` | `Landlord` or `Admin`, then owner-or-`Admin` |
//! | `DELETE` | `/api/posts/{id}` | as `PUT` |
//! | `POST`   | `/api/posts/{id}/rates` | `Lodger`; body `{"value":7}` |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use roost_core::{
  post::{Post, PostInput},
  posts,
  rating::{RatingOutcome, apply_rating},
  role::{ADMIN, LANDLORD, LODGER},
  store::PostStore,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{AppState, Backend, auth::Authenticated, error::ApiError, handlers::PageParams};

/// `GET /api/posts`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  Query(params): Query<PageParams>,
) -> Result<Json<Vec<Post>>, ApiError>
where
  S: Backend,
{
  let page = params.to_page()?;
  let posts = state
    .store
    .list_posts(page)
    .await
    .map_err(|e| ApiError::Internal(Box::new(e)))?;
  Ok(Json(posts))
}

/// `GET /api/posts/{id}`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Post>, ApiError>
where
  S: Backend,
{
  let post = state
    .store
    .get_post(id)
    .await
    .map_err(|e| ApiError::Internal(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("post not found: {id}")))?;
  Ok(Json(post))
}

/// `GET /api/posts/own`
pub async fn list_own<S>(
  State(state): State<AppState<S>>,
  caller: Authenticated,
  Query(params): Query<PageParams>,
) -> Result<Json<Vec<Post>>, ApiError>
where
  S: Backend,
{
  let claims = caller.require(&[LANDLORD])?;
  let page = params.to_page()?;
  let posts = state
    .store
    .posts_by_owner(&claims.subject, page)
    .await
    .map_err(|e| ApiError::Internal(Box::new(e)))?;
  Ok(Json(posts))
}

/// `POST /api/posts/own`
pub async fn create<S>(
  State(state): State<AppState<S>>,
  caller: Authenticated,
  Json(input): Json<PostInput>,
) -> Result<impl IntoResponse, ApiError>
where
  S: Backend,
{
  let claims = caller.require(&[LANDLORD])?;
  let post = posts::create_post(state.store.as_ref(), claims, input).await?;
  Ok((StatusCode::CREATED, Json(post)))
}

/// `PUT /api/posts/{id}`
pub async fn update<S>(
  State(state): State<AppState<S>>,
  caller: Authenticated,
  Path(id): Path<Uuid>,
  Json(input): Json<PostInput>,
) -> Result<Json<Post>, ApiError>
where
  S: Backend,
{
  let claims = caller.require(&[LANDLORD, ADMIN])?;
  let post = posts::update_post(state.store.as_ref(), claims, id, input).await?;
  Ok(Json(post))
}

/// `DELETE /api/posts/{id}`
pub async fn remove<S>(
  State(state): State<AppState<S>>,
  caller: Authenticated,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: Backend,
{
  let claims = caller.require(&[LANDLORD, ADMIN])?;
  posts::delete_post(state.store.as_ref(), claims, id).await?;
  Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct RateBody {
  pub value: f64,
}

/// `POST /api/posts/{id}/rates`
pub async fn rate<S>(
  State(state): State<AppState<S>>,
  caller: Authenticated,
  Path(id): Path<Uuid>,
  Json(body): Json<RateBody>,
) -> Result<Json<RatingOutcome>, ApiError>
where
  S: Backend,
{
  caller.require(&[LODGER])?;
  let outcome = apply_rating(state.store.as_ref(), &state.rating, id, body.value).await?;
  Ok(Json(outcome))
}
