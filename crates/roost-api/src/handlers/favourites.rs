//! Handlers for `/api/favourites`. All require `Lodger`.

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
};
use roost_core::{post::Post, posts, role::LODGER, store::PostStore};
use serde::Deserialize;
use uuid::Uuid;

use crate::{AppState, Backend, auth::Authenticated, error::ApiError, handlers::PageParams};

/// `GET /api/favourites`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  caller: Authenticated,
  Query(params): Query<PageParams>,
) -> Result<Json<Vec<Post>>, ApiError>
where
  S: Backend,
{
  let claims = caller.require(&[LODGER])?;
  let page = params.to_page()?;
  let posts = state
    .store
    .favourites(&claims.subject, page)
    .await
    .map_err(|e| ApiError::Internal(Box::new(e)))?;
  Ok(Json(posts))
}

#[derive(Debug, Deserialize)]
pub struct FavouriteBody {
  pub post_id: Uuid,
}

/// `POST /api/favourites`: idempotent.
pub async fn add<S>(
  State(state): State<AppState<S>>,
  caller: Authenticated,
  Json(body): Json<FavouriteBody>,
) -> Result<StatusCode, ApiError>
where
  S: Backend,
{
  let claims = caller.require(&[LODGER])?;
  posts::add_favourite(state.store.as_ref(), claims, body.post_id).await?;
  Ok(StatusCode::NO_CONTENT)
}

/// `DELETE /api/favourites/{post_id}`
pub async fn remove<S>(
  State(state): State<AppState<S>>,
  caller: Authenticated,
  Path(post_id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: Backend,
{
  let claims = caller.require(&[LODGER])?;
  posts::remove_favourite(state.store.as_ref(), claims, post_id).await?;
  Ok(StatusCode::NO_CONTENT)
}
