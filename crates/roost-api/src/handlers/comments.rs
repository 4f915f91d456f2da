//! Handlers for `/api/posts/{id}/comments`.

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use roost_core::{
  post::Comment,
  posts,
  role::{ADMIN, LODGER},
  store::PostStore,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{AppState, Backend, auth::Authenticated, error::ApiError, handlers::PageParams};

/// `GET /api/posts/{id}/comments`: anonymous, oldest first.
pub async fn list<S>(
  State(state): State<AppState<S>>,
  Path(post_id): Path<Uuid>,
  Query(params): Query<PageParams>,
) -> Result<Json<Vec<Comment>>, ApiError>
where
  S: Backend,
{
  let page = params.to_page()?;
  let store = state.store.as_ref();
  if store
    .get_post(post_id)
    .await
    .map_err(|e| ApiError::Internal(Box::new(e)))?
    .is_none()
  {
    return Err(ApiError::NotFound(format!("post not found: {post_id}")));
  }
  let comments = store
    .list_comments(post_id, page)
    .await
    .map_err(|e| ApiError::Internal(Box::new(e)))?;
  Ok(Json(comments))
}

#[derive(Debug, Deserialize)]
pub struct CommentBody {
  pub content: String,
}

/// `POST /api/posts/{id}/comments`
pub async fn create<S>(
  State(state): State<AppState<S>>,
  caller: Authenticated,
  Path(post_id): Path<Uuid>,
  Json(body): Json<CommentBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: Backend,
{
  let claims = caller.require(&[LODGER])?;
  let comment = posts::add_comment(state.store.as_ref(), claims, post_id, body.content).await?;
  Ok((StatusCode::CREATED, Json(comment)))
}

/// `DELETE /api/posts/{id}/comments/{comment_id}`: the author, or `Admin`.
pub async fn remove<S>(
  State(state): State<AppState<S>>,
  caller: Authenticated,
  Path((post_id, comment_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ApiError>
where
  S: Backend,
{
  let claims = caller.require(&[LODGER, ADMIN])?;
  posts::delete_comment(state.store.as_ref(), claims, post_id, comment_id).await?;
  Ok(StatusCode::NO_CONTENT)
}
