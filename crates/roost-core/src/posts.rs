//! Ownership-scoped mutations of posts and comments.
//!
//! Each operation loads the resource, runs the ownership guard against the
//! caller's claims and only then writes. The owner of a resource never
//! changes, so the check stays valid for the write that follows it.

use uuid::Uuid;

use crate::{
  Error, Result,
  claims::Claims,
  guard::require_owner_or_role,
  post::{Comment, Post, PostInput},
  role::ADMIN,
  store::PostStore,
};

/// Roles allowed to modify resources they do not own.
pub const ELEVATED: &[&str] = &[ADMIN];

pub async fn create_post<S>(store: &S, claims: &Claims, input: PostInput) -> Result<Post>
where
  S: PostStore,
{
  input.validate()?;
  let post = store
    .create_post(claims.subject.clone(), input)
    .await
    .map_err(Error::store)?;
  tracing::info!(post_id = %post.post_id, owner = %post.owner, "post created");
  Ok(post)
}

async fn load_post<S>(store: &S, post_id: Uuid) -> Result<Post>
where
  S: PostStore,
{
  store
    .get_post(post_id)
    .await
    .map_err(Error::store)?
    .ok_or(Error::PostNotFound(post_id))
}

pub async fn update_post<S>(
  store: &S,
  claims: &Claims,
  post_id: Uuid,
  input: PostInput,
) -> Result<Post>
where
  S: PostStore,
{
  input.validate()?;
  let post = load_post(store, post_id).await?;
  require_owner_or_role(claims, &post.owner, ELEVATED)?;

  store
    .update_post(post_id, input)
    .await
    .map_err(Error::store)?
    .ok_or(Error::PostNotFound(post_id))
}

pub async fn delete_post<S>(store: &S, claims: &Claims, post_id: Uuid) -> Result<()>
where
  S: PostStore,
{
  let post = load_post(store, post_id).await?;
  require_owner_or_role(claims, &post.owner, ELEVATED)?;

  if !store.delete_post(post_id).await.map_err(Error::store)? {
    return Err(Error::PostNotFound(post_id));
  }
  tracing::info!(%post_id, by = %claims.subject, "post deleted");
  Ok(())
}

pub async fn add_comment<S>(
  store: &S,
  claims: &Claims,
  post_id: Uuid,
  content: String,
) -> Result<Comment>
where
  S: PostStore,
{
  if content.trim().is_empty() {
    return Err(Error::InvalidInput("comment content is required".into()));
  }
  store
    .create_comment(post_id, claims.subject.clone(), content)
    .await
    .map_err(Error::store)?
    .ok_or(Error::PostNotFound(post_id))
}

/// Delete a comment on `post_id`. A comment id that belongs to another post
/// is reported as not found.
pub async fn delete_comment<S>(
  store: &S,
  claims: &Claims,
  post_id: Uuid,
  comment_id: Uuid,
) -> Result<()>
where
  S: PostStore,
{
  let comment = store
    .get_comment(comment_id)
    .await
    .map_err(Error::store)?
    .filter(|c| c.post_id == post_id)
    .ok_or(Error::CommentNotFound(comment_id))?;
  require_owner_or_role(claims, &comment.owner, ELEVATED)?;

  if !store.delete_comment(comment_id).await.map_err(Error::store)? {
    return Err(Error::CommentNotFound(comment_id));
  }
  Ok(())
}

/// Bookmark a post for the caller. Adding an existing favourite is a no-op.
pub async fn add_favourite<S>(store: &S, claims: &Claims, post_id: Uuid) -> Result<()>
where
  S: PostStore,
{
  load_post(store, post_id).await?;
  store
    .add_favourite(&claims.subject, post_id)
    .await
    .map_err(Error::store)?;
  Ok(())
}

pub async fn remove_favourite<S>(store: &S, claims: &Claims, post_id: Uuid) -> Result<()>
where
  S: PostStore,
{
  if !store
    .remove_favourite(&claims.subject, post_id)
    .await
    .map_err(Error::store)?
  {
    return Err(Error::FavouriteNotFound(post_id));
  }
  Ok(())
}
