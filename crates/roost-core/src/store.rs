//! Collaborator traits implemented by storage backends, plus supporting
//! query types.
//!
//! The traits are implemented by backends such as `roost-store-sqlite`. Higher
//! layers (`roost-token`, `roost-api`) depend on these abstractions, not on
//! any concrete backend.
//!
//! All methods return `Send` futures so the traits can be used in
//! multi-threaded async runtimes (e.g. tokio with `axum`).

use std::future::Future;

use serde::Deserialize;
use uuid::Uuid;

use crate::{
  post::{Comment, Post, PostInput, RatingTotals},
  principal::{NewPrincipal, Principal, PrincipalId, Registration},
  role::{Role, RoleName, RoleReplace},
};

// ─── Query type ──────────────────────────────────────────────────────────────

/// Zero-based page selection for list operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Page {
  pub index: usize,
  pub size:  usize,
}

impl Page {
  pub fn offset(&self) -> usize { self.index.saturating_mul(self.size) }
}

// ─── Credentials ─────────────────────────────────────────────────────────────

/// Account existence and password verification.
///
/// Password hashing lives entirely behind this trait.
pub trait CredentialStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Return the principal if `username` exists and `password` matches.
  /// Implementations must not reveal which of the two was wrong.
  fn authenticate<'a>(
    &'a self,
    username: &'a str,
    password: &'a str,
  ) -> impl Future<Output = Result<Option<Principal>, Self::Error>> + Send + 'a;

  /// Create an account and assign `roles` in one transaction.
  fn register<'a>(
    &'a self,
    input: NewPrincipal,
    password: &'a str,
    roles: Vec<RoleName>,
  ) -> impl Future<Output = Result<Registration, Self::Error>> + Send + 'a;

  fn get_principal<'a>(
    &'a self,
    id: &'a PrincipalId,
  ) -> impl Future<Output = Result<Option<Principal>, Self::Error>> + Send + 'a;

  fn find_by_username<'a>(
    &'a self,
    username: &'a str,
  ) -> impl Future<Output = Result<Option<Principal>, Self::Error>> + Send + 'a;

  fn list_principals(
    &self,
  ) -> impl Future<Output = Result<Vec<Principal>, Self::Error>> + Send + '_;

  /// Replace the password if `old` verifies. Returns `false` otherwise.
  fn change_password<'a>(
    &'a self,
    id: &'a PrincipalId,
    old: &'a str,
    new: &'a str,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;
}

// ─── Roles ───────────────────────────────────────────────────────────────────

/// The role registry and per-principal role sets.
pub trait RoleStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  fn list_roles(
    &self,
  ) -> impl Future<Output = Result<Vec<Role>, Self::Error>> + Send + '_;

  fn get_role(
    &self,
    role_id: Uuid,
  ) -> impl Future<Output = Result<Option<Role>, Self::Error>> + Send + '_;

  fn role_exists<'a>(
    &'a self,
    name: &'a str,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  /// The subset of `names` absent from the registry, in input order.
  fn missing_roles<'a>(
    &'a self,
    names: &'a [RoleName],
  ) -> impl Future<Output = Result<Vec<RoleName>, Self::Error>> + Send + 'a;

  /// Insert a role. Returns `None` if the name is already taken.
  fn create_role(
    &self,
    name: RoleName,
  ) -> impl Future<Output = Result<Option<Role>, Self::Error>> + Send + '_;

  /// Remove a role from the registry. Principals holding it keep it.
  /// Returns `false` if no such role existed.
  fn delete_role(
    &self,
    role_id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Current role names of a principal; `None` if the principal is unknown.
  fn load_roles<'a>(
    &'a self,
    principal: &'a PrincipalId,
  ) -> impl Future<Output = Result<Option<Vec<RoleName>>, Self::Error>> + Send + 'a;

  /// Remove every role of `principal`, then add exactly `roles`, as one
  /// transaction. Existence of every role is re-checked inside the
  /// transaction; on any failure nothing changes.
  fn replace_roles<'a>(
    &'a self,
    principal: &'a PrincipalId,
    roles: Vec<RoleName>,
  ) -> impl Future<Output = Result<RoleReplace, Self::Error>> + Send + 'a;
}

// ─── Posts ───────────────────────────────────────────────────────────────────

/// Posts, their rating counters, comments and favourites.
pub trait PostStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  fn create_post(
    &self,
    owner: PrincipalId,
    input: PostInput,
  ) -> impl Future<Output = Result<Post, Self::Error>> + Send + '_;

  fn get_post(
    &self,
    post_id: Uuid,
  ) -> impl Future<Output = Result<Option<Post>, Self::Error>> + Send + '_;

  /// All posts, newest first.
  fn list_posts(
    &self,
    page: Option<Page>,
  ) -> impl Future<Output = Result<Vec<Post>, Self::Error>> + Send + '_;

  fn posts_by_owner<'a>(
    &'a self,
    owner: &'a PrincipalId,
    page: Option<Page>,
  ) -> impl Future<Output = Result<Vec<Post>, Self::Error>> + Send + 'a;

  /// Overwrite the editable fields. Returns `None` if the post is gone.
  fn update_post(
    &self,
    post_id: Uuid,
    input: PostInput,
  ) -> impl Future<Output = Result<Option<Post>, Self::Error>> + Send + '_;

  fn delete_post(
    &self,
    post_id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Add `value` to `total_point` and one to `reviewer_count` atomically.
  ///
  /// Concurrent calls for the same post must never lose an update, and either
  /// both counters change or neither does. Returns `None` if the post does
  /// not exist.
  fn increment_rating(
    &self,
    post_id: Uuid,
    value: f64,
  ) -> impl Future<Output = Result<Option<RatingTotals>, Self::Error>> + Send + '_;

  /// Returns `None` if the post does not exist.
  fn create_comment(
    &self,
    post_id: Uuid,
    owner: PrincipalId,
    content: String,
  ) -> impl Future<Output = Result<Option<Comment>, Self::Error>> + Send + '_;

  fn get_comment(
    &self,
    comment_id: Uuid,
  ) -> impl Future<Output = Result<Option<Comment>, Self::Error>> + Send + '_;

  /// Comments on a post, oldest first.
  fn list_comments(
    &self,
    post_id: Uuid,
    page: Option<Page>,
  ) -> impl Future<Output = Result<Vec<Comment>, Self::Error>> + Send + '_;

  fn delete_comment(
    &self,
    comment_id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Returns `false` if the favourite already existed.
  fn add_favourite<'a>(
    &'a self,
    owner: &'a PrincipalId,
    post_id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  /// Returns `false` if there was nothing to remove.
  fn remove_favourite<'a>(
    &'a self,
    owner: &'a PrincipalId,
    post_id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  fn favourites<'a>(
    &'a self,
    owner: &'a PrincipalId,
    page: Option<Page>,
  ) -> impl Future<Output = Result<Vec<Post>, Self::Error>> + Send + 'a;
}
