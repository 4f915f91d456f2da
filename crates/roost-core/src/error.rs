//! Error types for `roost-core`.

use thiserror::Error;
use uuid::Uuid;

use crate::{guard::Forbidden, principal::PrincipalId, role::RoleName};

#[derive(Debug, Error)]
pub enum Error {
  #[error("forbidden")]
  Forbidden,

  #[error("roles '{}' do not exist in the system", join_names(.0))]
  UnknownRoles(Vec<RoleName>),

  #[error("role {0} already exists")]
  DuplicateRole(RoleName),

  #[error("user name {0:?} is already taken")]
  UsernameTaken(String),

  #[error("role not found: {0}")]
  RoleNotFound(Uuid),

  #[error("principal not found: {0}")]
  PrincipalNotFound(PrincipalId),

  #[error("post not found: {0}")]
  PostNotFound(Uuid),

  #[error("comment not found: {0}")]
  CommentNotFound(Uuid),

  #[error("post {0} is not among your favourites")]
  FavouriteNotFound(Uuid),

  #[error("rating {value} is outside [{min}, {max}]")]
  OutOfRange { value: f64, min: f64, max: f64 },

  #[error("invalid input: {0}")]
  InvalidInput(String),

  /// Failure inside a storage or credential collaborator.
  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// Box a collaborator error.
  pub fn store<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(e))
  }
}

impl From<Forbidden> for Error {
  fn from(_: Forbidden) -> Self { Self::Forbidden }
}

fn join_names(names: &[RoleName]) -> String {
  names
    .iter()
    .map(RoleName::as_str)
    .collect::<Vec<_>>()
    .join(",")
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
