//! JSON REST API for Roost.
//!
//! Exposes an axum [`Router`] backed by any store implementing the
//! [`roost_core::store`] traits, with bearer-token authentication issued by
//! `/oauth/token`.
//!
//! # Mounting
//!
//! ```rust,ignore
//! let app = roost_api::router(state);
//! axum::serve(listener, app).await?;
//! ```

pub mod auth;
pub mod error;
pub mod handlers;

pub use error::ApiError;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  routing::{delete, get, post, put},
};
use chrono::Duration;
use roost_core::{
  rating::RatingPolicy,
  store::{CredentialStore, PostStore, RoleStore},
};
use roost_token::{Algorithm, SigningKey, TokenError, TokenIssuer, TokenVerifier};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use handlers::{comments, favourites, posts, roles, token, users};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml`.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  pub store_path: PathBuf,
  pub token:      TokenConfig,
  #[serde(default)]
  pub rating:     RatingPolicy,
}

/// Token signing settings.
#[derive(Deserialize, Clone)]
pub struct TokenConfig {
  pub issuer:        String,
  pub audience:      String,
  /// Shared HMAC secret, base64url encoded.
  pub secret:        String,
  #[serde(default)]
  pub algorithm:     Algorithm,
  #[serde(default = "default_validity_secs")]
  pub validity_secs: i64,
}

fn default_validity_secs() -> i64 { 24 * 60 * 60 }

impl TokenConfig {
  pub fn issuer(&self) -> Result<TokenIssuer, TokenError> {
    let key = SigningKey::from_base64url(self.algorithm, &self.secret)?;
    TokenIssuer::new(
      key,
      self.issuer.clone(),
      self.audience.clone(),
      Duration::seconds(self.validity_secs),
    )
  }
}

// ─── Application state ────────────────────────────────────────────────────────

/// Everything a backend must provide to serve the API.
pub trait Backend: CredentialStore + RoleStore + PostStore + 'static {}

impl<T> Backend for T where T: CredentialStore + RoleStore + PostStore + 'static {}

/// Shared state threaded through all axum handlers.
pub struct AppState<S> {
  pub store:    Arc<S>,
  pub issuer:   Arc<TokenIssuer>,
  pub verifier: Arc<TokenVerifier>,
  pub rating:   RatingPolicy,
}

impl<S> Clone for AppState<S> {
  fn clone(&self) -> Self {
    Self {
      store:    Arc::clone(&self.store),
      issuer:   Arc::clone(&self.issuer),
      verifier: Arc::clone(&self.verifier),
      rating:   self.rating,
    }
  }
}

impl<S> AppState<S> {
  pub fn new(store: S, issuer: TokenIssuer, rating: RatingPolicy) -> Self {
    let verifier = issuer.verifier();
    Self {
      store: Arc::new(store),
      issuer: Arc::new(issuer),
      verifier: Arc::new(verifier),
      rating,
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full application router.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: Backend,
{
  Router::new()
    .route("/oauth/token", post(token::issue::<S>))
    // Users
    .route("/api/users", get(users::list::<S>).post(users::register::<S>))
    .route("/api/users/passwords", post(users::change_password::<S>))
    .route("/api/users/{id}", get(users::get_one::<S>))
    .route("/api/users/{id}/roles", put(users::assign::<S>))
    // Roles
    .route("/api/roles", get(roles::list::<S>).post(roles::create::<S>))
    .route("/api/roles/{id}", get(roles::get_one::<S>).delete(roles::remove::<S>))
    // Posts
    .route("/api/posts", get(posts::list::<S>))
    .route("/api/posts/own", get(posts::list_own::<S>).post(posts::create::<S>))
    .route(
      "/api/posts/{id}",
      get(posts::get_one::<S>)
        .put(posts::update::<S>)
        .delete(posts::remove::<S>),
    )
    .route("/api/posts/{id}/rates", post(posts::rate::<S>))
    // Comments
    .route(
      "/api/posts/{id}/comments",
      get(comments::list::<S>).post(comments::create::<S>),
    )
    .route("/api/posts/{id}/comments/{comment_id}", delete(comments::remove::<S>))
    // Favourites
    .route(
      "/api/favourites",
      get(favourites::list::<S>).post(favourites::add::<S>),
    )
    .route("/api/favourites/{post_id}", delete(favourites::remove::<S>))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}
