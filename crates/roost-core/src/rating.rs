//! Rating aggregation: bounded contributions to a post's running totals.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result, store::PostStore};

/// Inclusive bounds for a single rating.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatingPolicy {
  pub min: f64,
  pub max: f64,
}

impl Default for RatingPolicy {
  fn default() -> Self { Self { min: 0.0, max: 10.0 } }
}

impl RatingPolicy {
  /// Reject non-finite values and values outside `[min, max]`.
  pub fn check(&self, value: f64) -> Result<()> {
    if value.is_finite() && value >= self.min && value <= self.max {
      Ok(())
    } else {
      Err(Error::OutOfRange { value, min: self.min, max: self.max })
    }
  }
}

/// Result of one accepted rating.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatingOutcome {
  pub post_id:        Uuid,
  pub total_point:    f64,
  pub reviewer_count: f64,
  pub average:        f64,
}

/// Apply one rating to a post and return the new average.
///
/// The value is checked before the store is touched. The increment itself is
/// delegated to [`PostStore::increment_rating`], which is atomic per post.
pub async fn apply_rating<S>(
  store: &S,
  policy: &RatingPolicy,
  post_id: Uuid,
  value: f64,
) -> Result<RatingOutcome>
where
  S: PostStore,
{
  policy.check(value)?;

  let totals = store
    .increment_rating(post_id, value)
    .await
    .map_err(|e| {
      tracing::error!(%post_id, error = %e, "rating increment failed");
      Error::store(e)
    })?
    .ok_or(Error::PostNotFound(post_id))?;

  // reviewer_count is at least 1 after a successful increment.
  let average = totals.average().unwrap_or(value);
  tracing::debug!(%post_id, value, average, "rating applied");

  Ok(RatingOutcome {
    post_id,
    total_point: totals.total_point,
    reviewer_count: totals.reviewer_count,
    average,
  })
}
