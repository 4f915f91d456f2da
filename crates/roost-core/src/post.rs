//! Posts (the rated resource), their comments and favourites.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result, principal::PrincipalId};

pub const MAX_ADDRESS_LEN: usize = 200;
pub const MAX_DESCRIPTION_LEN: usize = 500;

// ─── Rating counters ─────────────────────────────────────────────────────────

/// Running rating totals. Both counters only ever grow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RatingTotals {
  pub total_point:    f64,
  pub reviewer_count: f64,
}

impl RatingTotals {
  /// The displayed average; `None` until the first rating.
  pub fn average(&self) -> Option<f64> {
    (self.reviewer_count > 0.0).then(|| self.total_point / self.reviewer_count)
  }
}

// ─── Posts ───────────────────────────────────────────────────────────────────

/// A boarding-house listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
  pub post_id:        Uuid,
  /// Set at creation, never changed.
  pub owner:          PrincipalId,
  pub address:        String,
  pub price:          f64,
  pub number_lodgers: u32,
  pub description:    String,
  pub images:         Vec<String>,
  #[serde(flatten)]
  pub rating:         RatingTotals,
  pub created_at:     DateTime<Utc>,
  pub last_update:    DateTime<Utc>,
}

/// Editable fields of a post, used for both create and update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostInput {
  pub address:        String,
  pub price:          f64,
  pub number_lodgers: u32,
  pub description:    String,
  #[serde(default)]
  pub images:         Vec<String>,
}

impl PostInput {
  pub fn validate(&self) -> Result<()> {
    if self.address.trim().is_empty() {
      return Err(Error::InvalidInput("address is required".into()));
    }
    if self.address.chars().count() > MAX_ADDRESS_LEN {
      return Err(Error::InvalidInput(format!(
        "address is longer than {MAX_ADDRESS_LEN} characters"
      )));
    }
    if self.description.chars().count() > MAX_DESCRIPTION_LEN {
      return Err(Error::InvalidInput(format!(
        "description is longer than {MAX_DESCRIPTION_LEN} characters"
      )));
    }
    if !self.price.is_finite() || self.price < 0.0 {
      return Err(Error::InvalidInput("price must be a non-negative number".into()));
    }
    Ok(())
  }
}

// ─── Comments ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
  pub comment_id: Uuid,
  pub post_id:    Uuid,
  pub owner:      PrincipalId,
  pub content:    String,
  pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
  use super::*;

  fn input() -> PostInput {
    PostInput {
      address:        "12 Nguyen Trai".into(),
      price:          1_500_000.0,
      number_lodgers: 2,
      description:    "Quiet room near the university".into(),
      images:         vec![],
    }
  }

  #[test]
  fn average_is_none_before_first_rating() {
    assert_eq!(RatingTotals::default().average(), None);
  }

  #[test]
  fn average_divides_total_by_count() {
    let totals = RatingTotals { total_point: 12.0, reviewer_count: 2.0 };
    assert_eq!(totals.average(), Some(6.0));
  }

  #[test]
  fn valid_input_passes() {
    assert!(input().validate().is_ok());
  }

  #[test]
  fn overlong_address_rejected() {
    let mut i = input();
    i.address = "x".repeat(MAX_ADDRESS_LEN + 1);
    assert!(matches!(i.validate(), Err(Error::InvalidInput(_))));
  }

  #[test]
  fn negative_price_rejected() {
    let mut i = input();
    i.price = -1.0;
    assert!(matches!(i.validate(), Err(Error::InvalidInput(_))));
  }
}
