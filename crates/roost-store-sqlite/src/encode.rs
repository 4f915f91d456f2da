//! Encoding and decoding helpers between domain types and SQLite columns.
//!
//! Timestamps are RFC 3339 strings with fixed microsecond precision so they
//! sort lexically. UUIDs are hyphenated lowercase strings. Image lists are
//! compact JSON arrays.

use std::collections::BTreeSet;

use chrono::{DateTime, SecondsFormat, SubsecRound as _, Utc};
use roost_core::{
  post::{Comment, Post, RatingTotals},
  principal::{Principal, PrincipalId},
  role::{Role, RoleName},
  store::Page,
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Scalars ─────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

/// The current time at the precision timestamps are stored with.
pub fn now() -> DateTime<Utc> { Utc::now().trunc_subsecs(6) }

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

pub fn encode_images(images: &[String]) -> Result<String> {
  Ok(serde_json::to_string(images)?)
}

/// `(LIMIT, OFFSET)` for an optional page; SQLite treats a negative limit as
/// unbounded.
pub fn limit_offset(page: Option<Page>) -> (i64, i64) {
  match page {
    Some(p) => (
      i64::try_from(p.size).unwrap_or(i64::MAX),
      i64::try_from(p.offset()).unwrap_or(i64::MAX),
    ),
    None => (-1, 0),
  }
}

// ─── Principals ──────────────────────────────────────────────────────────────

pub const PRINCIPAL_COLUMNS: &str =
  "principal_id, username, email, first_name, last_name, phone, created_at";

/// A `principals` row before its roles are attached.
pub struct RawPrincipal {
  pub principal_id: String,
  pub username:     String,
  pub email:        String,
  pub first_name:   String,
  pub last_name:    String,
  pub phone:        Option<String>,
  pub created_at:   String,
}

impl RawPrincipal {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      principal_id: row.get(0)?,
      username:     row.get(1)?,
      email:        row.get(2)?,
      first_name:   row.get(3)?,
      last_name:    row.get(4)?,
      phone:        row.get(5)?,
      created_at:   row.get(6)?,
    })
  }

  pub fn into_principal(self, roles: BTreeSet<RoleName>) -> Result<Principal> {
    Ok(Principal {
      principal_id: PrincipalId::new(self.principal_id),
      username: self.username,
      email: self.email,
      first_name: self.first_name,
      last_name: self.last_name,
      phone: self.phone,
      roles,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

// ─── Roles ───────────────────────────────────────────────────────────────────

pub struct RawRole {
  pub role_id: String,
  pub name:    String,
}

impl RawRole {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      role_id: row.get(0)?,
      name:    row.get(1)?,
    })
  }

  pub fn into_role(self) -> Result<Role> {
    Ok(Role {
      role_id: decode_uuid(&self.role_id)?,
      name:    RoleName::new(self.name),
    })
  }
}

// ─── Posts ───────────────────────────────────────────────────────────────────

pub const POST_COLUMNS: &str = "p.post_id, p.owner, p.address, p.price, p.number_lodgers, \
   p.description, p.images, p.total_point, p.reviewer_count, p.created_at, p.last_update";

pub struct RawPost {
  pub post_id:        String,
  pub owner:          String,
  pub address:        String,
  pub price:          f64,
  pub number_lodgers: u32,
  pub description:    String,
  pub images:         String,
  pub total_point:    f64,
  pub reviewer_count: f64,
  pub created_at:     String,
  pub last_update:    String,
}

impl RawPost {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      post_id:        row.get(0)?,
      owner:          row.get(1)?,
      address:        row.get(2)?,
      price:          row.get(3)?,
      number_lodgers: row.get(4)?,
      description:    row.get(5)?,
      images:         row.get(6)?,
      total_point:    row.get(7)?,
      reviewer_count: row.get(8)?,
      created_at:     row.get(9)?,
      last_update:    row.get(10)?,
    })
  }

  pub fn into_post(self) -> Result<Post> {
    Ok(Post {
      post_id:        decode_uuid(&self.post_id)?,
      owner:          PrincipalId::new(self.owner),
      address:        self.address,
      price:          self.price,
      number_lodgers: self.number_lodgers,
      description:    self.description,
      images:         serde_json::from_str(&self.images)?,
      rating:         RatingTotals {
        total_point:    self.total_point,
        reviewer_count: self.reviewer_count,
      },
      created_at:     decode_dt(&self.created_at)?,
      last_update:    decode_dt(&self.last_update)?,
    })
  }
}

// ─── Comments ────────────────────────────────────────────────────────────────

pub const COMMENT_COLUMNS: &str = "comment_id, post_id, owner, content, created_at";

pub struct RawComment {
  pub comment_id: String,
  pub post_id:    String,
  pub owner:      String,
  pub content:    String,
  pub created_at: String,
}

impl RawComment {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      comment_id: row.get(0)?,
      post_id:    row.get(1)?,
      owner:      row.get(2)?,
      content:    row.get(3)?,
      created_at: row.get(4)?,
    })
  }

  pub fn into_comment(self) -> Result<Comment> {
    Ok(Comment {
      comment_id: decode_uuid(&self.comment_id)?,
      post_id:    decode_uuid(&self.post_id)?,
      owner:      PrincipalId::new(self.owner),
      content:    self.content,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;

  use super::*;

  #[test]
  fn timestamps_sort_lexically() {
    let a = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
    let b = a + chrono::Duration::microseconds(1);
    let c = a + chrono::Duration::seconds(1);
    assert!(encode_dt(a) < encode_dt(b));
    assert!(encode_dt(b) < encode_dt(c));
    assert_eq!(decode_dt(&encode_dt(b)).unwrap(), b);
  }

  #[test]
  fn unbounded_page() {
    assert_eq!(limit_offset(None), (-1, 0));
    assert_eq!(limit_offset(Some(Page { index: 2, size: 10 })), (10, 20));
  }
}
