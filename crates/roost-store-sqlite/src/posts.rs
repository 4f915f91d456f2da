//! [`PostStore`] for [`SqliteStore`].

use rusqlite::OptionalExtension as _;
use roost_core::{
  post::{Comment, Post, PostInput, RatingTotals},
  principal::PrincipalId,
  store::{Page, PostStore},
};
use uuid::Uuid;

use crate::{
  Error, Result, SqliteStore,
  encode::{
    COMMENT_COLUMNS, POST_COLUMNS, RawComment, RawPost, encode_dt, encode_images, encode_uuid,
    limit_offset, now,
  },
};

impl SqliteStore {
  /// Run a post query whose only parameters are `?1` (a text key) plus the
  /// trailing `LIMIT ?2 OFFSET ?3`.
  async fn query_posts(&self, sql: String, key: String, page: Option<Page>) -> Result<Vec<Post>> {
    let (limit, offset) = limit_offset(page);
    let raws: Vec<RawPost> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params![key, limit, offset], RawPost::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawPost::into_post).collect()
  }
}

fn select_post(conn: &rusqlite::Connection, post_id: &str) -> rusqlite::Result<Option<RawPost>> {
  conn
    .query_row(
      &format!("SELECT {POST_COLUMNS} FROM posts p WHERE p.post_id = ?1"),
      rusqlite::params![post_id],
      RawPost::from_row,
    )
    .optional()
}

impl PostStore for SqliteStore {
  type Error = Error;

  async fn create_post(&self, owner: PrincipalId, input: PostInput) -> Result<Post> {
    let created = now();
    let post = Post {
      post_id:        Uuid::new_v4(),
      owner,
      address:        input.address,
      price:          input.price,
      number_lodgers: input.number_lodgers,
      description:    input.description,
      images:         input.images,
      rating:         RatingTotals::default(),
      created_at:     created,
      last_update:    created,
    };

    let id_str     = encode_uuid(post.post_id);
    let owner_str  = post.owner.as_str().to_owned();
    let address    = post.address.clone();
    let price      = post.price;
    let lodgers    = post.number_lodgers;
    let desc       = post.description.clone();
    let images     = encode_images(&post.images)?;
    let at_str     = encode_dt(created);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO posts (
             post_id, owner, address, price, number_lodgers, description,
             images, created_at, last_update
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)",
          rusqlite::params![id_str, owner_str, address, price, lodgers, desc, images, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(post)
  }

  async fn get_post(&self, post_id: Uuid) -> Result<Option<Post>> {
    let id_str = encode_uuid(post_id);
    let raw = self
      .conn
      .call(move |conn| Ok(select_post(conn, &id_str)?))
      .await?;
    raw.map(RawPost::into_post).transpose()
  }

  async fn list_posts(&self, page: Option<Page>) -> Result<Vec<Post>> {
    let (limit, offset) = limit_offset(page);
    let raws: Vec<RawPost> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {POST_COLUMNS} FROM posts p
           ORDER BY p.created_at DESC, p.rowid DESC
           LIMIT ?1 OFFSET ?2"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![limit, offset], RawPost::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawPost::into_post).collect()
  }

  async fn posts_by_owner(&self, owner: &PrincipalId, page: Option<Page>) -> Result<Vec<Post>> {
    let sql = format!(
      "SELECT {POST_COLUMNS} FROM posts p
       WHERE p.owner = ?1
       ORDER BY p.created_at DESC, p.rowid DESC
       LIMIT ?2 OFFSET ?3"
    );
    self.query_posts(sql, owner.as_str().to_owned(), page).await
  }

  async fn update_post(&self, post_id: Uuid, input: PostInput) -> Result<Option<Post>> {
    let id_str  = encode_uuid(post_id);
    let images  = encode_images(&input.images)?;
    let at_str  = encode_dt(now());

    let raw = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let changed = tx.execute(
          "UPDATE posts
           SET address = ?1, price = ?2, number_lodgers = ?3, description = ?4,
               images = ?5, last_update = ?6
           WHERE post_id = ?7",
          rusqlite::params![
            input.address,
            input.price,
            input.number_lodgers,
            input.description,
            images,
            at_str,
            id_str,
          ],
        )?;
        if changed == 0 {
          return Ok(None);
        }
        let raw = select_post(&tx, &id_str)?;
        tx.commit()?;
        Ok(raw)
      })
      .await?;

    raw.map(RawPost::into_post).transpose()
  }

  async fn delete_post(&self, post_id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(post_id);
    let deleted = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM posts WHERE post_id = ?1",
          rusqlite::params![id_str],
        )?)
      })
      .await?;

    Ok(deleted == 1)
  }

  async fn increment_rating(&self, post_id: Uuid, value: f64) -> Result<Option<RatingTotals>> {
    let id_str = encode_uuid(post_id);
    // One statement: both counters move together or not at all.
    let totals = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "UPDATE posts
               SET total_point = total_point + ?1,
                   reviewer_count = reviewer_count + 1
               WHERE post_id = ?2
               RETURNING total_point, reviewer_count",
              rusqlite::params![value, id_str],
              |row| {
                Ok(RatingTotals {
                  total_point:    row.get(0)?,
                  reviewer_count: row.get(1)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    Ok(totals)
  }

  async fn create_comment(
    &self,
    post_id: Uuid,
    owner: PrincipalId,
    content: String,
  ) -> Result<Option<Comment>> {
    let comment = Comment {
      comment_id: Uuid::new_v4(),
      post_id,
      owner,
      content,
      created_at: now(),
    };

    let comment_id = encode_uuid(comment.comment_id);
    let post_str   = encode_uuid(post_id);
    let owner_str  = comment.owner.as_str().to_owned();
    let content    = comment.content.clone();
    let at_str     = encode_dt(comment.created_at);

    let inserted = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "INSERT INTO comments (comment_id, post_id, owner, content, created_at)
           SELECT ?1, post_id, ?3, ?4, ?5 FROM posts WHERE post_id = ?2",
          rusqlite::params![comment_id, post_str, owner_str, content, at_str],
        )?)
      })
      .await?;

    Ok((inserted == 1).then_some(comment))
  }

  async fn get_comment(&self, comment_id: Uuid) -> Result<Option<Comment>> {
    let id_str = encode_uuid(comment_id);
    let raw = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {COMMENT_COLUMNS} FROM comments WHERE comment_id = ?1"),
              rusqlite::params![id_str],
              RawComment::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawComment::into_comment).transpose()
  }

  async fn list_comments(&self, post_id: Uuid, page: Option<Page>) -> Result<Vec<Comment>> {
    let id_str = encode_uuid(post_id);
    let (limit, offset) = limit_offset(page);
    let raws: Vec<RawComment> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {COMMENT_COLUMNS} FROM comments
           WHERE post_id = ?1
           ORDER BY created_at, rowid
           LIMIT ?2 OFFSET ?3"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![id_str, limit, offset], RawComment::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawComment::into_comment).collect()
  }

  async fn delete_comment(&self, comment_id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(comment_id);
    let deleted = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM comments WHERE comment_id = ?1",
          rusqlite::params![id_str],
        )?)
      })
      .await?;

    Ok(deleted == 1)
  }

  async fn add_favourite(&self, owner: &PrincipalId, post_id: Uuid) -> Result<bool> {
    let owner_str = owner.as_str().to_owned();
    let post_str  = encode_uuid(post_id);
    let at_str    = encode_dt(now());
    let inserted = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "INSERT OR IGNORE INTO favourites (owner, post_id, created_at)
           SELECT ?1, post_id, ?3 FROM posts WHERE post_id = ?2",
          rusqlite::params![owner_str, post_str, at_str],
        )?)
      })
      .await?;

    Ok(inserted == 1)
  }

  async fn remove_favourite(&self, owner: &PrincipalId, post_id: Uuid) -> Result<bool> {
    let owner_str = owner.as_str().to_owned();
    let post_str  = encode_uuid(post_id);
    let deleted = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM favourites WHERE owner = ?1 AND post_id = ?2",
          rusqlite::params![owner_str, post_str],
        )?)
      })
      .await?;

    Ok(deleted == 1)
  }

  async fn favourites(&self, owner: &PrincipalId, page: Option<Page>) -> Result<Vec<Post>> {
    let sql = format!(
      "SELECT {POST_COLUMNS} FROM favourites f
       JOIN posts p ON p.post_id = f.post_id
       WHERE f.owner = ?1
       ORDER BY f.created_at DESC, f.rowid DESC
       LIMIT ?2 OFFSET ?3"
    );
    self.query_posts(sql, owner.as_str().to_owned(), page).await
  }
}
