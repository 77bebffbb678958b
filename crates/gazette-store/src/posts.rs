//! CRUD and listing queries for [`Post`] records.
//!
//! Every listing comes as a `count_*` / `list_*_page` pair so callers can
//! clamp the requested page against the total before querying.

use chrono::{DateTime, Utc};
use rusqlite::params;
use uuid::Uuid;

use crate::col;
use crate::database::Database;
use crate::error::{Result, StoreError};
use crate::models::Post;

impl Database {
    // ------------------------------------------------------------------
    // Create / update / delete
    // ------------------------------------------------------------------

    /// Insert a new post.
    pub fn create_post(&self, post: &Post) -> Result<()> {
        self.conn().execute(
            "INSERT INTO posts (id, text, published_at, author_id, group_id, image)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                post.id.to_string(),
                post.text,
                post.published_at.to_rfc3339(),
                post.author_id.to_string(),
                post.group_id.map(|g| g.to_string()),
                post.image,
            ],
        )?;
        Ok(())
    }

    /// Update the editable fields of a post: text, group and image.
    ///
    /// `author_id` and `published_at` are set once at creation and never
    /// touched here.
    pub fn update_post(&self, post: &Post) -> Result<()> {
        let affected = self.conn().execute(
            "UPDATE posts SET text = ?2, group_id = ?3, image = ?4 WHERE id = ?1",
            params![
                post.id.to_string(),
                post.text,
                post.group_id.map(|g| g.to_string()),
                post.image,
            ],
        )?;
        if affected == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    /// Delete a post by id.  Returns `true` if a row was deleted.
    /// Its comments and read marks cascade.
    pub fn delete_post(&self, id: Uuid) -> Result<bool> {
        let affected = self
            .conn()
            .execute("DELETE FROM posts WHERE id = ?1", params![id.to_string()])?;
        Ok(affected > 0)
    }

    // ------------------------------------------------------------------
    // Read
    // ------------------------------------------------------------------

    /// Fetch a single post by id.
    pub fn get_post(&self, id: Uuid) -> Result<Post> {
        self.conn()
            .query_row(
                "SELECT id, text, published_at, author_id, group_id, image
                 FROM posts
                 WHERE id = ?1",
                params![id.to_string()],
                row_to_post,
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => StoreError::NotFound,
                other => StoreError::Sqlite(other),
            })
    }

    /// Total number of posts.
    pub fn count_posts(&self) -> Result<u64> {
        let n: u64 = self
            .conn()
            .query_row("SELECT COUNT(*) FROM posts", [], |row| row.get(0))?;
        Ok(n)
    }

    /// One page of all posts, newest first.
    pub fn list_posts_page(&self, limit: u32, offset: u32) -> Result<Vec<Post>> {
        let mut stmt = self.conn().prepare(
            "SELECT id, text, published_at, author_id, group_id, image
             FROM posts
             ORDER BY published_at DESC
             LIMIT ?1 OFFSET ?2",
        )?;

        let rows = stmt.query_map(params![limit, offset], row_to_post)?;

        let mut posts = Vec::new();
        for row in rows {
            posts.push(row?);
        }
        Ok(posts)
    }

    /// Number of posts filed under a group.
    pub fn count_posts_by_group(&self, group_id: Uuid) -> Result<u64> {
        let n: u64 = self.conn().query_row(
            "SELECT COUNT(*) FROM posts WHERE group_id = ?1",
            params![group_id.to_string()],
            |row| row.get(0),
        )?;
        Ok(n)
    }

    /// One page of a group's posts, newest first.
    pub fn list_posts_by_group_page(
        &self,
        group_id: Uuid,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<Post>> {
        let mut stmt = self.conn().prepare(
            "SELECT id, text, published_at, author_id, group_id, image
             FROM posts
             WHERE group_id = ?1
             ORDER BY published_at DESC
             LIMIT ?2 OFFSET ?3",
        )?;

        let rows = stmt.query_map(params![group_id.to_string(), limit, offset], row_to_post)?;

        let mut posts = Vec::new();
        for row in rows {
            posts.push(row?);
        }
        Ok(posts)
    }

    /// Number of posts published by an author.
    pub fn count_posts_by_author(&self, author_id: Uuid) -> Result<u64> {
        let n: u64 = self.conn().query_row(
            "SELECT COUNT(*) FROM posts WHERE author_id = ?1",
            params![author_id.to_string()],
            |row| row.get(0),
        )?;
        Ok(n)
    }

    /// One page of an author's posts, newest first.
    pub fn list_posts_by_author_page(
        &self,
        author_id: Uuid,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<Post>> {
        let mut stmt = self.conn().prepare(
            "SELECT id, text, published_at, author_id, group_id, image
             FROM posts
             WHERE author_id = ?1
             ORDER BY published_at DESC
             LIMIT ?2 OFFSET ?3",
        )?;

        let rows = stmt.query_map(params![author_id.to_string(), limit, offset], row_to_post)?;

        let mut posts = Vec::new();
        for row in rows {
            posts.push(row?);
        }
        Ok(posts)
    }

    /// The author's most recent post, if any.
    pub fn latest_post_by_author(&self, author_id: Uuid) -> Result<Option<Post>> {
        let mut stmt = self.conn().prepare(
            "SELECT id, text, published_at, author_id, group_id, image
             FROM posts
             WHERE author_id = ?1
             ORDER BY published_at DESC
             LIMIT 1",
        )?;

        let mut rows = stmt.query_map(params![author_id.to_string()], row_to_post)?;
        rows.next().transpose().map_err(StoreError::Sqlite)
    }

    // ------------------------------------------------------------------
    // Feed: posts by authors the user follows
    // ------------------------------------------------------------------

    /// Number of posts visible in the user's aggregated feed.
    pub fn count_feed_posts(&self, user_id: Uuid) -> Result<u64> {
        let n: u64 = self.conn().query_row(
            "SELECT COUNT(*)
             FROM posts p
             JOIN follows f ON f.author_id = p.author_id
             WHERE f.user_id = ?1",
            params![user_id.to_string()],
            |row| row.get(0),
        )?;
        Ok(n)
    }

    /// One page of the user's aggregated feed, newest first.
    pub fn list_feed_posts_page(
        &self,
        user_id: Uuid,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<Post>> {
        let mut stmt = self.conn().prepare(
            "SELECT p.id, p.text, p.published_at, p.author_id, p.group_id, p.image
             FROM posts p
             JOIN follows f ON f.author_id = p.author_id
             WHERE f.user_id = ?1
             ORDER BY p.published_at DESC
             LIMIT ?2 OFFSET ?3",
        )?;

        let rows = stmt.query_map(params![user_id.to_string(), limit, offset], row_to_post)?;

        let mut posts = Vec::new();
        for row in rows {
            posts.push(row?);
        }
        Ok(posts)
    }

    // ------------------------------------------------------------------
    // Read marks
    // ------------------------------------------------------------------

    /// Mark a post as read by a viewer.  Returns `true` on the first mark,
    /// `false` if it was already marked.
    pub fn mark_post_read(&self, post_id: Uuid, user_id: Uuid) -> Result<bool> {
        let affected = self.conn().execute(
            "INSERT OR IGNORE INTO post_reads (post_id, user_id) VALUES (?1, ?2)",
            params![post_id.to_string(), user_id.to_string()],
        )?;
        Ok(affected > 0)
    }

    /// Whether a viewer has opened this post before.
    pub fn has_read_post(&self, post_id: Uuid, user_id: Uuid) -> Result<bool> {
        let n: u64 = self.conn().query_row(
            "SELECT COUNT(*) FROM post_reads WHERE post_id = ?1 AND user_id = ?2",
            params![post_id.to_string(), user_id.to_string()],
            |row| row.get(0),
        )?;
        Ok(n > 0)
    }
}

/// Map a `rusqlite::Row` to a [`Post`].
pub(crate) fn row_to_post(row: &rusqlite::Row<'_>) -> rusqlite::Result<Post> {
    let published_at: DateTime<Utc> = col::timestamp(row, 2)?;
    Ok(Post {
        id: col::uuid(row, 0)?,
        text: row.get(1)?,
        published_at,
        author_id: col::uuid(row, 3)?,
        group_id: col::opt_uuid(row, 4)?,
        image: row.get(5)?,
    })
}
