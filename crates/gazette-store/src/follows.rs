//! Follow-edge storage.
//!
//! Edges are unique per `(user_id, author_id)` pair, enforced by a unique
//! index.  Inserts go through `INSERT OR IGNORE`, so two concurrent follow
//! requests for the same pair collapse to a single edge.

use chrono::{DateTime, Utc};
use rusqlite::params;
use uuid::Uuid;

use crate::database::Database;
use crate::error::Result;
use crate::models::User;
use crate::users::row_to_user;

impl Database {
    /// Insert a follow edge.  Returns `true` if the edge was created,
    /// `false` if it already existed.
    pub fn create_follow(
        &self,
        user_id: Uuid,
        author_id: Uuid,
        created_at: DateTime<Utc>,
    ) -> Result<bool> {
        let affected = self.conn().execute(
            "INSERT OR IGNORE INTO follows (user_id, author_id, created_at)
             VALUES (?1, ?2, ?3)",
            params![
                user_id.to_string(),
                author_id.to_string(),
                created_at.to_rfc3339(),
            ],
        )?;
        Ok(affected > 0)
    }

    /// Delete a follow edge.  Returns `true` if an edge was deleted; a
    /// missing edge is not an error.
    pub fn delete_follow(&self, user_id: Uuid, author_id: Uuid) -> Result<bool> {
        let affected = self.conn().execute(
            "DELETE FROM follows WHERE user_id = ?1 AND author_id = ?2",
            params![user_id.to_string(), author_id.to_string()],
        )?;
        Ok(affected > 0)
    }

    /// Whether `user_id` follows `author_id`.
    pub fn follow_exists(&self, user_id: Uuid, author_id: Uuid) -> Result<bool> {
        let n: u64 = self.conn().query_row(
            "SELECT COUNT(*) FROM follows WHERE user_id = ?1 AND author_id = ?2",
            params![user_id.to_string(), author_id.to_string()],
            |row| row.get(0),
        )?;
        Ok(n > 0)
    }

    /// All users with an edge pointing to `author_id`.
    pub fn followers_of(&self, author_id: Uuid) -> Result<Vec<User>> {
        let mut stmt = self.conn().prepare(
            "SELECT u.id, u.username, u.email, u.name, u.created_at
             FROM users u
             JOIN follows f ON f.user_id = u.id
             WHERE f.author_id = ?1
             ORDER BY u.username ASC",
        )?;

        let rows = stmt.query_map(params![author_id.to_string()], row_to_user)?;

        let mut users = Vec::new();
        for row in rows {
            users.push(row?);
        }
        Ok(users)
    }

    /// All authors `user_id` follows.
    pub fn followed_by(&self, user_id: Uuid) -> Result<Vec<User>> {
        let mut stmt = self.conn().prepare(
            "SELECT u.id, u.username, u.email, u.name, u.created_at
             FROM users u
             JOIN follows f ON f.author_id = u.id
             WHERE f.user_id = ?1
             ORDER BY u.username ASC",
        )?;

        let rows = stmt.query_map(params![user_id.to_string()], row_to_user)?;

        let mut users = Vec::new();
        for row in rows {
            users.push(row?);
        }
        Ok(users)
    }
}
