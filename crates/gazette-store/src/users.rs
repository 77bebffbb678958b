//! CRUD operations for [`User`] records.

use rusqlite::params;
use uuid::Uuid;

use crate::col;
use crate::database::Database;
use crate::error::{conflict_on_unique, Result, StoreError};
use crate::models::User;

impl Database {
    /// Insert a new user.  Usernames are unique.
    pub fn create_user(&self, user: &User) -> Result<()> {
        self.conn()
            .execute(
                "INSERT INTO users (id, username, email, name, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    user.id.to_string(),
                    user.username,
                    user.email,
                    user.name,
                    user.created_at.to_rfc3339(),
                ],
            )
            .map_err(|e| conflict_on_unique(e, "username already taken"))?;
        Ok(())
    }

    /// Fetch a single user by id.
    pub fn get_user(&self, id: Uuid) -> Result<User> {
        self.conn()
            .query_row(
                "SELECT id, username, email, name, created_at
                 FROM users
                 WHERE id = ?1",
                params![id.to_string()],
                row_to_user,
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => StoreError::NotFound,
                other => StoreError::Sqlite(other),
            })
    }

    /// Fetch a single user by username.
    pub fn get_user_by_username(&self, username: &str) -> Result<User> {
        self.conn()
            .query_row(
                "SELECT id, username, email, name, created_at
                 FROM users
                 WHERE username = ?1",
                params![username],
                row_to_user,
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => StoreError::NotFound,
                other => StoreError::Sqlite(other),
            })
    }

    /// Delete a user by id.  Returns `true` if a row was deleted.
    ///
    /// The user's posts, comments, follow edges and logout record cascade.
    pub fn delete_user(&self, id: Uuid) -> Result<bool> {
        let affected = self
            .conn()
            .execute("DELETE FROM users WHERE id = ?1", params![id.to_string()])?;
        Ok(affected > 0)
    }
}

/// Map a `rusqlite::Row` to a [`User`].
pub(crate) fn row_to_user(row: &rusqlite::Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: col::uuid(row, 0)?,
        username: row.get(1)?,
        email: row.get(2)?,
        name: row.get(3)?,
        created_at: col::timestamp(row, 4)?,
    })
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use crate::{Database, StoreError, User};

    fn user(username: &str) -> User {
        User {
            id: Uuid::new_v4(),
            username: username.to_string(),
            email: format!("{username}@example.com"),
            name: username.to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn create_and_fetch_by_username() {
        let db = Database::open_in_memory().unwrap();
        let u = user("alice");
        db.create_user(&u).unwrap();

        let fetched = db.get_user_by_username("alice").unwrap();
        assert_eq!(fetched.id, u.id);
        assert!(matches!(
            db.get_user_by_username("bob"),
            Err(StoreError::NotFound)
        ));
    }

    #[test]
    fn duplicate_username_is_a_conflict() {
        let db = Database::open_in_memory().unwrap();
        db.create_user(&user("alice")).unwrap();
        assert!(matches!(
            db.create_user(&user("alice")),
            Err(StoreError::Conflict(_))
        ));
    }
}
