use rusqlite::params;
use uuid::Uuid;

use crate::col;
use crate::database::Database;
use crate::error::Result;
use crate::models::Comment;

impl Database {
    pub fn create_comment(&self, comment: &Comment) -> Result<()> {
        self.conn().execute(
            "INSERT INTO comments (id, post_id, author_id, text, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                comment.id.to_string(),
                comment.post_id.to_string(),
                comment.author_id.to_string(),
                comment.text,
                comment.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// All comments on a post, oldest first.
    pub fn list_comments_for_post(&self, post_id: Uuid) -> Result<Vec<Comment>> {
        let mut stmt = self.conn().prepare(
            "SELECT id, post_id, author_id, text, created_at
             FROM comments
             WHERE post_id = ?1
             ORDER BY created_at ASC",
        )?;

        let rows = stmt.query_map(params![post_id.to_string()], row_to_comment)?;

        let mut comments = Vec::new();
        for row in rows {
            comments.push(row?);
        }
        Ok(comments)
    }
}

fn row_to_comment(row: &rusqlite::Row<'_>) -> rusqlite::Result<Comment> {
    Ok(Comment {
        id: col::uuid(row, 0)?,
        post_id: col::uuid(row, 1)?,
        author_id: col::uuid(row, 2)?,
        text: row.get(3)?,
        created_at: col::timestamp(row, 4)?,
    })
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    use crate::{Comment, Database, Post, User};

    fn seed(db: &Database) -> (User, Post) {
        let user = User {
            id: Uuid::new_v4(),
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            name: "Alice".to_string(),
            created_at: Utc::now(),
        };
        db.create_user(&user).unwrap();
        let post = Post {
            id: Uuid::new_v4(),
            text: "a post".to_string(),
            published_at: Utc::now(),
            author_id: user.id,
            group_id: None,
            image: None,
        };
        db.create_post(&post).unwrap();
        (user, post)
    }

    #[test]
    fn comments_come_back_oldest_first() {
        let db = Database::open_in_memory().unwrap();
        let (user, post) = seed(&db);

        for (i, text) in ["first", "second"].iter().enumerate() {
            db.create_comment(&Comment {
                id: Uuid::new_v4(),
                post_id: post.id,
                author_id: user.id,
                text: text.to_string(),
                created_at: Utc::now() - Duration::minutes(2 - i as i64),
            })
            .unwrap();
        }

        let comments = db.list_comments_for_post(post.id).unwrap();
        assert_eq!(comments.len(), 2);
        assert_eq!(comments[0].text, "first");
    }

    #[test]
    fn deleting_post_cascades_comments() {
        let db = Database::open_in_memory().unwrap();
        let (user, post) = seed(&db);

        db.create_comment(&Comment {
            id: Uuid::new_v4(),
            post_id: post.id,
            author_id: user.id,
            text: "nice".to_string(),
            created_at: Utc::now(),
        })
        .unwrap();

        assert!(db.delete_post(post.id).unwrap());
        assert!(db.list_comments_for_post(post.id).unwrap().is_empty());
    }
}
