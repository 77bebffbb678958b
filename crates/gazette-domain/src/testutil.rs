//! Shared fixtures for the domain tests.

use chrono::{DateTime, Utc};
use gazette_store::{Database, Post, User};
use uuid::Uuid;

pub(crate) fn db() -> Database {
    Database::open_in_memory().expect("in-memory database")
}

pub(crate) fn user(db: &Database, username: &str) -> User {
    let user = User {
        id: Uuid::new_v4(),
        username: username.to_string(),
        email: format!("{username}@example.com"),
        name: username.to_string(),
        created_at: Utc::now(),
    };
    db.create_user(&user).expect("seed user");
    user
}

pub(crate) fn post(db: &Database, author: &User, text: &str, published_at: DateTime<Utc>) -> Post {
    let post = Post {
        id: Uuid::new_v4(),
        text: text.to_string(),
        published_at,
        author_id: author.id,
        group_id: None,
        image: None,
    };
    db.create_post(&post).expect("seed post");
    post
}
