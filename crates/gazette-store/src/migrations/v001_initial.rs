//! v001 -- Initial schema creation.
//!
//! Creates the core tables: `users`, `groups`, `posts`, `comments`,
//! `follows`, `logout_times` and `post_reads`.

use rusqlite::Connection;

/// SQL executed when upgrading from version 0 to version 1.
const UP_SQL: &str = r#"
-- ----------------------------------------------------------------
-- Users (mirrored from the external identity provider)
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS users (
    id         TEXT PRIMARY KEY NOT NULL,   -- UUID v4
    username   TEXT NOT NULL UNIQUE,
    email      TEXT NOT NULL,
    name       TEXT NOT NULL,               -- display name used in mail bodies
    created_at TEXT NOT NULL                -- ISO-8601 / RFC-3339
);

-- ----------------------------------------------------------------
-- Groups
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS groups (
    id          TEXT PRIMARY KEY NOT NULL,  -- UUID v4
    title       TEXT NOT NULL,
    slug        TEXT NOT NULL UNIQUE,
    description TEXT NOT NULL
);

-- ----------------------------------------------------------------
-- Posts
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS posts (
    id           TEXT PRIMARY KEY NOT NULL, -- UUID v4
    text         TEXT NOT NULL,
    published_at TEXT NOT NULL,             -- set once, at creation
    author_id    TEXT NOT NULL,             -- FK -> users(id)
    group_id     TEXT,                      -- nullable FK -> groups(id)
    image        TEXT,                      -- opaque blob reference

    FOREIGN KEY (author_id) REFERENCES users(id) ON DELETE CASCADE,
    FOREIGN KEY (group_id)  REFERENCES groups(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_posts_published
    ON posts(published_at DESC);
CREATE INDEX IF NOT EXISTS idx_posts_author ON posts(author_id);
CREATE INDEX IF NOT EXISTS idx_posts_group  ON posts(group_id);

-- ----------------------------------------------------------------
-- Comments (cascade-deleted with their post)
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS comments (
    id         TEXT PRIMARY KEY NOT NULL,   -- UUID v4
    post_id    TEXT NOT NULL,               -- FK -> posts(id)
    author_id  TEXT NOT NULL,               -- FK -> users(id)
    text       TEXT NOT NULL,
    created_at TEXT NOT NULL,

    FOREIGN KEY (post_id)   REFERENCES posts(id) ON DELETE CASCADE,
    FOREIGN KEY (author_id) REFERENCES users(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_comments_post ON comments(post_id);

-- ----------------------------------------------------------------
-- Follow edges.  The unique index makes concurrent duplicate
-- follows collapse to a single edge.
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS follows (
    user_id    TEXT NOT NULL,               -- FK -> users(id), the follower
    author_id  TEXT NOT NULL,               -- FK -> users(id), the followed
    created_at TEXT NOT NULL,

    FOREIGN KEY (user_id)   REFERENCES users(id) ON DELETE CASCADE,
    FOREIGN KEY (author_id) REFERENCES users(id) ON DELETE CASCADE
);

CREATE UNIQUE INDEX IF NOT EXISTS idx_follows_unique
    ON follows(user_id, author_id);
CREATE INDEX IF NOT EXISTS idx_follows_author ON follows(author_id);

-- ----------------------------------------------------------------
-- Logout times (one row per user, upserted)
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS logout_times (
    user_id   TEXT NOT NULL UNIQUE,         -- FK -> users(id)
    logout_at TEXT,                         -- nullable

    FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
);

-- ----------------------------------------------------------------
-- Per-viewer read marks on posts
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS post_reads (
    post_id TEXT NOT NULL,                  -- FK -> posts(id)
    user_id TEXT NOT NULL,                  -- FK -> users(id)

    FOREIGN KEY (post_id) REFERENCES posts(id) ON DELETE CASCADE,
    FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
);

CREATE UNIQUE INDEX IF NOT EXISTS idx_post_reads_unique
    ON post_reads(post_id, user_id);
"#;

/// Apply the initial migration.
pub fn up(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(UP_SQL)
}
