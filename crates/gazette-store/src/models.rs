//! Domain model structs persisted in the SQLite database.
//!
//! Every struct derives `Serialize` and `Deserialize` so it can be handed
//! directly to the HTTP layer as a JSON payload.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// User
// ---------------------------------------------------------------------------

/// A user identity, mirrored from the external identity provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    /// Unique user identifier.
    pub id: Uuid,
    /// Unique login / URL handle.
    pub username: String,
    /// Address used for follower notifications.
    pub email: String,
    /// Display name used when personalizing notification bodies.
    pub name: String,
    /// When this user was first mirrored locally.
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Group
// ---------------------------------------------------------------------------

/// A topical group posts can be filed under.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Group {
    /// Unique group identifier.
    pub id: Uuid,
    /// Human-readable title.
    pub title: String,
    /// Unique URL slug (`[a-z0-9-]`).
    pub slug: String,
    /// Short description shown on the group page.
    pub description: String,
}

// ---------------------------------------------------------------------------
// Post
// ---------------------------------------------------------------------------

/// A published post.  `author_id` and `published_at` are set once at
/// creation; only `text`, `group_id` and `image` are editable.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Post {
    /// Unique post identifier.
    pub id: Uuid,
    /// Post body, non-empty.
    pub text: String,
    /// Publish timestamp, immutable.
    pub published_at: DateTime<Utc>,
    /// The author, required.
    pub author_id: Uuid,
    /// Optional group the post is filed under.
    pub group_id: Option<Uuid>,
    /// Optional opaque reference to an image blob (storage is external).
    pub image: Option<String>,
}

// ---------------------------------------------------------------------------
// Comment
// ---------------------------------------------------------------------------

/// A comment on a post.  Immutable once created; deleted with its post.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Comment {
    /// Unique comment identifier.
    pub id: Uuid,
    /// The post this comment belongs to.
    pub post_id: Uuid,
    /// The comment author.
    pub author_id: Uuid,
    /// Comment body, non-empty.
    pub text: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Follow edge
// ---------------------------------------------------------------------------

/// A directed follow relation: `user_id` sees `author_id`'s posts in the
/// aggregated feed.  At most one edge per pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Follow {
    /// The follower.
    pub user_id: Uuid,
    /// The followed author.
    pub author_id: Uuid,
    /// When the edge was created.
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// LogoutTime
// ---------------------------------------------------------------------------

/// The per-user last-logout record.  Exactly one row per user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LogoutTime {
    /// The user this record belongs to.
    pub user_id: Uuid,
    /// Last recorded logout, if any.
    pub logout_at: Option<DateTime<Utc>>,
}
