//! The follow graph: directed edges between users.
//!
//! An edge `(user, author)` means `user` sees `author`'s posts in their
//! aggregated feed.  At most one edge exists per pair, and a user never
//! follows themselves.

use chrono::{DateTime, Utc};
use gazette_store::Database;
use uuid::Uuid;

use crate::error::Result;

/// What a follow request did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowOutcome {
    /// A new edge was created.
    Created,
    /// The edge already existed; nothing changed.
    AlreadyFollowing,
    /// The user tried to follow themselves; nothing changed.
    SelfFollow,
}

/// Create a follow edge from `user` to `author`.
///
/// Idempotent: repeat calls for the same pair keep a single edge.  The
/// self-follow guard runs before anything touches the store.
pub fn follow(
    db: &Database,
    user: Uuid,
    author: Uuid,
    now: DateTime<Utc>,
) -> Result<FollowOutcome> {
    if user == author {
        return Ok(FollowOutcome::SelfFollow);
    }

    if db.create_follow(user, author, now)? {
        tracing::debug!(%user, %author, "follow edge created");
        Ok(FollowOutcome::Created)
    } else {
        Ok(FollowOutcome::AlreadyFollowing)
    }
}

/// Remove the follow edge from `user` to `author`, if present.
///
/// Returns `true` if an edge was removed; absence is not an error.
pub fn unfollow(db: &Database, user: Uuid, author: Uuid) -> Result<bool> {
    let removed = db.delete_follow(user, author)?;
    if removed {
        tracing::debug!(%user, %author, "follow edge removed");
    }
    Ok(removed)
}

/// Whether `user` follows `author`.
pub fn is_following(db: &Database, user: Uuid, author: Uuid) -> Result<bool> {
    Ok(db.follow_exists(user, author)?)
}

/// All users following `author`.
pub fn followers_of(db: &Database, author: Uuid) -> Result<Vec<gazette_store::User>> {
    Ok(db.followers_of(author)?)
}

/// All authors `user` follows.
pub fn followed_by(db: &Database, user: Uuid) -> Result<Vec<gazette_store::User>> {
    Ok(db.followed_by(user)?)
}
