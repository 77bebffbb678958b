//! Feed composition: the aggregated post list a user sees.

use gazette_store::{pagination, Database, Page, Post, PAGE_SIZE};
use uuid::Uuid;

use crate::error::Result;

/// Compose one page of `user`'s feed: posts authored by anyone the user
/// follows, newest first.  Page numbers are 1-indexed and clamp to the
/// last page when out of range.
pub fn compose_feed(db: &Database, user: Uuid, page: u32) -> Result<Page<Post>> {
    let total = db.count_feed_posts(user)?;
    let spec = pagination::clamp(page, total, PAGE_SIZE);
    let items = db.list_feed_posts_page(user, spec.limit, spec.offset)?;
    Ok(Page::new(items, spec, total))
}
