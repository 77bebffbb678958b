//! Logout tracking.
//!
//! Every logout upserts the user's single last-logout record.  Both the
//! create and the update path assign the same value: the current time
//! shifted by a fixed, configurable clock offset (default zero).

use chrono::{DateTime, Duration, Utc};
use gazette_store::Database;
use uuid::Uuid;

use crate::error::Result;

/// Records last-logout timestamps.
#[derive(Debug, Clone)]
pub struct LogoutTracker {
    clock_offset: Duration,
}

impl LogoutTracker {
    /// `offset_hours` is added to every recorded timestamp.  Deployments
    /// that need the legacy timezone correction set it negative.
    pub fn new(offset_hours: i64) -> Self {
        Self {
            clock_offset: Duration::hours(offset_hours),
        }
    }

    /// Record a logout at `now`.  Returns the stored timestamp.
    pub fn record(&self, db: &Database, user: Uuid, now: DateTime<Utc>) -> Result<DateTime<Utc>> {
        let logout_at = now + self.clock_offset;
        db.upsert_logout_time(user, logout_at)?;
        tracing::debug!(%user, %logout_at, "logout recorded");
        Ok(logout_at)
    }

    /// The user's last recorded logout, if any.
    pub fn last_logout(&self, db: &Database, user: Uuid) -> Result<Option<DateTime<Utc>>> {
        Ok(db.get_logout_time(user)?.and_then(|r| r.logout_at))
    }
}

impl Default for LogoutTracker {
    fn default() -> Self {
        Self::new(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil;

    #[test]
    fn first_and_repeat_logouts_keep_one_record() {
        let db = testutil::db();
        let alice = testutil::user(&db, "alice");
        let tracker = LogoutTracker::default();

        let first = Utc::now() - Duration::minutes(30);
        let second = Utc::now();

        tracker.record(&db, alice.id, first).unwrap();
        tracker.record(&db, alice.id, second).unwrap();

        assert_eq!(tracker.last_logout(&db, alice.id).unwrap(), Some(second));
    }

    #[test]
    fn both_branches_apply_the_same_offset() {
        let db = testutil::db();
        let alice = testutil::user(&db, "alice");
        let tracker = LogoutTracker::new(-3);

        let now = Utc::now();
        let created = tracker.record(&db, alice.id, now).unwrap();
        assert_eq!(created, now - Duration::hours(3));

        let updated = tracker.record(&db, alice.id, now).unwrap();
        assert_eq!(updated, created);
    }

    #[test]
    fn no_record_means_none() {
        let db = testutil::db();
        let alice = testutil::user(&db, "alice");
        let tracker = LogoutTracker::default();
        assert_eq!(tracker.last_logout(&db, alice.id).unwrap(), None);
    }
}
