//! Per-user last-logout records.

use chrono::{DateTime, Utc};
use rusqlite::params;
use uuid::Uuid;

use crate::col;
use crate::database::Database;
use crate::error::Result;
use crate::models::LogoutTime;

impl Database {
    /// Record a logout for the user.  The table holds exactly one row per
    /// user; repeat logouts overwrite the timestamp in place.
    pub fn upsert_logout_time(&self, user_id: Uuid, logout_at: DateTime<Utc>) -> Result<()> {
        self.conn().execute(
            "INSERT INTO logout_times (user_id, logout_at) VALUES (?1, ?2)
             ON CONFLICT(user_id) DO UPDATE SET logout_at = excluded.logout_at",
            params![user_id.to_string(), logout_at.to_rfc3339()],
        )?;
        Ok(())
    }

    /// The user's last recorded logout, if any.
    pub fn get_logout_time(&self, user_id: Uuid) -> Result<Option<LogoutTime>> {
        let mut stmt = self.conn().prepare(
            "SELECT user_id, logout_at FROM logout_times WHERE user_id = ?1",
        )?;

        let mut rows = stmt.query_map(params![user_id.to_string()], row_to_logout_time)?;
        rows.next().transpose().map_err(Into::into)
    }
}

fn row_to_logout_time(row: &rusqlite::Row<'_>) -> rusqlite::Result<LogoutTime> {
    Ok(LogoutTime {
        user_id: col::uuid(row, 0)?,
        logout_at: col::opt_timestamp(row, 1)?,
    })
}
