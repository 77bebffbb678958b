//! CRUD operations for [`Group`] records.

use rusqlite::params;
use uuid::Uuid;

use crate::col;
use crate::database::Database;
use crate::error::{conflict_on_unique, Result, StoreError};
use crate::models::Group;

impl Database {
    /// Insert a new group.  Slugs are unique.
    pub fn create_group(&self, group: &Group) -> Result<()> {
        self.conn()
            .execute(
                "INSERT INTO groups (id, title, slug, description)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    group.id.to_string(),
                    group.title,
                    group.slug,
                    group.description,
                ],
            )
            .map_err(|e| conflict_on_unique(e, "slug already taken"))?;
        Ok(())
    }

    /// Fetch a single group by id.
    pub fn get_group(&self, id: Uuid) -> Result<Group> {
        self.conn()
            .query_row(
                "SELECT id, title, slug, description FROM groups WHERE id = ?1",
                params![id.to_string()],
                row_to_group,
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => StoreError::NotFound,
                other => StoreError::Sqlite(other),
            })
    }

    /// Fetch a single group by its URL slug.
    pub fn get_group_by_slug(&self, slug: &str) -> Result<Group> {
        self.conn()
            .query_row(
                "SELECT id, title, slug, description FROM groups WHERE slug = ?1",
                params![slug],
                row_to_group,
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => StoreError::NotFound,
                other => StoreError::Sqlite(other),
            })
    }
}

/// Map a `rusqlite::Row` to a [`Group`].
fn row_to_group(row: &rusqlite::Row<'_>) -> rusqlite::Result<Group> {
    Ok(Group {
        id: col::uuid(row, 0)?,
        title: row.get(1)?,
        slug: row.get(2)?,
        description: row.get(3)?,
    })
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use crate::{Database, Group, StoreError};

    fn group(slug: &str) -> Group {
        Group {
            id: Uuid::new_v4(),
            title: format!("The {slug} group"),
            slug: slug.to_string(),
            description: "about things".to_string(),
        }
    }

    #[test]
    fn slug_lookup() {
        let db = Database::open_in_memory().unwrap();
        let g = group("cooking");
        db.create_group(&g).unwrap();

        assert_eq!(db.get_group_by_slug("cooking").unwrap().id, g.id);
        assert!(matches!(
            db.get_group_by_slug("gardening"),
            Err(StoreError::NotFound)
        ));
    }

    #[test]
    fn duplicate_slug_is_a_conflict() {
        let db = Database::open_in_memory().unwrap();
        db.create_group(&group("cooking")).unwrap();
        assert!(matches!(
            db.create_group(&group("cooking")),
            Err(StoreError::Conflict(_))
        ));
    }
}
