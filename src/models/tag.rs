//! Tag model
//!
//! Free-form labels attached to recipes through a junction table.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;

/// A tag
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tag {
    pub id: i64,
    pub name: String,
    pub created_at: String,
}

impl Tag {
    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            created_at: row.get("created_at")?,
        })
    }

    /// Look up a tag by name (case-insensitive), creating it if missing
    pub fn get_or_create(conn: &Connection, name: &str) -> DbResult<Self> {
        let existing = conn.query_row(
            "SELECT * FROM tags WHERE name = ?1 COLLATE NOCASE",
            [name],
            Self::from_row,
        );
        match existing {
            Ok(tag) => return Ok(tag),
            Err(rusqlite::Error::QueryReturnedNoRows) => {}
            Err(e) => return Err(e.into()),
        }

        conn.execute("INSERT INTO tags (name) VALUES (?1)", [name])?;
        let id = conn.last_insert_rowid();
        conn.query_row("SELECT * FROM tags WHERE id = ?1", [id], Self::from_row)
            .map_err(Into::into)
    }

    /// List all tags with their usage count
    pub fn list_with_counts(conn: &Connection) -> DbResult<Vec<(Self, i64)>> {
        let mut stmt = conn.prepare(
            r#"
            SELECT t.id, t.name, t.created_at, COUNT(rt.recipe_id) AS recipe_count
            FROM tags t
            LEFT JOIN recipe_tags rt ON rt.tag_id = t.id
            GROUP BY t.id
            ORDER BY t.name ASC
            "#,
        )?;

        let tags = stmt
            .query_map([], |row| {
                Ok((Self::from_row(row)?, row.get::<_, i64>("recipe_count")?))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(tags)
    }

    /// Get the tags attached to a recipe
    pub fn get_for_recipe(conn: &Connection, recipe_id: i64) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            r#"
            SELECT t.id, t.name, t.created_at
            FROM tags t
            INNER JOIN recipe_tags rt ON rt.tag_id = t.id
            WHERE rt.recipe_id = ?1
            ORDER BY t.name ASC
            "#,
        )?;

        let tags = stmt
            .query_map([recipe_id], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(tags)
    }

    /// Attach a tag to a recipe; no-op if already attached
    pub fn attach(conn: &Connection, recipe_id: i64, tag_id: i64) -> DbResult<bool> {
        let rows = conn.execute(
            "INSERT OR IGNORE INTO recipe_tags (recipe_id, tag_id) VALUES (?1, ?2)",
            params![recipe_id, tag_id],
        )?;
        Ok(rows > 0)
    }

    /// Detach a tag from a recipe
    pub fn detach(conn: &Connection, recipe_id: i64, tag_id: i64) -> DbResult<bool> {
        let rows = conn.execute(
            "DELETE FROM recipe_tags WHERE recipe_id = ?1 AND tag_id = ?2",
            params![recipe_id, tag_id],
        )?;
        Ok(rows > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;
    use crate::models::{Kitchen, KitchenCreate, KitchenKind, Recipe, RecipeCreate};

    fn conn_with_recipe() -> (Connection, i64) {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        let kitchen = Kitchen::create(
            &conn,
            &KitchenCreate {
                name: "Test".to_string(),
                kind: KitchenKind::Personal,
                color: None,
            },
        )
        .unwrap();
        let recipe = Recipe::create(
            &conn,
            &RecipeCreate {
                kitchen_id: kitchen.id,
                title: "Stew".to_string(),
                description: None,
                servings: 4,
                notes: None,
            },
        )
        .unwrap();
        let recipe_id = recipe.id;
        (conn, recipe_id)
    }

    #[test]
    fn test_get_or_create_is_case_insensitive() {
        let (conn, _) = conn_with_recipe();
        let a = Tag::get_or_create(&conn, "Vegan").unwrap();
        let b = Tag::get_or_create(&conn, "vegan").unwrap();
        assert_eq!(a.id, b.id);
    }

    #[test]
    fn test_attach_and_detach() {
        let (conn, recipe_id) = conn_with_recipe();
        let tag = Tag::get_or_create(&conn, "dinner").unwrap();

        assert!(Tag::attach(&conn, recipe_id, tag.id).unwrap());
        // second attach is a no-op
        assert!(!Tag::attach(&conn, recipe_id, tag.id).unwrap());

        let tags = Tag::get_for_recipe(&conn, recipe_id).unwrap();
        assert_eq!(tags.len(), 1);

        assert!(Tag::detach(&conn, recipe_id, tag.id).unwrap());
        assert!(Tag::get_for_recipe(&conn, recipe_id).unwrap().is_empty());
    }
}
