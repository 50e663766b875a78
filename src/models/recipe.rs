//! Recipe model
//!
//! A recipe belongs to one kitchen; its ingredient quantities are stored for
//! a base serving count.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;

/// A recipe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    pub id: i64,
    pub kitchen_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub servings: i64,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Data for creating a new recipe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeCreate {
    pub kitchen_id: i64,
    pub title: String,
    pub description: Option<String>,
    #[serde(default = "default_servings")]
    pub servings: i64,
    pub notes: Option<String>,
}

fn default_servings() -> i64 {
    1
}

/// Data for updating a recipe
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecipeUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub servings: Option<i64>,
    pub notes: Option<String>,
    pub kitchen_id: Option<i64>,
}

impl Recipe {
    /// Create a Recipe from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            kitchen_id: row.get("kitchen_id")?,
            title: row.get("title")?,
            description: row.get("description")?,
            servings: row.get("servings")?,
            notes: row.get("notes")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// Insert a new recipe into the database
    pub fn create(conn: &Connection, data: &RecipeCreate) -> DbResult<Self> {
        conn.execute(
            r#"
            INSERT INTO recipes (kitchen_id, title, description, servings, notes)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                data.kitchen_id,
                data.title,
                data.description,
                data.servings,
                data.notes,
            ],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?.ok_or_else(|| {
            crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows)
        })
    }

    /// Get a recipe by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM recipes WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(recipe) => Ok(Some(recipe)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// List recipes with optional search and kitchen filtering
    pub fn list(
        conn: &Connection,
        query: Option<&str>,
        kitchen_id: Option<i64>,
        sort_by: &str,
        sort_order: &str,
        limit: i64,
        offset: i64,
    ) -> DbResult<Vec<Self>> {
        let order = if sort_order.to_lowercase() == "desc" { "DESC" } else { "ASC" };
        let sort_col = match sort_by.to_lowercase().as_str() {
            "created_at" => "created_at",
            "updated_at" => "updated_at",
            _ => "title",
        };

        let (sql, search_param) = match (query, kitchen_id) {
            (Some(q), Some(_)) => (
                format!(
                    "SELECT * FROM recipes WHERE title LIKE ?1 AND kitchen_id = ?2 ORDER BY {} {} LIMIT ?3 OFFSET ?4",
                    sort_col, order
                ),
                Some(format!("%{}%", q)),
            ),
            (Some(q), None) => (
                format!(
                    "SELECT * FROM recipes WHERE title LIKE ?1 ORDER BY {} {} LIMIT ?2 OFFSET ?3",
                    sort_col, order
                ),
                Some(format!("%{}%", q)),
            ),
            (None, Some(_)) => (
                format!(
                    "SELECT * FROM recipes WHERE kitchen_id = ?1 ORDER BY {} {} LIMIT ?2 OFFSET ?3",
                    sort_col, order
                ),
                None,
            ),
            (None, None) => (
                format!(
                    "SELECT * FROM recipes ORDER BY {} {} LIMIT ?1 OFFSET ?2",
                    sort_col, order
                ),
                None,
            ),
        };

        let mut stmt = conn.prepare(&sql)?;

        let recipes = match (search_param, kitchen_id) {
            (Some(pattern), Some(kid)) => stmt
                .query_map(params![pattern, kid, limit, offset], Self::from_row)?
                .collect::<Result<Vec<_>, _>>()?,
            (Some(pattern), None) => stmt
                .query_map(params![pattern, limit, offset], Self::from_row)?
                .collect::<Result<Vec<_>, _>>()?,
            (None, Some(kid)) => stmt
                .query_map(params![kid, limit, offset], Self::from_row)?
                .collect::<Result<Vec<_>, _>>()?,
            (None, None) => stmt
                .query_map(params![limit, offset], Self::from_row)?
                .collect::<Result<Vec<_>, _>>()?,
        };

        Ok(recipes)
    }

    /// Update a recipe
    pub fn update(conn: &Connection, id: i64, data: &RecipeUpdate) -> DbResult<Option<Self>> {
        let mut updates = Vec::new();
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(ref title) = data.title {
            updates.push(format!("title = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(title.clone()));
        }
        if let Some(ref description) = data.description {
            updates.push(format!("description = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(description.clone()));
        }
        if let Some(servings) = data.servings {
            updates.push(format!("servings = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(servings));
        }
        if let Some(ref notes) = data.notes {
            updates.push(format!("notes = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(notes.clone()));
        }
        if let Some(kitchen_id) = data.kitchen_id {
            updates.push(format!("kitchen_id = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(kitchen_id));
        }

        if updates.is_empty() {
            return Self::get_by_id(conn, id);
        }

        updates.push("updated_at = datetime('now')".to_string());

        let sql = format!(
            "UPDATE recipes SET {} WHERE id = ?{}",
            updates.join(", "),
            params_vec.len() + 1
        );

        params_vec.push(Box::new(id));

        let params_refs: Vec<&dyn rusqlite::ToSql> = params_vec.iter().map(|p| p.as_ref()).collect();
        conn.execute(&sql, params_refs.as_slice())?;

        Self::get_by_id(conn, id)
    }

    /// Count recipes, optionally within one kitchen
    pub fn count(conn: &Connection, kitchen_id: Option<i64>) -> DbResult<i64> {
        let count: i64 = match kitchen_id {
            Some(kid) => conn.query_row(
                "SELECT COUNT(*) FROM recipes WHERE kitchen_id = ?1",
                [kid],
                |row| row.get(0),
            )?,
            None => conn.query_row("SELECT COUNT(*) FROM recipes", [], |row| row.get(0))?,
        };
        Ok(count)
    }

    /// Delete a recipe
    /// Returns Ok(true) if deleted, Ok(false) if not found
    pub fn delete(conn: &Connection, id: i64) -> DbResult<bool> {
        // Delete cascades to recipe_ingredients and recipe_tags
        let rows = conn.execute("DELETE FROM recipes WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;
    use crate::models::{Kitchen, KitchenCreate, KitchenKind};

    fn test_conn() -> (Connection, i64) {
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
        let kitchen_id = kitchen.id;
        (conn, kitchen_id)
    }

    #[test]
    fn test_create_defaults_to_one_serving() {
        let (conn, kitchen_id) = test_conn();
        let recipe = Recipe::create(
            &conn,
            &RecipeCreate {
                kitchen_id,
                title: "Pancakes".to_string(),
                description: None,
                servings: 1,
                notes: None,
            },
        )
        .unwrap();
        assert_eq!(recipe.servings, 1);
    }

    #[test]
    fn test_list_searches_by_title() {
        let (conn, kitchen_id) = test_conn();
        for title in ["Pancakes", "Pea soup", "Rye bread"] {
            Recipe::create(
                &conn,
                &RecipeCreate {
                    kitchen_id,
                    title: title.to_string(),
                    description: None,
                    servings: 1,
                    notes: None,
                },
            )
            .unwrap();
        }

        let hits = Recipe::list(&conn, Some("pan"), None, "title", "asc", 50, 0).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "Pancakes");

        let all = Recipe::list(&conn, None, Some(kitchen_id), "title", "asc", 50, 0).unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(Recipe::count(&conn, Some(kitchen_id)).unwrap(), 3);
    }

    #[test]
    fn test_kitchen_with_recipes_cannot_be_deleted() {
        let (conn, kitchen_id) = test_conn();
        Recipe::create(
            &conn,
            &RecipeCreate {
                kitchen_id,
                title: "Soup".to_string(),
                description: None,
                servings: 1,
                notes: None,
            },
        )
        .unwrap();

        // recipes reference the kitchen with ON DELETE RESTRICT
        assert!(Kitchen::delete(&conn, kitchen_id).is_err());
    }
}
