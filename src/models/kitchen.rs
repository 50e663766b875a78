//! Kitchen model
//!
//! A kitchen is a personal or shared collection of recipes.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;

/// Kind of kitchen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KitchenKind {
    Personal,
    Shared,
}

impl KitchenKind {
    /// Parse from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "personal" => Some(KitchenKind::Personal),
            "shared" => Some(KitchenKind::Shared),
            _ => None,
        }
    }

    /// Convert to database string
    pub fn to_db_str(&self) -> &'static str {
        match self {
            KitchenKind::Personal => "personal",
            KitchenKind::Shared => "shared",
        }
    }
}

/// A kitchen with its metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Kitchen {
    pub id: i64,
    pub name: String,
    pub kind: KitchenKind,
    pub color: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Data for creating a new kitchen
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KitchenCreate {
    pub name: String,
    pub kind: KitchenKind,
    pub color: Option<String>,
}

/// Data for updating a kitchen
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KitchenUpdate {
    pub name: Option<String>,
    pub color: Option<String>,
}

impl Kitchen {
    /// Create a Kitchen from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let kind_str: String = row.get("kind")?;
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            kind: KitchenKind::from_str(&kind_str).unwrap_or(KitchenKind::Personal),
            color: row.get("color")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// Insert a new kitchen into the database
    pub fn create(conn: &Connection, data: &KitchenCreate) -> DbResult<Self> {
        conn.execute(
            r#"
            INSERT INTO kitchens (name, kind, color)
            VALUES (?1, ?2, ?3)
            "#,
            params![data.name, data.kind.to_db_str(), data.color],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?.ok_or_else(|| {
            crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows)
        })
    }

    /// Get a kitchen by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM kitchens WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(kitchen) => Ok(Some(kitchen)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// List all kitchens, optionally filtered by kind
    pub fn list(conn: &Connection, kind: Option<KitchenKind>) -> DbResult<Vec<Self>> {
        let kitchens = match kind {
            Some(kind) => {
                let mut stmt = conn
                    .prepare("SELECT * FROM kitchens WHERE kind = ?1 ORDER BY name ASC")?;
                let rows = stmt
                    .query_map([kind.to_db_str()], Self::from_row)?
                    .collect::<Result<Vec<_>, _>>()?;
                rows
            }
            None => {
                let mut stmt = conn.prepare("SELECT * FROM kitchens ORDER BY name ASC")?;
                let rows = stmt
                    .query_map([], Self::from_row)?
                    .collect::<Result<Vec<_>, _>>()?;
                rows
            }
        };

        Ok(kitchens)
    }

    /// Update a kitchen's name or color
    pub fn update(conn: &Connection, id: i64, data: &KitchenUpdate) -> DbResult<Option<Self>> {
        let mut updates = Vec::new();
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(ref name) = data.name {
            updates.push(format!("name = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(name.clone()));
        }
        if let Some(ref color) = data.color {
            updates.push(format!("color = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(color.clone()));
        }

        if updates.is_empty() {
            return Self::get_by_id(conn, id);
        }

        updates.push("updated_at = datetime('now')".to_string());

        let sql = format!(
            "UPDATE kitchens SET {} WHERE id = ?{}",
            updates.join(", "),
            params_vec.len() + 1
        );

        params_vec.push(Box::new(id));

        let params_refs: Vec<&dyn rusqlite::ToSql> = params_vec.iter().map(|p| p.as_ref()).collect();
        conn.execute(&sql, params_refs.as_slice())?;

        Self::get_by_id(conn, id)
    }

    /// Count recipes in a kitchen
    pub fn get_recipe_count(conn: &Connection, id: i64) -> DbResult<i64> {
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM recipes WHERE kitchen_id = ?1",
            [id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Delete a kitchen (only if it has no recipes)
    /// Returns Ok(true) if deleted, Ok(false) if not found
    pub fn delete(conn: &Connection, id: i64) -> DbResult<bool> {
        if Self::get_by_id(conn, id)?.is_none() {
            return Ok(false);
        }

        // Delete cascades to kitchen_members and notifications;
        // recipes have ON DELETE RESTRICT, so a non-empty kitchen fails here
        let rows = conn.execute("DELETE FROM kitchens WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;

    fn test_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    #[test]
    fn test_create_and_get_kitchen() {
        let conn = test_conn();
        let kitchen = Kitchen::create(
            &conn,
            &KitchenCreate {
                name: "Family".to_string(),
                kind: KitchenKind::Shared,
                color: Some("#aabbcc".to_string()),
            },
        )
        .unwrap();

        let loaded = Kitchen::get_by_id(&conn, kitchen.id).unwrap().unwrap();
        assert_eq!(loaded.name, "Family");
        assert_eq!(loaded.kind, KitchenKind::Shared);
        assert_eq!(loaded.color.as_deref(), Some("#aabbcc"));
    }

    #[test]
    fn test_list_filters_by_kind() {
        let conn = test_conn();
        for (name, kind) in [
            ("Mine", KitchenKind::Personal),
            ("Ours", KitchenKind::Shared),
        ] {
            Kitchen::create(
                &conn,
                &KitchenCreate {
                    name: name.to_string(),
                    kind,
                    color: None,
                },
            )
            .unwrap();
        }

        let shared = Kitchen::list(&conn, Some(KitchenKind::Shared)).unwrap();
        assert_eq!(shared.len(), 1);
        assert_eq!(shared[0].name, "Ours");
        assert_eq!(Kitchen::list(&conn, None).unwrap().len(), 2);
    }

    #[test]
    fn test_delete_missing_kitchen_is_false() {
        let conn = test_conn();
        assert!(!Kitchen::delete(&conn, 999).unwrap());
    }
}
