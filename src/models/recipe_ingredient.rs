//! Recipe ingredient model
//!
//! An ingredient row holds a free-form name plus an optional quantity and
//! unit. Both are nullable: "a pinch of salt" has neither. The conversion
//! layer treats these rows as read-only input.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;

/// An ingredient row within a recipe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeIngredient {
    pub id: i64,
    pub recipe_id: i64,
    pub name: String,
    pub quantity: Option<f64>,
    pub unit: Option<String>,
    pub position: i64,
    pub created_at: String,
    pub updated_at: String,
}

/// Data for adding an ingredient to a recipe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeIngredientCreate {
    pub recipe_id: i64,
    pub name: String,
    pub quantity: Option<f64>,
    pub unit: Option<String>,
}

/// Data for updating a recipe ingredient
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecipeIngredientUpdate {
    pub name: Option<String>,
    /// Some(None) clears the quantity, None leaves it untouched
    pub quantity: Option<Option<f64>>,
    /// Some(None) clears the unit, None leaves it untouched
    pub unit: Option<Option<String>>,
    pub position: Option<i64>,
}

impl RecipeIngredient {
    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            recipe_id: row.get("recipe_id")?,
            name: row.get("name")?,
            quantity: row.get("quantity")?,
            unit: row.get("unit")?,
            position: row.get("position")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// Add an ingredient to a recipe, appended at the end
    pub fn create(conn: &Connection, data: &RecipeIngredientCreate) -> DbResult<Self> {
        let next_position: i64 = conn.query_row(
            "SELECT COALESCE(MAX(position), -1) + 1 FROM recipe_ingredients WHERE recipe_id = ?1",
            [data.recipe_id],
            |row| row.get(0),
        )?;

        conn.execute(
            r#"
            INSERT INTO recipe_ingredients (recipe_id, name, quantity, unit, position)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                data.recipe_id,
                data.name,
                data.quantity,
                data.unit,
                next_position,
            ],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?.ok_or_else(|| {
            crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows)
        })
    }

    /// Get an ingredient by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM recipe_ingredients WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(item) => Ok(Some(item)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Get all ingredients for a recipe in display order
    pub fn get_for_recipe(conn: &Connection, recipe_id: i64) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM recipe_ingredients WHERE recipe_id = ?1 ORDER BY position, id",
        )?;

        let ingredients = stmt
            .query_map([recipe_id], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ingredients)
    }

    /// Update an ingredient
    pub fn update(conn: &Connection, id: i64, data: &RecipeIngredientUpdate) -> DbResult<Option<Self>> {
        let mut updates = Vec::new();
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(ref name) = data.name {
            updates.push(format!("name = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(name.clone()));
        }
        if let Some(quantity) = data.quantity {
            updates.push(format!("quantity = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(quantity));
        }
        if let Some(ref unit) = data.unit {
            updates.push(format!("unit = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(unit.clone()));
        }
        if let Some(position) = data.position {
            updates.push(format!("position = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(position));
        }

        if updates.is_empty() {
            return Self::get_by_id(conn, id);
        }

        updates.push("updated_at = datetime('now')".to_string());

        let sql = format!(
            "UPDATE recipe_ingredients SET {} WHERE id = ?{}",
            updates.join(", "),
            params_vec.len() + 1
        );

        params_vec.push(Box::new(id));

        let params_refs: Vec<&dyn rusqlite::ToSql> = params_vec.iter().map(|p| p.as_ref()).collect();
        conn.execute(&sql, params_refs.as_slice())?;

        Self::get_by_id(conn, id)
    }

    /// Delete an ingredient
    pub fn delete(conn: &Connection, id: i64) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM recipe_ingredients WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;
    use crate::models::{Kitchen, KitchenCreate, KitchenKind, Recipe, RecipeCreate};

    fn recipe_conn() -> (Connection, i64) {
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
                title: "Porridge".to_string(),
                description: None,
                servings: 2,
                notes: None,
            },
        )
        .unwrap();
        let recipe_id = recipe.id;
        (conn, recipe_id)
    }

    #[test]
    fn test_ingredients_keep_insertion_order() {
        let (conn, recipe_id) = recipe_conn();
        for (name, qty, unit) in [
            ("oats", Some(100.0), Some("g")),
            ("milk", Some(4.0), Some("dl")),
            ("salt", None, None),
        ] {
            RecipeIngredient::create(
                &conn,
                &RecipeIngredientCreate {
                    recipe_id,
                    name: name.to_string(),
                    quantity: qty,
                    unit: unit.map(|u| u.to_string()),
                },
            )
            .unwrap();
        }

        let ingredients = RecipeIngredient::get_for_recipe(&conn, recipe_id).unwrap();
        let names: Vec<_> = ingredients.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["oats", "milk", "salt"]);
        assert_eq!(ingredients[0].position, 0);
        assert_eq!(ingredients[2].position, 2);
        assert_eq!(ingredients[2].quantity, None);
    }

    #[test]
    fn test_update_can_clear_quantity() {
        let (conn, recipe_id) = recipe_conn();
        let ing = RecipeIngredient::create(
            &conn,
            &RecipeIngredientCreate {
                recipe_id,
                name: "butter".to_string(),
                quantity: Some(50.0),
                unit: Some("g".to_string()),
            },
        )
        .unwrap();

        let updated = RecipeIngredient::update(
            &conn,
            ing.id,
            &RecipeIngredientUpdate {
                quantity: Some(None),
                ..Default::default()
            },
        )
        .unwrap()
        .unwrap();
        assert_eq!(updated.quantity, None);
        assert_eq!(updated.unit.as_deref(), Some("g"));
    }

    #[test]
    fn test_delete_recipe_cascades_to_ingredients() {
        let (conn, recipe_id) = recipe_conn();
        RecipeIngredient::create(
            &conn,
            &RecipeIngredientCreate {
                recipe_id,
                name: "flour".to_string(),
                quantity: Some(500.0),
                unit: Some("g".to_string()),
            },
        )
        .unwrap();

        Recipe::delete(&conn, recipe_id).unwrap();
        assert!(RecipeIngredient::get_for_recipe(&conn, recipe_id)
            .unwrap()
            .is_empty());
    }
}
