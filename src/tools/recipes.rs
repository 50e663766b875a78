//! Recipe MCP Tools
//!
//! Tools for managing recipes and ingredients, plus the serving-scaled
//! ingredient view that runs the Resolver -> Converter -> Formatter chain.

use std::collections::HashMap;

use serde::Serialize;

use crate::db::Database;
use crate::models::{
    Kitchen, Recipe, RecipeCreate, RecipeIngredient, RecipeIngredientCreate,
    RecipeIngredientUpdate, RecipeUpdate, Tag,
};
use crate::units::{convert_quantity, format_quantity, unit_options, Servings};

/// Response for create_recipe
#[derive(Debug, Serialize)]
pub struct CreateRecipeResponse {
    pub id: i64,
    pub kitchen_id: i64,
    pub title: String,
    pub created_at: String,
}

/// Full recipe detail with ingredients and tags
#[derive(Debug, Serialize)]
pub struct RecipeDetail {
    pub id: i64,
    pub kitchen_id: i64,
    pub kitchen_name: String,
    pub title: String,
    pub description: Option<String>,
    pub servings: i64,
    pub ingredients: Vec<RecipeIngredient>,
    pub tags: Vec<String>,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Recipe summary for listing
#[derive(Debug, Serialize)]
pub struct RecipeSummary {
    pub id: i64,
    pub kitchen_id: i64,
    pub title: String,
    pub servings: i64,
    pub ingredient_count: usize,
    pub tags: Vec<String>,
}

/// Response for list_recipes
#[derive(Debug, Serialize)]
pub struct ListRecipesResponse {
    pub recipes: Vec<RecipeSummary>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

/// Response for add_recipe_ingredient
#[derive(Debug, Serialize)]
pub struct AddIngredientResponse {
    pub id: i64,
    pub recipe_id: i64,
    pub name: String,
    pub quantity: Option<f64>,
    pub unit: Option<String>,
    pub position: i64,
}

/// One ingredient row as it should be displayed after scaling/conversion
#[derive(Debug, Serialize)]
pub struct ScaledIngredient {
    pub id: i64,
    pub name: String,
    /// Formatted quantity; empty when the stored quantity is unspecified
    pub display_quantity: String,
    /// The unit the quantity is shown in (override, or the stored unit)
    pub display_unit: Option<String>,
    /// Alternative units the caller may switch this row to
    pub unit_choices: Vec<String>,
}

/// Response for scale_recipe
#[derive(Debug, Serialize)]
pub struct ScaleRecipeResponse {
    pub recipe_id: i64,
    pub title: String,
    /// The recipe's stored base serving count
    pub base_servings: i64,
    /// The serving count the quantities were scaled to
    pub servings: u32,
    pub ingredients: Vec<ScaledIngredient>,
}

/// Response for successful delete
#[derive(Debug, Serialize)]
pub struct RecipeDeleteSuccessResponse {
    pub success: bool,
    pub deleted_id: i64,
}

// ============================================================================
// Recipe Tools
// ============================================================================

/// Create a new recipe
pub fn create_recipe(db: &Database, data: RecipeCreate) -> Result<CreateRecipeResponse, String> {
    let title = data.title.trim();
    if title.is_empty() {
        return Err("Recipe title cannot be empty".to_string());
    }
    if data.servings < 1 {
        return Err("servings must be a positive integer".to_string());
    }

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let kitchen = Kitchen::get_by_id(&conn, data.kitchen_id)
        .map_err(|e| format!("Database error checking kitchen: {}", e))?;
    if kitchen.is_none() {
        return Err(format!("Kitchen not found with id: {}", data.kitchen_id));
    }

    let recipe = Recipe::create(&conn, &data)
        .map_err(|e| format!("Failed to create recipe: {}", e))?;

    Ok(CreateRecipeResponse {
        id: recipe.id,
        kitchen_id: recipe.kitchen_id,
        title: recipe.title,
        created_at: recipe.created_at,
    })
}

/// Get a recipe with full details
pub fn get_recipe(db: &Database, id: i64) -> Result<Option<RecipeDetail>, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let recipe = Recipe::get_by_id(&conn, id)
        .map_err(|e| format!("Failed to get recipe: {}", e))?;

    match recipe {
        Some(recipe) => {
            let kitchen = Kitchen::get_by_id(&conn, recipe.kitchen_id)
                .map_err(|e| format!("Failed to get kitchen: {}", e))?
                .ok_or_else(|| format!("Kitchen not found with id: {}", recipe.kitchen_id))?;

            let ingredients = RecipeIngredient::get_for_recipe(&conn, id)
                .map_err(|e| format!("Failed to get ingredients: {}", e))?;

            let tags = Tag::get_for_recipe(&conn, id)
                .map_err(|e| format!("Failed to get tags: {}", e))?
                .into_iter()
                .map(|t| t.name)
                .collect();

            Ok(Some(RecipeDetail {
                id: recipe.id,
                kitchen_id: recipe.kitchen_id,
                kitchen_name: kitchen.name,
                title: recipe.title,
                description: recipe.description,
                servings: recipe.servings,
                ingredients,
                tags,
                notes: recipe.notes,
                created_at: recipe.created_at,
                updated_at: recipe.updated_at,
            }))
        }
        None => Ok(None),
    }
}

/// List recipes with filtering
pub fn list_recipes(
    db: &Database,
    query: Option<&str>,
    kitchen_id: Option<i64>,
    sort_by: &str,
    sort_order: &str,
    limit: i64,
    offset: i64,
) -> Result<ListRecipesResponse, String> {
    let limit = limit.min(200).max(1);
    let offset = offset.max(0);

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let recipes = Recipe::list(&conn, query, kitchen_id, sort_by, sort_order, limit, offset)
        .map_err(|e| format!("Failed to list recipes: {}", e))?;

    let total = Recipe::count(&conn, kitchen_id)
        .map_err(|e| format!("Failed to count recipes: {}", e))?;

    let mut summaries = Vec::new();
    for recipe in recipes {
        let ingredients = RecipeIngredient::get_for_recipe(&conn, recipe.id)
            .map_err(|e| format!("Failed to get ingredients: {}", e))?;
        let tags = Tag::get_for_recipe(&conn, recipe.id)
            .map_err(|e| format!("Failed to get tags: {}", e))?
            .into_iter()
            .map(|t| t.name)
            .collect();

        summaries.push(RecipeSummary {
            id: recipe.id,
            kitchen_id: recipe.kitchen_id,
            title: recipe.title,
            servings: recipe.servings,
            ingredient_count: ingredients.len(),
            tags,
        });
    }

    Ok(ListRecipesResponse {
        recipes: summaries,
        total,
        limit,
        offset,
    })
}

/// Update a recipe
pub fn update_recipe(
    db: &Database,
    id: i64,
    data: RecipeUpdate,
) -> Result<Option<Recipe>, String> {
    if let Some(ref title) = data.title {
        if title.trim().is_empty() {
            return Err("Recipe title cannot be empty".to_string());
        }
    }
    if let Some(servings) = data.servings {
        if servings < 1 {
            return Err("servings must be a positive integer".to_string());
        }
    }

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    if let Some(kitchen_id) = data.kitchen_id {
        let kitchen = Kitchen::get_by_id(&conn, kitchen_id)
            .map_err(|e| format!("Database error checking kitchen: {}", e))?;
        if kitchen.is_none() {
            return Err(format!("Kitchen not found with id: {}", kitchen_id));
        }
    }

    Recipe::update(&conn, id, &data).map_err(|e| format!("Failed to update recipe: {}", e))
}

/// Delete a recipe
pub fn delete_recipe(db: &Database, id: i64) -> Result<RecipeDeleteSuccessResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let deleted = Recipe::delete(&conn, id)
        .map_err(|e| format!("Failed to delete recipe: {}", e))?;
    if !deleted {
        return Err(format!("Recipe not found with id: {}", id));
    }

    Ok(RecipeDeleteSuccessResponse {
        success: true,
        deleted_id: id,
    })
}

// ============================================================================
// Ingredient Tools
// ============================================================================

/// Add an ingredient to a recipe
pub fn add_recipe_ingredient(
    db: &Database,
    data: RecipeIngredientCreate,
) -> Result<AddIngredientResponse, String> {
    if data.name.trim().is_empty() {
        return Err("Ingredient name cannot be empty".to_string());
    }
    if let Some(qty) = data.quantity {
        if !qty.is_finite() || qty < 0.0 {
            return Err("Ingredient quantity must be a non-negative number".to_string());
        }
    }

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let recipe = Recipe::get_by_id(&conn, data.recipe_id)
        .map_err(|e| format!("Database error checking recipe: {}", e))?;
    if recipe.is_none() {
        return Err(format!("Recipe not found with id: {}", data.recipe_id));
    }

    let ingredient = RecipeIngredient::create(&conn, &data)
        .map_err(|e| format!("Failed to add ingredient: {}", e))?;

    Ok(AddIngredientResponse {
        id: ingredient.id,
        recipe_id: ingredient.recipe_id,
        name: ingredient.name,
        quantity: ingredient.quantity,
        unit: ingredient.unit,
        position: ingredient.position,
    })
}

/// Update a recipe ingredient
pub fn update_recipe_ingredient(
    db: &Database,
    id: i64,
    data: RecipeIngredientUpdate,
) -> Result<Option<RecipeIngredient>, String> {
    if let Some(Some(qty)) = data.quantity {
        if !qty.is_finite() || qty < 0.0 {
            return Err("Ingredient quantity must be a non-negative number".to_string());
        }
    }

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    RecipeIngredient::update(&conn, id, &data)
        .map_err(|e| format!("Failed to update ingredient: {}", e))
}

/// Remove an ingredient from a recipe
pub fn remove_recipe_ingredient(db: &Database, id: i64) -> Result<bool, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    RecipeIngredient::delete(&conn, id)
        .map_err(|e| format!("Failed to remove ingredient: {}", e))
}

// ============================================================================
// Scaling / Conversion Tools
// ============================================================================

/// Compute the serving-scaled, unit-converted ingredient view of a recipe
///
/// Quantities are stored for `recipe.servings` servings; the displayed value
/// is `quantity * servings / base_servings`, then converted to the per-row
/// target unit when one is given and shares a category with the stored unit.
pub fn scale_recipe(
    db: &Database,
    recipe_id: i64,
    servings: Servings,
    unit_overrides: &HashMap<i64, String>,
) -> Result<Option<ScaleRecipeResponse>, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let recipe = Recipe::get_by_id(&conn, recipe_id)
        .map_err(|e| format!("Failed to get recipe: {}", e))?;
    let Some(recipe) = recipe else {
        return Ok(None);
    };

    let ingredients = RecipeIngredient::get_for_recipe(&conn, recipe_id)
        .map_err(|e| format!("Failed to get ingredients: {}", e))?;

    // servings is validated positive; stored base servings is >= 1 by schema
    let scale = servings.as_f64() / recipe.servings as f64;

    let rows = ingredients
        .into_iter()
        .map(|ing| {
            let base_unit = ing.unit.as_deref();
            let target_unit = unit_overrides
                .get(&ing.id)
                .map(String::as_str)
                .or(base_unit);

            let converted = convert_quantity(ing.quantity, base_unit, target_unit, scale);

            ScaledIngredient {
                id: ing.id,
                name: ing.name,
                display_quantity: format_quantity(converted),
                display_unit: target_unit.map(str::to_string),
                unit_choices: unit_options(base_unit),
            }
        })
        .collect();

    Ok(Some(ScaleRecipeResponse {
        recipe_id: recipe.id,
        title: recipe.title,
        base_servings: recipe.servings,
        servings: servings.get(),
        ingredients: rows,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;
    use crate::models::{KitchenCreate, KitchenKind};

    fn test_db() -> Database {
        // Unique name per test db so pooled connections see the same
        // in-memory database without bleeding across tests.
        use std::sync::atomic::{AtomicU64, Ordering};
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        let n = COUNTER.fetch_add(1, Ordering::SeqCst);
        let db = Database::in_memory_shared(&format!("skm_test_{}", n)).unwrap();
        db.with_conn(|conn| run_migrations(conn)).unwrap();
        db
    }

    fn seed_recipe(db: &Database) -> i64 {
        let conn = db.get_conn().unwrap();
        let kitchen = Kitchen::create(
            &conn,
            &KitchenCreate {
                name: "Home".to_string(),
                kind: KitchenKind::Personal,
                color: None,
            },
        )
        .unwrap();
        let recipe = Recipe::create(
            &conn,
            &RecipeCreate {
                kitchen_id: kitchen.id,
                title: "Bread".to_string(),
                description: None,
                servings: 1,
                notes: None,
            },
        )
        .unwrap();
        for (name, qty, unit) in [
            ("flour", Some(500.0), Some("g")),
            ("oil", Some(2.0), Some("tl")),
            ("eggs", Some(3.0), Some("tk")),
            ("salt", None, None::<&str>),
        ] {
            RecipeIngredient::create(
                &conn,
                &RecipeIngredientCreate {
                    recipe_id: recipe.id,
                    name: name.to_string(),
                    quantity: qty,
                    unit: unit.map(str::to_string),
                },
            )
            .unwrap();
        }
        recipe.id
    }

    #[test]
    fn test_scale_recipe_scales_and_converts() {
        let db = test_db();
        let recipe_id = seed_recipe(&db);

        let ingredients = {
            let conn = db.get_conn().unwrap();
            RecipeIngredient::get_for_recipe(&conn, recipe_id).unwrap()
        };
        let flour_id = ingredients[0].id;

        let mut overrides = HashMap::new();
        overrides.insert(flour_id, "kg".to_string());

        let result = scale_recipe(&db, recipe_id, Servings::new(2).unwrap(), &overrides)
            .unwrap()
            .unwrap();

        assert_eq!(result.servings, 2);
        // 500 g doubled -> 1000 g -> 1 kg
        assert_eq!(result.ingredients[0].display_quantity, "1");
        assert_eq!(result.ingredients[0].display_unit.as_deref(), Some("kg"));
        assert_eq!(
            result.ingredients[0].unit_choices,
            vec!["g", "kg", "oz", "lb"]
        );
        // 2 tl doubled, no override -> 4 tl
        assert_eq!(result.ingredients[1].display_quantity, "4");
        // 3 tk doubled -> 6
        assert_eq!(result.ingredients[2].display_quantity, "6");
        assert_eq!(result.ingredients[2].unit_choices, vec!["tk"]);
        // unspecified quantity renders empty
        assert_eq!(result.ingredients[3].display_quantity, "");
        assert!(result.ingredients[3].unit_choices.is_empty());
    }

    #[test]
    fn test_scale_recipe_cross_category_override_scales_only() {
        let db = test_db();
        let recipe_id = seed_recipe(&db);

        let ingredients = {
            let conn = db.get_conn().unwrap();
            RecipeIngredient::get_for_recipe(&conn, recipe_id).unwrap()
        };
        let flour_id = ingredients[0].id;

        let mut overrides = HashMap::new();
        overrides.insert(flour_id, "ml".to_string());

        let result = scale_recipe(&db, recipe_id, Servings::ONE, &overrides)
            .unwrap()
            .unwrap();
        // mass -> volume never converts, number stays scaled-only
        assert_eq!(result.ingredients[0].display_quantity, "500");
    }

    #[test]
    fn test_scale_recipe_missing_recipe_is_none() {
        let db = test_db();
        let result = scale_recipe(&db, 404, Servings::ONE, &HashMap::new()).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_scale_recipe_relative_to_base_servings() {
        let db = test_db();
        let recipe_id = seed_recipe(&db);
        {
            let conn = db.get_conn().unwrap();
            Recipe::update(
                &conn,
                recipe_id,
                &RecipeUpdate {
                    servings: Some(4),
                    ..Default::default()
                },
            )
            .unwrap();
        }

        // stored for 4 servings, asked for 2 -> half quantities
        let result = scale_recipe(&db, recipe_id, Servings::new(2).unwrap(), &HashMap::new())
            .unwrap()
            .unwrap();
        assert_eq!(result.base_servings, 4);
        assert_eq!(result.ingredients[0].display_quantity, "250");
    }
}
