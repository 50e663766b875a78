//! Tag MCP Tools
//!
//! Tools for attaching tags to recipes.

use serde::Serialize;

use crate::db::Database;
use crate::models::{Recipe, Tag};

/// Response for tag_recipe
#[derive(Debug, Serialize)]
pub struct TagRecipeResponse {
    pub recipe_id: i64,
    pub tag_id: i64,
    pub tag_name: String,
    /// false when the tag was already attached
    pub attached: bool,
}

/// One tag with its usage count
#[derive(Debug, Serialize)]
pub struct TagSummary {
    pub id: i64,
    pub name: String,
    pub recipe_count: i64,
}

/// Response for list_tags
#[derive(Debug, Serialize)]
pub struct ListTagsResponse {
    pub tags: Vec<TagSummary>,
    pub count: usize,
}

/// Attach a tag to a recipe, creating the tag on first use
pub fn tag_recipe(db: &Database, recipe_id: i64, name: &str) -> Result<TagRecipeResponse, String> {
    let name = name.trim();
    if name.is_empty() {
        return Err("Tag name cannot be empty".to_string());
    }

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let recipe = Recipe::get_by_id(&conn, recipe_id)
        .map_err(|e| format!("Database error checking recipe: {}", e))?;
    if recipe.is_none() {
        return Err(format!("Recipe not found with id: {}", recipe_id));
    }

    let tag = Tag::get_or_create(&conn, name)
        .map_err(|e| format!("Failed to create tag: {}", e))?;
    let attached = Tag::attach(&conn, recipe_id, tag.id)
        .map_err(|e| format!("Failed to attach tag: {}", e))?;

    Ok(TagRecipeResponse {
        recipe_id,
        tag_id: tag.id,
        tag_name: tag.name,
        attached,
    })
}

/// Detach a tag from a recipe
pub fn untag_recipe(db: &Database, recipe_id: i64, tag_id: i64) -> Result<bool, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    Tag::detach(&conn, recipe_id, tag_id).map_err(|e| format!("Failed to detach tag: {}", e))
}

/// List all tags with usage counts
pub fn list_tags(db: &Database) -> Result<ListTagsResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let tags = Tag::list_with_counts(&conn)
        .map_err(|e| format!("Failed to list tags: {}", e))?
        .into_iter()
        .map(|(tag, recipe_count)| TagSummary {
            id: tag.id,
            name: tag.name,
            recipe_count,
        })
        .collect::<Vec<_>>();

    let count = tags.len();
    Ok(ListTagsResponse { tags, count })
}
