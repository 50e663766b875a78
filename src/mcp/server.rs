//! SKM MCP Server Implementation
//!
//! Implements the MCP server with all SKM tools.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::Deserialize;

use crate::db::Database;
use crate::models::{
    KitchenKind, KitchenMemberCreate, KitchenRole, KitchenUpdate, RecipeCreate,
    RecipeIngredientCreate, RecipeIngredientUpdate, RecipeUpdate,
};
use crate::tools::kitchens;
use crate::tools::notifications;
use crate::tools::recipes;
use crate::tools::status::StatusTracker;
use crate::tools::tags;
use crate::units::{categorize_unit, unit_options, Servings};

/// SKM MCP Service
#[derive(Clone)]
pub struct SkmService {
    status_tracker: Arc<tokio::sync::Mutex<StatusTracker>>,
    database: Database,
    tool_router: ToolRouter<SkmService>,
}

impl SkmService {
    pub fn new(database_path: PathBuf, database: Database) -> Self {
        Self {
            status_tracker: Arc::new(tokio::sync::Mutex::new(StatusTracker::new(database_path))),
            database,
            tool_router: Self::tool_router(),
        }
    }
}

// ============================================================================
// Kitchen Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CreateKitchenParams {
    /// Name of the kitchen
    pub name: String,
    /// Kitchen kind: personal or shared (default personal)
    #[serde(default = "default_kitchen_kind")]
    pub kind: String,
    /// Accent color as a hex string (optional)
    pub color: Option<String>,
    /// Name of the member who owns the kitchen
    pub owner: String,
}

fn default_kitchen_kind() -> String { "personal".to_string() }

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetKitchenParams {
    /// Kitchen ID
    pub id: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListKitchensParams {
    /// Filter by kind: personal or shared (optional)
    pub kind: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UpdateKitchenParams {
    /// Kitchen ID to update
    pub id: i64,
    /// New name (optional)
    pub name: Option<String>,
    /// New accent color (optional)
    pub color: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DeleteKitchenParams {
    /// Kitchen ID to delete (must contain no recipes)
    pub id: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AddKitchenMemberParams {
    /// Kitchen ID to add the member to
    pub kitchen_id: i64,
    /// Member name
    pub member: String,
    /// Role: owner or viewer (default viewer)
    #[serde(default = "default_member_role")]
    pub role: String,
}

fn default_member_role() -> String { "viewer".to_string() }

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UpdateKitchenMemberParams {
    /// Membership ID to update
    pub id: i64,
    /// New role: owner or viewer
    pub role: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct RemoveKitchenMemberParams {
    /// Membership ID to remove
    pub id: i64,
}

// ============================================================================
// Recipe Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CreateRecipeParams {
    /// Kitchen the recipe belongs to
    pub kitchen_id: i64,
    /// Recipe title
    pub title: String,
    /// Optional description
    pub description: Option<String>,
    /// Serving count the ingredient quantities are written for (default 1)
    #[serde(default = "default_base_servings")]
    pub servings: i64,
    /// Optional notes
    pub notes: Option<String>,
}

fn default_base_servings() -> i64 { 1 }

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetRecipeParams {
    /// Recipe ID
    pub id: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListRecipesParams {
    /// Search query for recipe title (optional)
    pub query: Option<String>,
    /// Restrict to one kitchen (optional)
    pub kitchen_id: Option<i64>,
    /// Sort by: title or created_at (default title)
    #[serde(default = "default_sort_by")]
    pub sort_by: String,
    /// Sort order: asc or desc (default asc)
    #[serde(default = "default_sort_order")]
    pub sort_order: String,
    /// Maximum results (default 50, max 200)
    #[serde(default = "default_list_limit")]
    pub limit: i64,
    /// Offset for pagination (default 0)
    #[serde(default)]
    pub offset: i64,
}

fn default_sort_by() -> String { "title".to_string() }
fn default_sort_order() -> String { "asc".to_string() }
fn default_list_limit() -> i64 { 50 }

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UpdateRecipeParams {
    /// Recipe ID to update
    pub id: i64,
    /// New title (optional)
    pub title: Option<String>,
    /// New description (optional)
    pub description: Option<String>,
    /// New base serving count (optional)
    pub servings: Option<i64>,
    /// New notes (optional)
    pub notes: Option<String>,
    /// Move to another kitchen (optional)
    pub kitchen_id: Option<i64>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DeleteRecipeParams {
    /// Recipe ID to delete
    pub id: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AddRecipeIngredientParams {
    /// Recipe ID to add the ingredient to
    pub recipe_id: i64,
    /// Ingredient name
    pub name: String,
    /// Quantity for the recipe's base serving count (optional)
    pub quantity: Option<f64>,
    /// Unit symbol, e.g. g, kg, dl, tl, spl, tk (optional, stored verbatim)
    pub unit: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UpdateRecipeIngredientParams {
    /// Recipe ingredient ID to update
    pub id: i64,
    /// New name (optional)
    pub name: Option<String>,
    /// New quantity (optional)
    pub quantity: Option<f64>,
    /// Clear the quantity entirely (default false)
    #[serde(default)]
    pub clear_quantity: bool,
    /// New unit (optional)
    pub unit: Option<String>,
    /// Clear the unit entirely (default false)
    #[serde(default)]
    pub clear_unit: bool,
    /// New position within the ingredient list (optional)
    pub position: Option<i64>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct RemoveRecipeIngredientParams {
    /// Recipe ingredient ID to remove
    pub id: i64,
}

// ============================================================================
// Scaling / Conversion Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ScaleRecipeParams {
    /// Recipe ID to scale
    pub recipe_id: i64,
    /// Serving count to scale the quantities to (positive integer)
    pub servings: i64,
    /// Per-ingredient unit overrides, keyed by ingredient ID (optional)
    #[serde(default)]
    pub unit_overrides: HashMap<String, String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UnitOptionsParams {
    /// Unit symbol to look up (omit for an ingredient with no unit)
    pub unit: Option<String>,
}

// ============================================================================
// Tag Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct TagRecipeParams {
    /// Recipe ID to tag
    pub recipe_id: i64,
    /// Tag name (created on first use, matched case-insensitively)
    pub name: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UntagRecipeParams {
    /// Recipe ID to untag
    pub recipe_id: i64,
    /// Tag ID to detach
    pub tag_id: i64,
}

// ============================================================================
// Notification Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct RequestRecipeChangeParams {
    /// Recipe the change request is about
    pub recipe_id: i64,
    /// Name of the member filing the request
    pub requested_by: String,
    /// The request message for the kitchen owners
    pub message: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListNotificationsParams {
    /// Kitchen whose notifications to list
    pub kitchen_id: i64,
    /// Only unread notifications (default false)
    #[serde(default)]
    pub unread_only: bool,
    /// Maximum results (default 50, max 200)
    #[serde(default = "default_list_limit")]
    pub limit: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct MarkNotificationReadParams {
    /// Notification ID to mark as read
    pub id: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UnreadNotificationCountParams {
    /// Kitchen whose unread count to fetch
    pub kitchen_id: i64,
}

// ============================================================================
// Tool Implementations
// ============================================================================

#[tool_router]
impl SkmService {
    // --- Status ---

    #[tool(description = "Get the current status of the SKM service including build info, database status, and process information")]
    async fn skm_status(&self) -> Result<CallToolResult, McpError> {
        let tracker = self.status_tracker.lock().await;
        let status = tracker.get_status();
        let json = serde_json::to_string_pretty(&status)
            .map_err(|e| McpError::internal_error(format!("Serialization error: {}", e), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Get step-by-step instructions for managing kitchens and recipes. Call this when starting a new session or when unsure how to use the recipe tools.")]
    fn recipe_instructions(&self) -> Result<CallToolResult, McpError> {
        use crate::tools::status::RECIPE_INSTRUCTIONS;
        Ok(CallToolResult::success(vec![Content::text(RECIPE_INSTRUCTIONS)]))
    }

    // --- Kitchens ---

    #[tool(description = "Create a new kitchen. The owner is added as its first member.")]
    fn create_kitchen(&self, Parameters(p): Parameters<CreateKitchenParams>) -> Result<CallToolResult, McpError> {
        let kind = KitchenKind::from_str(&p.kind)
            .ok_or_else(|| McpError::invalid_params(format!("Invalid kitchen kind: {}", p.kind), None))?;
        let result = kitchens::create_kitchen(&self.database, &p.name, kind, p.color, &p.owner)
            .map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Get full kitchen details with members and recipe count")]
    fn get_kitchen(&self, Parameters(p): Parameters<GetKitchenParams>) -> Result<CallToolResult, McpError> {
        let result = kitchens::get_kitchen(&self.database, p.id).map_err(|e| McpError::internal_error(e, None))?;
        let json = match result {
            Some(kitchen) => serde_json::to_string_pretty(&kitchen),
            None => Ok(format!(r#"{{"error": "Kitchen not found", "id": {}}}"#, p.id)),
        }.map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "List kitchens with member and recipe counts, optionally filtered by kind")]
    fn list_kitchens(&self, Parameters(p): Parameters<ListKitchensParams>) -> Result<CallToolResult, McpError> {
        let kind = match p.kind.as_deref() {
            Some(s) => Some(KitchenKind::from_str(s)
                .ok_or_else(|| McpError::invalid_params(format!("Invalid kitchen kind: {}", s), None))?),
            None => None,
        };
        let result = kitchens::list_kitchens(&self.database, kind).map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Rename a kitchen or change its accent color")]
    fn update_kitchen(&self, Parameters(p): Parameters<UpdateKitchenParams>) -> Result<CallToolResult, McpError> {
        let data = KitchenUpdate { name: p.name, color: p.color };
        let result = kitchens::update_kitchen(&self.database, p.id, data).map_err(|e| McpError::internal_error(e, None))?;
        let json = match result {
            Some(kitchen) => serde_json::to_string_pretty(&kitchen),
            None => Ok(format!(r#"{{"error": "Kitchen not found", "id": {}}}"#, p.id)),
        }.map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Delete a kitchen (only allowed when it contains no recipes)")]
    fn delete_kitchen(&self, Parameters(p): Parameters<DeleteKitchenParams>) -> Result<CallToolResult, McpError> {
        let result = kitchens::delete_kitchen(&self.database, p.id).map_err(|e| McpError::internal_error(e, None))?;
        let json = match result {
            Ok(success) => serde_json::to_string_pretty(&success),
            Err(blocked) => serde_json::to_string_pretty(&blocked),
        }.map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Add a member to a kitchen as owner or viewer")]
    fn add_kitchen_member(&self, Parameters(p): Parameters<AddKitchenMemberParams>) -> Result<CallToolResult, McpError> {
        let role = KitchenRole::from_str(&p.role)
            .ok_or_else(|| McpError::invalid_params(format!("Invalid role: {}", p.role), None))?;
        let data = KitchenMemberCreate { kitchen_id: p.kitchen_id, member: p.member, role };
        let result = kitchens::add_kitchen_member(&self.database, data).map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Change a member's role. A kitchen must always keep at least one owner.")]
    fn update_kitchen_member(&self, Parameters(p): Parameters<UpdateKitchenMemberParams>) -> Result<CallToolResult, McpError> {
        let role = KitchenRole::from_str(&p.role)
            .ok_or_else(|| McpError::invalid_params(format!("Invalid role: {}", p.role), None))?;
        let result = kitchens::update_kitchen_member(&self.database, p.id, role)
            .map_err(|e| McpError::internal_error(e, None))?;
        let json = match result {
            Some(member) => serde_json::to_string_pretty(&member),
            None => Ok(format!(r#"{{"error": "Member not found", "id": {}}}"#, p.id)),
        }.map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Remove a member from a kitchen. The last owner cannot be removed.")]
    fn remove_kitchen_member(&self, Parameters(p): Parameters<RemoveKitchenMemberParams>) -> Result<CallToolResult, McpError> {
        let removed = kitchens::remove_kitchen_member(&self.database, p.id)
            .map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::json!({ "success": removed, "id": p.id });
        Ok(CallToolResult::success(vec![Content::text(json.to_string())]))
    }

    // --- Recipes ---

    #[tool(description = "Create a new recipe in a kitchen (ingredients added separately)")]
    fn create_recipe(&self, Parameters(p): Parameters<CreateRecipeParams>) -> Result<CallToolResult, McpError> {
        let data = RecipeCreate {
            kitchen_id: p.kitchen_id, title: p.title, description: p.description,
            servings: p.servings, notes: p.notes,
        };
        let result = recipes::create_recipe(&self.database, data).map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Get full recipe details with ingredients and tags")]
    fn get_recipe(&self, Parameters(p): Parameters<GetRecipeParams>) -> Result<CallToolResult, McpError> {
        let result = recipes::get_recipe(&self.database, p.id).map_err(|e| McpError::internal_error(e, None))?;
        let json = match result {
            Some(recipe) => serde_json::to_string_pretty(&recipe),
            None => Ok(format!(r#"{{"error": "Recipe not found", "id": {}}}"#, p.id)),
        }.map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "List recipes with optional title search, kitchen filter, sorting, and pagination")]
    fn list_recipes(&self, Parameters(p): Parameters<ListRecipesParams>) -> Result<CallToolResult, McpError> {
        let result = recipes::list_recipes(&self.database, p.query.as_deref(), p.kitchen_id, &p.sort_by, &p.sort_order, p.limit, p.offset)
            .map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Update a recipe's title, description, base serving count, notes, or kitchen")]
    fn update_recipe(&self, Parameters(p): Parameters<UpdateRecipeParams>) -> Result<CallToolResult, McpError> {
        let data = RecipeUpdate {
            title: p.title, description: p.description, servings: p.servings,
            notes: p.notes, kitchen_id: p.kitchen_id,
        };
        let result = recipes::update_recipe(&self.database, p.id, data).map_err(|e| McpError::internal_error(e, None))?;
        let json = match result {
            Some(recipe) => serde_json::to_string_pretty(&recipe),
            None => Ok(format!(r#"{{"error": "Recipe not found", "id": {}}}"#, p.id)),
        }.map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Delete a recipe along with its ingredients and tag links")]
    fn delete_recipe(&self, Parameters(p): Parameters<DeleteRecipeParams>) -> Result<CallToolResult, McpError> {
        let result = recipes::delete_recipe(&self.database, p.id).map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Add an ingredient row to a recipe. Quantity and unit are both optional ('salt to taste').")]
    fn add_recipe_ingredient(&self, Parameters(p): Parameters<AddRecipeIngredientParams>) -> Result<CallToolResult, McpError> {
        let data = RecipeIngredientCreate {
            recipe_id: p.recipe_id, name: p.name, quantity: p.quantity, unit: p.unit,
        };
        let result = recipes::add_recipe_ingredient(&self.database, data).map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Update a recipe ingredient. Use clear_quantity/clear_unit to remove the quantity or unit entirely.")]
    fn update_recipe_ingredient(&self, Parameters(p): Parameters<UpdateRecipeIngredientParams>) -> Result<CallToolResult, McpError> {
        let quantity = if p.clear_quantity { Some(None) } else { p.quantity.map(Some) };
        let unit = if p.clear_unit { Some(None) } else { p.unit.map(Some) };
        let data = RecipeIngredientUpdate { name: p.name, quantity, unit, position: p.position };
        let result = recipes::update_recipe_ingredient(&self.database, p.id, data)
            .map_err(|e| McpError::internal_error(e, None))?;
        let json = match result {
            Some(ingredient) => serde_json::to_string_pretty(&ingredient),
            None => Ok(format!(r#"{{"error": "Ingredient not found", "id": {}}}"#, p.id)),
        }.map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Remove an ingredient row from a recipe")]
    fn remove_recipe_ingredient(&self, Parameters(p): Parameters<RemoveRecipeIngredientParams>) -> Result<CallToolResult, McpError> {
        let removed = recipes::remove_recipe_ingredient(&self.database, p.id)
            .map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::json!({ "success": removed, "id": p.id });
        Ok(CallToolResult::success(vec![Content::text(json.to_string())]))
    }

    // --- Scaling / Conversion ---

    #[tool(description = "Get a recipe's ingredient list scaled to a serving count, with quantities converted to per-ingredient unit overrides where the units are compatible. Returns formatted display quantities and the unit choices for each row.")]
    fn scale_recipe(&self, Parameters(p): Parameters<ScaleRecipeParams>) -> Result<CallToolResult, McpError> {
        let servings = Servings::new(p.servings)
            .map_err(|e| McpError::invalid_params(e.to_string(), None))?;

        let mut overrides = HashMap::new();
        for (key, unit) in p.unit_overrides {
            let id: i64 = key.parse()
                .map_err(|_| McpError::invalid_params(format!("Invalid ingredient id: {}", key), None))?;
            overrides.insert(id, unit);
        }

        let result = recipes::scale_recipe(&self.database, p.recipe_id, servings, &overrides)
            .map_err(|e| McpError::internal_error(e, None))?;
        let json = match result {
            Some(scaled) => serde_json::to_string_pretty(&scaled),
            None => Ok(format!(r#"{{"error": "Recipe not found", "id": {}}}"#, p.recipe_id)),
        }.map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Get the unit category and the alternative units a picker may offer for a unit symbol. Unknown units get only themselves; a missing unit gets no choices.")]
    fn unit_options(&self, Parameters(p): Parameters<UnitOptionsParams>) -> Result<CallToolResult, McpError> {
        let unit = p.unit.as_deref();
        let json = serde_json::json!({
            "unit": unit,
            "category": categorize_unit(unit),
            "options": unit_options(unit),
        });
        let json = serde_json::to_string_pretty(&json)
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    // --- Tags ---

    #[tool(description = "Attach a tag to a recipe, creating the tag on first use. Tag names match case-insensitively.")]
    fn tag_recipe(&self, Parameters(p): Parameters<TagRecipeParams>) -> Result<CallToolResult, McpError> {
        let result = tags::tag_recipe(&self.database, p.recipe_id, &p.name)
            .map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Detach a tag from a recipe")]
    fn untag_recipe(&self, Parameters(p): Parameters<UntagRecipeParams>) -> Result<CallToolResult, McpError> {
        let detached = tags::untag_recipe(&self.database, p.recipe_id, p.tag_id)
            .map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::json!({ "success": detached, "recipe_id": p.recipe_id, "tag_id": p.tag_id });
        Ok(CallToolResult::success(vec![Content::text(json.to_string())]))
    }

    #[tool(description = "List all tags with the number of recipes using each")]
    fn list_tags(&self) -> Result<CallToolResult, McpError> {
        let result = tags::list_tags(&self.database).map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    // --- Notifications ---

    #[tool(description = "File a change request against a recipe. The request lands as a notification in the recipe's kitchen for its owners.")]
    fn request_recipe_change(&self, Parameters(p): Parameters<RequestRecipeChangeParams>) -> Result<CallToolResult, McpError> {
        let result = notifications::request_recipe_change(&self.database, p.recipe_id, &p.requested_by, &p.message)
            .map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "List a kitchen's notifications, unread first, with the current unread count")]
    fn list_notifications(&self, Parameters(p): Parameters<ListNotificationsParams>) -> Result<CallToolResult, McpError> {
        let result = notifications::list_notifications(&self.database, p.kitchen_id, p.unread_only, p.limit)
            .map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Mark a notification as read")]
    fn mark_notification_read(&self, Parameters(p): Parameters<MarkNotificationReadParams>) -> Result<CallToolResult, McpError> {
        let marked = notifications::mark_notification_read(&self.database, p.id)
            .map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::json!({ "success": marked, "id": p.id });
        Ok(CallToolResult::success(vec![Content::text(json.to_string())]))
    }

    #[tool(description = "Get the unread notification count for a kitchen (badge count)")]
    fn unread_notification_count(&self, Parameters(p): Parameters<UnreadNotificationCountParams>) -> Result<CallToolResult, McpError> {
        let result = notifications::unread_notification_count(&self.database, p.kitchen_id)
            .map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }
}

// ============================================================================
// Server Handler
// ============================================================================

#[tool_handler]
impl ServerHandler for SkmService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "skm".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("Shared Kitchen Manager".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Shared Kitchen Manager (SKM) - Kitchens, recipes, and serving-scaled ingredient views. \
                 IMPORTANT: Call recipe_instructions when starting a session. \
                 Kitchens: create/get/list/update/delete_kitchen, add/update/remove_kitchen_member. \
                 A kitchen keeps at least one owner and cannot be deleted while it has recipes. \
                 Recipes: create/get/list/update/delete_recipe, add/update/remove_recipe_ingredient. \
                 Ingredient quantity and unit are optional; unknown units are stored verbatim. \
                 Scaling: scale_recipe returns display-ready quantities for a serving count with \
                 optional per-ingredient unit overrides; unit_options lists picker choices. \
                 Conversion only happens within a unit category (mass, volume, spoon). \
                 Tags: tag_recipe/untag_recipe/list_tags. \
                 Change requests: request_recipe_change, list_notifications, mark_notification_read, \
                 unread_notification_count."
                    .into(),
            ),
        }
    }
}
