//! Notification MCP Tools
//!
//! Change requests filed by kitchen viewers, read by kitchen owners.

use serde::Serialize;

use crate::db::Database;
use crate::models::{Kitchen, Notification, NotificationCreate, Recipe};

/// Response for request_recipe_change
#[derive(Debug, Serialize)]
pub struct RequestChangeResponse {
    pub id: i64,
    pub kitchen_id: i64,
    pub recipe_id: Option<i64>,
    pub created_at: String,
}

/// Response for list_notifications
#[derive(Debug, Serialize)]
pub struct ListNotificationsResponse {
    pub notifications: Vec<Notification>,
    pub unread: i64,
    pub count: usize,
}

/// Response for unread_notification_count
#[derive(Debug, Serialize)]
pub struct UnreadCountResponse {
    pub kitchen_id: i64,
    pub unread: i64,
}

/// File a change request against a recipe's kitchen
pub fn request_recipe_change(
    db: &Database,
    recipe_id: i64,
    requested_by: &str,
    message: &str,
) -> Result<RequestChangeResponse, String> {
    let requested_by = requested_by.trim();
    if requested_by.is_empty() {
        return Err("requested_by cannot be empty".to_string());
    }
    let message = message.trim();
    if message.is_empty() {
        return Err("Change request message cannot be empty".to_string());
    }

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let recipe = Recipe::get_by_id(&conn, recipe_id)
        .map_err(|e| format!("Database error checking recipe: {}", e))?
        .ok_or_else(|| format!("Recipe not found with id: {}", recipe_id))?;

    let notification = Notification::create(
        &conn,
        &NotificationCreate {
            kitchen_id: recipe.kitchen_id,
            recipe_id: Some(recipe_id),
            requested_by: requested_by.to_string(),
            message: message.to_string(),
        },
    )
    .map_err(|e| format!("Failed to create notification: {}", e))?;

    Ok(RequestChangeResponse {
        id: notification.id,
        kitchen_id: notification.kitchen_id,
        recipe_id: notification.recipe_id,
        created_at: notification.created_at,
    })
}

/// List a kitchen's notifications, unread first
pub fn list_notifications(
    db: &Database,
    kitchen_id: i64,
    unread_only: bool,
    limit: i64,
) -> Result<ListNotificationsResponse, String> {
    let limit = limit.min(200).max(1);

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let kitchen = Kitchen::get_by_id(&conn, kitchen_id)
        .map_err(|e| format!("Database error checking kitchen: {}", e))?;
    if kitchen.is_none() {
        return Err(format!("Kitchen not found with id: {}", kitchen_id));
    }

    let notifications = Notification::list_for_kitchen(&conn, kitchen_id, unread_only, limit)
        .map_err(|e| format!("Failed to list notifications: {}", e))?;
    let unread = Notification::unread_count(&conn, kitchen_id)
        .map_err(|e| format!("Failed to count unread: {}", e))?;

    let count = notifications.len();
    Ok(ListNotificationsResponse {
        notifications,
        unread,
        count,
    })
}

/// Mark a notification as read
pub fn mark_notification_read(db: &Database, id: i64) -> Result<bool, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    Notification::mark_read(&conn, id)
        .map_err(|e| format!("Failed to mark notification read: {}", e))
}

/// Count unread notifications for a kitchen (badge count)
pub fn unread_notification_count(
    db: &Database,
    kitchen_id: i64,
) -> Result<UnreadCountResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let unread = Notification::unread_count(&conn, kitchen_id)
        .map_err(|e| format!("Failed to count unread: {}", e))?;

    Ok(UnreadCountResponse { kitchen_id, unread })
}
