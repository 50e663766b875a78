//! Kitchen MCP Tools
//!
//! Tools for managing kitchens and their members.

use serde::Serialize;

use crate::db::Database;
use crate::models::{
    Kitchen, KitchenCreate, KitchenKind, KitchenMember, KitchenMemberCreate, KitchenRole,
    KitchenUpdate,
};

/// Response for create_kitchen
#[derive(Debug, Serialize)]
pub struct CreateKitchenResponse {
    pub id: i64,
    pub name: String,
    pub kind: KitchenKind,
    pub created_at: String,
}

/// Full kitchen detail with members
#[derive(Debug, Serialize)]
pub struct KitchenDetail {
    pub id: i64,
    pub name: String,
    pub kind: KitchenKind,
    pub color: Option<String>,
    pub members: Vec<KitchenMember>,
    pub recipe_count: i64,
    pub created_at: String,
    pub updated_at: String,
}

/// Kitchen summary for listing
#[derive(Debug, Serialize)]
pub struct KitchenSummary {
    pub id: i64,
    pub name: String,
    pub kind: KitchenKind,
    pub color: Option<String>,
    pub member_count: usize,
    pub recipe_count: i64,
}

/// Response for list_kitchens
#[derive(Debug, Serialize)]
pub struct ListKitchensResponse {
    pub kitchens: Vec<KitchenSummary>,
    pub count: usize,
}

/// Response for delete blocked
#[derive(Debug, Serialize)]
pub struct KitchenDeleteBlockedResponse {
    pub error: String,
    pub recipe_count: i64,
}

/// Response for successful delete
#[derive(Debug, Serialize)]
pub struct KitchenDeleteSuccessResponse {
    pub success: bool,
    pub deleted_id: i64,
}

/// Response for member changes
#[derive(Debug, Serialize)]
pub struct MemberResponse {
    pub id: i64,
    pub kitchen_id: i64,
    pub member: String,
    pub role: KitchenRole,
}

// ============================================================================
// Kitchen Tools
// ============================================================================

/// Create a new kitchen; the creator becomes its first owner
pub fn create_kitchen(
    db: &Database,
    name: &str,
    kind: KitchenKind,
    color: Option<String>,
    owner: &str,
) -> Result<CreateKitchenResponse, String> {
    let name = name.trim();
    if name.is_empty() {
        return Err("Kitchen name cannot be empty".to_string());
    }
    let owner = owner.trim();
    if owner.is_empty() {
        return Err("Kitchen owner cannot be empty".to_string());
    }

    let mut conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    // Kitchen and its first owner land together or not at all
    let tx = conn
        .transaction()
        .map_err(|e| format!("Database error: {}", e))?;

    let kitchen = Kitchen::create(
        &tx,
        &KitchenCreate {
            name: name.to_string(),
            kind,
            color,
        },
    )
    .map_err(|e| format!("Failed to create kitchen: {}", e))?;

    KitchenMember::create(
        &tx,
        &KitchenMemberCreate {
            kitchen_id: kitchen.id,
            member: owner.to_string(),
            role: KitchenRole::Owner,
        },
    )
    .map_err(|e| format!("Failed to add kitchen owner: {}", e))?;

    tx.commit().map_err(|e| format!("Database error: {}", e))?;

    Ok(CreateKitchenResponse {
        id: kitchen.id,
        name: kitchen.name,
        kind: kitchen.kind,
        created_at: kitchen.created_at,
    })
}

/// Get a kitchen with members and recipe count
pub fn get_kitchen(db: &Database, id: i64) -> Result<Option<KitchenDetail>, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let kitchen = Kitchen::get_by_id(&conn, id)
        .map_err(|e| format!("Failed to get kitchen: {}", e))?;

    match kitchen {
        Some(kitchen) => {
            let members = KitchenMember::get_for_kitchen(&conn, id)
                .map_err(|e| format!("Failed to get members: {}", e))?;
            let recipe_count = Kitchen::get_recipe_count(&conn, id)
                .map_err(|e| format!("Failed to count recipes: {}", e))?;

            Ok(Some(KitchenDetail {
                id: kitchen.id,
                name: kitchen.name,
                kind: kitchen.kind,
                color: kitchen.color,
                members,
                recipe_count,
                created_at: kitchen.created_at,
                updated_at: kitchen.updated_at,
            }))
        }
        None => Ok(None),
    }
}

/// List kitchens, optionally filtered by kind
pub fn list_kitchens(
    db: &Database,
    kind: Option<KitchenKind>,
) -> Result<ListKitchensResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let kitchens =
        Kitchen::list(&conn, kind).map_err(|e| format!("Failed to list kitchens: {}", e))?;

    let mut summaries = Vec::new();
    for kitchen in kitchens {
        let members = KitchenMember::get_for_kitchen(&conn, kitchen.id)
            .map_err(|e| format!("Failed to get members: {}", e))?;
        let recipe_count = Kitchen::get_recipe_count(&conn, kitchen.id)
            .map_err(|e| format!("Failed to count recipes: {}", e))?;

        summaries.push(KitchenSummary {
            id: kitchen.id,
            name: kitchen.name,
            kind: kitchen.kind,
            color: kitchen.color,
            member_count: members.len(),
            recipe_count,
        });
    }

    let count = summaries.len();
    Ok(ListKitchensResponse {
        kitchens: summaries,
        count,
    })
}

/// Rename a kitchen or change its color
pub fn update_kitchen(
    db: &Database,
    id: i64,
    data: KitchenUpdate,
) -> Result<Option<Kitchen>, String> {
    if let Some(ref name) = data.name {
        if name.trim().is_empty() {
            return Err("Kitchen name cannot be empty".to_string());
        }
    }

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    Kitchen::update(&conn, id, &data).map_err(|e| format!("Failed to update kitchen: {}", e))
}

/// Delete a kitchen (blocked while it still has recipes)
pub fn delete_kitchen(
    db: &Database,
    id: i64,
) -> Result<Result<KitchenDeleteSuccessResponse, KitchenDeleteBlockedResponse>, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let kitchen = Kitchen::get_by_id(&conn, id)
        .map_err(|e| format!("Database error: {}", e))?;
    if kitchen.is_none() {
        return Err(format!("Kitchen not found with id: {}", id));
    }

    let recipe_count = Kitchen::get_recipe_count(&conn, id)
        .map_err(|e| format!("Failed to count recipes: {}", e))?;

    if recipe_count > 0 {
        return Ok(Err(KitchenDeleteBlockedResponse {
            error: format!(
                "Cannot delete kitchen: it still contains {} recipe(s)",
                recipe_count
            ),
            recipe_count,
        }));
    }

    Kitchen::delete(&conn, id).map_err(|e| format!("Failed to delete kitchen: {}", e))?;

    Ok(Ok(KitchenDeleteSuccessResponse {
        success: true,
        deleted_id: id,
    }))
}

// ============================================================================
// Member Tools
// ============================================================================

/// Add a member to a kitchen
pub fn add_kitchen_member(
    db: &Database,
    data: KitchenMemberCreate,
) -> Result<MemberResponse, String> {
    if data.member.trim().is_empty() {
        return Err("Member name cannot be empty".to_string());
    }

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let kitchen = Kitchen::get_by_id(&conn, data.kitchen_id)
        .map_err(|e| format!("Database error checking kitchen: {}", e))?;
    if kitchen.is_none() {
        return Err(format!("Kitchen not found with id: {}", data.kitchen_id));
    }

    let member = KitchenMember::create(&conn, &data)
        .map_err(|e| format!("Failed to add member (already in kitchen?): {}", e))?;

    Ok(MemberResponse {
        id: member.id,
        kitchen_id: member.kitchen_id,
        member: member.member,
        role: member.role,
    })
}

/// Change a member's role; a kitchen must keep at least one owner
pub fn update_kitchen_member(
    db: &Database,
    id: i64,
    role: KitchenRole,
) -> Result<Option<MemberResponse>, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let existing = KitchenMember::get_by_id(&conn, id)
        .map_err(|e| format!("Failed to get member: {}", e))?;
    let Some(existing) = existing else {
        return Ok(None);
    };

    if existing.role == KitchenRole::Owner && role == KitchenRole::Viewer {
        let owners = KitchenMember::count_owners(&conn, existing.kitchen_id)
            .map_err(|e| format!("Failed to count owners: {}", e))?;
        if owners <= 1 {
            return Err("Cannot demote the last owner of a kitchen".to_string());
        }
    }

    let updated = KitchenMember::set_role(&conn, id, role)
        .map_err(|e| format!("Failed to update member: {}", e))?;

    Ok(updated.map(|m| MemberResponse {
        id: m.id,
        kitchen_id: m.kitchen_id,
        member: m.member,
        role: m.role,
    }))
}

/// Remove a member; the last owner cannot be removed
pub fn remove_kitchen_member(db: &Database, id: i64) -> Result<bool, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let existing = KitchenMember::get_by_id(&conn, id)
        .map_err(|e| format!("Failed to get member: {}", e))?;
    let Some(existing) = existing else {
        return Ok(false);
    };

    if existing.role == KitchenRole::Owner {
        let owners = KitchenMember::count_owners(&conn, existing.kitchen_id)
            .map_err(|e| format!("Failed to count owners: {}", e))?;
        if owners <= 1 {
            return Err("Cannot remove the last owner of a kitchen".to_string());
        }
    }

    KitchenMember::delete(&conn, id).map_err(|e| format!("Failed to remove member: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;

    fn test_db() -> Database {
        use std::sync::atomic::{AtomicU64, Ordering};
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        let n = COUNTER.fetch_add(1, Ordering::SeqCst);
        let db = Database::in_memory_shared(&format!("skm_kitchens_test_{}", n)).unwrap();
        db.with_conn(|conn| run_migrations(conn)).unwrap();
        db
    }

    #[test]
    fn test_create_kitchen_adds_creator_as_owner() {
        let db = test_db();
        let created =
            create_kitchen(&db, "Family", KitchenKind::Shared, None, "anna").unwrap();

        let detail = get_kitchen(&db, created.id).unwrap().unwrap();
        assert_eq!(detail.members.len(), 1);
        assert_eq!(detail.members[0].member, "anna");
        assert_eq!(detail.members[0].role, KitchenRole::Owner);
    }

    #[test]
    fn test_create_kitchen_rolls_back_when_owner_insert_fails() {
        let db = test_db();
        {
            let conn = db.get_conn().unwrap();
            conn.execute_batch("DROP TABLE kitchen_members").unwrap();
        }

        let result = create_kitchen(&db, "Family", KitchenKind::Shared, None, "anna");
        assert!(result.is_err());

        // The failed owner insert must take the kitchen row with it
        let conn = db.get_conn().unwrap();
        assert!(Kitchen::list(&conn, None).unwrap().is_empty());
    }

    #[test]
    fn test_last_owner_cannot_be_demoted_or_removed() {
        let db = test_db();
        let created =
            create_kitchen(&db, "Solo", KitchenKind::Personal, None, "anna").unwrap();
        let detail = get_kitchen(&db, created.id).unwrap().unwrap();
        let owner_id = detail.members[0].id;

        assert!(update_kitchen_member(&db, owner_id, KitchenRole::Viewer).is_err());
        assert!(remove_kitchen_member(&db, owner_id).is_err());
    }
}
