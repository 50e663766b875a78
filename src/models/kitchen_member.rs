//! Kitchen member model
//!
//! Membership rows linking people to kitchens with a role.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;

/// Role of a member within a kitchen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KitchenRole {
    /// Full control: edit recipes, manage members
    Owner,
    /// Read-only access; may file change requests
    Viewer,
}

impl KitchenRole {
    /// Parse from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "owner" => Some(KitchenRole::Owner),
            "viewer" => Some(KitchenRole::Viewer),
            _ => None,
        }
    }

    /// Convert to database string
    pub fn to_db_str(&self) -> &'static str {
        match self {
            KitchenRole::Owner => "owner",
            KitchenRole::Viewer => "viewer",
        }
    }
}

/// A kitchen membership row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KitchenMember {
    pub id: i64,
    pub kitchen_id: i64,
    pub member: String,
    pub role: KitchenRole,
    pub created_at: String,
}

/// Data for adding a member to a kitchen
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KitchenMemberCreate {
    pub kitchen_id: i64,
    pub member: String,
    pub role: KitchenRole,
}

impl KitchenMember {
    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let role_str: String = row.get("role")?;
        Ok(Self {
            id: row.get("id")?,
            kitchen_id: row.get("kitchen_id")?,
            member: row.get("member")?,
            role: KitchenRole::from_str(&role_str).unwrap_or(KitchenRole::Viewer),
            created_at: row.get("created_at")?,
        })
    }

    /// Add a member to a kitchen
    pub fn create(conn: &Connection, data: &KitchenMemberCreate) -> DbResult<Self> {
        conn.execute(
            r#"
            INSERT INTO kitchen_members (kitchen_id, member, role)
            VALUES (?1, ?2, ?3)
            "#,
            params![data.kitchen_id, data.member, data.role.to_db_str()],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?.ok_or_else(|| {
            crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows)
        })
    }

    /// Get a membership row by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM kitchen_members WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(member) => Ok(Some(member)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Get all members of a kitchen, owners first
    pub fn get_for_kitchen(conn: &Connection, kitchen_id: i64) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM kitchen_members WHERE kitchen_id = ?1 ORDER BY role ASC, member ASC",
        )?;

        let members = stmt
            .query_map([kitchen_id], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(members)
    }

    /// Change a member's role
    pub fn set_role(conn: &Connection, id: i64, role: KitchenRole) -> DbResult<Option<Self>> {
        conn.execute(
            "UPDATE kitchen_members SET role = ?1 WHERE id = ?2",
            params![role.to_db_str(), id],
        )?;
        Self::get_by_id(conn, id)
    }

    /// Count owners of a kitchen
    pub fn count_owners(conn: &Connection, kitchen_id: i64) -> DbResult<i64> {
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM kitchen_members WHERE kitchen_id = ?1 AND role = 'owner'",
            [kitchen_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Remove a member from a kitchen
    pub fn delete(conn: &Connection, id: i64) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM kitchen_members WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;
    use crate::models::{Kitchen, KitchenCreate, KitchenKind};

    fn kitchen_with_members(conn: &Connection) -> i64 {
        let kitchen = Kitchen::create(
            conn,
            &KitchenCreate {
                name: "Shared".to_string(),
                kind: KitchenKind::Shared,
                color: None,
            },
        )
        .unwrap();

        for (member, role) in [("anna", KitchenRole::Owner), ("mati", KitchenRole::Viewer)] {
            KitchenMember::create(
                conn,
                &KitchenMemberCreate {
                    kitchen_id: kitchen.id,
                    member: member.to_string(),
                    role,
                },
            )
            .unwrap();
        }
        kitchen.id
    }

    #[test]
    fn test_members_listed_owners_first() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        let kitchen_id = kitchen_with_members(&conn);

        let members = KitchenMember::get_for_kitchen(&conn, kitchen_id).unwrap();
        assert_eq!(members.len(), 2);
        assert_eq!(members[0].role, KitchenRole::Owner);
        assert_eq!(KitchenMember::count_owners(&conn, kitchen_id).unwrap(), 1);
    }

    #[test]
    fn test_duplicate_member_rejected() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        let kitchen_id = kitchen_with_members(&conn);

        let dup = KitchenMember::create(
            &conn,
            &KitchenMemberCreate {
                kitchen_id,
                member: "anna".to_string(),
                role: KitchenRole::Viewer,
            },
        );
        assert!(dup.is_err());
    }
}
