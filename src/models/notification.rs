//! Notification model
//!
//! Change-request notifications filed by kitchen viewers for the owners to
//! act on. Delivery to devices is out of scope; these are just the rows.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;

/// A notification row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: i64,
    pub kitchen_id: i64,
    pub recipe_id: Option<i64>,
    pub kind: String,
    pub requested_by: String,
    pub message: String,
    pub is_read: bool,
    pub created_at: String,
}

/// Data for creating a notification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationCreate {
    pub kitchen_id: i64,
    pub recipe_id: Option<i64>,
    pub requested_by: String,
    pub message: String,
}

impl Notification {
    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            kitchen_id: row.get("kitchen_id")?,
            recipe_id: row.get("recipe_id")?,
            kind: row.get("kind")?,
            requested_by: row.get("requested_by")?,
            message: row.get("message")?,
            is_read: row.get::<_, i32>("is_read")? != 0,
            created_at: row.get("created_at")?,
        })
    }

    /// Insert a new change-request notification
    pub fn create(conn: &Connection, data: &NotificationCreate) -> DbResult<Self> {
        let created_at = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string();
        conn.execute(
            r#"
            INSERT INTO notifications (kitchen_id, recipe_id, kind, requested_by, message, created_at)
            VALUES (?1, ?2, 'recipe_change_request', ?3, ?4, ?5)
            "#,
            params![
                data.kitchen_id,
                data.recipe_id,
                data.requested_by,
                data.message,
                created_at,
            ],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?.ok_or_else(|| {
            crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows)
        })
    }

    /// Get a notification by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM notifications WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(notification) => Ok(Some(notification)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// List notifications for a kitchen, unread first, newest within each group
    pub fn list_for_kitchen(
        conn: &Connection,
        kitchen_id: i64,
        unread_only: bool,
        limit: i64,
    ) -> DbResult<Vec<Self>> {
        let sql = if unread_only {
            "SELECT * FROM notifications WHERE kitchen_id = ?1 AND is_read = 0
             ORDER BY created_at DESC LIMIT ?2"
        } else {
            "SELECT * FROM notifications WHERE kitchen_id = ?1
             ORDER BY is_read ASC, created_at DESC LIMIT ?2"
        };
        let mut stmt = conn.prepare(sql)?;

        let notifications = stmt
            .query_map(params![kitchen_id, limit], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(notifications)
    }

    /// Mark a notification as read
    /// Returns Ok(true) if a row changed
    pub fn mark_read(conn: &Connection, id: i64) -> DbResult<bool> {
        let rows = conn.execute(
            "UPDATE notifications SET is_read = 1 WHERE id = ?1",
            [id],
        )?;
        Ok(rows > 0)
    }

    /// Count unread notifications for a kitchen
    pub fn unread_count(conn: &Connection, kitchen_id: i64) -> DbResult<i64> {
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM notifications WHERE kitchen_id = ?1 AND is_read = 0",
            [kitchen_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;
    use crate::models::{Kitchen, KitchenCreate, KitchenKind};

    fn conn_with_kitchen() -> (Connection, i64) {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        let kitchen = Kitchen::create(
            &conn,
            &KitchenCreate {
                name: "Shared".to_string(),
                kind: KitchenKind::Shared,
                color: None,
            },
        )
        .unwrap();
        let kitchen_id = kitchen.id;
        (conn, kitchen_id)
    }

    #[test]
    fn test_unread_count_and_mark_read() {
        let (conn, kitchen_id) = conn_with_kitchen();
        let n = Notification::create(
            &conn,
            &NotificationCreate {
                kitchen_id,
                recipe_id: None,
                requested_by: "mati".to_string(),
                message: "Please double the garlic".to_string(),
            },
        )
        .unwrap();
        assert!(!n.is_read);
        assert_eq!(Notification::unread_count(&conn, kitchen_id).unwrap(), 1);

        assert!(Notification::mark_read(&conn, n.id).unwrap());
        assert_eq!(Notification::unread_count(&conn, kitchen_id).unwrap(), 0);

        let unread =
            Notification::list_for_kitchen(&conn, kitchen_id, true, 50).unwrap();
        assert!(unread.is_empty());
        let all = Notification::list_for_kitchen(&conn, kitchen_id, false, 50).unwrap();
        assert_eq!(all.len(), 1);
    }
}
