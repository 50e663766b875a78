//! Database migrations
//!
//! Schema creation and migration logic.

use rusqlite::Connection;

use super::connection::DbResult;

/// Current schema version
pub const SCHEMA_VERSION: i32 = 1;

/// Run all migrations to bring the database up to the current schema version
pub fn run_migrations(conn: &Connection) -> DbResult<()> {
    // Create migrations table if it doesn't exist
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
        [],
    )?;

    // Get current version
    let current_version: i32 = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
            [],
            |row| row.get(0),
        )
        .unwrap_or(0);

    // Run migrations
    if current_version < 1 {
        migrate_v1(conn)?;
        conn.execute("INSERT INTO schema_migrations (version) VALUES (1)", [])?;
    }

    Ok(())
}

/// Get the current schema version
pub fn get_schema_version(conn: &Connection) -> DbResult<i32> {
    let version: i32 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
        [],
        |row| row.get(0),
    )?;
    Ok(version)
}

/// Migration v1: Initial schema
fn migrate_v1(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(
        r#"
        -- ============================================
        -- KITCHENS
        -- Personal or shared collections of recipes
        -- ============================================
        CREATE TABLE kitchens (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            kind TEXT NOT NULL CHECK(kind IN ('personal', 'shared')) DEFAULT 'personal',
            color TEXT,                          -- nullable hex color for the UI

            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_kitchens_name ON kitchens(name);

        -- ============================================
        -- KITCHEN MEMBERS
        -- Who can see or edit a kitchen, and in what role
        -- ============================================
        CREATE TABLE kitchen_members (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            kitchen_id INTEGER NOT NULL REFERENCES kitchens(id) ON DELETE CASCADE,
            member TEXT NOT NULL,                -- display name of the member
            role TEXT NOT NULL CHECK(role IN ('owner', 'viewer')) DEFAULT 'viewer',

            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            UNIQUE(kitchen_id, member)
        );

        CREATE INDEX idx_kitchen_members_kitchen ON kitchen_members(kitchen_id);

        -- ============================================
        -- RECIPES
        -- Belong to exactly one kitchen
        -- ============================================
        CREATE TABLE recipes (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            kitchen_id INTEGER NOT NULL REFERENCES kitchens(id) ON DELETE RESTRICT,
            title TEXT NOT NULL,
            description TEXT,
            servings INTEGER NOT NULL DEFAULT 1, -- ingredient quantities are stored for this many servings

            notes TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_recipes_title ON recipes(title);
        CREATE INDEX idx_recipes_kitchen ON recipes(kitchen_id);

        -- ============================================
        -- RECIPE INGREDIENTS
        -- Quantity and unit are both nullable: "salt" with no amount is fine
        -- ============================================
        CREATE TABLE recipe_ingredients (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            recipe_id INTEGER NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
            name TEXT NOT NULL,
            quantity REAL,                       -- nullable, amount unspecified
            unit TEXT,                           -- nullable unit symbol
            position INTEGER NOT NULL DEFAULT 0, -- stable display order

            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_recipe_ingredients_recipe ON recipe_ingredients(recipe_id);

        -- ============================================
        -- TAGS
        -- ============================================
        CREATE TABLE tags (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE COLLATE NOCASE,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE recipe_tags (
            recipe_id INTEGER NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
            tag_id INTEGER NOT NULL REFERENCES tags(id) ON DELETE CASCADE,
            PRIMARY KEY (recipe_id, tag_id)
        );

        -- ============================================
        -- NOTIFICATIONS
        -- Change requests filed by kitchen viewers
        -- ============================================
        CREATE TABLE notifications (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            kitchen_id INTEGER NOT NULL REFERENCES kitchens(id) ON DELETE CASCADE,
            recipe_id INTEGER REFERENCES recipes(id) ON DELETE CASCADE,
            kind TEXT NOT NULL CHECK(kind IN ('recipe_change_request')) DEFAULT 'recipe_change_request',
            requested_by TEXT NOT NULL,
            message TEXT NOT NULL,
            is_read INTEGER NOT NULL DEFAULT 0,  -- boolean

            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_notifications_kitchen ON notifications(kitchen_id);
        CREATE INDEX idx_notifications_unread ON notifications(is_read);
        "#,
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap();
        assert_eq!(get_schema_version(&conn).unwrap(), SCHEMA_VERSION);
    }
}
