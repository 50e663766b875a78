//! SKM Status Tool
//!
//! Provides runtime status information about the SKM service.

use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::BuildInfo;

/// Recipe management instructions for AI assistants
pub const RECIPE_INSTRUCTIONS: &str = r##"
# SKM Recipe Management Instructions

This guide explains how to manage kitchens and recipes using the Shared
Kitchen Manager (SKM) tools.

## Overview

SKM organizes recipes into **kitchens**:
1. **Kitchens** - Personal or shared collections of recipes, with members
2. **Recipes** - Title, description, base serving count, and ingredient rows
3. **Ingredients** - Free-form name plus optional quantity and unit
4. **Tags** - Free-form labels for filtering recipes
5. **Notifications** - Change requests viewers file for kitchen owners

## Kitchens and Roles

Every kitchen member has a role:
- **owner** - edits recipes, manages members, reads change requests
- **viewer** - read-only; may file change requests

A kitchen always keeps at least one owner; the last owner can be neither
demoted nor removed. Kitchens with recipes in them cannot be deleted.

## Units

Ingredient units fall into four categories. Conversion only ever happens
inside a category:

| Category | Units (base first) |
|----------|--------------------|
| mass | g, kg, oz, lb |
| volume | ml, l, dl, fl oz, qt, gal, cup |
| spoon | tl (teaspoon), spl (tablespoon) |
| piece | tk (no alternatives) |

Anything else ("pinch", "scoop") is stored verbatim and never converted.
An ingredient may also omit quantity and unit entirely ("salt to taste").

## Scaling Recipes

`scale_recipe` is the display path. Given a serving count and optional
per-ingredient unit overrides, it returns each ingredient with:
- `display_quantity` - scaled to the requested servings, converted to the
  override unit when it shares a category with the stored unit, formatted
  to at most 2 decimals
- `unit_choices` - the alternative units a picker may offer for that row

Quantities are stored for the recipe's `servings` base count, so asking for
2 servings of a 4-serving recipe halves every quantity.

Cross-category overrides (e.g. g -> ml) never convert: the number is scaled
only. A missing quantity renders as an empty string, never an error.

`unit_options` returns the picker list for any single unit symbol.

## Step-by-Step Workflow

### 1. Create a kitchen

```
create_kitchen(name: "Family", kind: "shared", owner: "anna", color: "#7a9e4f")
```

### 2. Create a recipe

```
create_recipe(
  kitchen_id: 1,
  title: "Karask",
  servings: 4,
  description: "Estonian barley bread"
)
```

### 3. Add ingredients

```
add_recipe_ingredient(recipe_id: 1, name: "barley flour", quantity: 500, unit: "g")
add_recipe_ingredient(recipe_id: 1, name: "kefir", quantity: 5, unit: "dl")
add_recipe_ingredient(recipe_id: 1, name: "eggs", quantity: 2, unit: "tk")
add_recipe_ingredient(recipe_id: 1, name: "salt")
```

### 4. Tag it

```
tag_recipe(recipe_id: 1, name: "bread")
tag_recipe(recipe_id: 1, name: "oven")
```

### 5. Scale for tonight

```
scale_recipe(recipe_id: 1, servings: 6, unit_overrides: {"1": "kg"})
```

### 6. Viewers file change requests

```
request_recipe_change(recipe_id: 1, requested_by: "mati", message: "Less salt?")
list_notifications(kitchen_id: 1, unread_only: true)
mark_notification_read(id: 3)
```

## Quick Reference

| Task | Tool |
|------|------|
| Create kitchen | `create_kitchen` |
| View kitchen with members | `get_kitchen` |
| List kitchens | `list_kitchens` |
| Rename / recolor kitchen | `update_kitchen` |
| Delete empty kitchen | `delete_kitchen` |
| Manage members | `add_kitchen_member`, `update_kitchen_member`, `remove_kitchen_member` |
| Create recipe | `create_recipe` |
| View recipe | `get_recipe` |
| List / search recipes | `list_recipes` |
| Edit recipe | `update_recipe` |
| Delete recipe | `delete_recipe` |
| Manage ingredients | `add/update/remove_recipe_ingredient` |
| Scale + convert for display | `scale_recipe` |
| Unit picker choices | `unit_options` |
| Tags | `tag_recipe`, `untag_recipe`, `list_tags` |
| Change requests | `request_recipe_change`, `list_notifications`, `mark_notification_read`, `unread_notification_count` |

## Notes

- Servings are always positive integers; 0 or negative values are rejected
- Quantity/unit are stored exactly as entered; conversion is display-only
- Deleting a recipe removes its ingredients and tag links
- Notifications are rows only; push delivery is outside SKM
"##;

/// Runtime status of the SKM service
#[derive(Debug, Clone, Serialize)]
pub struct SkmStatus {
    /// Build information
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub version: &'static str,

    /// Database information
    pub database_path: String,
    pub database_size_bytes: Option<u64>,

    /// Process information
    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
}

/// Status tracker for collecting runtime information
pub struct StatusTracker {
    start_time: Instant,
    database_path: PathBuf,
}

impl StatusTracker {
    /// Create a new status tracker
    pub fn new(database_path: PathBuf) -> Self {
        Self {
            start_time: Instant::now(),
            database_path,
        }
    }

    /// Get the current status
    pub fn get_status(&self) -> SkmStatus {
        let build_info = BuildInfo::current();

        // Get database size if it exists
        let database_size_bytes = std::fs::metadata(&self.database_path)
            .ok()
            .map(|m| m.len());

        // Get process info
        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));

        let memory_usage_bytes = sys
            .process(Pid::from_u32(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        SkmStatus {
            build_number: build_info.build_number,
            build_timestamp: build_info.build_timestamp,
            version: build_info.version,
            database_path: self.database_path.display().to_string(),
            database_size_bytes,
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
        }
    }
}
