//! Data models
//!
//! Rust structs representing database entities.

mod kitchen;
mod kitchen_member;
mod notification;
mod recipe;
mod recipe_ingredient;
mod tag;

pub use kitchen::{Kitchen, KitchenCreate, KitchenKind, KitchenUpdate};
pub use kitchen_member::{KitchenMember, KitchenMemberCreate, KitchenRole};
pub use notification::{Notification, NotificationCreate};
pub use recipe::{Recipe, RecipeCreate, RecipeUpdate};
pub use recipe_ingredient::{
    RecipeIngredient, RecipeIngredientCreate, RecipeIngredientUpdate,
};
pub use tag::Tag;
