//! Quantity and unit handling module
//!
//! Handles the unit catalog, ingredient scaling, and display formatting.

pub mod catalog;
pub mod convert;
pub mod format;

pub use catalog::{base_factor, categorize_unit, unit_options, UnitCategory};
pub use convert::{convert_quantity, InvalidServings, Servings};
pub use format::format_quantity;
