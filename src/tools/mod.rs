//! SKM Tools module
//!
//! MCP tool implementations for the Shared Kitchen Manager.

pub mod kitchens;
pub mod notifications;
pub mod recipes;
pub mod status;
pub mod tags;
