//! Shared Kitchen Manager (SKM) Library
//!
//! Core functionality for kitchen and recipe management.

pub mod build_info;
pub mod db;
pub mod mcp;
pub mod models;
pub mod tools;
pub mod units;
