//! MCP Server Module

pub mod server;

pub use server::SkmService;
