//! MCP (Model Context Protocol) module
//!
//! Implements the MCP server protocol for tool invocation.

pub mod args;
pub mod catalog;
pub mod server;
pub mod tools;
pub mod types;
