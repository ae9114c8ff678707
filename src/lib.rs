//! MCP Integration Server Library
//!
//! A Model Context Protocol (MCP) server exposing GitHub, Jira and Notion
//! operations as tools over a line-delimited JSON-RPC stdio transport.

pub mod config;
pub mod error;
pub mod github;
pub mod jira;
pub mod mcp;
pub mod notion;
pub mod services;

pub use config::Config;
pub use error::{IntegrationError, Result};
