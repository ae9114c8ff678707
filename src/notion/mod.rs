//! Notion API module
//!
//! Types and client for the Notion pages, databases and search endpoints.

pub mod client;
pub mod types;

pub use client::NotionClient;
