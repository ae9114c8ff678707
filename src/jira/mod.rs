//! Jira API module

pub mod client;
pub mod types;

pub use client::JiraClient;
