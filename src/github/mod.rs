//! GitHub API module
//!
//! Contains types and the client for interacting with the GitHub REST API.

pub mod client;
pub mod types;

pub use client::GithubClient;
