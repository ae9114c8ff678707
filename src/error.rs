//! Error types for the MCP Integration Server
//!
//! This module defines the error hierarchy for all operations in the server.

use thiserror::Error;

/// Main error type for the MCP Integration Server
#[derive(Error, Debug)]
pub enum IntegrationError {
    /// GitHub API errors
    #[error("GitHub API error: {0}")]
    Github(#[from] GithubApiError),

    /// Jira API errors
    #[error("Jira API error: {0}")]
    Jira(#[from] JiraApiError),

    /// Notion API errors
    #[error("Notion API error: {0}")]
    Notion(#[from] NotionApiError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// MCP protocol errors
    #[error("MCP protocol error: {0}")]
    Mcp(#[from] McpError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP client errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// GitHub API errors
#[derive(Error, Debug)]
pub enum GithubApiError {
    #[error("{operation} failed (HTTP {status}): {body}")]
    RequestFailed {
        operation: String,
        status: u16,
        body: String,
    },

    #[error("Not found: {resource}: {body}")]
    NotFound { resource: String, body: String },
}

/// Jira API errors
#[derive(Error, Debug)]
pub enum JiraApiError {
    #[error("{field} cannot be empty")]
    EmptyField { field: &'static str },

    #[error("{operation} (HTTP {status}): {body}")]
    RequestFailed {
        operation: String,
        status: u16,
        body: String,
    },

    #[error("failed to parse response: {message}")]
    InvalidResponse { message: String },
}

/// Notion API errors
#[derive(Error, Debug)]
pub enum NotionApiError {
    #[error("invalid Notion URL: {url}")]
    InvalidUrl { url: String },

    #[error("{operation} failed (HTTP {status}): {body}")]
    RequestFailed {
        operation: String,
        status: u16,
        body: String,
    },
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {message}")]
    ReadFailed { path: String, message: String },

    #[error("Failed to parse config file {path}: {message}")]
    ParseFailed { path: String, message: String },

    #[error("Missing required setting: {field} (set it in the config file or via {env})")]
    MissingCredential {
        field: &'static str,
        env: &'static str,
    },
}

/// MCP protocol errors
#[derive(Error, Debug)]
pub enum McpError {
    #[error("unknown tool: {name}")]
    UnknownTool { name: String },
}

/// Result type alias for MCP Integration Server operations
pub type Result<T> = std::result::Result<T, IntegrationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = JiraApiError::EmptyField { field: "ticket ID" };
        assert_eq!(err.to_string(), "ticket ID cannot be empty");
    }

    #[test]
    fn test_error_conversion() {
        let jira_err = JiraApiError::EmptyField { field: "summary" };
        let err: IntegrationError = jira_err.into();
        assert!(matches!(err, IntegrationError::Jira(_)));
        assert!(err.to_string().contains("summary cannot be empty"));
    }

    #[test]
    fn test_not_found_keeps_upstream_body() {
        let err: IntegrationError = GithubApiError::NotFound {
            resource: "issue o/r#9".to_string(),
            body: r#"{"message":"Not Found"}"#.to_string(),
        }
        .into();
        assert_eq!(
            err.to_string(),
            r#"GitHub API error: Not found: issue o/r#9: {"message":"Not Found"}"#
        );
    }

    #[test]
    fn test_missing_credential_names_env_var() {
        let err = ConfigError::MissingCredential {
            field: "jira_token",
            env: "JIRA_TOKEN",
        };
        assert!(err.to_string().contains("JIRA_TOKEN"));
    }
}
