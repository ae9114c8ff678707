//! Configuration management for the MCP Integration Server
//!
//! Credentials are loaded in layers: a base YAML file, an optional override
//! file, then environment variables. Later layers win key by key.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{ConfigError, Result};

/// Default base config file, relative to the working directory
pub const DEFAULT_CONFIG_FILE: &str = "config.yml";

/// Default override file, relative to the working directory
pub const DEFAULT_LOCAL_CONFIG_FILE: &str = "local.yml";

/// Directory name under the user config dir used as a fallback location
const CONFIG_DIR_NAME: &str = "mcp-integration-server";

/// Environment variable names, highest precedence
pub mod env {
    pub const GITHUB_TOKEN: &str = "GITHUB_TOKEN";
    pub const JIRA_URL: &str = "JIRA_URL";
    pub const JIRA_USERNAME: &str = "JIRA_USERNAME";
    pub const JIRA_TOKEN: &str = "JIRA_TOKEN";
    pub const NOTION_TOKEN: &str = "NOTION_TOKEN";
}

/// Credentials for the three upstream services
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// GitHub personal access token
    pub github_token: String,

    /// Jira site URL, e.g. `https://example.atlassian.net`
    pub jira_url: String,

    /// Jira account e-mail used for basic auth
    pub jira_username: String,

    /// Jira API token
    pub jira_token: String,

    /// Notion integration token
    pub notion_token: String,
}

/// One config layer. Absent keys leave the previous layer untouched.
#[derive(Debug, Default, Deserialize)]
struct ConfigLayer {
    github_token: Option<String>,
    jira_url: Option<String>,
    jira_username: Option<String>,
    jira_token: Option<String>,
    notion_token: Option<String>,
}

impl Config {
    /// Load configuration from the given base and override files plus the
    /// process environment.
    pub fn load(base: &Path, local: &Path) -> Result<Self> {
        Self::load_with_env(base, local, |key| std::env::var(key).ok())
    }

    /// Same as [`Config::load`] with an injectable environment lookup.
    pub fn load_with_env<F>(base: &Path, local: &Path, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        let base = Self::resolve_base_path(base);
        for path in [base.as_path(), local] {
            if let Some(layer) = Self::read_layer(path)? {
                tracing::info!("Loaded config from: {}", path.display());
                config.apply(layer);
            }
        }

        config.apply_env(lookup);
        Ok(config)
    }

    /// Fall back to the user config dir when the base file is missing
    fn resolve_base_path(base: &Path) -> PathBuf {
        if base.exists() || base.is_absolute() {
            return base.to_path_buf();
        }

        dirs::config_dir()
            .map(|dir| dir.join(CONFIG_DIR_NAME).join(base))
            .filter(|candidate| candidate.exists())
            .unwrap_or_else(|| base.to_path_buf())
    }

    fn read_layer(path: &Path) -> Result<Option<ConfigLayer>> {
        if !path.exists() {
            tracing::debug!("Config file {} not found, skipping", path.display());
            return Ok(None);
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFailed {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        // An empty file deserializes to unit, not a mapping
        if content.trim().is_empty() {
            return Ok(Some(ConfigLayer::default()));
        }

        let layer = serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseFailed {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        Ok(Some(layer))
    }

    fn apply(&mut self, layer: ConfigLayer) {
        let ConfigLayer {
            github_token,
            jira_url,
            jira_username,
            jira_token,
            notion_token,
        } = layer;

        if let Some(v) = github_token {
            self.github_token = v;
        }
        if let Some(v) = jira_url {
            self.jira_url = v;
        }
        if let Some(v) = jira_username {
            self.jira_username = v;
        }
        if let Some(v) = jira_token {
            self.jira_token = v;
        }
        if let Some(v) = notion_token {
            self.notion_token = v;
        }
    }

    fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let fields: [(&str, &mut String); 5] = [
            (env::GITHUB_TOKEN, &mut self.github_token),
            (env::JIRA_URL, &mut self.jira_url),
            (env::JIRA_USERNAME, &mut self.jira_username),
            (env::JIRA_TOKEN, &mut self.jira_token),
            (env::NOTION_TOKEN, &mut self.notion_token),
        ];

        for (key, field) in fields {
            if let Some(value) = lookup(key).filter(|v| !v.is_empty()) {
                *field = value;
            }
        }
    }

    /// Check that the settings needed at startup are present.
    ///
    /// Jira cannot be reached without its URL, username and token, so those
    /// are fatal. Missing GitHub or Notion tokens only produce a warning; the
    /// corresponding tools will report upstream authentication errors.
    pub fn validate(&self) -> Result<()> {
        let required = [
            (&self.jira_url, "jira_url", env::JIRA_URL),
            (&self.jira_username, "jira_username", env::JIRA_USERNAME),
            (&self.jira_token, "jira_token", env::JIRA_TOKEN),
        ];

        for (value, field, env) in required {
            if value.is_empty() {
                return Err(ConfigError::MissingCredential { field, env }.into());
            }
        }

        if self.github_token.is_empty() {
            tracing::warn!("github_token is not set; GitHub tools will be unauthenticated");
        }
        if self.notion_token.is_empty() {
            tracing::warn!("notion_token is not set; Notion tools will fail");
        }

        Ok(())
    }
}

/// Timeout applied to every upstream HTTP call
pub const HTTP_TIMEOUT_SECS: u64 = 30;

/// GitHub API constants
pub mod github {
    /// Base URL for the GitHub REST API
    pub const API_BASE_URL: &str = "https://api.github.com";

    /// Value of the `X-GitHub-Api-Version` header
    pub const API_VERSION: &str = "2022-11-28";

    pub const MEDIA_TYPE: &str = "application/vnd.github+json";
    pub const DIFF_MEDIA_TYPE: &str = "application/vnd.github.v3.diff";
}

/// Jira API constants
pub mod jira {
    /// REST path appended to the site URL
    pub const API_PATH: &str = "rest/api/3/";

    /// Issue type used for new tickets
    pub const DEFAULT_ISSUE_TYPE: &str = "Task";

    /// Page size for JQL searches
    pub const SEARCH_MAX_RESULTS: u32 = 50;
}

/// Notion API constants
pub mod notion {
    /// Base URL for the Notion API
    pub const API_BASE_URL: &str = "https://api.notion.com/v1";

    /// Value of the `Notion-Version` header
    pub const API_VERSION: &str = "2022-06-28";
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_missing_files_yield_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_with_env(
            &dir.path().join("config.yml"),
            &dir.path().join("local.yml"),
            no_env,
        )
        .unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_local_file_overrides_base_per_key() {
        let dir = TempDir::new().unwrap();
        let base = write(
            &dir,
            "config.yml",
            "github_token: base-gh\njira_url: https://base.atlassian.net\njira_token: base-jira\n",
        );
        let local = write(&dir, "local.yml", "jira_token: local-jira\n");

        let config = Config::load_with_env(&base, &local, no_env).unwrap();
        assert_eq!(config.github_token, "base-gh");
        assert_eq!(config.jira_url, "https://base.atlassian.net");
        assert_eq!(config.jira_token, "local-jira");
    }

    #[test]
    fn test_env_has_highest_precedence() {
        let dir = TempDir::new().unwrap();
        let base = write(&dir, "config.yml", "notion_token: file-notion\njira_username: file-user\n");
        let local = dir.path().join("local.yml");

        let env: HashMap<&str, &str> = [(env::NOTION_TOKEN, "env-notion"), (env::JIRA_USERNAME, "")]
            .into_iter()
            .collect();

        let config =
            Config::load_with_env(&base, &local, |k| env.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(config.notion_token, "env-notion");
        // empty env values do not clobber the file
        assert_eq!(config.jira_username, "file-user");
    }

    #[test]
    fn test_invalid_yaml_is_an_error() {
        let dir = TempDir::new().unwrap();
        let base = write(&dir, "config.yml", "github_token: [unclosed\n");
        let result = Config::load_with_env(&base, &dir.path().join("local.yml"), no_env);
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_file_is_accepted() {
        let dir = TempDir::new().unwrap();
        let base = write(&dir, "config.yml", "");
        let config =
            Config::load_with_env(&base, &dir.path().join("local.yml"), no_env).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_validate_requires_jira_credentials() {
        let mut config = Config {
            jira_url: "https://example.atlassian.net".to_string(),
            jira_username: "me@example.com".to_string(),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("jira_token"));

        config.jira_token = "secret".to_string();
        assert!(config.validate().is_ok());
    }
}
