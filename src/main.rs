//! MCP Integration Server
//!
//! Serves GitHub, Jira and Notion tools to an MCP client over stdio.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use mcp_integration_server::config::{Config, DEFAULT_CONFIG_FILE, DEFAULT_LOCAL_CONFIG_FILE};
use mcp_integration_server::error::Result;
use mcp_integration_server::github::GithubClient;
use mcp_integration_server::jira::JiraClient;
use mcp_integration_server::mcp::server::McpServer;
use mcp_integration_server::mcp::tools::Services;
use mcp_integration_server::notion::NotionClient;

/// MCP Integration Server
#[derive(Parser)]
#[command(name = "mcp-integration-server")]
#[command(author, version, about = "MCP server for GitHub, Jira and Notion")]
struct Cli {
    /// Base config file
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Override file applied on top of the base config
    #[arg(long, default_value = DEFAULT_LOCAL_CONFIG_FILE)]
    local_config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    // stdout carries the protocol, so logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match Config::load(&cli.config, &cli.local_config).and_then(|c| c.validate().map(|_| c)) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    run_server(config).await
}

async fn run_server(config: Config) -> Result<()> {
    let services = Services {
        github: Arc::new(GithubClient::new(config.github_token)?),
        jira: Arc::new(JiraClient::new(config.jira_url, config.jira_username, config.jira_token)?),
        notion: Arc::new(NotionClient::new(config.notion_token)?),
    };

    tracing::info!("Starting MCP integration server on stdio");
    McpServer::new(services).run_stdio().await
}
