//! MCP tool dispatch
//!
//! Maps tool names to handlers. Every handler has the same shape: it takes
//! the service handles plus the loosely typed argument mapping, pulls out
//! the fields it needs, and forwards them to one service call.

use std::collections::HashMap;
use std::sync::Arc;

use futures::future::BoxFuture;

use crate::error::{McpError, Result};
use crate::mcp::args::Arguments;
use crate::mcp::catalog::tool_catalog;
use crate::mcp::types::{CallToolResult, Tool};
use crate::services::{GithubService, JiraService, NotionService};

/// Handles to the upstream services shared by all handlers
#[derive(Clone)]
pub struct Services {
    pub github: Arc<dyn GithubService>,
    pub jira: Arc<dyn JiraService>,
    pub notion: Arc<dyn NotionService>,
}

/// Uniform handler signature
type Handler = for<'a> fn(&'a Services, Arguments) -> BoxFuture<'a, Result<String>>;

/// Tool handler
pub struct ToolHandler {
    services: Services,
    tools: Vec<Tool>,
    routes: HashMap<&'static str, Handler>,
}

impl ToolHandler {
    /// Create a new tool handler
    pub fn new(services: Services) -> Self {
        Self {
            services,
            tools: tool_catalog(),
            routes: ROUTES.iter().copied().collect(),
        }
    }

    /// List all available tools
    pub fn list_tools(&self) -> Vec<Tool> {
        self.tools.clone()
    }

    /// Call a tool by name. Failures are reported inside the result, never
    /// as an `Err`.
    pub async fn call_tool(&self, name: &str, args: Arguments) -> CallToolResult {
        let Some(handler) = self.routes.get(name) else {
            tracing::warn!("Unknown tool requested: {}", name);
            let err = McpError::UnknownTool {
                name: name.to_string(),
            };
            return CallToolResult::error(err.to_string());
        };

        tracing::debug!("Calling tool {}", name);
        match handler(&self.services, args).await {
            Ok(text) => CallToolResult::text(text),
            Err(e) => {
                tracing::warn!("Tool {} failed: {}", name, e);
                CallToolResult::error(e.to_string())
            }
        }
    }
}

const ROUTES: &[(&str, Handler)] = &[
    ("github_get_pull_request", github_get_pull_request),
    ("github_get_pull_request_diff", github_get_pull_request_diff),
    ("github_create_issue", github_create_issue),
    ("github_create_pull_request", github_create_pull_request),
    ("github_get_issue", github_get_issue),
    ("github_list_branches", github_list_branches),
    ("github_list_commits", github_list_commits),
    ("github_search_repositories", github_search_repositories),
    ("github_search_issues", github_search_issues),
    ("github_get_workflows", github_get_workflows),
    ("github_run_workflow", github_run_workflow),
    ("github_add_comment", github_add_comment),
    ("github_get_comments", github_get_comments),
    ("github_assign_copilot", github_assign_copilot),
    ("github_create_branch", github_create_branch),
    ("github_create_repository", github_create_repository),
    ("github_get_commit", github_get_commit),
    ("github_get_release_by_tag", github_get_release_by_tag),
    ("github_get_tag", github_get_tag),
    ("github_search_code", github_search_code),
    ("github_search_pull_requests", github_search_pull_requests),
    ("github_run_failed_jobs", github_run_failed_jobs),
    ("github_create_commit", github_create_commit),
    ("github_push", github_push),
    ("jira_get_ticket", jira_get_ticket),
    ("jira_search_tickets", jira_search_tickets),
    ("jira_create_ticket", jira_create_ticket),
    ("notion_search_pages", notion_search_pages),
    ("notion_get_page", notion_get_page),
    ("notion_get_database", notion_get_database),
    ("notion_create_page", notion_create_page),
    ("notion_create_database", notion_create_database),
    ("notion_update_page", notion_update_page),
    ("notion_update_database", notion_update_database),
];

// ==================== GitHub Handlers ====================

fn github_get_pull_request(s: &Services, args: Arguments) -> BoxFuture<'_, Result<String>> {
    Box::pin(async move {
        let (owner, repo) = (args.string("owner"), args.string("repo"));
        s.github.get_pull_request(&owner, &repo, args.integer("number")).await
    })
}

fn github_get_pull_request_diff(s: &Services, args: Arguments) -> BoxFuture<'_, Result<String>> {
    Box::pin(async move {
        let (owner, repo) = (args.string("owner"), args.string("repo"));
        s.github.get_pull_request_diff(&owner, &repo, args.integer("number")).await
    })
}

fn github_create_issue(s: &Services, args: Arguments) -> BoxFuture<'_, Result<String>> {
    Box::pin(async move {
        let (owner, repo) = (args.string("owner"), args.string("repo"));
        let (title, body) = (args.string("title"), args.string("body"));
        s.github.create_issue(&owner, &repo, &title, &body).await
    })
}

fn github_create_pull_request(s: &Services, args: Arguments) -> BoxFuture<'_, Result<String>> {
    Box::pin(async move {
        let (owner, repo) = (args.string("owner"), args.string("repo"));
        let (title, body) = (args.string("title"), args.string("body"));
        let (head, base) = (args.string("head"), args.string("base"));
        s.github
            .create_pull_request(&owner, &repo, &title, &body, &head, &base)
            .await
    })
}

fn github_get_issue(s: &Services, args: Arguments) -> BoxFuture<'_, Result<String>> {
    Box::pin(async move {
        let (owner, repo) = (args.string("owner"), args.string("repo"));
        s.github.get_issue(&owner, &repo, args.integer("number")).await
    })
}

fn github_list_branches(s: &Services, args: Arguments) -> BoxFuture<'_, Result<String>> {
    Box::pin(async move {
        let (owner, repo) = (args.string("owner"), args.string("repo"));
        s.github.list_branches(&owner, &repo).await
    })
}

fn github_list_commits(s: &Services, args: Arguments) -> BoxFuture<'_, Result<String>> {
    Box::pin(async move {
        let (owner, repo) = (args.string("owner"), args.string("repo"));
        s.github.list_commits(&owner, &repo).await
    })
}

fn github_search_repositories(s: &Services, args: Arguments) -> BoxFuture<'_, Result<String>> {
    Box::pin(async move { s.github.search_repositories(&args.string("query")).await })
}

fn github_search_issues(s: &Services, args: Arguments) -> BoxFuture<'_, Result<String>> {
    Box::pin(async move { s.github.search_issues(&args.string("query")).await })
}

fn github_get_workflows(s: &Services, args: Arguments) -> BoxFuture<'_, Result<String>> {
    Box::pin(async move {
        let (owner, repo) = (args.string("owner"), args.string("repo"));
        s.github.get_workflows(&owner, &repo).await
    })
}

fn github_run_workflow(s: &Services, args: Arguments) -> BoxFuture<'_, Result<String>> {
    Box::pin(async move {
        let (owner, repo) = (args.string("owner"), args.string("repo"));
        let (workflow_id, git_ref) = (args.string("workflowID"), args.string("ref"));
        s.github.run_workflow(&owner, &repo, &workflow_id, &git_ref).await
    })
}

fn github_add_comment(s: &Services, args: Arguments) -> BoxFuture<'_, Result<String>> {
    Box::pin(async move {
        let (owner, repo) = (args.string("owner"), args.string("repo"));
        let body = args.string("body");
        s.github.add_comment(&owner, &repo, args.integer("number"), &body).await
    })
}

fn github_get_comments(s: &Services, args: Arguments) -> BoxFuture<'_, Result<String>> {
    Box::pin(async move {
        let (owner, repo) = (args.string("owner"), args.string("repo"));
        s.github.get_comments(&owner, &repo, args.integer("number")).await
    })
}

fn github_assign_copilot(s: &Services, args: Arguments) -> BoxFuture<'_, Result<String>> {
    Box::pin(async move {
        let (owner, repo) = (args.string("owner"), args.string("repo"));
        let assignees = args.string_list("assignees");
        s.github
            .assign_copilot(&owner, &repo, args.integer("number"), &assignees)
            .await
    })
}

fn github_create_branch(s: &Services, args: Arguments) -> BoxFuture<'_, Result<String>> {
    Box::pin(async move {
        let (owner, repo) = (args.string("owner"), args.string("repo"));
        let (branch, sha) = (args.string("branchName"), args.string("sha"));
        s.github.create_branch(&owner, &repo, &branch, &sha).await
    })
}

fn github_create_repository(s: &Services, args: Arguments) -> BoxFuture<'_, Result<String>> {
    Box::pin(async move {
        let (name, description) = (args.string("name"), args.string("description"));
        s.github
            .create_repository(&name, &description, args.boolean("private"))
            .await
    })
}

fn github_get_commit(s: &Services, args: Arguments) -> BoxFuture<'_, Result<String>> {
    Box::pin(async move {
        let (owner, repo) = (args.string("owner"), args.string("repo"));
        s.github.get_commit(&owner, &repo, &args.string("sha")).await
    })
}

fn github_get_release_by_tag(s: &Services, args: Arguments) -> BoxFuture<'_, Result<String>> {
    Box::pin(async move {
        let (owner, repo) = (args.string("owner"), args.string("repo"));
        s.github.get_release_by_tag(&owner, &repo, &args.string("tagName")).await
    })
}

fn github_get_tag(s: &Services, args: Arguments) -> BoxFuture<'_, Result<String>> {
    Box::pin(async move {
        let (owner, repo) = (args.string("owner"), args.string("repo"));
        s.github.get_tag(&owner, &repo, &args.string("tagName")).await
    })
}

fn github_search_code(s: &Services, args: Arguments) -> BoxFuture<'_, Result<String>> {
    Box::pin(async move { s.github.search_code(&args.string("query")).await })
}

fn github_search_pull_requests(s: &Services, args: Arguments) -> BoxFuture<'_, Result<String>> {
    Box::pin(async move { s.github.search_pull_requests(&args.string("query")).await })
}

fn github_run_failed_jobs(s: &Services, args: Arguments) -> BoxFuture<'_, Result<String>> {
    Box::pin(async move {
        let (owner, repo) = (args.string("owner"), args.string("repo"));
        s.github.run_failed_jobs(&owner, &repo, args.integer("runID")).await
    })
}

fn github_create_commit(s: &Services, args: Arguments) -> BoxFuture<'_, Result<String>> {
    Box::pin(async move {
        let (owner, repo) = (args.string("owner"), args.string("repo"));
        let (message, tree) = (args.string("message"), args.string("tree"));
        let parents = args.string_list("parents");
        s.github
            .create_commit(&owner, &repo, &message, &tree, &parents)
            .await
    })
}

fn github_push(s: &Services, args: Arguments) -> BoxFuture<'_, Result<String>> {
    Box::pin(async move {
        let (owner, repo) = (args.string("owner"), args.string("repo"));
        let (git_ref, sha) = (args.string("ref"), args.string("sha"));
        s.github.push(&owner, &repo, &git_ref, &sha).await
    })
}

// ==================== Jira Handlers ====================

fn jira_get_ticket(s: &Services, args: Arguments) -> BoxFuture<'_, Result<String>> {
    Box::pin(async move { s.jira.get_ticket(&args.string("ticketID")).await })
}

fn jira_search_tickets(s: &Services, args: Arguments) -> BoxFuture<'_, Result<String>> {
    Box::pin(async move { s.jira.search_tickets(&args.string("jql")).await })
}

fn jira_create_ticket(s: &Services, args: Arguments) -> BoxFuture<'_, Result<String>> {
    Box::pin(async move {
        let (project_key, summary) = (args.string("projectKey"), args.string("summary"));
        let description = args.string("description");
        s.jira.create_ticket(&project_key, &summary, &description).await
    })
}

// ==================== Notion Handlers ====================

fn notion_search_pages(s: &Services, args: Arguments) -> BoxFuture<'_, Result<String>> {
    Box::pin(async move { s.notion.search_pages(&args.string("title")).await })
}

fn notion_get_page(s: &Services, args: Arguments) -> BoxFuture<'_, Result<String>> {
    Box::pin(async move { s.notion.get_page_by_url(&args.string("url")).await })
}

fn notion_get_database(s: &Services, args: Arguments) -> BoxFuture<'_, Result<String>> {
    Box::pin(async move { s.notion.get_database(&args.string("databaseID")).await })
}

fn notion_create_page(s: &Services, args: Arguments) -> BoxFuture<'_, Result<String>> {
    Box::pin(async move {
        let (parent_id, title) = (args.string("parentID"), args.string("title"));
        let content = args.string("content");
        s.notion.create_page(&parent_id, &title, &content).await
    })
}

fn notion_create_database(s: &Services, args: Arguments) -> BoxFuture<'_, Result<String>> {
    Box::pin(async move {
        let (parent_page_id, title) = (args.string("parentPageID"), args.string("title"));
        s.notion.create_database(&parent_page_id, &title).await
    })
}

fn notion_update_page(s: &Services, args: Arguments) -> BoxFuture<'_, Result<String>> {
    Box::pin(async move {
        let (page_id, title) = (args.string("pageID"), args.string("title"));
        let content = args.string("content");
        s.notion.update_page(&page_id, &title, &content).await
    })
}

fn notion_update_database(s: &Services, args: Arguments) -> BoxFuture<'_, Result<String>> {
    Box::pin(async move {
        let (database_id, title) = (args.string("databaseID"), args.string("title"));
        s.notion.update_database(&database_id, &title).await
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_routes_match_catalog() {
        let catalog: HashSet<String> = tool_catalog().into_iter().map(|t| t.name).collect();
        let routes: HashSet<String> = ROUTES.iter().map(|(name, _)| name.to_string()).collect();
        assert_eq!(routes.len(), ROUTES.len(), "duplicate route");
        assert_eq!(catalog, routes);
    }
}
