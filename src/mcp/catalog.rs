//! Tool catalog
//!
//! Static descriptors advertised through `tools/list`. The order here is the
//! order clients see.

use serde_json::{json, Map, Value};

use crate::mcp::types::Tool;

/// Build the full tool catalog
pub fn tool_catalog() -> Vec<Tool> {
    let mut tools = github_tools();
    tools.extend(jira_tools());
    tools.extend(notion_tools());
    tools
}

// ==================== GitHub ====================

fn github_tools() -> Vec<Tool> {
    vec![
        tool_def(
            "github_get_pull_request",
            "Get details of a specific pull request",
            repo_schema(&[("number", integer("Pull request number"))], &["number"]),
        ),
        tool_def(
            "github_get_pull_request_diff",
            "Get the diff of a specific pull request for analysis",
            repo_schema(&[("number", integer("Pull request number"))], &["number"]),
        ),
        tool_def(
            "github_create_issue",
            "Create a new issue in a repository",
            repo_schema(
                &[("title", string("Issue title")), ("body", string("Issue body"))],
                &["title"],
            ),
        ),
        tool_def(
            "github_create_pull_request",
            "Create a new pull request",
            repo_schema(
                &[
                    ("title", string("Pull request title")),
                    ("body", string("Pull request body")),
                    ("head", string("Source branch")),
                    ("base", string("Target branch")),
                ],
                &["title", "head", "base"],
            ),
        ),
        tool_def(
            "github_get_issue",
            "Get details of a specific issue",
            repo_schema(&[("number", integer("Issue number"))], &["number"]),
        ),
        tool_def(
            "github_list_branches",
            "List all branches in a repository",
            repo_schema(&[], &[]),
        ),
        tool_def(
            "github_list_commits",
            "List commits in a repository",
            repo_schema(&[], &[]),
        ),
        tool_def(
            "github_search_repositories",
            "Search for repositories",
            query_schema(),
        ),
        tool_def(
            "github_search_issues",
            "Search for issues across repositories",
            query_schema(),
        ),
        tool_def(
            "github_get_workflows",
            "Get workflows for a repository",
            repo_schema(&[], &[]),
        ),
        tool_def(
            "github_run_workflow",
            "Trigger a workflow run",
            repo_schema(
                &[
                    ("workflowID", string("Workflow ID or workflow file name")),
                    ("ref", string("Git reference")),
                ],
                &["workflowID", "ref"],
            ),
        ),
        tool_def(
            "github_add_comment",
            "Add a comment to an issue or pull request",
            repo_schema(
                &[
                    ("number", integer("Issue or pull request number")),
                    ("body", string("Comment body")),
                ],
                &["number", "body"],
            ),
        ),
        tool_def(
            "github_get_comments",
            "Get comments from an issue or pull request",
            repo_schema(&[("number", integer("Issue or pull request number"))], &["number"]),
        ),
        tool_def(
            "github_assign_copilot",
            "Assign users to an issue or pull request",
            repo_schema(
                &[
                    ("number", integer("Issue or pull request number")),
                    ("assignees", string_array("Array of usernames to assign")),
                ],
                &["number", "assignees"],
            ),
        ),
        tool_def(
            "github_create_branch",
            "Create a new branch in a repository",
            repo_schema(
                &[
                    ("branchName", string("Name for the new branch")),
                    ("sha", string("SHA of the commit to branch from")),
                ],
                &["branchName", "sha"],
            ),
        ),
        tool_def(
            "github_create_repository",
            "Create a new repository",
            object_schema(
                &[
                    ("name", string("Repository name")),
                    ("description", string("Repository description")),
                    ("private", boolean("Whether the repository should be private")),
                ],
                &["name"],
            ),
        ),
        tool_def(
            "github_get_commit",
            "Get details of a specific commit",
            repo_schema(&[("sha", string("Commit SHA"))], &["sha"]),
        ),
        tool_def(
            "github_get_release_by_tag",
            "Get release information by tag",
            repo_schema(&[("tagName", string("Tag name"))], &["tagName"]),
        ),
        tool_def(
            "github_get_tag",
            "Get tag information",
            repo_schema(&[("tagName", string("Tag name"))], &["tagName"]),
        ),
        tool_def(
            "github_search_code",
            "Search for code in repositories",
            query_schema(),
        ),
        tool_def(
            "github_search_pull_requests",
            "Search for pull requests",
            query_schema(),
        ),
        tool_def(
            "github_run_failed_jobs",
            "Re-run the failed jobs of a workflow run",
            repo_schema(&[("runID", integer("Workflow run ID"))], &["runID"]),
        ),
        tool_def(
            "github_create_commit",
            "Create a commit object from an existing tree",
            repo_schema(
                &[
                    ("message", string("Commit message")),
                    ("tree", string("SHA of the tree object")),
                    ("parents", string_array("SHAs of the parent commits")),
                ],
                &["message", "tree", "parents"],
            ),
        ),
        tool_def(
            "github_push",
            "Move a branch to a commit (fast-forward only)",
            repo_schema(
                &[
                    ("ref", string("Branch name, e.g. main")),
                    ("sha", string("SHA of the commit to point the branch at")),
                ],
                &["ref", "sha"],
            ),
        ),
    ]
}

// ==================== Jira ====================

fn jira_tools() -> Vec<Tool> {
    vec![
        tool_def(
            "jira_get_ticket",
            "Get details of a Jira ticket",
            object_schema(&[("ticketID", string("Jira ticket ID"))], &["ticketID"]),
        ),
        tool_def(
            "jira_search_tickets",
            "Search for Jira tickets using JQL",
            object_schema(&[("jql", string("JQL query string"))], &["jql"]),
        ),
        tool_def(
            "jira_create_ticket",
            "Create a new Jira ticket",
            object_schema(
                &[
                    ("projectKey", string("Project key")),
                    ("summary", string("Ticket summary")),
                    ("description", string("Ticket description")),
                ],
                &["projectKey", "summary"],
            ),
        ),
    ]
}

// ==================== Notion ====================

fn notion_tools() -> Vec<Tool> {
    vec![
        tool_def(
            "notion_search_pages",
            "Search for Notion pages by title",
            object_schema(&[("title", string("Page title to search for"))], &["title"]),
        ),
        tool_def(
            "notion_get_page",
            "Get a Notion page by URL",
            object_schema(&[("url", string("Page URL"))], &["url"]),
        ),
        tool_def(
            "notion_get_database",
            "Get a Notion database by ID",
            object_schema(&[("databaseID", string("Database ID"))], &["databaseID"]),
        ),
        tool_def(
            "notion_create_page",
            "Create a new Notion page",
            object_schema(
                &[
                    ("parentID", string("Parent page ID")),
                    ("title", string("Page title")),
                    ("content", string("Page content")),
                ],
                &["parentID", "title"],
            ),
        ),
        tool_def(
            "notion_create_database",
            "Create a new Notion database",
            object_schema(
                &[
                    ("parentPageID", string("Parent page ID")),
                    ("title", string("Database title")),
                ],
                &["parentPageID", "title"],
            ),
        ),
        tool_def(
            "notion_update_page",
            "Update an existing Notion page",
            object_schema(
                &[
                    ("pageID", string("Page ID to update")),
                    ("title", string("New page title")),
                    ("content", string("Content to append to the page")),
                ],
                &["pageID"],
            ),
        ),
        tool_def(
            "notion_update_database",
            "Update an existing Notion database",
            object_schema(
                &[
                    ("databaseID", string("Database ID to update")),
                    ("title", string("New database title")),
                ],
                &["databaseID", "title"],
            ),
        ),
    ]
}

// ==================== Schema Helpers ====================

fn tool_def(name: &str, description: &str, input_schema: Value) -> Tool {
    Tool {
        name: name.to_string(),
        description: description.to_string(),
        input_schema,
    }
}

fn string(description: &str) -> Value {
    json!({"type": "string", "description": description})
}

fn integer(description: &str) -> Value {
    json!({"type": "integer", "description": description})
}

fn boolean(description: &str) -> Value {
    json!({"type": "boolean", "description": description})
}

fn string_array(description: &str) -> Value {
    json!({"type": "array", "items": {"type": "string"}, "description": description})
}

fn object_schema(properties: &[(&str, Value)], required: &[&str]) -> Value {
    let properties: Map<String, Value> = properties
        .iter()
        .map(|(name, schema)| (name.to_string(), schema.clone()))
        .collect();

    json!({
        "type": "object",
        "properties": properties,
        "required": required,
    })
}

/// Schema for tools scoped to one repository: `owner` and `repo` come first
/// and are always required.
fn repo_schema(extra: &[(&str, Value)], extra_required: &[&str]) -> Value {
    let mut properties = vec![
        ("owner", string("Repository owner")),
        ("repo", string("Repository name")),
    ];
    properties.extend(extra.iter().cloned());

    let mut required = vec!["owner", "repo"];
    required.extend_from_slice(extra_required);

    object_schema(&properties, &required)
}

fn query_schema() -> Value {
    object_schema(&[("query", string("Search query"))], &["query"])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_size() {
        let tools = tool_catalog();
        assert_eq!(tools.len(), 34);
        assert_eq!(tools.iter().filter(|t| t.name.starts_with("github_")).count(), 24);
        assert_eq!(tools.iter().filter(|t| t.name.starts_with("jira_")).count(), 3);
        assert_eq!(tools.iter().filter(|t| t.name.starts_with("notion_")).count(), 7);
    }

    #[test]
    fn test_names_are_unique() {
        let tools = tool_catalog();
        let names: HashSet<_> = tools.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names.len(), tools.len());
    }

    #[test]
    fn test_required_fields_are_declared() {
        for tool in tool_catalog() {
            let schema = &tool.input_schema;
            assert_eq!(schema["type"], "object", "{}", tool.name);
            let properties = schema["properties"].as_object().unwrap();
            for field in schema["required"].as_array().unwrap() {
                let field = field.as_str().unwrap();
                assert!(properties.contains_key(field), "{} lacks {}", tool.name, field);
            }
        }
    }

    #[test]
    fn test_property_types_are_restricted() {
        let allowed = ["string", "integer", "boolean", "array"];
        for tool in tool_catalog() {
            for (name, prop) in tool.input_schema["properties"].as_object().unwrap() {
                let ty = prop["type"].as_str().unwrap();
                assert!(allowed.contains(&ty), "{}.{} has type {}", tool.name, name, ty);
                if ty == "array" {
                    assert_eq!(prop["items"]["type"], "string");
                }
            }
        }
    }

    #[test]
    fn test_repo_schema_requires_owner_and_repo() {
        let schema = repo_schema(&[("sha", string("Commit SHA"))], &["sha"]);
        assert_eq!(schema["required"], json!(["owner", "repo", "sha"]));
    }

    #[test]
    fn test_catalog_is_stable_across_calls() {
        let first = serde_json::to_value(tool_catalog()).unwrap();
        let second = serde_json::to_value(tool_catalog()).unwrap();
        assert_eq!(first, second);
    }
}
