//! Service traits consumed by the tool dispatcher
//!
//! Each upstream API is reached through one of these traits. The concrete
//! clients live in [`crate::github`], [`crate::jira`] and [`crate::notion`];
//! every method performs one upstream call (or a short fixed sequence) and
//! renders the outcome as display text.

use async_trait::async_trait;

use crate::error::Result;

/// Source control operations against GitHub
#[async_trait]
pub trait GithubService: Send + Sync {
    async fn get_pull_request(&self, owner: &str, repo: &str, number: i64) -> Result<String>;
    async fn get_pull_request_diff(&self, owner: &str, repo: &str, number: i64) -> Result<String>;
    async fn create_issue(&self, owner: &str, repo: &str, title: &str, body: &str) -> Result<String>;
    async fn create_pull_request(
        &self,
        owner: &str,
        repo: &str,
        title: &str,
        body: &str,
        head: &str,
        base: &str,
    ) -> Result<String>;
    async fn get_comments(&self, owner: &str, repo: &str, number: i64) -> Result<String>;
    async fn add_comment(&self, owner: &str, repo: &str, number: i64, body: &str) -> Result<String>;
    async fn assign_copilot(
        &self,
        owner: &str,
        repo: &str,
        number: i64,
        assignees: &[String],
    ) -> Result<String>;
    async fn create_branch(&self, owner: &str, repo: &str, branch: &str, sha: &str) -> Result<String>;
    async fn create_repository(&self, name: &str, description: &str, private: bool) -> Result<String>;
    async fn get_commit(&self, owner: &str, repo: &str, sha: &str) -> Result<String>;
    async fn get_issue(&self, owner: &str, repo: &str, number: i64) -> Result<String>;
    async fn get_release_by_tag(&self, owner: &str, repo: &str, tag: &str) -> Result<String>;
    async fn get_tag(&self, owner: &str, repo: &str, tag: &str) -> Result<String>;
    async fn list_branches(&self, owner: &str, repo: &str) -> Result<String>;
    async fn list_commits(&self, owner: &str, repo: &str) -> Result<String>;
    async fn get_workflows(&self, owner: &str, repo: &str) -> Result<String>;
    async fn run_workflow(&self, owner: &str, repo: &str, workflow_id: &str, git_ref: &str)
        -> Result<String>;
    async fn run_failed_jobs(&self, owner: &str, repo: &str, run_id: i64) -> Result<String>;
    async fn create_commit(
        &self,
        owner: &str,
        repo: &str,
        message: &str,
        tree: &str,
        parents: &[String],
    ) -> Result<String>;
    async fn push(&self, owner: &str, repo: &str, git_ref: &str, sha: &str) -> Result<String>;
    async fn search_code(&self, query: &str) -> Result<String>;
    async fn search_issues(&self, query: &str) -> Result<String>;
    async fn search_pull_requests(&self, query: &str) -> Result<String>;
    async fn search_repositories(&self, query: &str) -> Result<String>;
}

/// Ticket operations against Jira
#[async_trait]
pub trait JiraService: Send + Sync {
    async fn get_ticket(&self, ticket_id: &str) -> Result<String>;
    async fn search_tickets(&self, jql: &str) -> Result<String>;
    async fn create_ticket(&self, project_key: &str, summary: &str, description: &str)
        -> Result<String>;
}

/// Page and database operations against Notion
#[async_trait]
pub trait NotionService: Send + Sync {
    async fn search_pages(&self, title: &str) -> Result<String>;
    async fn get_page_by_url(&self, url: &str) -> Result<String>;
    async fn get_database(&self, database_id: &str) -> Result<String>;
    async fn create_page(&self, parent_id: &str, title: &str, content: &str) -> Result<String>;
    async fn create_database(&self, parent_page_id: &str, title: &str) -> Result<String>;
    async fn update_page(&self, page_id: &str, title: &str, content: &str) -> Result<String>;
    async fn update_database(&self, database_id: &str, title: &str) -> Result<String>;
}
