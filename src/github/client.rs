//! GitHub API client
//!
//! High-level client for the GitHub REST API operations exposed as tools.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;

use crate::config::github::{API_BASE_URL, API_VERSION, DIFF_MEDIA_TYPE, MEDIA_TYPE};
use crate::config::HTTP_TIMEOUT_SECS;
use crate::error::{GithubApiError, IntegrationError, Result};
use crate::github::types::*;
use crate::services::GithubService;

/// Page size requested from list endpoints
const PER_PAGE: &str = "100";

/// GitHub API client
pub struct GithubClient {
    /// HTTP client
    http_client: reqwest::Client,

    /// Personal access token; empty means unauthenticated
    token: String,

    /// API root, without trailing slash
    base_url: String,
}

impl GithubClient {
    /// Create a new GitHub client against api.github.com
    pub fn new(token: impl Into<String>) -> Result<Self> {
        Self::with_base_url(token, API_BASE_URL)
    }

    /// Create a client against another API root (e.g. GitHub Enterprise)
    pub fn with_base_url(token: impl Into<String>, base_url: impl Into<String>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, HeaderValue::from_static(MEDIA_TYPE));
        headers.insert("x-github-api-version", HeaderValue::from_static(API_VERSION));

        let http_client = reqwest::Client::builder()
            .user_agent(concat!("mcp-integration-server/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            http_client,
            token: token.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// URL under `/repos/{owner}/{repo}`
    fn repo_url(&self, owner: &str, repo: &str, path: &str) -> String {
        format!(
            "{}/repos/{}/{}{}",
            self.base_url,
            urlencoding::encode(owner),
            urlencoding::encode(repo),
            path
        )
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        if self.token.is_empty() {
            request
        } else {
            request.bearer_auth(&self.token)
        }
    }

    fn get(&self, url: &str) -> RequestBuilder {
        self.authorized(self.http_client.get(url))
    }

    fn post(&self, url: &str) -> RequestBuilder {
        self.authorized(self.http_client.post(url))
    }

    /// Send a request, mapping non-success statuses to errors
    async fn send(&self, request: RequestBuilder, operation: &str) -> Result<Response> {
        let response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        tracing::debug!("GitHub {} returned {}: {}", operation, status, body);

        if status == StatusCode::NOT_FOUND {
            return Err(IntegrationError::Github(GithubApiError::NotFound {
                resource: operation.to_string(),
                body,
            }));
        }

        Err(IntegrationError::Github(GithubApiError::RequestFailed {
            operation: operation.to_string(),
            status: status.as_u16(),
            body,
        }))
    }

    /// Send a request and decode the JSON body
    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder, operation: &str) -> Result<T> {
        let response = self.send(request, operation).await?;
        Ok(response.json().await?)
    }

    async fn search<T: DeserializeOwned>(&self, kind: &str, query: &str, sort: &str) -> Result<SearchResult<T>> {
        let url = format!("{}/search/{}", self.base_url, kind);
        let request = self
            .get(&url)
            .query(&[("q", query), ("sort", sort), ("order", "desc")]);
        self.send_json(request, &format!("search {}", kind)).await
    }
}

#[async_trait]
impl GithubService for GithubClient {
    async fn get_pull_request(&self, owner: &str, repo: &str, number: i64) -> Result<String> {
        let url = self.repo_url(owner, repo, &format!("/pulls/{}", number));
        let pr: PullRequest = self
            .send_json(self.get(&url), &format!("pull request {}/{}#{}", owner, repo, number))
            .await?;
        Ok(pr.to_string())
    }

    async fn get_pull_request_diff(&self, owner: &str, repo: &str, number: i64) -> Result<String> {
        let url = self.repo_url(owner, repo, &format!("/pulls/{}", number));
        let request = self.get(&url).header(header::ACCEPT, DIFF_MEDIA_TYPE);
        let response = self
            .send(request, &format!("diff of {}/{}#{}", owner, repo, number))
            .await?;
        Ok(response.text().await?)
    }

    async fn create_issue(&self, owner: &str, repo: &str, title: &str, body: &str) -> Result<String> {
        let url = self.repo_url(owner, repo, "/issues");
        let request = self.post(&url).json(&CreateIssueRequest { title, body });
        let issue: Issue = self.send_json(request, "create issue").await?;
        Ok(issue.to_string())
    }

    async fn create_pull_request(
        &self,
        owner: &str,
        repo: &str,
        title: &str,
        body: &str,
        head: &str,
        base: &str,
    ) -> Result<String> {
        let url = self.repo_url(owner, repo, "/pulls");
        let request = self.post(&url).json(&CreatePullRequestRequest {
            title,
            body,
            head,
            base,
        });
        let pr: PullRequest = self.send_json(request, "create pull request").await?;
        Ok(pr.to_string())
    }

    async fn get_comments(&self, owner: &str, repo: &str, number: i64) -> Result<String> {
        let url = self.repo_url(owner, repo, &format!("/issues/{}/comments", number));
        let request = self.get(&url).query(&[("per_page", PER_PAGE)]);
        let comments: Vec<IssueComment> = self
            .send_json(request, &format!("comments of {}/{}#{}", owner, repo, number))
            .await?;

        Ok(comments.iter().map(|c| format!("{}\n", c)).collect())
    }

    async fn add_comment(&self, owner: &str, repo: &str, number: i64, body: &str) -> Result<String> {
        let url = self.repo_url(owner, repo, &format!("/issues/{}/comments", number));
        let request = self.post(&url).json(&CommentRequest { body });
        let comment: IssueComment = self.send_json(request, "add comment").await?;
        Ok(comment.to_string())
    }

    async fn assign_copilot(
        &self,
        owner: &str,
        repo: &str,
        number: i64,
        assignees: &[String],
    ) -> Result<String> {
        let url = self.repo_url(owner, repo, &format!("/issues/{}/assignees", number));
        let request = self.post(&url).json(&AssigneesRequest { assignees });
        let issue: Issue = self.send_json(request, "add assignees").await?;
        Ok(issue.to_string())
    }

    async fn create_branch(&self, owner: &str, repo: &str, branch: &str, sha: &str) -> Result<String> {
        let url = self.repo_url(owner, repo, "/git/refs");
        let request = self.post(&url).json(&CreateRefRequest {
            git_ref: format!("refs/heads/{}", branch),
            sha: sha.to_string(),
        });
        let reference: Reference = self.send_json(request, "create branch").await?;
        Ok(reference.to_string())
    }

    async fn create_repository(&self, name: &str, description: &str, private: bool) -> Result<String> {
        let url = format!("{}/user/repos", self.base_url);
        let request = self.post(&url).json(&CreateRepositoryRequest {
            name,
            description,
            private,
        });
        let repository: Repository = self.send_json(request, "create repository").await?;
        Ok(repository.to_string())
    }

    async fn get_commit(&self, owner: &str, repo: &str, sha: &str) -> Result<String> {
        let url = self.repo_url(owner, repo, &format!("/git/commits/{}", urlencoding::encode(sha)));
        let commit: GitCommit = self
            .send_json(self.get(&url), &format!("commit {} in {}/{}", sha, owner, repo))
            .await?;
        Ok(commit.to_string())
    }

    async fn get_issue(&self, owner: &str, repo: &str, number: i64) -> Result<String> {
        let url = self.repo_url(owner, repo, &format!("/issues/{}", number));
        let issue: Issue = self
            .send_json(self.get(&url), &format!("issue {}/{}#{}", owner, repo, number))
            .await?;
        Ok(issue.to_string())
    }

    async fn get_release_by_tag(&self, owner: &str, repo: &str, tag: &str) -> Result<String> {
        let url = self.repo_url(owner, repo, &format!("/releases/tags/{}", urlencoding::encode(tag)));
        let release: Release = self
            .send_json(self.get(&url), &format!("release {} in {}/{}", tag, owner, repo))
            .await?;
        Ok(release.to_string())
    }

    async fn get_tag(&self, owner: &str, repo: &str, tag: &str) -> Result<String> {
        // No lookup-by-name endpoint: list and filter
        let url = self.repo_url(owner, repo, "/tags");
        let request = self.get(&url).query(&[("per_page", PER_PAGE)]);
        let tags: Vec<NamedCommit> = self.send_json(request, "list tags").await?;

        Ok(find_tag(&tags, tag)
            .map(|t| format!("Tag: {}\nCommit: {}", t.name, t.commit.sha))
            .unwrap_or_else(|| "Tag not found".to_string()))
    }

    async fn list_branches(&self, owner: &str, repo: &str) -> Result<String> {
        let url = self.repo_url(owner, repo, "/branches");
        let request = self.get(&url).query(&[("per_page", PER_PAGE)]);
        let branches: Vec<NamedCommit> = self.send_json(request, "list branches").await?;

        Ok(branches
            .iter()
            .map(|b| format!("Branch: {}\nSHA: {}\n\n", b.name, b.commit.sha))
            .collect())
    }

    async fn list_commits(&self, owner: &str, repo: &str) -> Result<String> {
        let url = self.repo_url(owner, repo, "/commits");
        let commits: Vec<RepoCommit> = self.send_json(self.get(&url), "list commits").await?;
        Ok(commits.iter().map(|c| format!("{}\n", c)).collect())
    }

    async fn get_workflows(&self, owner: &str, repo: &str) -> Result<String> {
        let url = self.repo_url(owner, repo, "/actions/workflows");
        let list: WorkflowList = self.send_json(self.get(&url), "list workflows").await?;

        Ok(list
            .workflows
            .iter()
            .map(|w| format!("Workflow: {}\nID: {}\nState: {}\n\n", w.name, w.id, w.state))
            .collect())
    }

    async fn run_workflow(&self, owner: &str, repo: &str, workflow_id: &str, git_ref: &str) -> Result<String> {
        let url = self.repo_url(
            owner,
            repo,
            &format!("/actions/workflows/{}/dispatches", urlencoding::encode(workflow_id)),
        );
        let request = self.post(&url).json(&WorkflowDispatchRequest { git_ref });
        self.send(request, "dispatch workflow").await?;
        Ok("Workflow run successfully".to_string())
    }

    async fn run_failed_jobs(&self, owner: &str, repo: &str, run_id: i64) -> Result<String> {
        let url = self.repo_url(owner, repo, &format!("/actions/runs/{}/rerun-failed-jobs", run_id));
        self.send(self.post(&url), "re-run failed jobs").await?;
        Ok(format!("Re-run of failed jobs requested for run {}", run_id))
    }

    async fn create_commit(
        &self,
        owner: &str,
        repo: &str,
        message: &str,
        tree: &str,
        parents: &[String],
    ) -> Result<String> {
        let url = self.repo_url(owner, repo, "/git/commits");
        let request = self.post(&url).json(&CreateCommitRequest {
            message,
            tree,
            parents,
        });
        let commit: GitCommit = self.send_json(request, "create commit").await?;
        Ok(commit.to_string())
    }

    async fn push(&self, owner: &str, repo: &str, git_ref: &str, sha: &str) -> Result<String> {
        let url = self.repo_url(owner, repo, &format!("/git/refs/{}", branch_ref_path(git_ref)));
        let request = self
            .authorized(self.http_client.patch(&url))
            .json(&UpdateRefRequest { sha, force: false });
        let reference: Reference = self.send_json(request, "update ref").await?;
        Ok(reference.to_string())
    }

    async fn search_code(&self, query: &str) -> Result<String> {
        let result: SearchResult<CodeResult> = self.search("code", query, "indexed").await?;

        Ok(result
            .items
            .iter()
            .map(|c| format!("File: {}\nRepo: {}\nURL: {}\n\n", c.name, c.repository.full_name, c.html_url))
            .collect())
    }

    async fn search_issues(&self, query: &str) -> Result<String> {
        let result: SearchResult<Issue> = self.search("issues", query, "updated").await?;
        Ok(format_issue_hits(&result.items))
    }

    async fn search_pull_requests(&self, query: &str) -> Result<String> {
        // Pull requests are searched as issues
        let query = format!("{} is:pr", query);
        let result: SearchResult<Issue> = self.search("issues", &query, "updated").await?;
        Ok(format_issue_hits(&result.items))
    }

    async fn search_repositories(&self, query: &str) -> Result<String> {
        let result: SearchResult<Repository> = self.search("repositories", query, "stars").await?;

        Ok(result
            .items
            .iter()
            .map(|r| {
                format!(
                    "Name: {}\nDescription: {}\nStars: {}\nURL: {}\n\n",
                    r.full_name,
                    r.description.as_deref().unwrap_or_default(),
                    r.stargazers_count,
                    r.html_url
                )
            })
            .collect())
    }
}

/// Find a tag by exact name
fn find_tag<'a>(tags: &'a [NamedCommit], name: &str) -> Option<&'a NamedCommit> {
    tags.iter().find(|t| t.name == name)
}

/// Path under `/git/refs/` for a branch given as `main`, `heads/main` or
/// `refs/heads/main`
fn branch_ref_path(git_ref: &str) -> String {
    let git_ref = git_ref.trim_start_matches("refs/");
    if git_ref.starts_with("heads/") || git_ref.starts_with("tags/") {
        git_ref.to_string()
    } else {
        format!("heads/{}", git_ref)
    }
}

fn format_issue_hits(issues: &[Issue]) -> String {
    issues
        .iter()
        .map(|i| {
            format!(
                "Title: {}\nNumber: {}\nState: {}\nURL: {}\n\n",
                i.title, i.number, i.state, i.html_url
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_branch_ref_path() {
        assert_eq!(branch_ref_path("main"), "heads/main");
        assert_eq!(branch_ref_path("feature/login"), "heads/feature/login");
        assert_eq!(branch_ref_path("heads/main"), "heads/main");
        assert_eq!(branch_ref_path("refs/heads/main"), "heads/main");
    }

    #[test]
    fn test_find_tag() {
        let tags: Vec<NamedCommit> = serde_json::from_value(json!([
            {"name": "v1.0.0", "commit": {"sha": "aaa"}},
            {"name": "v1.1.0", "commit": {"sha": "bbb"}}
        ]))
        .unwrap();

        assert_eq!(find_tag(&tags, "v1.1.0").unwrap().commit.sha, "bbb");
        assert!(find_tag(&tags, "v2.0.0").is_none());
    }

    #[test]
    fn test_format_issue_hits() {
        let issues: Vec<Issue> = serde_json::from_value(json!([{
            "number": 3,
            "title": "Flaky test",
            "state": "open",
            "html_url": "https://github.com/o/r/issues/3"
        }]))
        .unwrap();

        assert_eq!(
            format_issue_hits(&issues),
            "Title: Flaky test\nNumber: 3\nState: open\nURL: https://github.com/o/r/issues/3\n\n"
        );
    }

    #[test]
    fn test_repo_url_encodes_segments() {
        let client = GithubClient::with_base_url("", "https://ghe.example.com/api/v3/").unwrap();
        assert_eq!(
            client.repo_url("my org", "repo", "/pulls/1"),
            "https://ghe.example.com/api/v3/repos/my%20org/repo/pulls/1"
        );
    }
}
