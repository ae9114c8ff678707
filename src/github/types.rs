//! GitHub REST API type definitions
//!
//! Only the fields the tools render are modelled. Every type has a
//! `Display` impl producing the text handed back to the caller.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A GitHub account
#[derive(Debug, Clone, Deserialize, Default)]
pub struct User {
    pub login: String,
}

/// Head or base of a pull request
#[derive(Debug, Clone, Deserialize, Default)]
pub struct PullRequestBranch {
    #[serde(rename = "ref")]
    pub git_ref: String,
    pub sha: String,
}

/// A pull request
#[derive(Debug, Clone, Deserialize)]
pub struct PullRequest {
    pub number: u64,
    pub title: String,
    pub state: String,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub user: Option<User>,
    pub head: PullRequestBranch,
    pub base: PullRequestBranch,
    #[serde(default)]
    pub draft: bool,
    #[serde(default)]
    pub merged: bool,
    #[serde(default)]
    pub additions: Option<u64>,
    #[serde(default)]
    pub deletions: Option<u64>,
    #[serde(default)]
    pub changed_files: Option<u64>,
    pub html_url: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl fmt::Display for PullRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Pull Request #{}: {}", self.number, self.title)?;
        writeln!(f, "State: {}{}", self.state, if self.merged { " (merged)" } else { "" })?;
        if self.draft {
            writeln!(f, "Draft: yes")?;
        }
        if let Some(user) = &self.user {
            writeln!(f, "Author: {}", user.login)?;
        }
        writeln!(f, "Head: {} ({})", self.head.git_ref, self.head.sha)?;
        writeln!(f, "Base: {} ({})", self.base.git_ref, self.base.sha)?;
        if let (Some(files), Some(add), Some(del)) =
            (self.changed_files, self.additions, self.deletions)
        {
            writeln!(f, "Changes: {} files, +{} -{}", files, add, del)?;
        }
        if let Some(created) = &self.created_at {
            writeln!(f, "Created: {}", created)?;
        }
        writeln!(f, "URL: {}", self.html_url)?;
        if let Some(body) = self.body.as_deref().filter(|b| !b.is_empty()) {
            write!(f, "\n{}\n", body)?;
        }
        Ok(())
    }
}

/// An issue label
#[derive(Debug, Clone, Deserialize)]
pub struct IssueLabel {
    pub name: String,
}

/// An issue (pull requests are issues too in this API)
#[derive(Debug, Clone, Deserialize)]
pub struct Issue {
    pub number: u64,
    pub title: String,
    pub state: String,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub assignees: Vec<User>,
    #[serde(default)]
    pub labels: Vec<IssueLabel>,
    #[serde(default)]
    pub comments: u64,
    pub html_url: String,
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Issue #{}: {}", self.number, self.title)?;
        writeln!(f, "State: {}", self.state)?;
        if let Some(user) = &self.user {
            writeln!(f, "Author: {}", user.login)?;
        }
        if !self.assignees.is_empty() {
            let names: Vec<&str> = self.assignees.iter().map(|u| u.login.as_str()).collect();
            writeln!(f, "Assignees: {}", names.join(", "))?;
        }
        if !self.labels.is_empty() {
            let names: Vec<&str> = self.labels.iter().map(|l| l.name.as_str()).collect();
            writeln!(f, "Labels: {}", names.join(", "))?;
        }
        writeln!(f, "Comments: {}", self.comments)?;
        writeln!(f, "URL: {}", self.html_url)?;
        if let Some(body) = self.body.as_deref().filter(|b| !b.is_empty()) {
            write!(f, "\n{}\n", body)?;
        }
        Ok(())
    }
}

/// A comment on an issue or pull request
#[derive(Debug, Clone, Deserialize)]
pub struct IssueComment {
    pub id: u64,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub created_at: Option<String>,
    pub html_url: String,
}

impl fmt::Display for IssueComment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let author = self.user.as_ref().map(|u| u.login.as_str()).unwrap_or("unknown");
        writeln!(f, "Comment {} by {}", self.id, author)?;
        if let Some(created) = &self.created_at {
            writeln!(f, "Created: {}", created)?;
        }
        writeln!(f, "URL: {}", self.html_url)?;
        writeln!(f, "{}", self.body)
    }
}

/// Object a git reference points at
#[derive(Debug, Clone, Deserialize)]
pub struct GitObject {
    pub sha: String,
    #[serde(rename = "type", default)]
    pub object_type: String,
}

/// A git reference such as `refs/heads/main`
#[derive(Debug, Clone, Deserialize)]
pub struct Reference {
    #[serde(rename = "ref")]
    pub git_ref: String,
    pub object: GitObject,
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ref: {}\nSHA: {}", self.git_ref, self.object.sha)
    }
}

/// Author or committer of a git commit
#[derive(Debug, Clone, Deserialize, Default)]
pub struct GitActor {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub date: String,
}

/// Bare SHA pointer used for trees and parents
#[derive(Debug, Clone, Deserialize)]
pub struct ShaRef {
    pub sha: String,
}

/// A git commit object
#[derive(Debug, Clone, Deserialize)]
pub struct GitCommit {
    pub sha: String,
    pub message: String,
    #[serde(default)]
    pub author: Option<GitActor>,
    pub tree: ShaRef,
    #[serde(default)]
    pub parents: Vec<ShaRef>,
    #[serde(default)]
    pub html_url: Option<String>,
}

impl fmt::Display for GitCommit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Commit: {}", self.sha)?;
        if let Some(author) = &self.author {
            writeln!(f, "Author: {} <{}>", author.name, author.email)?;
            writeln!(f, "Date: {}", author.date)?;
        }
        writeln!(f, "Tree: {}", self.tree.sha)?;
        if !self.parents.is_empty() {
            let parents: Vec<&str> = self.parents.iter().map(|p| p.sha.as_str()).collect();
            writeln!(f, "Parents: {}", parents.join(", "))?;
        }
        if let Some(url) = &self.html_url {
            writeln!(f, "URL: {}", url)?;
        }
        write!(f, "\n{}\n", self.message)
    }
}

/// Commit details as nested in the list-commits response
#[derive(Debug, Clone, Deserialize)]
pub struct CommitDetails {
    pub message: String,
    #[serde(default)]
    pub author: Option<GitActor>,
}

/// An entry of the list-commits response
#[derive(Debug, Clone, Deserialize)]
pub struct RepoCommit {
    pub sha: String,
    pub commit: CommitDetails,
    pub html_url: String,
}

impl fmt::Display for RepoCommit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let author = self.commit.author.clone().unwrap_or_default();
        let summary = self.commit.message.lines().next().unwrap_or_default();
        writeln!(f, "Commit: {}", self.sha)?;
        writeln!(f, "Author: {} ({})", author.name, author.date)?;
        writeln!(f, "Message: {}", summary)?;
        writeln!(f, "URL: {}", self.html_url)
    }
}

/// A repository
#[derive(Debug, Clone, Deserialize)]
pub struct Repository {
    pub full_name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub private: bool,
    #[serde(default)]
    pub stargazers_count: u64,
    #[serde(default)]
    pub default_branch: Option<String>,
    pub html_url: String,
}

impl fmt::Display for Repository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Repository: {}", self.full_name)?;
        writeln!(f, "Description: {}", self.description.as_deref().unwrap_or_default())?;
        writeln!(f, "Private: {}", self.private)?;
        if let Some(branch) = &self.default_branch {
            writeln!(f, "Default branch: {}", branch)?;
        }
        writeln!(f, "URL: {}", self.html_url)
    }
}

/// A release
#[derive(Debug, Clone, Deserialize)]
pub struct Release {
    pub id: u64,
    pub tag_name: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub draft: bool,
    #[serde(default)]
    pub prerelease: bool,
    #[serde(default)]
    pub published_at: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    pub html_url: String,
}

impl fmt::Display for Release {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Release: {}", self.name.as_deref().unwrap_or(&self.tag_name))?;
        writeln!(f, "ID: {}", self.id)?;
        writeln!(f, "Tag: {}", self.tag_name)?;
        writeln!(f, "Draft: {}", self.draft)?;
        writeln!(f, "Prerelease: {}", self.prerelease)?;
        if let Some(published) = &self.published_at {
            writeln!(f, "Published: {}", published)?;
        }
        writeln!(f, "URL: {}", self.html_url)?;
        if let Some(body) = self.body.as_deref().filter(|b| !b.is_empty()) {
            write!(f, "\n{}\n", body)?;
        }
        Ok(())
    }
}

/// A tag or branch entry: a name and the commit it points at
#[derive(Debug, Clone, Deserialize)]
pub struct NamedCommit {
    pub name: String,
    pub commit: ShaRef,
}

/// A GitHub Actions workflow
#[derive(Debug, Clone, Deserialize)]
pub struct Workflow {
    pub id: u64,
    pub name: String,
    pub state: String,
    #[serde(default)]
    pub path: String,
}

/// Response of the list-workflows endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct WorkflowList {
    #[serde(default)]
    pub total_count: u64,
    #[serde(default)]
    pub workflows: Vec<Workflow>,
}

/// Envelope of all search endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResult<T> {
    #[serde(default)]
    pub total_count: u64,
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}

/// Repository reference nested in code search hits
#[derive(Debug, Clone, Deserialize)]
pub struct RepositoryName {
    pub full_name: String,
}

/// A code search hit
#[derive(Debug, Clone, Deserialize)]
pub struct CodeResult {
    pub name: String,
    #[serde(default)]
    pub path: String,
    pub repository: RepositoryName,
    pub html_url: String,
}

// ==================== Request Bodies ====================

#[derive(Debug, Clone, Serialize)]
pub struct CreateIssueRequest<'a> {
    pub title: &'a str,
    pub body: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreatePullRequestRequest<'a> {
    pub title: &'a str,
    pub body: &'a str,
    pub head: &'a str,
    pub base: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct CommentRequest<'a> {
    pub body: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct AssigneesRequest<'a> {
    pub assignees: &'a [String],
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateRefRequest {
    #[serde(rename = "ref")]
    pub git_ref: String,
    pub sha: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdateRefRequest<'a> {
    pub sha: &'a str,
    pub force: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateRepositoryRequest<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub private: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateCommitRequest<'a> {
    pub message: &'a str,
    pub tree: &'a str,
    pub parents: &'a [String],
}

#[derive(Debug, Clone, Serialize)]
pub struct WorkflowDispatchRequest<'a> {
    #[serde(rename = "ref")]
    pub git_ref: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_pull_request_display() {
        let pr: PullRequest = serde_json::from_value(json!({
            "number": 42,
            "title": "Add tool catalog",
            "state": "open",
            "body": "Implements the catalog.",
            "user": {"login": "octocat"},
            "head": {"ref": "feature", "sha": "abc123"},
            "base": {"ref": "main", "sha": "def456"},
            "additions": 10,
            "deletions": 2,
            "changed_files": 3,
            "html_url": "https://github.com/o/r/pull/42"
        }))
        .unwrap();

        let text = pr.to_string();
        assert!(text.starts_with("Pull Request #42: Add tool catalog\n"));
        assert!(text.contains("Author: octocat"));
        assert!(text.contains("Head: feature (abc123)"));
        assert!(text.contains("Changes: 3 files, +10 -2"));
        assert!(text.ends_with("Implements the catalog.\n"));
    }

    #[test]
    fn test_issue_display_lists_assignees_and_labels() {
        let issue: Issue = serde_json::from_value(json!({
            "number": 7,
            "title": "Crash on empty input",
            "state": "closed",
            "assignees": [{"login": "a"}, {"login": "b"}],
            "labels": [{"name": "bug"}],
            "comments": 4,
            "html_url": "https://github.com/o/r/issues/7"
        }))
        .unwrap();

        let text = issue.to_string();
        assert!(text.contains("Assignees: a, b"));
        assert!(text.contains("Labels: bug"));
        assert!(text.contains("Comments: 4"));
    }

    #[test]
    fn test_repo_commit_display_uses_first_message_line() {
        let commit: RepoCommit = serde_json::from_value(json!({
            "sha": "abc",
            "commit": {
                "message": "Fix parser\n\nLonger explanation",
                "author": {"name": "Dev", "email": "dev@example.com", "date": "2024-01-01T00:00:00Z"}
            },
            "html_url": "https://github.com/o/r/commit/abc"
        }))
        .unwrap();

        let text = commit.to_string();
        assert!(text.contains("Message: Fix parser\n"));
        assert!(!text.contains("Longer explanation"));
    }

    #[test]
    fn test_search_result_defaults() {
        let result: SearchResult<CodeResult> = serde_json::from_value(json!({})).unwrap();
        assert_eq!(result.total_count, 0);
        assert!(result.items.is_empty());
    }

    #[test]
    fn test_create_ref_request_serialization() {
        let request = CreateRefRequest {
            git_ref: "refs/heads/topic".to_string(),
            sha: "abc".to_string(),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value, json!({"ref": "refs/heads/topic", "sha": "abc"}));
    }
}
