//! Jira Cloud REST client

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;

use crate::config::jira::{API_PATH, DEFAULT_ISSUE_TYPE, SEARCH_MAX_RESULTS};
use crate::config::HTTP_TIMEOUT_SECS;
use crate::error::{JiraApiError, Result};
use crate::jira::types::*;
use crate::services::JiraService;

/// Fields requested for search hits
const SEARCH_FIELDS: [&str; 3] = ["summary", "status", "assignee"];

/// Jira API client using basic auth (account e-mail + API token)
pub struct JiraClient {
    http_client: reqwest::Client,
    username: String,
    token: String,

    /// Site URL, always ending with `/`
    base_url: String,
}

impl JiraClient {
    /// Create a new Jira client
    pub fn new(
        base_url: impl Into<String>,
        username: impl Into<String>,
        token: impl Into<String>,
    ) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));

        let http_client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            http_client,
            username: username.into(),
            token: token.into(),
            base_url: normalize_base_url(&base_url.into()),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}{}", self.base_url, API_PATH, path)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request.basic_auth(&self.username, Some(&self.token))
    }

    /// Send a request and require the given status
    async fn send(&self, request: RequestBuilder, expected: StatusCode, operation: &str) -> Result<Response> {
        let response = self.authorized(request).send().await?;
        let status = response.status();

        if status == expected {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        tracing::debug!("Jira {} returned {}: {}", operation, status, body);

        Err(JiraApiError::RequestFailed {
            operation: operation.to_string(),
            status: status.as_u16(),
            body,
        }
        .into())
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        expected: StatusCode,
        operation: &str,
    ) -> Result<T> {
        let response = self.send(request, expected, operation).await?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            JiraApiError::InvalidResponse {
                message: e.to_string(),
            }
            .into()
        })
    }
}

#[async_trait]
impl JiraService for JiraClient {
    async fn get_ticket(&self, ticket_id: &str) -> Result<String> {
        if ticket_id.is_empty() {
            return Err(JiraApiError::EmptyField { field: "ticket ID" }.into());
        }

        let url = self.endpoint(&format!("issue/{}", urlencoding::encode(ticket_id)));
        let issue: JiraIssue = self
            .send_json(
                self.http_client.get(&url),
                StatusCode::OK,
                &format!("failed to get ticket {}", ticket_id),
            )
            .await?;

        Ok(format_ticket(&issue))
    }

    async fn search_tickets(&self, jql: &str) -> Result<String> {
        if jql.is_empty() {
            return Err(JiraApiError::EmptyField { field: "JQL query" }.into());
        }

        let request = self.http_client.post(self.endpoint("search")).json(&JiraSearchRequest {
            jql,
            max_results: SEARCH_MAX_RESULTS,
            fields: SEARCH_FIELDS,
        });
        let response: JiraSearchResponse = self
            .send_json(
                request,
                StatusCode::OK,
                &format!("failed to search tickets with JQL '{}'", jql),
            )
            .await?;

        tracing::debug!("Jira search matched {} issues", response.total);
        Ok(format_search_hits(&response.issues))
    }

    async fn create_ticket(&self, project_key: &str, summary: &str, description: &str) -> Result<String> {
        if project_key.is_empty() {
            return Err(JiraApiError::EmptyField { field: "project key" }.into());
        }
        if summary.is_empty() {
            return Err(JiraApiError::EmptyField { field: "summary" }.into());
        }

        let body = JiraCreateIssueRequest {
            fields: JiraCreateFields {
                project: KeyRef { key: project_key },
                summary,
                description: (!description.is_empty()).then(|| AdfNode::paragraph_doc(description)),
                issue_type: NameRef {
                    name: DEFAULT_ISSUE_TYPE,
                },
            },
        };

        let request = self.http_client.post(self.endpoint("issue")).json(&body);
        let created: JiraCreatedIssue = self
            .send_json(request, StatusCode::CREATED, "failed to create ticket")
            .await?;

        Ok(format!("Created ticket: {} - {}", created.key, summary))
    }
}

/// Ensure the site URL ends with exactly one `/`
fn normalize_base_url(url: &str) -> String {
    format!("{}/", url.trim_end_matches('/'))
}

fn format_ticket(issue: &JiraIssue) -> String {
    let description = issue
        .fields
        .description
        .as_ref()
        .map(AdfNode::plain_text)
        .unwrap_or_default();

    format!(
        "ID: {}\nSummary: {}\nStatus: {}\nAssignee: {}\nDescription: {}\n",
        issue.key,
        issue.fields.summary,
        issue.fields.status.name,
        assignee_name(issue.fields.assignee.as_ref()),
        description
    )
}

fn format_search_hits(issues: &[JiraIssue]) -> String {
    if issues.is_empty() {
        return "No tickets found matching the query.".to_string();
    }

    issues
        .iter()
        .map(|issue| {
            format!(
                "Key: {}\nSummary: {}\nStatus: {}\nAssignee: {}\n\n",
                issue.key,
                issue.fields.summary,
                issue.fields.status.name,
                assignee_name(issue.fields.assignee.as_ref())
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn client() -> JiraClient {
        JiraClient::new("https://example.atlassian.net", "me@example.com", "secret").unwrap()
    }

    #[test]
    fn test_normalize_base_url() {
        assert_eq!(normalize_base_url("https://x.atlassian.net"), "https://x.atlassian.net/");
        assert_eq!(normalize_base_url("https://x.atlassian.net/"), "https://x.atlassian.net/");
        assert_eq!(normalize_base_url("https://x.atlassian.net//"), "https://x.atlassian.net/");
    }

    #[test]
    fn test_endpoint() {
        assert_eq!(
            client().endpoint("issue/PROJ-1"),
            "https://example.atlassian.net/rest/api/3/issue/PROJ-1"
        );
    }

    #[tokio::test]
    async fn test_empty_arguments_fail_before_any_request() {
        let client = client();

        let err = client.get_ticket("").await.unwrap_err();
        assert!(err.to_string().contains("ticket ID cannot be empty"));

        let err = client.search_tickets("").await.unwrap_err();
        assert!(err.to_string().contains("JQL query cannot be empty"));

        let err = client.create_ticket("", "summary", "").await.unwrap_err();
        assert!(err.to_string().contains("project key cannot be empty"));

        let err = client.create_ticket("PROJ", "", "").await.unwrap_err();
        assert!(err.to_string().contains("summary cannot be empty"));
    }

    #[test]
    fn test_format_ticket() {
        let issue: JiraIssue = serde_json::from_value(json!({
            "id": "10001",
            "key": "PROJ-7",
            "fields": {
                "summary": "Login fails",
                "status": {"name": "In Progress"},
                "assignee": {"displayName": "Ada"},
                "description": {
                    "type": "doc",
                    "version": 1,
                    "content": [{"type": "paragraph", "content": [{"type": "text", "text": "Steps"}]}]
                }
            }
        }))
        .unwrap();

        assert_eq!(
            format_ticket(&issue),
            "ID: PROJ-7\nSummary: Login fails\nStatus: In Progress\nAssignee: Ada\nDescription: Steps \n\n"
        );
    }

    #[test]
    fn test_format_search_hits() {
        assert_eq!(format_search_hits(&[]), "No tickets found matching the query.");

        let issues: Vec<JiraIssue> = serde_json::from_value(json!([
            {"key": "PROJ-1", "fields": {"summary": "One", "status": {"name": "Done"}, "assignee": null}}
        ]))
        .unwrap();

        assert_eq!(
            format_search_hits(&issues),
            "Key: PROJ-1\nSummary: One\nStatus: Done\nAssignee: Unassigned\n\n"
        );
    }
}
