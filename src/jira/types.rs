//! Jira REST API type definitions
//!
//! These types mirror the Jira v3 responses and request bodies used by the
//! client.

use serde::{Deserialize, Serialize};

/// A node of an Atlassian Document Format tree
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct AdfNode {
    #[serde(rename = "type")]
    pub node_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub content: Vec<AdfNode>,
}

impl AdfNode {
    /// A `doc` holding a single paragraph of text
    pub fn paragraph_doc(text: &str) -> Self {
        let paragraph = AdfNode {
            node_type: "paragraph".to_string(),
            content: vec![AdfNode {
                node_type: "text".to_string(),
                text: Some(text.to_string()),
                ..Default::default()
            }],
            ..Default::default()
        };

        AdfNode {
            node_type: "doc".to_string(),
            version: Some(1),
            content: vec![paragraph],
            ..Default::default()
        }
    }

    /// Plain text of the top-level paragraphs. Each text run is followed by
    /// a space and each paragraph by a newline.
    pub fn plain_text(&self) -> String {
        let mut text = String::new();
        for block in self.content.iter().filter(|b| b.node_type == "paragraph") {
            for run in block.content.iter().filter(|r| r.node_type == "text") {
                text.push_str(run.text.as_deref().unwrap_or_default());
                text.push(' ');
            }
            text.push('\n');
        }
        text
    }
}

/// A Jira user
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct JiraUser {
    #[serde(default)]
    pub account_id: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub email_address: String,
}

/// Display name of an assignee, `Unassigned` when there is none
pub fn assignee_name(assignee: Option<&JiraUser>) -> &str {
    match assignee {
        None => "Unassigned",
        Some(user) if !user.display_name.is_empty() => &user.display_name,
        Some(user) => &user.email_address,
    }
}

/// Issue status
#[derive(Debug, Clone, Deserialize, Default)]
pub struct JiraStatus {
    #[serde(default)]
    pub name: String,
}

/// Issue fields the tools render
#[derive(Debug, Clone, Deserialize, Default)]
pub struct JiraIssueFields {
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub description: Option<AdfNode>,
    #[serde(default)]
    pub status: JiraStatus,
    #[serde(default)]
    pub assignee: Option<JiraUser>,
}

/// A Jira issue
#[derive(Debug, Clone, Deserialize)]
pub struct JiraIssue {
    #[serde(default)]
    pub id: String,
    pub key: String,
    #[serde(default)]
    pub fields: JiraIssueFields,
}

/// Response of the search endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct JiraSearchResponse {
    #[serde(default)]
    pub issues: Vec<JiraIssue>,
    #[serde(default)]
    pub total: u64,
}

/// Body of a JQL search
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JiraSearchRequest<'a> {
    pub jql: &'a str,
    pub max_results: u32,
    pub fields: [&'a str; 3],
}

/// Key reference, used for projects
#[derive(Debug, Clone, Serialize)]
pub struct KeyRef<'a> {
    pub key: &'a str,
}

/// Name reference, used for issue types
#[derive(Debug, Clone, Serialize)]
pub struct NameRef<'a> {
    pub name: &'a str,
}

/// Fields of a new issue
#[derive(Debug, Clone, Serialize)]
pub struct JiraCreateFields<'a> {
    pub project: KeyRef<'a>,
    pub summary: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<AdfNode>,
    #[serde(rename = "issuetype")]
    pub issue_type: NameRef<'a>,
}

/// Body of the create-issue endpoint
#[derive(Debug, Clone, Serialize)]
pub struct JiraCreateIssueRequest<'a> {
    pub fields: JiraCreateFields<'a>,
}

/// Response of the create-issue endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct JiraCreatedIssue {
    pub key: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_plain_text_of_paragraphs() {
        let doc: AdfNode = serde_json::from_value(json!({
            "type": "doc",
            "version": 1,
            "content": [
                {"type": "paragraph", "content": [
                    {"type": "text", "text": "Steps"},
                    {"type": "text", "text": "to reproduce"}
                ]},
                {"type": "codeBlock", "content": [{"type": "text", "text": "ignored"}]},
                {"type": "paragraph", "content": [{"type": "text", "text": "Expected"}]}
            ]
        }))
        .unwrap();

        assert_eq!(doc.plain_text(), "Steps to reproduce \nExpected \n");
    }

    #[test]
    fn test_paragraph_doc_serialization() {
        let doc = AdfNode::paragraph_doc("Hello");
        assert_eq!(
            serde_json::to_value(&doc).unwrap(),
            json!({
                "type": "doc",
                "version": 1,
                "content": [{"type": "paragraph", "content": [{"type": "text", "text": "Hello"}]}]
            })
        );
    }

    #[test]
    fn test_create_request_omits_missing_description() {
        let request = JiraCreateIssueRequest {
            fields: JiraCreateFields {
                project: KeyRef { key: "PROJ" },
                summary: "Broken build",
                description: None,
                issue_type: NameRef { name: "Task" },
            },
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({"fields": {"project": {"key": "PROJ"}, "summary": "Broken build", "issuetype": {"name": "Task"}}})
        );
    }

    #[test]
    fn test_assignee_name() {
        assert_eq!(assignee_name(None), "Unassigned");

        let user = JiraUser {
            display_name: "Ada".to_string(),
            email_address: "ada@example.com".to_string(),
            ..Default::default()
        };
        assert_eq!(assignee_name(Some(&user)), "Ada");

        let user = JiraUser {
            email_address: "ada@example.com".to_string(),
            ..Default::default()
        };
        assert_eq!(assignee_name(Some(&user)), "ada@example.com");
    }

    #[test]
    fn test_issue_with_null_description() {
        let issue: JiraIssue = serde_json::from_value(json!({
            "id": "10001",
            "key": "PROJ-1",
            "fields": {"summary": "Broken", "description": null, "status": {"name": "To Do"}, "assignee": null}
        }))
        .unwrap();

        assert_eq!(issue.key, "PROJ-1");
        assert!(issue.fields.description.is_none());
        assert!(issue.fields.assignee.is_none());
    }
}
