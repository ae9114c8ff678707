//! Notion API client

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{RequestBuilder, Url};
use serde::de::DeserializeOwned;

use crate::config::notion::{API_BASE_URL, API_VERSION};
use crate::config::HTTP_TIMEOUT_SECS;
use crate::error::{NotionApiError, Result};
use crate::notion::types::*;
use crate::services::NotionService;

/// Notion API client
pub struct NotionClient {
    http_client: reqwest::Client,
    token: String,
    base_url: String,
}

impl NotionClient {
    /// Create a new Notion client against api.notion.com
    pub fn new(token: impl Into<String>) -> Result<Self> {
        Self::with_base_url(token, API_BASE_URL)
    }

    pub fn with_base_url(token: impl Into<String>, base_url: impl Into<String>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert("notion-version", HeaderValue::from_static(API_VERSION));

        let http_client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            http_client,
            token: token.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder, operation: &str) -> Result<T> {
        let response = request.bearer_auth(&self.token).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::debug!("Notion {} returned {}: {}", operation, status, body);
            return Err(NotionApiError::RequestFailed {
                operation: operation.to_string(),
                status: status.as_u16(),
                body,
            }
            .into());
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl NotionService for NotionClient {
    async fn search_pages(&self, title: &str) -> Result<String> {
        let request = self.http_client.post(self.url("/search")).json(&SearchRequest {
            query: title,
            filter: SearchFilter {
                property: "object",
                value: "page",
            },
        });
        let response: SearchResponse = self.send_json(request, "search pages").await?;

        Ok(response
            .results
            .iter()
            .filter(|hit| hit.object == "page" && hit.parent.kind == "page_id")
            .map(|hit| format!("{}\n", hit.url))
            .collect())
    }

    async fn get_page_by_url(&self, url: &str) -> Result<String> {
        let page_id = extract_page_id(url)?;
        let request = self
            .http_client
            .get(self.url(&format!("/pages/{}", urlencoding::encode(&page_id))));
        let page: Page = self.send_json(request, &format!("get page {}", page_id)).await?;

        Ok(format!(
            "Page ID: {}\nURL: {}\nCreated: {}\nLast Edited: {}",
            page.id, page.url, page.created_time, page.last_edited_time
        ))
    }

    async fn get_database(&self, database_id: &str) -> Result<String> {
        let request = self
            .http_client
            .get(self.url(&format!("/databases/{}", urlencoding::encode(database_id))));
        let database: Database = self
            .send_json(request, &format!("get database {}", database_id))
            .await?;

        Ok(format_database(&database))
    }

    async fn create_page(&self, parent_id: &str, title: &str, content: &str) -> Result<String> {
        let mut children = Vec::new();
        if !content.is_empty() {
            children.push(ParagraphBlock::new(content));
        }

        let request = self.http_client.post(self.url("/pages")).json(&CreatePageRequest {
            parent: PageParent::page(parent_id),
            properties: TitleProperties::new(title),
            children,
        });
        let page: ObjectRef = self.send_json(request, "create page").await?;

        Ok(format!("Created page: {} (ID: {})", title, page.id))
    }

    async fn create_database(&self, parent_page_id: &str, title: &str) -> Result<String> {
        let properties = BTreeMap::from([(
            "Name",
            TitleColumn {
                title: EmptyObject {},
            },
        )]);

        let request = self.http_client.post(self.url("/databases")).json(&CreateDatabaseRequest {
            parent: PageParent::page(parent_page_id),
            title: vec![RichText::text(title)],
            properties,
        });
        let database: ObjectRef = self.send_json(request, "create database").await?;

        Ok(format!("Created database: {} (ID: {})", title, database.id))
    }

    /// Sets the title, then appends the content. The two PATCH calls are
    /// not atomic: if the append fails the new title stays in place.
    async fn update_page(&self, page_id: &str, title: &str, content: &str) -> Result<String> {
        let (update, append) = update_page_requests(title, content);

        let page_path = format!("/pages/{}", urlencoding::encode(page_id));
        let request = self.http_client.patch(self.url(&page_path)).json(&update);
        let page: ObjectRef = self.send_json(request, "update page").await?;

        if let Some(append) = append {
            let children_path = format!("/blocks/{}/children", urlencoding::encode(page_id));
            let request = self.http_client.patch(self.url(&children_path)).json(&append);
            let _: serde_json::Value = self.send_json(request, "append page content").await?;
        }

        Ok(format!("Updated page: {}", page.id))
    }

    async fn update_database(&self, database_id: &str, title: &str) -> Result<String> {
        let path = format!("/databases/{}", urlencoding::encode(database_id));
        let request = self.http_client.patch(self.url(&path)).json(&UpdateDatabaseRequest {
            title: vec![RichText::text(title)],
        });
        let database: ObjectRef = self.send_json(request, "update database").await?;

        Ok(format!("Updated database: {}", database.id))
    }
}

/// Bodies of the page update and of the optional content append
fn update_page_requests(title: &str, content: &str) -> (UpdatePageRequest, Option<AppendChildrenRequest>) {
    let update = UpdatePageRequest {
        properties: (!title.is_empty()).then(|| TitleProperties::new(title)),
    };
    let append = (!content.is_empty()).then(|| AppendChildrenRequest {
        children: vec![ParagraphBlock::new(content)],
    });
    (update, append)
}

/// Page id of a Notion URL: the last `-`-separated segment of its path
fn extract_page_id(page_url: &str) -> Result<String> {
    let invalid = || NotionApiError::InvalidUrl {
        url: page_url.to_string(),
    };

    let parsed = Url::parse(page_url).map_err(|_| invalid())?;
    let path = parsed.path().trim_start_matches('/');

    match path.rsplit('-').next() {
        Some(id) if !id.is_empty() => Ok(id.to_string()),
        _ => Err(invalid().into()),
    }
}

fn format_database(database: &Database) -> String {
    let properties: String = database
        .properties
        .iter()
        .map(|(name, prop)| format!("- {} ({})\n", name, prop.kind))
        .collect();

    format!(
        "Database ID: {}\nTitle: {}\nCreated: {}\nProperties:\n{}",
        database.id,
        database.display_title(),
        database.created_time,
        properties
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_page_id() {
        assert_eq!(
            extract_page_id("https://www.notion.so/team/Project-Plan-0123456789abcdef0123456789abcdef").unwrap(),
            "0123456789abcdef0123456789abcdef"
        );
        assert_eq!(
            extract_page_id("https://www.notion.so/0123456789abcdef?pvs=4").unwrap(),
            "0123456789abcdef"
        );
    }

    #[test]
    fn test_extract_page_id_rejects_bad_urls() {
        assert!(extract_page_id("not a url").is_err());
        assert!(extract_page_id("https://www.notion.so/").is_err());
        assert!(extract_page_id("https://www.notion.so/Plan-").is_err());
    }

    #[test]
    fn test_format_database() {
        let database: Database = serde_json::from_value(json!({
            "id": "db1",
            "title": [{"type": "text", "text": {"content": "Tasks"}}],
            "created_time": "2024-05-01T10:00:00.000Z",
            "properties": {
                "Status": {"type": "select"},
                "Name": {"type": "title"}
            }
        }))
        .unwrap();

        assert_eq!(
            format_database(&database),
            "Database ID: db1\nTitle: Tasks\nCreated: 2024-05-01T10:00:00.000Z\nProperties:\n- Name (title)\n- Status (select)\n"
        );
    }

    #[test]
    fn test_update_page_requests() {
        let (update, append) = update_page_requests("Renamed", "Appended line");
        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            json!({"properties": {"title": {"title": [{"type": "text", "text": {"content": "Renamed"}}]}}})
        );
        assert_eq!(
            serde_json::to_value(append.unwrap()).unwrap(),
            json!({"children": [{
                "object": "block",
                "type": "paragraph",
                "paragraph": {"rich_text": [{"type": "text", "text": {"content": "Appended line"}}]}
            }]})
        );

        let (update, append) = update_page_requests("", "");
        assert_eq!(serde_json::to_value(&update).unwrap(), json!({}));
        assert!(append.is_none());

        let (update, append) = update_page_requests("", "only content");
        assert_eq!(serde_json::to_value(&update).unwrap(), json!({}));
        assert!(append.is_some());
    }

    #[test]
    fn test_url_joins_base() {
        let client = NotionClient::with_base_url("token", "http://localhost:9999/v1/").unwrap();
        assert_eq!(client.url("/pages/abc"), "http://localhost:9999/v1/pages/abc");
    }
}
