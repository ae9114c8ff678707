//! Notion API type definitions

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Plain text content of a rich text run
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TextContent {
    #[serde(default)]
    pub content: String,
}

/// A rich text run. Only the `text` kind is produced by this client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RichText {
    #[serde(rename = "type")]
    pub kind: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<TextContent>,
}

impl RichText {
    pub fn text(content: &str) -> Self {
        Self {
            kind: "text".to_string(),
            text: Some(TextContent {
                content: content.to_string(),
            }),
        }
    }
}

/// Where a page or database lives
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Parent {
    #[serde(rename = "type", default)]
    pub kind: String,
}

/// A page object
#[derive(Debug, Clone, Deserialize)]
pub struct Page {
    pub id: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub created_time: String,
    #[serde(default)]
    pub last_edited_time: String,
    #[serde(default)]
    pub parent: Parent,
}

/// One result of the search endpoint; pages and databases share this shape
#[derive(Debug, Clone, Deserialize)]
pub struct SearchHit {
    #[serde(default)]
    pub object: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub parent: Parent,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub results: Vec<SearchHit>,
}

/// A database column
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseProperty {
    #[serde(rename = "type", default)]
    pub kind: String,
}

/// A database object
#[derive(Debug, Clone, Deserialize)]
pub struct Database {
    pub id: String,
    #[serde(default)]
    pub title: Vec<RichText>,
    #[serde(default)]
    pub created_time: String,
    #[serde(default)]
    pub properties: BTreeMap<String, DatabaseProperty>,
}

impl Database {
    /// Text of the first title run, `Untitled` when there is none
    pub fn display_title(&self) -> &str {
        self.title
            .first()
            .and_then(|t| t.text.as_ref())
            .map(|t| t.content.as_str())
            .unwrap_or("Untitled")
    }
}

/// Filter restricting search results to one object kind
#[derive(Debug, Clone, Serialize)]
pub struct SearchFilter<'a> {
    pub property: &'a str,
    pub value: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchRequest<'a> {
    pub query: &'a str,
    pub filter: SearchFilter<'a>,
}

/// Parent reference for new pages and databases
#[derive(Debug, Clone, Serialize)]
pub struct PageParent<'a> {
    #[serde(rename = "type")]
    pub kind: &'a str,
    pub page_id: &'a str,
}

impl<'a> PageParent<'a> {
    pub fn page(page_id: &'a str) -> Self {
        Self {
            kind: "page_id",
            page_id,
        }
    }
}

/// A title property value
#[derive(Debug, Clone, Serialize)]
pub struct TitleProperty {
    pub title: Vec<RichText>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TitleProperties {
    pub title: TitleProperty,
}

impl TitleProperties {
    pub fn new(title: &str) -> Self {
        Self {
            title: TitleProperty {
                title: vec![RichText::text(title)],
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ParagraphContent {
    pub rich_text: Vec<RichText>,
}

/// A paragraph block
#[derive(Debug, Clone, Serialize)]
pub struct ParagraphBlock {
    pub object: &'static str,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub paragraph: ParagraphContent,
}

impl ParagraphBlock {
    pub fn new(content: &str) -> Self {
        Self {
            object: "block",
            kind: "paragraph",
            paragraph: ParagraphContent {
                rich_text: vec![RichText::text(content)],
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CreatePageRequest<'a> {
    pub parent: PageParent<'a>,
    pub properties: TitleProperties,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ParagraphBlock>,
}

/// Empty schema for the `title` column type
#[derive(Debug, Clone, Serialize)]
pub struct EmptyObject {}

#[derive(Debug, Clone, Serialize)]
pub struct TitleColumn {
    pub title: EmptyObject,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateDatabaseRequest<'a> {
    pub parent: PageParent<'a>,
    pub title: Vec<RichText>,
    pub properties: BTreeMap<&'a str, TitleColumn>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdatePageRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<TitleProperties>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AppendChildrenRequest {
    pub children: Vec<ParagraphBlock>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdateDatabaseRequest {
    pub title: Vec<RichText>,
}

/// Response carrying only an object id
#[derive(Debug, Clone, Deserialize)]
pub struct ObjectRef {
    pub id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_database_title_fallback() {
        let db: Database = serde_json::from_value(json!({
            "id": "db1",
            "title": [],
            "created_time": "2024-01-01T00:00:00.000Z",
            "properties": {}
        }))
        .unwrap();
        assert_eq!(db.display_title(), "Untitled");

        let db: Database = serde_json::from_value(json!({
            "id": "db1",
            "title": [{"type": "text", "text": {"content": "Roadmap"}, "plain_text": "Roadmap"}],
            "properties": {"Name": {"id": "title", "type": "title", "title": {}}}
        }))
        .unwrap();
        assert_eq!(db.display_title(), "Roadmap");
        assert_eq!(db.properties["Name"].kind, "title");
    }

    #[test]
    fn test_create_page_request_shape() {
        let request = CreatePageRequest {
            parent: PageParent::page("abc"),
            properties: TitleProperties::new("Notes"),
            children: vec![ParagraphBlock::new("Hello")],
        };

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "parent": {"type": "page_id", "page_id": "abc"},
                "properties": {"title": {"title": [{"type": "text", "text": {"content": "Notes"}}]}},
                "children": [{
                    "object": "block",
                    "type": "paragraph",
                    "paragraph": {"rich_text": [{"type": "text", "text": {"content": "Hello"}}]}
                }]
            })
        );
    }

    #[test]
    fn test_create_page_without_content_has_no_children() {
        let request = CreatePageRequest {
            parent: PageParent::page("abc"),
            properties: TitleProperties::new("Notes"),
            children: Vec::new(),
        };

        let value = serde_json::to_value(&request).unwrap();
        assert!(value.get("children").is_none());
    }

    #[test]
    fn test_update_page_request_without_title_is_empty() {
        let request = UpdatePageRequest { properties: None };
        assert_eq!(serde_json::to_value(&request).unwrap(), json!({}));
    }
}
