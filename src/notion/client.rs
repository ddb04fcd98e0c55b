use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::debug;

use super::error::ApiError;
use super::properties::Properties;
use super::types::{
    Block, CommentHandle, CommentRange, ListResponse, PageHandle, PageSummary, RichText,
};
use crate::config::Config;
use crate::constants::{property, PAGE_SIZE, USER_AGENT};

/// Operations the mapping engine needs from the document store.
///
/// List operations return the complete, already-paginated result in API order.
#[async_trait]
pub trait NotionApi: Send + Sync {
    /// Direct children of a block or page.
    async fn list_children(&self, block_id: &str) -> Result<Vec<Block>, ApiError>;

    /// Pages of a database, optionally only those created on or after `created_after`.
    async fn query_database(
        &self,
        database_id: &str,
        created_after: Option<DateTime<Utc>>,
    ) -> Result<Vec<PageSummary>, ApiError>;

    /// Create a page in a database with the given properties and content.
    async fn create_page(
        &self,
        database_id: &str,
        properties: &Properties,
        children: &[Block],
    ) -> Result<PageHandle, ApiError>;

    /// Create a comment on a block, anchored to `range` of its text.
    async fn create_comment(
        &self,
        block_id: &str,
        text: &[RichText],
        range: CommentRange,
    ) -> Result<CommentHandle, ApiError>;
}

/// Notion REST API client.
pub struct NotionClient {
    client: Client,
    base_url: String,
    token: String,
    version: String,
}

impl NotionClient {
    /// Create a new client.
    ///
    /// # Arguments
    ///
    /// * `token` - Integration token sent as bearer auth.
    /// * `base_url` - API root, e.g. `https://api.notion.com/v1`.
    /// * `version` - Value of the `Notion-Version` header.
    /// * `timeout` - Per-request timeout.
    #[must_use]
    pub fn new(token: String, base_url: &str, version: String, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
            version,
        }
    }

    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.notion_token.clone(),
            &config.notion_api_base,
            config.notion_version.clone(),
            config.http_timeout,
        )
    }

    fn get(&self, path: &str) -> RequestBuilder {
        self.authorized(self.client.get(format!("{}{path}", self.base_url)))
    }

    fn post(&self, path: &str) -> RequestBuilder {
        self.authorized(self.client.post(format!("{}{path}", self.base_url)))
    }

    fn authorized(&self, req: RequestBuilder) -> RequestBuilder {
        req.bearer_auth(&self.token)
            .header("Notion-Version", &self.version)
    }

    /// Send a request and decode a successful JSON response.
    async fn send<T: DeserializeOwned>(req: RequestBuilder) -> Result<T, ApiError> {
        let resp = req.send().await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ApiError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let bytes = resp.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl NotionApi for NotionClient {
    async fn list_children(&self, block_id: &str) -> Result<Vec<Block>, ApiError> {
        let path = format!("/blocks/{block_id}/children");
        let mut blocks = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let mut req = self.get(&path).query(&[("page_size", PAGE_SIZE.to_string())]);
            if let Some(c) = &cursor {
                req = req.query(&[("start_cursor", c)]);
            }

            let page: ListResponse<Block> = Self::send(req).await?;
            debug!(block_id, count = page.results.len(), has_more = page.has_more, "Fetched children");
            blocks.extend(page.results);

            match page.next_cursor {
                Some(next) if page.has_more => cursor = Some(next),
                _ => break,
            }
        }

        Ok(blocks)
    }

    async fn query_database(
        &self,
        database_id: &str,
        created_after: Option<DateTime<Utc>>,
    ) -> Result<Vec<PageSummary>, ApiError> {
        let path = format!("/databases/{database_id}/query");
        let mut pages = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let mut body = json!({ "page_size": PAGE_SIZE });
            if let Some(ts) = created_after {
                body["filter"] = created_filter(ts);
            }
            if let Some(c) = &cursor {
                body["start_cursor"] = Value::String(c.clone());
            }

            let page: ListResponse<PageSummary> = Self::send(self.post(&path).json(&body)).await?;
            debug!(database_id, count = page.results.len(), has_more = page.has_more, "Queried database");
            pages.extend(page.results);

            match page.next_cursor {
                Some(next) if page.has_more => cursor = Some(next),
                _ => break,
            }
        }

        Ok(pages)
    }

    async fn create_page(
        &self,
        database_id: &str,
        properties: &Properties,
        children: &[Block],
    ) -> Result<PageHandle, ApiError> {
        let body = json!({
            "parent": { "database_id": database_id },
            "properties": properties,
            "children": children,
        });
        Self::send(self.post("/pages").json(&body)).await
    }

    async fn create_comment(
        &self,
        block_id: &str,
        text: &[RichText],
        range: CommentRange,
    ) -> Result<CommentHandle, ApiError> {
        let body = json!({
            "parent": { "block_id": block_id },
            "rich_text": text,
            "visible_to": "default",
            "comment": range,
        });
        Self::send(self.post("/comments").json(&body)).await
    }
}

fn created_filter(ts: DateTime<Utc>) -> Value {
    json!({
        "and": [{
            "property": property::CREATED_TIME,
            "date": { "on_or_after": ts.to_rfc3339_opts(SecondsFormat::Secs, true) },
        }]
    })
}
