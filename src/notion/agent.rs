use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, error, info, warn};

use super::builder::{build_base, build_to_read, PageDraft, ToReadFields};
use super::client::NotionApi;
use super::comments::{anchor, CommentOutcome};
use super::error::{Result, SyncError};
use super::extract::{Extraction, Extractor};
use super::types::{PageHandle, PageSummary};
use crate::constants::{property, SOURCE_LABEL};
use crate::post::Post;
use crate::registry::DatabaseRegistry;

/// A page read back from the inbox database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InboxPage {
    pub page_id: String,
    pub name: String,
    pub to: String,
    /// Date property, in the source timezone.
    pub created_at: Option<String>,
    /// Raw page creation timestamp.
    pub created_time: String,
    pub preview: String,
    pub notion_url: String,
    pub source: String,
    pub content: String,
}

/// A created to-read page and the outcome of each comment attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToReadPage {
    pub page: PageHandle,
    pub comments: Vec<CommentOutcome>,
}

/// Reads and writes pages through an injected [`NotionApi`] client.
pub struct NotionAgent<C: NotionApi> {
    client: C,
    registry: DatabaseRegistry,
}

impl<C: NotionApi> NotionAgent<C> {
    pub fn new(client: C, registry: DatabaseRegistry) -> Self {
        Self { client, registry }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn registry(&self) -> &DatabaseRegistry {
        &self.registry
    }

    /// Flat text and block metadata of a page, embeds skipped.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Retrieval`] if fetching any block's children fails.
    pub async fn extract_page_blocks(&self, page_id: &str) -> Result<Extraction> {
        Extractor::new(&self.client).extract(page_id).await
    }

    /// Read every page of an inbox database together with its content.
    ///
    /// # Errors
    ///
    /// Returns an error if the query or any content extraction fails.
    pub async fn query_inbox(
        &self,
        database_id: &str,
        created_after: Option<DateTime<Utc>>,
    ) -> Result<Vec<InboxPage>> {
        let pages = self.client.query_database(database_id, created_after).await?;

        let mut inbox = Vec::with_capacity(pages.len());
        for page in pages {
            debug!(page_id = %page.id, "Reading inbox page");
            let content = self.extract_page_blocks(&page.id).await?;
            inbox.push(inbox_page(page, content.text));
        }

        Ok(inbox)
    }

    /// Create an inbox page for a post.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::MissingField`] for an incomplete post, or the
    /// API error if the page cannot be created.
    pub async fn create_inbox_item(
        &self,
        database_id: &str,
        list_names: &[String],
        post: &Post,
    ) -> Result<PageHandle> {
        let draft = build_base(list_names, post)?;
        self.create_page(database_id, &draft).await
    }

    /// Create an inbox page in the database registered for `source_name`.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::UnknownSource`] if no database is registered for
    /// the source, otherwise as [`Self::create_inbox_item`].
    pub async fn create_inbox_item_for_source(
        &self,
        source_name: &str,
        list_names: &[String],
        post: &Post,
    ) -> Result<PageHandle> {
        let database_id = self
            .registry
            .lookup(source_name)
            .ok_or_else(|| SyncError::UnknownSource(source_name.to_string()))?;
        self.create_inbox_item(database_id, list_names, post).await
    }

    /// Create a to-read page, then comment the author's (and reply author's)
    /// description onto their names in the new page.
    ///
    /// Comment failures never fail the call; they show up in
    /// [`ToReadPage::comments`].
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::MissingField`] for an incomplete post, or the
    /// API error if the page cannot be created.
    pub async fn create_to_read_item(
        &self,
        database_id: &str,
        list_names: &[String],
        post: &Post,
        fields: &ToReadFields,
    ) -> Result<ToReadPage> {
        let draft = build_to_read(list_names, post, fields)?;
        let page = self.create_page(database_id, &draft).await?;
        let comments = self.comment_people(&page.id, post).await;
        Ok(ToReadPage { page, comments })
    }

    async fn create_page(&self, database_id: &str, draft: &PageDraft) -> Result<PageHandle> {
        debug!(
            database_id,
            properties = ?draft.properties.names().collect::<Vec<_>>(),
            blocks = draft.blocks.len(),
            "Creating page"
        );
        let page = self
            .client
            .create_page(database_id, &draft.properties, &draft.blocks)
            .await?;
        info!(database_id, page_id = %page.id, url = %page.url, "Created page");
        Ok(page)
    }

    async fn comment_people(&self, page_id: &str, post: &Post) -> Vec<CommentOutcome> {
        let extraction = match self.extract_page_blocks(page_id).await {
            Ok(extraction) => extraction,
            Err(e) => {
                error!(page_id, error = %e, "Failed to read back page for comments");
                return vec![CommentOutcome::Failed {
                    reason: e.to_string(),
                }];
            }
        };

        let author = post.name.as_deref().unwrap_or_default();
        debug!(author, desc = %post.user_desc, "Adding author description as comment");
        let mut outcomes = vec![self.try_comment(&extraction, author, &post.user_desc).await];

        if let Some(reply_to) = post.reply_target() {
            let desc = post.reply_user_desc.as_deref().unwrap_or_default();
            outcomes.push(self.try_comment(&extraction, reply_to, desc).await);
        }

        outcomes
    }

    /// Best-effort [`anchor`]: errors become [`CommentOutcome::Failed`].
    async fn try_comment(
        &self,
        extraction: &Extraction,
        pattern: &str,
        comment_text: &str,
    ) -> CommentOutcome {
        match anchor(&self.client, &extraction.metadata, pattern, comment_text).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(pattern, error = %e, "Failed to add comment");
                CommentOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }
}

fn inbox_page(page: PageSummary, content: String) -> InboxPage {
    InboxPage {
        name: page.title(property::NAME),
        to: page.rich_text(property::TO),
        created_at: page.date_start(property::CREATED_AT),
        created_time: page.created_time.clone(),
        preview: page.rich_text(property::PREVIEW),
        notion_url: page.url.clone(),
        source: SOURCE_LABEL.to_string(),
        content,
        page_id: page.id,
    }
}
