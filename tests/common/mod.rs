//! In-memory Notion fake shared by the integration tests.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use notion_post_sync::notion::{
    concat_plain_text, ApiError, Block, BlockKind, CommentHandle, CommentRange, NotionApi,
    PageHandle, PageSummary, Properties, RichText,
};

/// A comment recorded by [`MemoryNotion`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedComment {
    pub block_id: String,
    pub text: String,
    pub range: CommentRange,
}

/// Block tree held in memory; children are looked up by parent id.
#[derive(Default)]
pub struct MemoryNotion {
    children: Mutex<HashMap<String, Vec<Block>>>,
    failing: HashSet<String>,
    fail_comments: bool,
    pub fetches: Mutex<Vec<String>>,
    pub comments: Mutex<Vec<RecordedComment>>,
    pub pages: Mutex<Vec<(String, Properties, Vec<Block>)>>,
}

impl MemoryNotion {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_children(self, parent: &str, blocks: Vec<Block>) -> Self {
        self.children
            .lock()
            .unwrap()
            .insert(parent.to_string(), blocks);
        self
    }

    pub fn failing_on(mut self, block_id: &str) -> Self {
        self.failing.insert(block_id.to_string());
        self
    }

    pub fn failing_comments(mut self) -> Self {
        self.fail_comments = true;
        self
    }

    pub fn comments(&self) -> Vec<RecordedComment> {
        self.comments.lock().unwrap().clone()
    }

    pub fn fetches(&self) -> Vec<String> {
        self.fetches.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotionApi for MemoryNotion {
    async fn list_children(&self, block_id: &str) -> Result<Vec<Block>, ApiError> {
        self.fetches.lock().unwrap().push(block_id.to_string());
        if self.failing.contains(block_id) {
            return Err(ApiError::Api {
                status: 502,
                message: "bad gateway".to_string(),
            });
        }
        Ok(self
            .children
            .lock()
            .unwrap()
            .get(block_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn query_database(
        &self,
        _database_id: &str,
        _created_after: Option<DateTime<Utc>>,
    ) -> Result<Vec<PageSummary>, ApiError> {
        Ok(Vec::new())
    }

    async fn create_page(
        &self,
        database_id: &str,
        properties: &Properties,
        children: &[Block],
    ) -> Result<PageHandle, ApiError> {
        let mut pages = self.pages.lock().unwrap();
        let id = format!("page-{}", pages.len() + 1);
        pages.push((database_id.to_string(), properties.clone(), children.to_vec()));

        // Stored blocks get ids so they can be read back.
        let stored = children
            .iter()
            .enumerate()
            .map(|(i, b)| b.clone().with_id(format!("{id}-b{i}")))
            .collect();
        self.children.lock().unwrap().insert(id.clone(), stored);

        Ok(PageHandle {
            url: format!("https://www.notion.so/{id}"),
            id,
        })
    }

    async fn create_comment(
        &self,
        block_id: &str,
        text: &[RichText],
        range: CommentRange,
    ) -> Result<CommentHandle, ApiError> {
        if self.fail_comments {
            return Err(ApiError::Network("connection reset".to_string()));
        }
        let mut comments = self.comments.lock().unwrap();
        comments.push(RecordedComment {
            block_id: block_id.to_string(),
            text: concat_plain_text(text),
            range,
        });
        Ok(CommentHandle {
            id: format!("comment-{}", comments.len()),
            discussion_id: None,
        })
    }
}

pub fn paragraph(id: &str, text: &str) -> Block {
    Block::paragraph(text).with_id(id)
}

pub fn table(id: &str) -> Block {
    Block::new(BlockKind::Table {
        width: 2,
        has_column_header: false,
        has_row_header: false,
    })
    .with_id(id)
}

pub fn row(id: &str, cells: &[&str]) -> Block {
    Block::new(BlockKind::TableRow {
        cells: cells.iter().map(|c| vec![RichText::plain(*c)]).collect(),
    })
    .with_id(id)
}
