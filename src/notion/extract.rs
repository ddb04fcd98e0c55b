//! Flatten a page's block tree into text.
//!
//! The walker keeps an explicit stack of frames instead of recursing, so
//! deep tables do not grow the native stack. Each frame holds the children
//! of one fetched block; when a frame runs out, its text is folded into the
//! parent as the text of the table that opened it.

use std::collections::HashSet;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::client::NotionApi;
use super::error::{Result, SyncError};
use super::types::{concat_plain_text, Block, BlockKind, RichText};

/// Text recorded for a single block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockText {
    pub text: String,
}

/// Block id to text, in visit order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockMetadata(IndexMap<String, BlockText>);

impl BlockMetadata {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, block_id: impl Into<String>, text: impl Into<String>) {
        self.0.insert(block_id.into(), BlockText { text: text.into() });
    }

    #[must_use]
    pub fn text(&self, block_id: &str) -> Option<&str> {
        self.0.get(block_id).map(|b| b.text.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(id, b)| (id.as_str(), b.text.as_str()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for BlockMetadata {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut metadata = Self::new();
        for (id, text) in iter {
            metadata.insert(id, text);
        }
        metadata
    }
}

/// Flat text of a block tree plus the text each block contributed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    pub text: String,
    pub metadata: BlockMetadata,
}

struct Frame {
    /// Table whose rows this frame holds; `None` for the root.
    table_id: Option<String>,
    depth: usize,
    children: std::vec::IntoIter<Block>,
    text: String,
    metadata: BlockMetadata,
}

impl Frame {
    fn new(table_id: Option<String>, depth: usize, children: Vec<Block>) -> Self {
        Self {
            table_id,
            depth,
            children: children.into_iter(),
            text: String::new(),
            metadata: BlockMetadata::new(),
        }
    }
}

/// Walks a block tree through a [`NotionApi`] client.
pub struct Extractor<'a, C: NotionApi + ?Sized> {
    client: &'a C,
    skip_embeds: bool,
}

impl<'a, C: NotionApi + ?Sized> Extractor<'a, C> {
    /// Embeds are skipped unless [`Self::skip_embeds`] says otherwise.
    pub fn new(client: &'a C) -> Self {
        Self {
            client,
            skip_embeds: true,
        }
    }

    /// When `false`, embeds get an empty metadata entry but still add no text.
    #[must_use]
    pub fn skip_embeds(mut self, skip: bool) -> Self {
        self.skip_embeds = skip;
        self
    }

    /// Extract the flat text and per-block text below `block_id`.
    ///
    /// Children are visited in the order the API returns them. Tables are
    /// entered by fetching the table block's own children; the rows' text
    /// is recorded under the table id, not under the individual rows.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Retrieval`] if any children fetch fails.
    pub async fn extract(&self, block_id: &str) -> Result<Extraction> {
        let mut visited = HashSet::from([block_id.to_string()]);
        let mut root = Frame::new(None, 0, self.fetch(block_id).await?);
        let mut stack: Vec<Frame> = Vec::new();

        loop {
            let frame = match stack.last_mut() {
                Some(frame) => frame,
                None => &mut root,
            };

            let Some(block) = frame.children.next() else {
                let Some(done) = stack.pop() else {
                    break;
                };
                let parent = match stack.last_mut() {
                    Some(frame) => frame,
                    None => &mut root,
                };
                parent.text.push_str(&done.text);
                if let Some(table_id) = done.table_id {
                    parent.metadata.insert(table_id, done.text);
                }
                continue;
            };

            let Some(id) = block.id else {
                warn!(block_type = block.kind.type_name(), "Block without id, skipping");
                continue;
            };
            debug!(block_id = %id, block_type = block.kind.type_name(), depth = frame.depth, "Read block");

            match block.kind {
                BlockKind::Paragraph(runs)
                | BlockKind::BulletedListItem(runs)
                | BlockKind::Heading2(runs) => {
                    let text = concat_plain_text(&runs);
                    frame.text.push_str(&text);
                    frame.metadata.insert(id, text);
                }
                BlockKind::Embed { .. } => {
                    if !self.skip_embeds {
                        frame.metadata.insert(id, String::new());
                    }
                }
                BlockKind::Table { .. } => {
                    if !visited.insert(id.clone()) {
                        warn!(block_id = %id, "Table already visited, skipping");
                        continue;
                    }
                    let depth = frame.depth + 1;
                    let rows = self.fetch(&id).await?;
                    stack.push(Frame::new(Some(id), depth, rows));
                }
                BlockKind::TableRow { cells } => {
                    let text = row_text(&cells);
                    frame.text.push_str(&text);
                    frame.text.push('\n');
                    frame.metadata.insert(id, text);
                }
                BlockKind::Unsupported { type_name } => {
                    warn!(block_id = %id, block_type = %type_name, "Unsupported block type");
                }
            }
        }

        Ok(Extraction {
            text: root.text,
            metadata: root.metadata,
        })
    }

    async fn fetch(&self, block_id: &str) -> Result<Vec<Block>> {
        self.client
            .list_children(block_id)
            .await
            .map_err(|source| SyncError::Retrieval {
                block_id: block_id.to_string(),
                source,
            })
    }
}

/// Cell pieces in order, each cell followed by a `,`.
fn row_text(cells: &[Vec<RichText>]) -> String {
    let mut text = String::new();
    for cell in cells {
        text.push_str(&concat_plain_text(cell));
        text.push(',');
    }
    text
}
