//! Map a [`Post`] to page properties and content blocks.
//!
//! Pure transformation; nothing here touches the network.

use tracing::debug;

use super::error::Result;
use super::properties::{Properties, PropertyValue};
use super::types::Block;
use crate::constants::{property, SOURCE_LABEL};
use crate::post::Post;

/// Properties and content of a page that has not been created yet.
#[derive(Debug, Clone, PartialEq)]
pub struct PageDraft {
    pub properties: Properties,
    pub blocks: Vec<Block>,
}

/// Extra fields carried by to-read pages.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToReadFields {
    pub topics: Vec<String>,
    pub categories: Vec<String>,
    /// Passed through as given; no range is enforced.
    pub rating: f64,
}

/// Build the inbox page for a post.
///
/// # Errors
///
/// Returns [`SyncError::MissingField`](super::SyncError::MissingField) if the
/// author name, id or handle is missing.
pub fn build_base(list_names: &[String], post: &Post) -> Result<PageDraft> {
    let author = post.author_name()?;
    let url = post.status_url()?;

    let preview = if post.retweeted {
        format!("Retweeted: {}", post.text)
    } else {
        post.text.clone()
    };

    let properties = Properties::new()
        .with(property::NAME, PropertyValue::title(author))
        .with(
            property::TO,
            PropertyValue::text(post.reply_target().unwrap_or_default()),
        )
        .with(
            property::CREATED_AT,
            PropertyValue::date(post.created_at_local.as_str()),
        )
        .with(property::PREVIEW, PropertyValue::linked_text(preview, url))
        .with(
            property::LIST_NAME,
            PropertyValue::multi_select(list_names.iter().cloned()),
        );

    let mut blocks = vec![Block::paragraph(primary_text(author, post))];

    if let Some(embed) = post.embed_url() {
        blocks.push(Block::embed(embed));
    }

    // A reply embed only ever follows the reply text.
    if let Some(reply_text) = post.reply_text() {
        blocks.push(Block::paragraph(format!(
            "Reply-to: {}: {reply_text}",
            post.reply_to_name.as_deref().unwrap_or_default()
        )));

        if let Some(reply_embed) = post.reply_embed_url() {
            blocks.push(Block::embed(reply_embed));
        }
    }

    debug!(
        author,
        properties = properties.len(),
        blocks = blocks.len(),
        "Built page draft"
    );

    Ok(PageDraft { properties, blocks })
}

/// Build the to-read page for a post: the inbox page plus source, topics,
/// categories and rating.
///
/// # Errors
///
/// Same as [`build_base`].
pub fn build_to_read(list_names: &[String], post: &Post, fields: &ToReadFields) -> Result<PageDraft> {
    let base = build_base(list_names, post)?;

    let extension = Properties::new()
        .with(property::SOURCE, PropertyValue::text(SOURCE_LABEL))
        .with(
            property::TOPIC,
            PropertyValue::multi_select(fields.topics.iter().cloned()),
        )
        .with(
            property::CATEGORY,
            PropertyValue::multi_select(fields.categories.iter().cloned()),
        )
        .with(property::RATING, PropertyValue::Number(fields.rating));

    Ok(PageDraft {
        properties: base.properties.merged(extension),
        blocks: base.blocks,
    })
}

fn primary_text(author: &str, post: &Post) -> String {
    let mut content = author.to_string();
    if post.retweeted {
        content.push_str(" (Retweeted)");
    }
    content.push_str(": ");
    content.push_str(&post.text);
    content
}
