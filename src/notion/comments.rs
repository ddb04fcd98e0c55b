use tracing::{debug, info};

use super::client::NotionApi;
use super::error::{Result, SyncError};
use super::extract::BlockMetadata;
use super::types::{CommentRange, RichText};

/// What happened to a requested comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommentOutcome {
    Attached {
        block_id: String,
        range: CommentRange,
        comment_id: String,
    },
    /// No block text contains the pattern.
    SkippedNoMatch,
    /// Creation failed; the page itself is unaffected.
    Failed { reason: String },
}

/// Locate the first occurrence of `pattern` in `text` as a character range.
#[must_use]
pub fn find_range(text: &str, pattern: &str) -> Option<CommentRange> {
    let byte_start = text.find(pattern)?;
    let start = text[..byte_start].chars().count();
    Some(CommentRange {
        start,
        end: start + pattern.chars().count(),
    })
}

/// Attach `comment_text` to the first block (in `metadata` order) whose
/// text contains `pattern`, anchored at the first occurrence.
///
/// At most one comment is created. No match is not an error.
///
/// # Errors
///
/// Returns [`SyncError::CommentAttachment`] if the comment create call fails.
pub async fn anchor<C: NotionApi + ?Sized>(
    client: &C,
    metadata: &BlockMetadata,
    pattern: &str,
    comment_text: &str,
) -> Result<CommentOutcome> {
    let Some((block_id, range)) = metadata
        .iter()
        .find_map(|(id, text)| find_range(text, pattern).map(|range| (id, range)))
    else {
        debug!(pattern, "No block contains pattern, skipping comment");
        return Ok(CommentOutcome::SkippedNoMatch);
    };

    let comment = client
        .create_comment(block_id, &[RichText::plain(comment_text)], range)
        .await
        .map_err(|source| SyncError::CommentAttachment {
            block_id: block_id.to_string(),
            source,
        })?;

    info!(
        block_id,
        pattern,
        start = range.start,
        end = range.end,
        comment_id = %comment.id,
        "Created comment"
    );

    Ok(CommentOutcome::Attached {
        block_id: block_id.to_string(),
        range,
        comment_id: comment.id,
    })
}
