//! Mapping between posts and Notion pages.

mod agent;
mod builder;
mod client;
mod comments;
mod error;
mod extract;
mod properties;
mod types;

pub use agent::{InboxPage, NotionAgent, ToReadPage};
pub use builder::{build_base, build_to_read, PageDraft, ToReadFields};
pub use client::{NotionApi, NotionClient};
pub use comments::{anchor, find_range, CommentOutcome};
pub use error::{ApiError, Result, SyncError};
pub use extract::{BlockMetadata, BlockText, Extraction, Extractor};
pub use properties::{DateValue, Properties, PropertyValue, SelectOption};
pub use types::{
    concat_plain_text, Annotations, Block, BlockKind, CommentHandle, CommentRange, ListResponse,
    PageHandle, PageSummary, RichText,
};
