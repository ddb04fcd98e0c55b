//! Shared constants used across the application.

/// Default base URL of the Notion REST API.
pub const DEFAULT_NOTION_API_BASE: &str = "https://api.notion.com/v1";

/// Value sent in the `Notion-Version` header unless overridden.
pub const DEFAULT_NOTION_VERSION: &str = "2022-06-28";

/// User agent string used for API requests.
pub const USER_AGENT: &str = concat!("notion-post-sync/", env!("CARGO_PKG_VERSION"));

/// Base URL of the originating platform, used to build canonical post links.
pub const PLATFORM_BASE_URL: &str = "https://twitter.com";

/// Literal written into the `Source` property of to-read pages and inbox records.
pub const SOURCE_LABEL: &str = "Twitter";

/// Maximum page size accepted by the Notion list/query endpoints.
pub const PAGE_SIZE: u32 = 100;

/// Registry key for the inbox collection.
pub const SOURCE_TWITTER: &str = "twitter";

/// Registry key for the to-read collection.
pub const SOURCE_TWITTER_TOREAD: &str = "twitter_toread";

/// Property names of the target databases.
pub mod property {
    pub const NAME: &str = "Name";
    pub const TO: &str = "To";
    pub const CREATED_AT: &str = "Created at";
    pub const CREATED_TIME: &str = "Created time";
    pub const PREVIEW: &str = "Preview";
    pub const LIST_NAME: &str = "List Name";
    pub const SOURCE: &str = "Source";
    pub const TOPIC: &str = "Topic";
    pub const CATEGORY: &str = "Category";
    pub const RATING: &str = "Rating";
}
