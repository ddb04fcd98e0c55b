//! Local post storage written by the upstream collector.

use std::path::Path;

use anyhow::{Context, Result};
use indexmap::IndexMap;
use tracing::info;

use crate::post::Post;

/// File name of the collected posts inside a run's data directory.
pub const TWITTER_DATA_FILE: &str = "twitter.json";

/// Posts grouped by the list they were collected from, in file order.
pub type PostsByList = IndexMap<String, Vec<Post>>;

/// Load `twitter.json` from a run's data directory.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not valid JSON.
pub async fn load_twitter_posts(data_dir: &Path) -> Result<PostsByList> {
    let path = data_dir.join(TWITTER_DATA_FILE);
    let raw = tokio::fs::read_to_string(&path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let posts: PostsByList = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    info!(
        path = %path.display(),
        lists = posts.len(),
        posts = posts.values().map(Vec::len).sum::<usize>(),
        "Loaded posts"
    );
    Ok(posts)
}
