use serde::{Deserialize, Deserializer, Serialize};

use crate::constants::PLATFORM_BASE_URL;
use crate::notion::SyncError;

/// A single social post together with its reply and embed context.
///
/// Field names on the wire follow the upstream collector's JSON output.
/// `reply_*` fields are either all absent or present together.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Post {
    #[serde(rename = "tweet_id", default, deserialize_with = "string_or_number")]
    pub id: Option<String>,
    /// Author display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Author handle, without the leading `@`.
    #[serde(rename = "screen_name", default)]
    pub handle: Option<String>,
    #[serde(default)]
    pub text: String,
    /// Creation timestamp as reported by the platform.
    #[serde(default)]
    pub created_at: String,
    /// Creation timestamp normalized to the local timezone.
    #[serde(rename = "created_at_pdt", default)]
    pub created_at_local: String,
    #[serde(default)]
    pub retweeted: bool,
    #[serde(default)]
    pub user_desc: String,

    #[serde(default)]
    pub reply_to_name: Option<String>,
    #[serde(default)]
    pub reply_to_screen_name: Option<String>,
    #[serde(default)]
    pub reply_text: Option<String>,
    #[serde(default)]
    pub reply_user_desc: Option<String>,

    /// Embedded media URL of the post itself.
    #[serde(default)]
    pub embed: Option<String>,
    /// Embedded media URL of the replied-to post.
    #[serde(default)]
    pub reply_embed: Option<String>,
}

impl Post {
    /// Create a post with the required fields set and everything else empty.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        handle: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            id: Some(id.into()),
            name: Some(name.into()),
            handle: Some(handle.into()),
            text: text.into(),
            ..Self::default()
        }
    }

    /// Author display name.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::MissingField`] if the post has no author name.
    pub fn author_name(&self) -> Result<&str, SyncError> {
        self.name.as_deref().ok_or(SyncError::MissingField("name"))
    }

    /// Canonical URL of the post on the originating platform.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::MissingField`] if the id or handle is missing.
    pub fn status_url(&self) -> Result<String, SyncError> {
        let handle = self
            .handle
            .as_deref()
            .ok_or(SyncError::MissingField("screen_name"))?;
        let id = self.id.as_deref().ok_or(SyncError::MissingField("tweet_id"))?;
        Ok(format!("{PLATFORM_BASE_URL}/{handle}/status/{id}"))
    }

    /// Display name of the reply target, if the post is a reply.
    #[must_use]
    pub fn reply_target(&self) -> Option<&str> {
        non_empty(self.reply_to_name.as_deref())
    }

    #[must_use]
    pub fn embed_url(&self) -> Option<&str> {
        non_empty(self.embed.as_deref())
    }

    #[must_use]
    pub fn reply_text(&self) -> Option<&str> {
        non_empty(self.reply_text.as_deref())
    }

    #[must_use]
    pub fn reply_embed_url(&self) -> Option<&str> {
        non_empty(self.reply_embed.as_deref())
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}

/// Post ids arrive either as JSON strings or as (large) integers.
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(u64),
    }

    Ok(Option::<Id>::deserialize(deserializer)?.map(|id| match id {
        Id::Text(s) => s,
        Id::Number(n) => n.to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_url() {
        let post = Post::new("42", "Alice", "alice", "hello");
        assert_eq!(
            post.status_url().unwrap(),
            "https://twitter.com/alice/status/42"
        );
    }

    #[test]
    fn test_missing_required_fields() {
        let post = Post {
            handle: None,
            ..Post::new("42", "Alice", "alice", "hello")
        };
        assert!(matches!(
            post.status_url(),
            Err(SyncError::MissingField("screen_name"))
        ));

        let post = Post {
            name: None,
            ..Post::new("42", "Alice", "alice", "hello")
        };
        assert!(matches!(
            post.author_name(),
            Err(SyncError::MissingField("name"))
        ));
    }

    #[test]
    fn test_empty_optional_fields_are_absent() {
        let post = Post {
            embed: Some(String::new()),
            reply_to_name: Some(String::new()),
            ..Post::new("1", "A", "a", "t")
        };
        assert_eq!(post.embed_url(), None);
        assert_eq!(post.reply_target(), None);
    }

    #[test]
    fn test_deserialize_collector_json() {
        let json = r#"{
            "tweet_id": 1650000000000000000,
            "name": "Alice",
            "screen_name": "alice",
            "text": "hello",
            "created_at": "2023-04-23T05:00:00+00:00",
            "created_at_pdt": "2023-04-22",
            "retweeted": true,
            "user_desc": "builder",
            "reply_to_name": null,
            "embed": "https://example.com/video"
        }"#;
        let post: Post = serde_json::from_str(json).unwrap();
        assert_eq!(post.id.as_deref(), Some("1650000000000000000"));
        assert_eq!(post.handle.as_deref(), Some("alice"));
        assert_eq!(post.created_at_local, "2023-04-22");
        assert!(post.retweeted);
        assert_eq!(post.reply_target(), None);
        assert_eq!(post.embed_url(), Some("https://example.com/video"));
    }
}
