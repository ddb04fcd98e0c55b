//! Integration tests for loading collected posts from disk.

use notion_post_sync::config::Config;
use notion_post_sync::source::{load_twitter_posts, TWITTER_DATA_FILE};
use tempfile::TempDir;

const SAMPLE: &str = r#"{
    "AI": [
        {
            "tweet_id": "42",
            "name": "Alice",
            "screen_name": "alice",
            "text": "hello",
            "created_at_pdt": "2023-04-22",
            "retweeted": false,
            "reply_to_name": "Bob",
            "reply_text": "first",
            "reply_user_desc": "Thinks things"
        }
    ],
    "Rust": [
        { "tweet_id": 7, "name": "Carol", "screen_name": "carol", "text": "fn main() {}" },
        { "tweet_id": 8, "name": "Carol", "screen_name": "carol", "text": "again", "retweeted": true }
    ]
}"#;

#[tokio::test]
async fn test_load_posts_grouped_by_list() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config = Config {
        work_dir: temp_dir.path().to_path_buf(),
        data_folder: "data".into(),
        run_id: "run-1".to_string(),
        ..Config::for_testing()
    };
    let data_dir = config.run_data_dir();
    tokio::fs::create_dir_all(&data_dir).await.unwrap();
    tokio::fs::write(data_dir.join(TWITTER_DATA_FILE), SAMPLE)
        .await
        .unwrap();

    let posts = load_twitter_posts(&data_dir).await.unwrap();

    let lists: Vec<_> = posts.keys().map(String::as_str).collect();
    assert_eq!(lists, vec!["AI", "Rust"]);
    assert_eq!(posts["AI"][0].reply_target(), Some("Bob"));
    assert_eq!(posts["Rust"][0].id.as_deref(), Some("7"));
    assert!(posts["Rust"][1].retweeted);
}

#[tokio::test]
async fn test_missing_file_is_error() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let err = load_twitter_posts(temp_dir.path()).await.unwrap_err();
    assert!(format!("{err:#}").contains(TWITTER_DATA_FILE));
}

#[tokio::test]
async fn test_malformed_file_is_error() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    tokio::fs::write(temp_dir.path().join(TWITTER_DATA_FILE), "[1, 2")
        .await
        .unwrap();
    assert!(load_twitter_posts(temp_dir.path()).await.is_err());
}
