use anyhow::{Context, Result};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use notion_post_sync::config::Config;
use notion_post_sync::constants::SOURCE_TWITTER;
use notion_post_sync::notion::{NotionAgent, NotionClient};
use notion_post_sync::registry::DatabaseRegistry;
use notion_post_sync::source::{load_twitter_posts, PostsByList};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {e:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    init_tracing()?;

    info!("Starting notion-post-sync");

    let config = Config::from_env().context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;

    info!(
        api_base = %config.notion_api_base,
        run_id = %config.run_id,
        sources = ?config.sources,
        targets = ?config.targets,
        "Configuration loaded"
    );

    let registry = DatabaseRegistry::from_config(&config);
    if registry.is_empty() {
        warn!("No target databases configured");
    }
    let agent = NotionAgent::new(NotionClient::from_config(&config), registry);

    for source in &config.sources {
        info!(source = %source, "Pulling data for source");

        match source.as_str() {
            SOURCE_TWITTER => {
                let posts = load_twitter_posts(&config.run_data_dir())
                    .await
                    .context("Failed to load twitter posts")?;
                push_to_targets(&config, &agent, source, &posts).await;
            }
            other => warn!(source = %other, "Unknown source, skipping"),
        }
    }

    info!("Run complete");
    Ok(())
}

async fn push_to_targets(
    config: &Config,
    agent: &NotionAgent<NotionClient>,
    source: &str,
    posts: &PostsByList,
) {
    for target in &config.targets {
        info!(target = %target, "Pushing data to target");

        match target.as_str() {
            "notion" => {
                let (created, failed) = push_to_notion(agent, source, posts).await;
                info!(source, created, failed, "Pushed posts to Notion");
            }
            other => warn!(target = %other, "Unknown target, skipping"),
        }
    }
}

async fn push_to_notion(
    agent: &NotionAgent<NotionClient>,
    source: &str,
    posts: &PostsByList,
) -> (usize, usize) {
    let mut created = 0;
    let mut failed = 0;

    for (list_name, list_posts) in posts {
        let list_names = [list_name.clone()];
        for post in list_posts {
            match agent
                .create_inbox_item_for_source(source, &list_names, post)
                .await
            {
                Ok(_) => created += 1,
                Err(e) => {
                    failed += 1;
                    error!(list = %list_name, post_id = ?post.id, "Failed to create page: {e}");
                }
            }
        }
    }

    (created, failed)
}

fn init_tracing() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,notion_post_sync=debug"));

    // Check if JSON logging is requested
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| matches!(v.to_lowercase().as_str(), "json" | "structured"))
        .unwrap_or(false);

    if use_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
            .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {e}"))?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .try_init()
            .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {e}"))?;
    }

    Ok(())
}
