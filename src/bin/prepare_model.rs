//! Downloads a pretrained classifier and its tokenizer into the local model
//! cache directory read by the service at startup.
//!
//! Usage: `prepare-model [REPO_ID] [CACHE_DIR]`. Both default to the values
//! in the service configuration.

use anyhow::{Result, bail};
use sentiment_service::{config, model::ModelCache};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = config::load().await?;
    let mut args = std::env::args().skip(1);
    let repo_id = args.next().unwrap_or(config.model.repo_id);
    let cache_dir = args.next().unwrap_or(config.model.cache_dir);

    let cache = ModelCache::new(&cache_dir);

    info!("Downloading model {} into {}", repo_id, cache_dir);
    let report = cache.download(&repo_id).await?;

    let files = cache.list_files()?;
    for file in &files {
        info!("Cached file: {}", file.display());
    }
    if files.is_empty() {
        warn!("{} is empty", cache_dir);
    }

    if cache.is_writable() {
        info!("Write permission is granted on {}", cache_dir);
    } else {
        warn!("No write permission on {}", cache_dir);
    }

    for (file, reason) in &report.failed {
        warn!("Could not fetch {}: {}", file, reason);
    }

    if !report.is_complete() {
        bail!("Model cache at {} is incomplete", cache_dir);
    }

    info!("Files successfully saved to {}", cache_dir);
    Ok(())
}
