pub mod cache;
pub mod client;

pub use cache::*;
pub use client::*;

use anyhow::Result;
use log::info;
use std::path::PathBuf;

use crate::ui::{Phase, Ui};

/// Download the feed at `url` unless it is already cached; returns the archive path
pub fn ensure_feed_downloaded(
    url: &str,
    cache_dir: Option<PathBuf>,
    force: bool,
    ui: &mut impl Ui,
) -> Result<PathBuf> {
    let cache = CacheManager::new(cache_dir)?;
    let path = cache.feed_path(url);

    if !force && cache.is_cached(url) {
        info!("using cached feed {:?}", path);
        return Ok(path);
    }

    ui.set_phase(Phase::Downloading);
    let client = FeedClient::new()?;
    let bytes = client.download(url, &path, ui)?;
    info!("downloaded {} bytes to {:?}", bytes, path);

    Ok(path)
}
