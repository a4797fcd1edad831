use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::fs;
use std::path::PathBuf;

pub struct CacheManager {
    cache_dir: PathBuf,
}

impl CacheManager {
    pub fn new(custom_dir: Option<PathBuf>) -> Result<Self> {
        let cache_dir = match custom_dir {
            Some(dir) => dir,
            None => {
                let proj_dirs = ProjectDirs::from("", "", "gtfs-to-sqlite")
                    .context("Could not determine cache directory")?;
                proj_dirs.cache_dir().to_path_buf()
            }
        };

        fs::create_dir_all(&cache_dir).context("Failed to create cache directory")?;

        Ok(Self { cache_dir })
    }

    /// Path of the cached archive for a feed URL
    pub fn feed_path(&self, url: &str) -> PathBuf {
        self.cache_dir.join(cache_file_name(url))
    }

    /// Check if a feed is already cached
    pub fn is_cached(&self, url: &str) -> bool {
        self.feed_path(url).is_file()
    }
}

/// File name for a feed URL: scheme dropped, every non-alphanumeric run becomes `_`
fn cache_file_name(url: &str) -> String {
    let trimmed = url
        .split_once("://")
        .map(|(_, rest)| rest)
        .unwrap_or(url)
        .trim_end_matches('/');
    let trimmed = trimmed.strip_suffix(".zip").unwrap_or(trimmed);

    let mut name = String::with_capacity(trimmed.len() + 4);
    for c in trimmed.chars() {
        if c.is_ascii_alphanumeric() || c == '-' {
            name.push(c);
        } else if !name.ends_with('_') {
            name.push('_');
        }
    }

    format!("{}.zip", name.trim_matches('_'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_cache_file_name() {
        assert_eq!(
            cache_file_name("https://www.bart.gov/dev/schedules/google_transit.zip"),
            "www_bart_gov_dev_schedules_google_transit.zip"
        );
        assert_eq!(cache_file_name("http://example.com/feed/"), "example_com_feed.zip");
    }

    #[test]
    fn test_is_cached() {
        let dir = tempdir().unwrap();
        let cache = CacheManager::new(Some(dir.path().to_path_buf())).unwrap();
        let url = "https://example.com/gtfs.zip";

        assert!(!cache.is_cached(url));
        fs::write(cache.feed_path(url), b"zip").unwrap();
        assert!(cache.is_cached(url));
    }
}
