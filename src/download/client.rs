use anyhow::{Context, Result};
use reqwest::blocking::Client;
use std::io::{Read, Write};
use std::path::Path;

use crate::ui::Ui;

pub struct FeedClient {
    client: Client,
}

impl FeedClient {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("gtfs-to-sqlite/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self { client })
    }

    /// Download the feed archive at `url` to `dest`
    pub fn download(&self, url: &str, dest: &Path, ui: &mut impl Ui) -> Result<u64> {
        let response = self
            .client
            .get(url)
            .send()
            .with_context(|| format!("Failed to start download of {}", url))?
            .error_for_status()
            .with_context(|| format!("Server refused {}", url))?;

        let total_size = response.content_length().unwrap_or(0);
        ui.begin("download", total_size);

        // Write to a sibling file first so an interrupted download never looks cached
        let partial = dest.with_extension("part");
        let mut file =
            std::fs::File::create(&partial).context("Failed to create destination file")?;

        let mut downloaded: u64 = 0;
        let mut buffer = [0u8; 8192];
        let mut reader = response;

        loop {
            let bytes_read = reader
                .read(&mut buffer)
                .context("Failed to read from response")?;

            if bytes_read == 0 {
                break;
            }

            file.write_all(&buffer[..bytes_read])
                .context("Failed to write to file")?;

            downloaded += bytes_read as u64;
            ui.set_progress(downloaded);
        }

        file.flush()?;
        std::fs::rename(&partial, dest).context("Failed to move download into place")?;

        ui.finish(format!("downloaded {}", format_bytes(downloaded)));
        Ok(downloaded)
    }
}

/// Format bytes as human-readable string
fn format_bytes(bytes: u64) -> String {
    if bytes >= 1_000_000_000 {
        format!("{:.1} GB", bytes as f64 / 1_000_000_000.0)
    } else if bytes >= 1_000_000 {
        format!("{:.1} MB", bytes as f64 / 1_000_000.0)
    } else if bytes >= 1_000 {
        format!("{:.1} KB", bytes as f64 / 1_000.0)
    } else {
        format!("{} B", bytes)
    }
}
