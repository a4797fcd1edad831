use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use super::{FeedSource, LineStream};
use crate::error::FeedError;

/// Feed made of loose files in a directory; lines are decoded one at a time
pub struct DirectorySource {
    dir: PathBuf,
}

impl DirectorySource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl FeedSource for DirectorySource {
    fn location(&self) -> &Path {
        &self.dir
    }

    fn get_rows(&mut self, file_name: &str) -> Result<LineStream, FeedError> {
        let path = self.dir.join(file_name);
        let file = File::open(&path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => FeedError::NotFound {
                file: file_name.to_string(),
            },
            _ => FeedError::Io {
                file: file_name.to_string(),
                source: e,
            },
        })?;

        let file_name = file_name.to_string();
        let lines = BufReader::new(file)
            .lines()
            .enumerate()
            .map(move |(idx, line)| {
                line.map_err(|e| match e.kind() {
                    io::ErrorKind::InvalidData => FeedError::Decode {
                        file: file_name.clone(),
                        line: idx + 1,
                    },
                    _ => FeedError::Io {
                        file: file_name.clone(),
                        source: e,
                    },
                })
            });

        Ok(Box::new(lines))
    }
}
