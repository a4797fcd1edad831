use std::ffi::OsStr;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use zip::ZipArchive;

use super::{FeedSource, LineStream};
use crate::error::FeedError;

/// Feed packed in a zip archive.
///
/// Each requested entry is decoded into memory in full and then split into
/// lines lazily, so memory use is bounded by the largest entry read.
pub struct ArchiveSource {
    path: PathBuf,
    archive: ZipArchive<BufReader<File>>,
}

impl ArchiveSource {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, FeedError> {
        let path = path.into();
        let file = File::open(&path).map_err(|e| FeedError::Io {
            file: path.display().to_string(),
            source: e,
        })?;
        let archive = ZipArchive::new(BufReader::new(file))?;

        Ok(Self { path, archive })
    }

    /// Entry name for `file_name`: exact match, else same file name in a subfolder
    fn entry_name(&self, file_name: &str) -> Option<String> {
        let mut names = self.archive.file_names();
        if names.any(|n| n == file_name) {
            return Some(file_name.to_string());
        }

        let mut nested: Vec<&str> = self
            .archive
            .file_names()
            .filter(|n| Path::new(n).file_name() == Some(OsStr::new(file_name)))
            .collect();
        nested.sort_unstable();
        nested.first().map(|n| n.to_string())
    }
}

impl FeedSource for ArchiveSource {
    fn location(&self) -> &Path {
        &self.path
    }

    fn get_rows(&mut self, file_name: &str) -> Result<LineStream, FeedError> {
        let entry_name = self
            .entry_name(file_name)
            .ok_or_else(|| FeedError::NotFound {
                file: file_name.to_string(),
            })?;

        let mut entry = self.archive.by_name(&entry_name)?;
        let mut bytes = Vec::with_capacity(entry.size() as usize);
        entry.read_to_end(&mut bytes).map_err(|e| FeedError::Io {
            file: file_name.to_string(),
            source: e,
        })?;

        let content = String::from_utf8(bytes).map_err(|e| {
            let valid = e.utf8_error().valid_up_to();
            let line = e.as_bytes()[..valid]
                .iter()
                .filter(|&&b| b == b'\n')
                .count()
                + 1;
            FeedError::Decode {
                file: file_name.to_string(),
                line,
            }
        })?;

        Ok(Box::new(OwnedLines::new(content)))
    }
}

/// Line iterator that owns its text
struct OwnedLines {
    content: String,
    pos: usize,
}

impl OwnedLines {
    fn new(content: String) -> Self {
        Self { content, pos: 0 }
    }
}

impl Iterator for OwnedLines {
    type Item = Result<String, FeedError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.content.len() {
            return None;
        }

        let rest = &self.content[self.pos..];
        let (line, consumed) = match rest.find('\n') {
            Some(end) => (&rest[..end], end + 1),
            None => (rest, rest.len()),
        };
        let line = line.strip_suffix('\r').unwrap_or(line).to_string();
        self.pos += consumed;

        Some(Ok(line))
    }
}
