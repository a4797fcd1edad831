//! Feed sources: where the `<table>.txt` files of a feed are read from
//!
//! A feed is either a directory of loose files or a zip archive. [`open`]
//! picks the implementation once, by checking the kind of the path.

mod archive;
mod directory;

use log::debug;
use std::path::Path;

use crate::error::FeedError;
use crate::parser::TableReader;

pub use archive::ArchiveSource;
pub use directory::DirectorySource;

/// Lazy, single-pass sequence of decoded text lines (line terminators removed)
pub type LineStream = Box<dyn Iterator<Item = Result<String, FeedError>>>;

/// Capability shared by directory and archive feeds
pub trait FeedSource {
    /// Path the feed was opened from
    fn location(&self) -> &Path;

    /// Decoded lines of the named file, header included
    fn get_rows(&mut self, file_name: &str) -> Result<LineStream, FeedError>;

    /// Streaming table reader over the named file
    fn get_table(&mut self, file_name: &str) -> Result<TableReader, FeedError> {
        let rows = self.get_rows(file_name)?;
        TableReader::new(file_name, rows)
    }
}

/// Open a feed from a directory or a zip archive
pub fn open(path: impl AsRef<Path>) -> Result<Box<dyn FeedSource>, FeedError> {
    let path = path.as_ref();

    if path.is_dir() {
        debug!("opening feed directory {:?}", path);
        Ok(Box::new(DirectorySource::new(path)))
    } else if path.is_file() {
        debug!("opening feed archive {:?}", path);
        Ok(Box::new(ArchiveSource::open(path)?))
    } else {
        Err(FeedError::NotFileNorDirectory(path.to_path_buf()))
    }
}

/// Strip a leading UTF-8 byte order mark
pub(crate) fn strip_bom(line: &str) -> &str {
    line.strip_prefix('\u{feff}').unwrap_or(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_bom() {
        assert_eq!(strip_bom("\u{feff}agency_id"), "agency_id");
        assert_eq!(strip_bom("agency_id"), "agency_id");
    }

    #[test]
    fn test_open_missing_path() {
        let err = open("/nonexistent/feed/location").err().unwrap();
        assert!(matches!(err, FeedError::NotFileNorDirectory(_)));
    }
}
