use std::rc::Rc;

use super::record::{Header, Record};
use crate::error::FeedError;
use crate::feed::{strip_bom, LineStream};

/// Forward-only reader over the data lines of one feed file.
///
/// The header is consumed on construction; each call to `next` decodes and
/// splits one more line. Whitespace-only lines are skipped. Reading the file
/// again requires a new reader from the feed source.
pub struct TableReader {
    file: Rc<str>,
    header: Rc<Header>,
    lines: LineStream,
    line_no: usize,
}

impl TableReader {
    pub fn new(file_name: &str, mut lines: LineStream) -> Result<Self, FeedError> {
        let header_line = lines
            .next()
            .transpose()?
            .ok_or_else(|| FeedError::MissingHeader {
                file: file_name.to_string(),
            })?;

        Ok(Self {
            file: Rc::from(file_name),
            header: Rc::new(Header::parse(strip_bom(&header_line))),
            lines,
            line_no: 1,
        })
    }

    pub fn header(&self) -> &Header {
        &self.header
    }
}

impl Iterator for TableReader {
    type Item = Result<Record, FeedError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => return Some(Err(e)),
            };
            self.line_no += 1;

            if line.trim().is_empty() {
                continue;
            }

            return Some(Ok(Record::parse(
                &line,
                Rc::clone(&self.header),
                Rc::clone(&self.file),
                self.line_no,
            )));
        }
    }
}

impl std::fmt::Debug for TableReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TableReader")
            .field("file", &self.file)
            .field("header", &self.header)
            .field("line", &self.line_no)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stream(lines: &[&str]) -> LineStream {
        let owned: Vec<Result<String, FeedError>> =
            lines.iter().map(|l| Ok(l.to_string())).collect();
        Box::new(owned.into_iter())
    }

    #[test]
    fn test_header_and_records() {
        let reader = TableReader::new("t.txt", stream(&["a, b,c", "1,2,3", "4,5,6"])).unwrap();
        assert_eq!(reader.header().position("b"), Some(1));

        let records: Vec<Record> = reader.collect::<Result<_, _>>().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get("b"), Some("2"));
        assert_eq!(records[1].get("c"), Some("6"));
        assert_eq!(records[1].line(), 3);
    }

    #[test]
    fn test_blank_lines_skipped_but_counted() {
        let reader = TableReader::new("t.txt", stream(&["a", "1", "", "  ", "2"])).unwrap();
        let records: Vec<Record> = reader.collect::<Result<_, _>>().unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[1].line(), 5);
    }

    #[test]
    fn test_bom_stripped_from_header() {
        let reader = TableReader::new("t.txt", stream(&["\u{feff}agency_id,x", "BART,1"])).unwrap();
        assert_eq!(reader.header().position("agency_id"), Some(0));
    }

    #[test]
    fn test_empty_file_has_no_header() {
        let err = TableReader::new("t.txt", stream(&[])).unwrap_err();
        assert!(matches!(err, FeedError::MissingHeader { file } if file == "t.txt"));
    }

    #[test]
    fn test_single_pass() {
        let mut reader = TableReader::new("t.txt", stream(&["a", "1"])).unwrap();
        assert!(reader.next().is_some());
        assert!(reader.next().is_none());
        assert!(reader.next().is_none());
    }
}
