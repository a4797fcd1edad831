use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::error::FeedError;

/// Column name to position index parsed from a header line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    index: HashMap<String, usize>,
    /// Number of tokens on the header line, duplicates included
    width: usize,
}

impl Header {
    /// Split on commas and trim each name. A repeated name keeps its last position.
    pub fn parse(line: &str) -> Self {
        let mut index = HashMap::new();
        let mut width = 0;

        for (pos, name) in line.split(',').map(str::trim).enumerate() {
            index.insert(name.to_string(), pos);
            width += 1;
        }

        Self { index, width }
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

/// One data line of a table, addressable by column name
pub struct Record {
    values: Vec<String>,
    header: Rc<Header>,
    file: Rc<str>,
    line: usize,
}

impl Record {
    pub(crate) fn parse(line: &str, header: Rc<Header>, file: Rc<str>, line_no: usize) -> Self {
        Self {
            values: line.split(',').map(|v| v.trim().to_string()).collect(),
            header,
            file,
            line: line_no,
        }
    }

    /// Value of the named column.
    ///
    /// `None` when the header does not declare `name`, or when this row is too
    /// short to reach its position. A missing column is absent data, not an error.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.header
            .position(name)
            .and_then(|pos| self.values.get(pos))
            .map(String::as_str)
    }

    /// Every header name mapped to its value in this row
    pub fn as_mapping(&self) -> Result<HashMap<String, String>, FeedError> {
        if self.values.len() < self.header.width() {
            return Err(FeedError::RowShape {
                file: self.file.to_string(),
                line: self.line,
                expected: self.header.width(),
                found: self.values.len(),
            });
        }

        Ok(self
            .header
            .index
            .iter()
            .map(|(name, &pos)| (name.clone(), self.values[pos].clone()))
            .collect())
    }

    /// 1-based line number in the source file
    pub fn line(&self) -> usize {
        self.line
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Record")
            .field("file", &self.file)
            .field("line", &self.line)
            .field("values", &self.values)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(header: &str, line: &str) -> Record {
        Record::parse(line, Rc::new(Header::parse(header)), Rc::from("t.txt"), 2)
    }

    #[test]
    fn test_header_positions_are_trimmed() {
        let header = Header::parse("a, b,c");
        assert_eq!(header.position("a"), Some(0));
        assert_eq!(header.position("b"), Some(1));
        assert_eq!(header.position("c"), Some(2));
        assert_eq!(header.len(), 3);
    }

    #[test]
    fn test_duplicate_header_last_wins() {
        let header = Header::parse("a,a");
        assert_eq!(header.position("a"), Some(1));
        assert_eq!(header.len(), 1);
        assert_eq!(header.width(), 2);
    }

    #[test]
    fn test_named_access() {
        let rec = record("a, b,c", "1,2,3");
        assert_eq!(rec.get("b"), Some("2"));
        assert_eq!(rec.get("z"), None);
    }

    #[test]
    fn test_values_are_trimmed() {
        let rec = record("a,b", "  x , y ");
        assert_eq!(rec.values(), &["x".to_string(), "y".to_string()]);
    }

    #[test]
    fn test_short_row_mapping_fails() {
        let rec = record("a,b,c", "1,2");

        assert_eq!(rec.get("a"), Some("1"));
        assert_eq!(rec.get("b"), Some("2"));
        assert_eq!(rec.get("c"), None);

        let err = rec.as_mapping().unwrap_err();
        assert!(matches!(
            err,
            FeedError::RowShape {
                line: 2,
                expected: 3,
                found: 2,
                ..
            }
        ));
    }

    #[test]
    fn test_mapping_covers_header_names() {
        let rec = record("a,b,a", "1,2,3,4");
        let mapping = rec.as_mapping().unwrap();

        assert_eq!(mapping.len(), 2);
        assert_eq!(mapping["a"], "3");
        assert_eq!(mapping["b"], "2");
    }
}
