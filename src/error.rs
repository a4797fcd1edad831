//! Error types for feed reading and schema derivation
use std::path::PathBuf;

use thiserror::Error;

/// An error that can occur while reading a feed
#[derive(Error, Debug)]
pub enum FeedError {
    /// The named file is not present in the feed
    #[error("could not find file {file} in the feed")]
    NotFound { file: String },
    /// The given path is neither a directory nor a file
    #[error("could not read feed: {} is neither a file nor a directory", .0.display())]
    NotFileNorDirectory(PathBuf),
    /// The file has no header line
    #[error("{file} is empty; a header line is expected")]
    MissingHeader { file: String },
    /// The bytes of a line are not valid UTF-8
    #[error("{file}:{line}: invalid UTF-8")]
    Decode { file: String, line: usize },
    /// A data row has fewer values than the header declares
    #[error("{file}:{line}: expected {expected} values, found {found}")]
    RowShape {
        file: String,
        line: usize,
        expected: usize,
        found: usize,
    },
    /// A non-empty value cannot be converted to its declared type
    #[error("{file}:{line}: field '{field}': cannot convert '{value}' to {expected}")]
    TypeConversion {
        file: String,
        line: usize,
        field: String,
        value: String,
        expected: &'static str,
    },
    /// Impossible to read a file
    #[error("impossible to read '{file}'")]
    Io {
        file: String,
        #[source]
        source: std::io::Error,
    },
    /// Error while opening or reading the zip archive
    #[error(transparent)]
    Zip(#[from] zip::result::ZipError),
}

/// An error raised while deriving or filtering the schema
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SchemaError {
    /// A foreign key targets a table that was not built earlier in the sequence
    #[error("{table}.{column} references {target}, which must be declared first")]
    UnresolvedReference {
        table: String,
        column: String,
        target: String,
    },
    #[error("table {0} is declared more than once")]
    DuplicateTable(String),
    /// The declared id field is not one of the entity's fields
    #[error("{table}: id field {field} is not declared")]
    UnknownIdField { table: String, field: String },
    /// Two columns of one table share a name (including the surrogate `id`)
    #[error("{table}: column {column} is declared more than once")]
    DuplicateColumn { table: String, column: String },
    #[error("unknown table: {0}")]
    UnknownTable(String),
    #[error("circular dependency detected at: {0}")]
    CircularDependency(String),
}
