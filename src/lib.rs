pub mod cli;
pub mod download;
pub mod error;
pub mod feed;
pub mod filter;
pub mod loader;
pub mod parser;
pub mod schema;
pub mod ui;
pub mod writer;

pub use cli::{Cli, Commands};
pub use error::{FeedError, SchemaError};
pub use loader::{load, load_path, LoadSummary};
pub use ui::{Phase, ProgressUi, SilentUi, Ui};
