use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "gtfs-to-sqlite")]
#[command(version, about = "Load a GTFS transit feed into a SQLite database")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Table selection shared by the loading commands
#[derive(Args, Debug, Clone, Default)]
pub struct TableFilter {
    /// Only include these tables and the tables they reference (comma-separated)
    #[arg(short, long, value_delimiter = ',')]
    pub include: Option<Vec<String>>,

    /// Exclude these tables and the tables that reference them (comma-separated)
    #[arg(short, long, value_delimiter = ',')]
    pub exclude: Option<Vec<String>>,

    /// Reject rows whose foreign keys point at missing parents
    #[arg(long)]
    pub enforce_foreign_keys: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load a feed directory or zip archive into SQLite
    Load {
        /// Directory of .txt files or a zip archive
        feed: PathBuf,

        /// Output SQLite database path
        output_db: PathBuf,

        #[command(flatten)]
        filter: TableFilter,
    },

    /// Download (if needed) a zipped feed and load it
    Sync {
        /// URL of the zipped feed
        url: String,

        /// Output SQLite database path
        output_db: PathBuf,

        #[command(flatten)]
        filter: TableFilter,

        /// Force re-download even if cached
        #[arg(short, long)]
        force: bool,

        /// Custom cache directory
        #[arg(short, long)]
        cache_dir: Option<PathBuf>,
    },

    /// Download a zipped feed into the cache
    Fetch {
        /// URL of the zipped feed
        url: String,

        /// Output directory
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Force re-download even if cached
        #[arg(short, long)]
        force: bool,
    },

    /// List all table names in load order
    ListTables,

    /// Print the derived database schema
    Schema {
        /// Print as JSON instead of SQL
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
