use anyhow::Result;
use gtfs_to_sqlite::{
    cli::{Cli, Commands, TableFilter},
    download::ensure_feed_downloaded,
    filter::resolve_tables,
    loader::load_path,
    schema::{build, table_names, ALL_TABLES},
    ui::{init_logging, ProgressUi},
    writer::{generate_create_table, generate_indexes, SqliteOptions, SqliteStorage},
};
use indicatif::MultiProgress;
use log::info;
use std::path::Path;
use std::time::Instant;

fn main() -> Result<()> {
    let multi = MultiProgress::new();
    init_logging(&multi)?;
    let mut ui = ProgressUi::with_multi(multi);
    let cli = Cli::parse_args();

    match cli.command {
        Commands::Load {
            feed,
            output_db,
            filter,
        } => {
            let start = Instant::now();
            let total = convert(&feed, &output_db, filter, &mut ui)?;

            info!(
                "Created {:?} ({} records) in {:.1}s",
                output_db,
                total,
                start.elapsed().as_secs_f64()
            );
        }

        Commands::Sync {
            url,
            output_db,
            filter,
            force,
            cache_dir,
        } => {
            let start = Instant::now();
            let feed = ensure_feed_downloaded(&url, cache_dir, force, &mut ui)?;
            let total = convert(&feed, &output_db, filter, &mut ui)?;

            info!(
                "Created {:?} ({} records) from {} in {:.1}s",
                output_db,
                total,
                url,
                start.elapsed().as_secs_f64()
            );
        }

        Commands::Fetch { url, output, force } => {
            let path = ensure_feed_downloaded(&url, output, force, &mut ui)?;
            println!("{} downloaded to {:?}", url, path);
        }

        Commands::ListTables => {
            println!("Available tables:\n");
            for name in table_names() {
                println!("  {}", name);
            }
        }

        Commands::Schema { json } => {
            let schema = build(ALL_TABLES)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&schema)?);
            } else {
                for table in &schema.tables {
                    println!("{};", generate_create_table(table));
                    for index in generate_indexes(table) {
                        println!("{};", index);
                    }
                    println!();
                }
            }
        }
    }

    Ok(())
}

/// Derive the schema for the selected tables and load the feed into a new database
fn convert(
    feed: &Path,
    output_db: &Path,
    filter: TableFilter,
    ui: &mut ProgressUi,
) -> Result<u64> {
    let tables = resolve_tables(filter.include, filter.exclude)?;
    let schema = build(&tables)?;

    let options = SqliteOptions {
        enforce_foreign_keys: filter.enforce_foreign_keys,
    };
    let mut storage = SqliteStorage::create(output_db, &schema, &options)?;

    let summary = load_path(feed, &mut storage, &tables, ui)?;
    storage.finalize()?;

    Ok(summary.total())
}
