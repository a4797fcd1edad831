use anyhow::{Context, Result};
use log::{debug, info};
use std::path::Path;

use crate::error::FeedError;
use crate::feed::{self, FeedSource};
use crate::schema::EntityDef;
use crate::ui::{Phase, Ui};
use crate::writer::Storage;

const PROGRESS_INTERVAL: u64 = 1000;

/// Records loaded per table, in load order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadSummary {
    pub tables: Vec<(&'static str, u64)>,
}

impl LoadSummary {
    pub fn total(&self) -> u64 {
        self.tables.iter().map(|(_, count)| count).sum()
    }

    pub fn count(&self, table_name: &str) -> Option<u64> {
        self.tables
            .iter()
            .find(|(name, _)| *name == table_name)
            .map(|(_, count)| *count)
    }
}

/// Stream every entity's file from `feed` into `storage`, then commit once.
///
/// `entities` must be in dependency order. Any failure aborts the load before
/// the commit; rows already handed to storage are left to its discretion.
pub fn load(
    feed: &mut dyn FeedSource,
    storage: &mut dyn Storage,
    entities: &[&'static EntityDef],
    ui: &mut impl Ui,
) -> Result<LoadSummary> {
    ui.set_phase(Phase::Loading);
    let mut summary = LoadSummary::default();

    for entity in entities {
        let file_name = entity.file_name();
        info!("loading {} from {}", entity, file_name);

        let count = load_table(feed, storage, entity, &file_name, ui)?;
        summary.tables.push((entity.table_name, count));
    }

    debug!("commit");
    storage.commit().context("Failed to commit loaded records")?;
    ui.log(format!(
        "{} records loaded from {}",
        summary.total(),
        feed.location().display()
    ));
    ui.set_phase(Phase::Complete);

    Ok(summary)
}

fn load_table(
    feed: &mut dyn FeedSource,
    storage: &mut dyn Storage,
    entity: &'static EntityDef,
    file_name: &str,
    ui: &mut impl Ui,
) -> Result<u64> {
    let table = feed.get_table(file_name)?;
    ui.begin(entity.table_name, 0);

    let mut count: u64 = 0;
    for record in table {
        let record = record?;
        let values = record.as_mapping()?;

        let instance = entity
            .construct(&values)
            .map_err(|e| FeedError::TypeConversion {
                file: file_name.to_string(),
                line: record.line(),
                field: e.field,
                value: e.value,
                expected: e.expected,
            })?;

        storage.add(&instance).with_context(|| {
            format!("{}:{}: storage rejected record", file_name, record.line())
        })?;

        count += 1;
        if count % PROGRESS_INTERVAL == 0 {
            ui.set_progress(count);
        }
    }

    ui.set_progress(count);
    ui.finish(format!("{}: {} records", entity.table_name, count));
    Ok(count)
}

/// Open the feed at `path` (directory or zip), load it, and release it on every exit path
pub fn load_path(
    path: &Path,
    storage: &mut dyn Storage,
    entities: &[&'static EntityDef],
    ui: &mut impl Ui,
) -> Result<LoadSummary> {
    let mut feed = feed::open(path)?;
    load(feed.as_mut(), storage, entities, ui)
}
