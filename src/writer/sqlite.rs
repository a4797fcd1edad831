use anyhow::{Context, Result};
use log::{debug, info, warn};
use rusqlite::{Connection, Statement};
use std::path::Path;

use super::schema_gen::{generate_create_table, generate_indexes};
use super::Storage;
use crate::schema::{EntityInstance, Schema, Value};

/// Options for the SQLite storage
#[derive(Debug, Clone, Default)]
pub struct SqliteOptions {
    /// Turn on `PRAGMA foreign_keys`; rows with dangling references are then rejected
    pub enforce_foreign_keys: bool,
}

/// Writes entities into a fresh SQLite database inside one transaction
pub struct SqliteStorage {
    conn: Connection,
    in_transaction: bool,
    staged: u64,
}

impl SqliteStorage {
    /// Create the database at `db_path`, replacing any existing file, and
    /// create every table of `schema`
    pub fn create(db_path: &Path, schema: &Schema, options: &SqliteOptions) -> Result<Self> {
        if db_path.exists() {
            warn!("replacing existing database {}", db_path.display());
            std::fs::remove_file(db_path).context("Failed to remove existing database")?;
        }

        let conn = Connection::open(db_path).context("Failed to create database")?;
        Self::with_connection(conn, schema, options)
    }

    /// Use an already open connection (e.g. in-memory)
    pub fn with_connection(
        conn: Connection,
        schema: &Schema,
        options: &SqliteOptions,
    ) -> Result<Self> {
        let foreign_keys = if options.enforce_foreign_keys { "ON" } else { "OFF" };
        conn.execute_batch(&format!(
            "PRAGMA foreign_keys = {};
             PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA cache_size = -64000;",
            foreign_keys
        ))?;

        let storage = Self {
            conn,
            in_transaction: false,
            staged: 0,
        };
        storage.create_tables(schema)?;

        Ok(storage)
    }

    /// Create all tables for the given schema
    fn create_tables(&self, schema: &Schema) -> Result<()> {
        info!("Creating {} tables...", schema.tables.len());

        for table in &schema.tables {
            let sql = generate_create_table(table);
            self.conn
                .execute(&sql, [])
                .with_context(|| format!("Failed to create table: {}", table.name))?;

            for index_sql in generate_indexes(table) {
                self.conn
                    .execute(&index_sql, [])
                    .with_context(|| format!("Failed to create index for: {}", table.name))?;
            }
        }

        Ok(())
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Finalize the database after the load
    pub fn finalize(self) -> Result<()> {
        debug!("optimizing database");
        self.conn.execute("PRAGMA optimize;", [])?;
        Ok(())
    }
}

impl Storage for SqliteStorage {
    fn add(&mut self, instance: &EntityInstance) -> Result<()> {
        if !self.in_transaction {
            self.conn.execute_batch("BEGIN")?;
            self.in_transaction = true;
        }

        // Only present fields are inserted; absent ones and the surrogate id take column defaults
        let columns: Vec<&str> = instance.fields().map(|(name, _)| name).collect();
        let sql = if columns.is_empty() {
            format!("INSERT INTO {} DEFAULT VALUES", instance.entity.table_name)
        } else {
            let placeholders: Vec<&str> = columns.iter().map(|_| "?").collect();
            format!(
                "INSERT INTO {} ({}) VALUES ({})",
                instance.entity.table_name,
                columns.join(", "),
                placeholders.join(", ")
            )
        };

        let mut stmt = self.conn.prepare_cached(&sql)?;
        for (idx, (_, value)) in instance.fields().enumerate() {
            bind_value(&mut stmt, idx + 1, value)?;
        }
        stmt.raw_execute()
            .with_context(|| format!("Failed to insert into {}", instance.entity.table_name))?;

        self.staged += 1;
        Ok(())
    }

    fn commit(&mut self) -> Result<()> {
        if self.in_transaction {
            self.conn.execute_batch("COMMIT").context("Failed to commit")?;
            self.in_transaction = false;
        }
        info!("committed {} records", self.staged);
        self.staged = 0;
        Ok(())
    }
}

fn bind_value(stmt: &mut Statement, idx: usize, value: &Value) -> rusqlite::Result<()> {
    match value {
        Value::Null => stmt.raw_bind_parameter(idx, rusqlite::types::Null),
        Value::Integer(i) => stmt.raw_bind_parameter(idx, i),
        Value::Text(s) => stmt.raw_bind_parameter(idx, s.as_str()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{build, ALL_TABLES, AGENCY, CALENDAR_DATES};
    use std::collections::HashMap;

    fn storage() -> SqliteStorage {
        let schema = build(ALL_TABLES).unwrap();
        let conn = Connection::open_in_memory().unwrap();
        SqliteStorage::with_connection(conn, &schema, &SqliteOptions::default()).unwrap()
    }

    fn values(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_insert_and_commit() {
        let mut storage = storage();
        let agency = AGENCY
            .construct(&values(&[("agency_id", "BART"), ("agency_lang", "")]))
            .unwrap();

        storage.add(&agency).unwrap();
        storage.commit().unwrap();

        let (id, lang): (String, Option<String>) = storage
            .connection()
            .query_row("SELECT agency_id, agency_lang FROM agency", [], |row| {
                Ok((row.get(0)?, row.get(1)?))
            })
            .unwrap();
        assert_eq!(id, "BART");
        assert_eq!(lang, None);
    }

    #[test]
    fn test_surrogate_id_assigned() {
        let mut storage = storage();
        for date in ["20240101", "20240102"] {
            let exception = CALENDAR_DATES
                .construct(&values(&[
                    ("service_id", "WKDY"),
                    ("date", date),
                    ("exception_type", "2"),
                ]))
                .unwrap();
            storage.add(&exception).unwrap();
        }
        storage.commit().unwrap();

        let ids: Vec<i64> = storage
            .connection()
            .prepare("SELECT id FROM calendar_dates ORDER BY id")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<rusqlite::Result<_>>()
            .unwrap();
        assert_eq!(ids, vec![1, 2]);
    }
}
