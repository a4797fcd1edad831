//! Storage collaborators that receive constructed entities

mod memory;
pub mod schema_gen;
mod sqlite;

use anyhow::Result;

use crate::schema::EntityInstance;

pub use memory::MemoryStorage;
pub use schema_gen::{generate_create_table, generate_indexes};
pub use sqlite::{SqliteOptions, SqliteStorage};

/// Destination for loaded entities.
///
/// `add` stages one instance; `commit` durably persists everything staged so
/// far in one step. The loader never commits per row.
pub trait Storage {
    fn add(&mut self, instance: &EntityInstance) -> Result<()>;
    fn commit(&mut self) -> Result<()>;
}
