use anyhow::Result;

use super::Storage;
use crate::schema::EntityInstance;

/// Keeps entities in memory; staged instances become visible on commit
#[derive(Debug, Default)]
pub struct MemoryStorage {
    staged: Vec<EntityInstance>,
    committed: Vec<EntityInstance>,
    commits: usize,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn staged(&self) -> &[EntityInstance] {
        &self.staged
    }

    pub fn committed(&self) -> &[EntityInstance] {
        &self.committed
    }

    /// Number of times `commit` was called
    pub fn commit_count(&self) -> usize {
        self.commits
    }

    /// Committed instances of one table, in load order
    pub fn table<'a>(&'a self, table_name: &'a str) -> impl Iterator<Item = &'a EntityInstance> {
        self.committed
            .iter()
            .filter(move |i| i.entity.table_name == table_name)
    }
}

impl Storage for MemoryStorage {
    fn add(&mut self, instance: &EntityInstance) -> Result<()> {
        self.staged.push(instance.clone());
        Ok(())
    }

    fn commit(&mut self) -> Result<()> {
        self.committed.append(&mut self.staged);
        self.commits += 1;
        Ok(())
    }
}
