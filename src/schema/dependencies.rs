use super::entity::{EntityDef, FieldType};
use super::tables::{get_table, ALL_TABLES};
use crate::error::SchemaError;
use log::warn;
use std::collections::{HashMap, HashSet, VecDeque};

impl EntityDef {
    /// Tables this entity references through foreign keys
    pub fn dependencies(&self) -> HashSet<&'static str> {
        self.fields
            .iter()
            .filter_map(|f| match f.field_type {
                FieldType::ForeignKey(target) => Some(target.table_name),
                _ => None,
            })
            .collect()
    }
}

/// Resolves table dependencies for filtering
pub struct DependencyResolver {
    /// Map of table name -> tables it depends on
    deps: HashMap<&'static str, HashSet<&'static str>>,
}

impl DependencyResolver {
    pub fn new() -> Self {
        let deps = ALL_TABLES
            .iter()
            .map(|table| (table.table_name, table.dependencies()))
            .collect();

        Self { deps }
    }

    /// Given a set of requested tables, resolve all required dependencies
    /// Returns tables in dependency order (parents before children)
    pub fn resolve_includes(
        &self,
        requested: &[&str],
    ) -> Result<Vec<&'static EntityDef>, SchemaError> {
        let mut included: HashSet<&str> = HashSet::new();
        let mut queue: VecDeque<&str> = requested.iter().copied().collect();

        while let Some(table_name) = queue.pop_front() {
            if included.contains(table_name) {
                continue;
            }

            if get_table(table_name).is_none() {
                return Err(SchemaError::UnknownTable(table_name.to_string()));
            }

            included.insert(table_name);

            if let Some(table_deps) = self.deps.get(table_name) {
                for dep in table_deps {
                    if !included.contains(dep) {
                        queue.push_back(dep);
                    }
                }
            }
        }

        self.topological_sort(&included)
    }

    /// Given a set of tables to exclude, return remaining tables in order
    pub fn resolve_excludes(
        &self,
        excluded: &[&str],
    ) -> Result<Vec<&'static EntityDef>, SchemaError> {
        for name in excluded {
            if get_table(name).is_none() {
                return Err(SchemaError::UnknownTable(name.to_string()));
            }
        }

        // Dropping a parent drops everything that references it, transitively
        let mut dropped: HashSet<&str> = excluded.iter().copied().collect();
        loop {
            let before = dropped.len();
            for table in ALL_TABLES {
                if table.dependencies().iter().any(|dep| dropped.contains(dep)) {
                    dropped.insert(table.table_name);
                }
            }
            if dropped.len() == before {
                break;
            }
        }

        for table in ALL_TABLES {
            let name = table.table_name;
            if dropped.contains(name) && !excluded.contains(&name) {
                warn!("{} is excluded because a table it references is excluded", name);
            }
        }

        let included: HashSet<&str> = ALL_TABLES
            .iter()
            .map(|t| t.table_name)
            .filter(|name| !dropped.contains(name))
            .collect();

        self.topological_sort(&included)
    }

    /// Return all tables in dependency order
    pub fn all_tables_ordered(&self) -> Vec<&'static EntityDef> {
        ALL_TABLES.to_vec()
    }

    /// Topological sort of tables by dependencies, ties broken by registry order
    fn topological_sort(
        &self,
        included: &HashSet<&str>,
    ) -> Result<Vec<&'static EntityDef>, SchemaError> {
        let mut result = Vec::new();
        let mut visited: HashSet<&str> = HashSet::new();
        let mut temp_visited: HashSet<&str> = HashSet::new();

        for table in ALL_TABLES {
            if included.contains(table.table_name) && !visited.contains(table.table_name) {
                self.visit(
                    table.table_name,
                    included,
                    &mut visited,
                    &mut temp_visited,
                    &mut result,
                )?;
            }
        }

        Ok(result)
    }

    fn visit<'a>(
        &self,
        name: &'a str,
        included: &HashSet<&'a str>,
        visited: &mut HashSet<&'a str>,
        temp_visited: &mut HashSet<&'a str>,
        result: &mut Vec<&'static EntityDef>,
    ) -> Result<(), SchemaError> {
        if temp_visited.contains(name) {
            return Err(SchemaError::CircularDependency(name.to_string()));
        }
        if visited.contains(name) {
            return Ok(());
        }

        temp_visited.insert(name);

        if let Some(deps) = self.deps.get(name) {
            let mut deps: Vec<&'static str> = deps.iter().copied().collect();
            deps.sort_unstable();
            for dep in deps {
                if dep != name && included.contains(dep) {
                    self.visit(dep, included, visited, temp_visited, result)?;
                }
            }
        }

        temp_visited.remove(name);
        visited.insert(name);

        if let Some(table) = get_table(name) {
            result.push(table);
        }

        Ok(())
    }
}

impl Default for DependencyResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(tables: &[&EntityDef]) -> Vec<&'static str> {
        tables.iter().map(|t| t.table_name).collect()
    }

    #[test]
    fn test_resolve_stop_times_includes_parents() {
        let resolver = DependencyResolver::new();
        let tables = resolver.resolve_includes(&["stop_times"]).unwrap();

        assert_eq!(
            names(&tables),
            vec!["agency", "calendar", "routes", "trips", "stop_times"]
        );
    }

    #[test]
    fn test_exclude_drops_children() {
        let resolver = DependencyResolver::new();
        let tables = resolver.resolve_excludes(&["routes"]).unwrap();

        assert_eq!(
            names(&tables),
            vec!["agency", "calendar", "calendar_dates", "fare_attributes"]
        );
    }

    #[test]
    fn test_all_tables_already_ordered() {
        let resolver = DependencyResolver::new();
        let all: HashSet<&str> = ALL_TABLES.iter().map(|t| t.table_name).collect();
        let sorted = resolver.topological_sort(&all).unwrap();
        assert_eq!(names(&sorted), names(&resolver.all_tables_ordered()));
    }

    #[test]
    fn test_unknown_table_error() {
        let resolver = DependencyResolver::new();
        let result = resolver.resolve_includes(&["nonexistent"]);
        assert!(matches!(result, Err(SchemaError::UnknownTable(_))));
        assert!(resolver.resolve_excludes(&["stops"]).is_err());
    }
}
