use crate::schema::{DependencyResolver, EntityDef};
use anyhow::{bail, Result};
use log::info;

/// Resolves which tables to load based on include/exclude filters
pub fn resolve_tables(
    include: Option<Vec<String>>,
    exclude: Option<Vec<String>>,
) -> Result<Vec<&'static EntityDef>> {
    let resolver = DependencyResolver::new();

    match (include, exclude) {
        (Some(_), Some(_)) => {
            bail!("Cannot use both --include and --exclude at the same time");
        }
        (Some(include_list), None) => {
            let refs: Vec<&str> = include_list.iter().map(|s| s.as_str()).collect();
            info!("Resolving dependencies for: {:?}", refs);
            let tables = resolver.resolve_includes(&refs)?;

            info!("Including {} tables:", tables.len());
            for t in &tables {
                info!("  - {}", t.table_name);
            }

            Ok(tables)
        }
        (None, Some(exclude_list)) => {
            let refs: Vec<&str> = exclude_list.iter().map(|s| s.as_str()).collect();
            info!("Excluding tables: {:?}", refs);
            let tables = resolver.resolve_excludes(&refs)?;

            info!("Including {} tables (after exclusions)", tables.len());

            Ok(tables)
        }
        (None, None) => {
            let tables = resolver.all_tables_ordered();
            info!("Including all {} tables", tables.len());
            Ok(tables)
        }
    }
}
