use crate::schema::TableDef;

/// Generate CREATE TABLE SQL for a derived table
pub fn generate_create_table(table: &TableDef) -> String {
    let mut sql = format!("CREATE TABLE {} (\n", table.name);
    let mut columns = Vec::new();

    for col in &table.columns {
        let pk = if col.primary_key { " PRIMARY KEY" } else { "" };
        columns.push(format!(
            "    {} {}{}",
            col.name,
            col.column_type.sql_type(),
            pk
        ));
    }

    for fk in &table.foreign_keys {
        columns.push(format!(
            "    FOREIGN KEY ({}) REFERENCES {}({})",
            fk.column, fk.references_table, fk.references_column
        ));
    }

    sql.push_str(&columns.join(",\n"));
    sql.push_str("\n)");

    sql
}

/// Generate CREATE INDEX statements for foreign key columns
pub fn generate_indexes(table: &TableDef) -> Vec<String> {
    table
        .foreign_keys
        .iter()
        .map(|fk| {
            format!(
                "CREATE INDEX idx_{}_{} ON {}({})",
                table.name, fk.column, table.name, fk.column
            )
        })
        .collect()
}
