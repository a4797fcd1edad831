use log::debug;

use super::entity::{EntityDef, FieldType, SURROGATE_ID};
use super::types::{ColumnDef, ColumnType, ForeignKeyDef, Schema, TableDef};
use crate::error::SchemaError;

/// Derive relational table definitions from entity definitions.
///
/// Tables come out in the order given. Every foreign-key target must appear
/// earlier in `entities`; the builder never reorders.
pub fn build(entities: &[&'static EntityDef]) -> Result<Schema, SchemaError> {
    let mut tables: Vec<TableDef> = Vec::with_capacity(entities.len());

    for entity in entities {
        if tables.iter().any(|t| t.name == entity.table_name) {
            return Err(SchemaError::DuplicateTable(entity.table_name.to_string()));
        }

        let table = build_table(entity, &tables)?;
        debug!(
            "derived table {} ({} columns, {} foreign keys)",
            table.name,
            table.columns.len(),
            table.foreign_keys.len()
        );
        tables.push(table);
    }

    Ok(Schema { tables })
}

/// Reject entities whose table could not have exactly one primary key column
fn validate(entity: &EntityDef) -> Result<(), SchemaError> {
    for (idx, field) in entity.fields.iter().enumerate() {
        let repeated = entity.fields[..idx].iter().any(|f| f.name == field.name);
        let shadows_surrogate = entity.id_field.is_none() && field.name == SURROGATE_ID;
        if repeated || shadows_surrogate {
            return Err(SchemaError::DuplicateColumn {
                table: entity.table_name.to_string(),
                column: field.name.to_string(),
            });
        }
    }

    if let Some(id) = entity.id_field {
        if entity.field(id).is_none() {
            return Err(SchemaError::UnknownIdField {
                table: entity.table_name.to_string(),
                field: id.to_string(),
            });
        }
    }

    Ok(())
}

fn build_table(entity: &EntityDef, built: &[TableDef]) -> Result<TableDef, SchemaError> {
    validate(entity)?;

    let mut columns = Vec::with_capacity(entity.fields.len() + 1);
    let mut foreign_keys = Vec::new();

    for field in entity.fields {
        let column = match field.field_type {
            FieldType::String => ColumnDef::new(field.name, ColumnType::Text),
            FieldType::Integer => ColumnDef::new(field.name, ColumnType::Integer),
            FieldType::ForeignKey(target) => {
                if !built.iter().any(|t| t.name == target.table_name) {
                    return Err(SchemaError::UnresolvedReference {
                        table: entity.table_name.to_string(),
                        column: field.name.to_string(),
                        target: target.table_name.to_string(),
                    });
                }

                foreign_keys.push(ForeignKeyDef {
                    column: field.name,
                    references_table: target.table_name,
                    references_column: target.key_column(),
                });
                ColumnDef::new(field.name, ColumnType::Text)
            }
        };

        if entity.id_field == Some(field.name) {
            columns.push(column.primary());
        } else {
            columns.push(column);
        }
    }

    if entity.id_field.is_none() {
        columns.push(ColumnDef::new(SURROGATE_ID, ColumnType::Integer).primary());
    }

    Ok(TableDef {
        name: entity.table_name,
        columns,
        foreign_keys,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::entity::FieldDef;
    use crate::schema::tables::{ALL_TABLES, CALENDAR_DATES, FARE_RULES, ROUTES, TRIPS};

    #[test]
    fn test_one_column_per_field_and_single_primary_key() {
        let schema = build(ALL_TABLES).unwrap();

        for (entity, table) in ALL_TABLES.iter().zip(&schema.tables) {
            let expected = entity.fields.len() + usize::from(entity.id_field.is_none());
            assert_eq!(table.columns.len(), expected, "{}", table.name);
            assert_eq!(table.columns.iter().filter(|c| c.primary_key).count(), 1);

            let surrogates = table.columns.iter().filter(|c| c.name == "id").count();
            assert_eq!(surrogates, usize::from(entity.id_field.is_none()));
        }
    }

    #[test]
    fn test_primary_key_selection() {
        let schema = build(ALL_TABLES).unwrap();

        let routes = schema.table("routes").unwrap();
        assert_eq!(routes.primary_key().unwrap().name, "route_id");
        assert_eq!(routes.primary_key().unwrap().column_type, ColumnType::Text);

        let stop_times = schema.table("stop_times").unwrap();
        let pk = stop_times.primary_key().unwrap();
        assert_eq!(pk.name, "id");
        assert_eq!(pk.column_type, ColumnType::Integer);
        assert_eq!(stop_times.columns.last().unwrap().name, "id");
    }

    #[test]
    fn test_foreign_key_targets() {
        let schema = build(ALL_TABLES).unwrap();

        let mut targets: Vec<String> = Vec::new();
        for table in &schema.tables {
            for fk in &table.foreign_keys {
                targets.push(format!("{}.{} -> {}", table.name, fk.column, fk.target()));
            }
        }

        assert_eq!(
            targets,
            vec![
                "routes.agency_id -> agency.agency_id",
                "trips.route_id -> routes.route_id",
                "trips.service_id -> calendar.service_id",
                "stop_times.trip_id -> trips.trip_id",
                "calendar_dates.service_id -> calendar.service_id",
                "fare_rules.fare_id -> fare_attributes.fare_id",
                "fare_rules.route_id -> routes.route_id",
            ]
        );
    }

    #[test]
    fn test_foreign_key_columns_are_text() {
        let schema = build(ALL_TABLES).unwrap();
        for table in [&TRIPS, &FARE_RULES, &CALENDAR_DATES] {
            let def = schema.table(table.table_name).unwrap();
            for fk in &def.foreign_keys {
                assert_eq!(def.column(fk.column).unwrap().column_type, ColumnType::Text);
            }
        }
    }

    #[test]
    fn test_integer_fields_map_to_integer_columns() {
        let schema = build(ALL_TABLES).unwrap();
        let routes = schema.table(ROUTES.table_name).unwrap();
        assert_eq!(routes.column("route_type").unwrap().column_type, ColumnType::Integer);
        assert_eq!(routes.column("route_url").unwrap().column_type, ColumnType::Text);
    }

    #[test]
    fn test_deterministic_output() {
        assert_eq!(build(ALL_TABLES).unwrap(), build(ALL_TABLES).unwrap());
    }

    #[test]
    fn test_surrogate_key_target() {
        static LOG: EntityDef = EntityDef {
            name: "Log",
            table_name: "logs",
            fields: &[FieldDef::string("message")],
            id_field: None,
        };
        static LOG_TAG: EntityDef = EntityDef {
            name: "LogTag",
            table_name: "log_tags",
            fields: &[FieldDef::foreign_key("log", &LOG), FieldDef::string("tag")],
            id_field: Some("tag"),
        };

        let schema = build(&[&LOG, &LOG_TAG]).unwrap();
        let fk = &schema.table("log_tags").unwrap().foreign_keys[0];
        assert_eq!(fk.target(), "logs.id");
    }

    #[test]
    fn test_reference_before_declaration_is_rejected() {
        let err = build(&[&TRIPS]).unwrap_err();
        assert!(matches!(err, SchemaError::UnresolvedReference { .. }));
    }

    #[test]
    fn test_duplicate_table_is_rejected() {
        let agency = &crate::schema::tables::AGENCY;
        let err = build(&[agency, agency]).unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateTable(name) if name == "agency"));
    }

    #[test]
    fn test_unknown_id_field_is_rejected() {
        static BADGE: EntityDef = EntityDef {
            name: "Badge",
            table_name: "badges",
            fields: &[FieldDef::string("label")],
            id_field: Some("badge_id"),
        };

        let err = build(&[&BADGE]).unwrap_err();
        assert_eq!(
            err,
            SchemaError::UnknownIdField {
                table: "badges".to_string(),
                field: "badge_id".to_string(),
            }
        );
    }

    #[test]
    fn test_field_named_like_surrogate_is_rejected() {
        static TICKET: EntityDef = EntityDef {
            name: "Ticket",
            table_name: "tickets",
            fields: &[FieldDef::string("id"), FieldDef::string("zone")],
            id_field: None,
        };

        let err = build(&[&TICKET]).unwrap_err();
        assert_eq!(
            err,
            SchemaError::DuplicateColumn {
                table: "tickets".to_string(),
                column: "id".to_string(),
            }
        );
    }

    #[test]
    fn test_repeated_field_is_rejected() {
        static ZONE: EntityDef = EntityDef {
            name: "Zone",
            table_name: "zones",
            fields: &[
                FieldDef::string("zone_id"),
                FieldDef::string("name"),
                FieldDef::integer("name"),
            ],
            id_field: Some("zone_id"),
        };

        let err = build(&[&ZONE]).unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateColumn { column, .. } if column == "name"));
    }

    #[test]
    fn test_field_named_id_can_be_the_primary_key() {
        static STATION: EntityDef = EntityDef {
            name: "Station",
            table_name: "stations",
            fields: &[FieldDef::string("id"), FieldDef::string("name")],
            id_field: Some("id"),
        };

        let schema = build(&[&STATION]).unwrap();
        let table = schema.table("stations").unwrap();
        assert_eq!(table.columns.len(), 2);
        assert_eq!(table.primary_key().unwrap().name, "id");
    }
}
