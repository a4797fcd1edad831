//! Entity definitions for the GTFS files this tool loads

use super::entity::{EntityDef, FieldDef};

// =============================================================================
// Independent Tables (no FK dependencies)
// =============================================================================

pub static AGENCY: EntityDef = EntityDef {
    name: "Agency",
    table_name: "agency",
    fields: &[
        FieldDef::string("agency_id"),
        FieldDef::string("agency_name"),
        FieldDef::string("agency_url"),
        FieldDef::string("agency_timezone"),
        FieldDef::string("agency_lang"),
        FieldDef::string("agency_phone"),
    ],
    id_field: Some("agency_id"),
};

pub static CALENDAR: EntityDef = EntityDef {
    name: "ServicePeriod",
    table_name: "calendar",
    fields: &[
        FieldDef::string("service_id"),
        FieldDef::integer("monday"),
        FieldDef::integer("tuesday"),
        FieldDef::integer("wednesday"),
        FieldDef::integer("thursday"),
        FieldDef::integer("friday"),
        FieldDef::integer("saturday"),
        FieldDef::integer("sunday"),
        FieldDef::string("start_date"),
        FieldDef::string("end_date"),
    ],
    id_field: Some("service_id"),
};

pub static FARE_ATTRIBUTES: EntityDef = EntityDef {
    name: "FareAttribute",
    table_name: "fare_attributes",
    fields: &[
        FieldDef::string("fare_id"),
        FieldDef::string("price"),
        FieldDef::string("currency_type"),
        FieldDef::string("payment_method"),
        FieldDef::integer("transfers"),
        FieldDef::string("transfer_duration"),
    ],
    id_field: Some("fare_id"),
};

// =============================================================================
// Dependent Tables
// =============================================================================

pub static ROUTES: EntityDef = EntityDef {
    name: "Route",
    table_name: "routes",
    fields: &[
        FieldDef::string("route_id"),
        FieldDef::foreign_key("agency_id", &AGENCY),
        FieldDef::string("route_short_name"),
        FieldDef::string("route_long_name"),
        FieldDef::string("route_desc"),
        FieldDef::integer("route_type"),
        FieldDef::string("route_url"),
        FieldDef::string("route_color"),
        FieldDef::string("route_text_color"),
    ],
    id_field: Some("route_id"),
};

pub static TRIPS: EntityDef = EntityDef {
    name: "Trip",
    table_name: "trips",
    fields: &[
        FieldDef::foreign_key("route_id", &ROUTES),
        FieldDef::foreign_key("service_id", &CALENDAR),
        FieldDef::string("trip_id"),
        FieldDef::string("trip_headsign"),
        FieldDef::string("trip_short_name"),
        FieldDef::string("direction_id"),
        FieldDef::string("block_id"),
        FieldDef::string("shape_id"),
    ],
    id_field: Some("trip_id"),
};

/// Arrival/departure times stay raw strings; GTFS allows hours past 24
pub static STOP_TIMES: EntityDef = EntityDef {
    name: "StopTime",
    table_name: "stop_times",
    fields: &[
        FieldDef::foreign_key("trip_id", &TRIPS),
        FieldDef::string("arrival_time"),
        FieldDef::string("departure_time"),
        FieldDef::string("stop_id"),
        FieldDef::integer("stop_sequence"),
        FieldDef::string("stop_headsign"),
        FieldDef::string("pickup_type"),
        FieldDef::string("drop_off_type"),
        FieldDef::string("shape_dist_traveled"),
    ],
    id_field: None,
};

pub static CALENDAR_DATES: EntityDef = EntityDef {
    name: "ServiceException",
    table_name: "calendar_dates",
    fields: &[
        FieldDef::foreign_key("service_id", &CALENDAR),
        FieldDef::string("date"),
        FieldDef::string("exception_type"),
    ],
    id_field: None,
};

pub static FARE_RULES: EntityDef = EntityDef {
    name: "FareRule",
    table_name: "fare_rules",
    fields: &[
        FieldDef::foreign_key("fare_id", &FARE_ATTRIBUTES),
        FieldDef::foreign_key("route_id", &ROUTES),
        FieldDef::string("origin_id"),
        FieldDef::string("destination_id"),
        FieldDef::string("contains_id"),
    ],
    id_field: None,
};

// =============================================================================
// Table Registry
// =============================================================================

/// All tables in dependency order (parents before children)
pub static ALL_TABLES: &[&EntityDef] = &[
    &AGENCY,
    &CALENDAR,
    &ROUTES,
    &TRIPS,
    &STOP_TIMES,
    &CALENDAR_DATES,
    &FARE_ATTRIBUTES,
    &FARE_RULES,
];

/// Get table by name
pub fn get_table(name: &str) -> Option<&'static EntityDef> {
    ALL_TABLES.iter().copied().find(|t| t.table_name == name)
}

/// Get all table names
pub fn table_names() -> Vec<&'static str> {
    ALL_TABLES.iter().map(|t| t.table_name).collect()
}
