use std::collections::HashMap;
use std::fmt;

use thiserror::Error;

/// A typed field value inside an [`EntityInstance`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Null,
    Integer(i64),
    Text(String),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }
}

/// Scalar or foreign-key classification of one entity attribute
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldType {
    String,
    Integer,
    /// Stored as text; carries the referenced entity for schema derivation only
    ForeignKey(&'static EntityDef),
}

impl FieldType {
    /// Convert a raw source string. An empty string is always null.
    pub fn convert(&self, raw: &str) -> Result<Value, ConvertError> {
        if raw.is_empty() {
            return Ok(Value::Null);
        }

        match self {
            FieldType::String | FieldType::ForeignKey(_) => Ok(Value::Text(raw.to_string())),
            FieldType::Integer => raw
                .parse::<i64>()
                .map(Value::Integer)
                .map_err(|_| ConvertError {
                    field: String::new(),
                    value: raw.to_string(),
                    expected: self.type_name(),
                }),
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Integer => "integer",
            FieldType::ForeignKey(_) => "foreign key",
        }
    }
}

/// A non-empty value could not be converted to its declared type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("field '{field}': cannot convert '{value}' to {expected}")]
pub struct ConvertError {
    pub field: String,
    pub value: String,
    pub expected: &'static str,
}

/// One declared (name, type) pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldDef {
    pub name: &'static str,
    pub field_type: FieldType,
}

impl FieldDef {
    pub const fn string(name: &'static str) -> Self {
        Self {
            name,
            field_type: FieldType::String,
        }
    }

    pub const fn integer(name: &'static str) -> Self {
        Self {
            name,
            field_type: FieldType::Integer,
        }
    }

    pub const fn foreign_key(name: &'static str, target: &'static EntityDef) -> Self {
        Self {
            name,
            field_type: FieldType::ForeignKey(target),
        }
    }
}

/// Static descriptor for one feed file / table
#[derive(Debug, PartialEq)]
pub struct EntityDef {
    /// Display name of the entity kind (e.g. "Agency")
    pub name: &'static str,
    pub table_name: &'static str,
    pub fields: &'static [FieldDef],
    /// Primary key field; `None` means a surrogate integer `id` column
    pub id_field: Option<&'static str>,
}

impl EntityDef {
    /// Name of the source file inside a feed
    pub fn file_name(&self) -> String {
        format!("{}.txt", self.table_name)
    }

    /// Column a foreign key pointing at this entity references
    pub fn key_column(&self) -> &'static str {
        self.id_field.unwrap_or(SURROGATE_ID)
    }

    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Build an instance from raw field values.
    ///
    /// Declared fields missing from `values` are left out of the instance entirely,
    /// while present-but-empty values become [`Value::Null`]. Keys that are not
    /// declared are ignored.
    pub fn construct(
        &'static self,
        values: &HashMap<String, String>,
    ) -> Result<EntityInstance, ConvertError> {
        let mut instance = EntityInstance::new(self);

        for field in self.fields {
            let Some(raw) = values.get(field.name) else {
                continue;
            };

            let value = field.field_type.convert(raw).map_err(|e| ConvertError {
                field: field.name.to_string(),
                ..e
            })?;
            instance.values.push((field.name, value));
        }

        Ok(instance)
    }
}

impl fmt::Display for EntityDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Name of the synthesized primary key column
pub const SURROGATE_ID: &str = "id";

/// A constructed record: declared fields in declaration order
#[derive(Debug, Clone, PartialEq)]
pub struct EntityInstance {
    pub entity: &'static EntityDef,
    values: Vec<(&'static str, Value)>,
}

impl EntityInstance {
    fn new(entity: &'static EntityDef) -> Self {
        Self {
            entity,
            values: Vec::with_capacity(entity.fields.len()),
        }
    }

    /// `None` when the field was absent from the source, `Some(Value::Null)` when empty
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values
            .iter()
            .find(|(field, _)| *field == name)
            .map(|(_, value)| value)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn fields(&self) -> impl Iterator<Item = (&'static str, &Value)> + '_ {
        self.values.iter().map(|(name, value)| (*name, value))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
