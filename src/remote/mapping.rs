//! Translation between internal record fields and the record store's
//! external field names and encodings.

use serde_json::{Map, Value};

use crate::data::{EntityData, Identity, Record};
use crate::error::GatewayError;

pub static ID_FIELD: &str = "Id";
pub static CREATED_FIELD: &str = "CreatedOn";
pub static MODIFIED_FIELD: &str = "ModifiedOn";

/// Separator of list values stored as a single string.
pub static LIST_DELIMITER: &str = ",";

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Coercion {
    /// Stored as-is.
    Plain,
    /// String-typed reference stored as an integer.
    Integer,
    /// List of strings stored as one delimited string.
    Delimited,
    /// Structured value stored as a JSON string.
    Json,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct FieldMapping {
    pub internal: &'static str,
    pub external: &'static str,
    pub coercion: Coercion,
}

impl FieldMapping {
    pub const fn plain(internal: &'static str, external: &'static str) -> FieldMapping {
        FieldMapping {
            internal,
            external,
            coercion: Coercion::Plain,
        }
    }

    pub const fn integer(internal: &'static str, external: &'static str) -> FieldMapping {
        FieldMapping {
            internal,
            external,
            coercion: Coercion::Integer,
        }
    }

    pub const fn delimited(internal: &'static str, external: &'static str) -> FieldMapping {
        FieldMapping {
            internal,
            external,
            coercion: Coercion::Delimited,
        }
    }

    pub const fn json(internal: &'static str, external: &'static str) -> FieldMapping {
        FieldMapping {
            internal,
            external,
            coercion: Coercion::Json,
        }
    }

    /// Fails with the offending text when a reference isn't an integer.
    fn to_external(&self, value: Value) -> Result<Value, String> {
        Ok(match self.coercion {
            Coercion::Plain => value,
            Coercion::Integer => match value {
                Value::String(text) if text.trim().is_empty() => Value::Null,
                Value::String(text) => match Identity::parse_reference(&text) {
                    Some(id) => Value::from(id.0),
                    None => return Err(text),
                },
                Value::Number(_) => value,
                _ => Value::Null,
            },
            Coercion::Delimited => match value {
                Value::Array(items) => Value::String(
                    items
                        .iter()
                        .filter_map(Value::as_str)
                        .collect::<Vec<_>>()
                        .join(LIST_DELIMITER),
                ),
                other => other,
            },
            Coercion::Json => Value::String(value.to_string()),
        })
    }

    fn to_internal(&self, value: Value) -> Result<Value, String> {
        Ok(match self.coercion {
            Coercion::Plain => value,
            Coercion::Integer => match value {
                Value::Number(number) => Value::String(number.to_string()),
                Value::Null => Value::String(String::new()),
                other => other,
            },
            Coercion::Delimited => match value {
                Value::String(text) => Value::Array(
                    text.split(LIST_DELIMITER)
                        .map(str::trim)
                        .filter(|it| !it.is_empty())
                        .map(|it| Value::String(it.to_string()))
                        .collect(),
                ),
                Value::Null => Value::Array(Vec::new()),
                other => other,
            },
            Coercion::Json => match value {
                Value::String(text) if text.trim().is_empty() => Value::Null,
                Value::String(text) => serde_json::from_str(&text)
                    .map_err(|e| format!("field '{}' holds invalid JSON: {}", self.external, e))?,
                other => other,
            },
        })
    }
}

/// Names of every external field of `D`, identity and stamps included.
pub fn external_fields<D: EntityData>() -> Vec<String> {
    [ID_FIELD, CREATED_FIELD, MODIFIED_FIELD]
        .into_iter()
        .chain(D::REMOTE_FIELDS.iter().map(|it| it.external))
        .map(str::to_string)
        .collect()
}

/// Encodes caller data as a record store row.
pub fn to_external<D: EntityData>(data: &D) -> Result<Map<String, Value>, GatewayError> {
    let mut internal = match serde_json::to_value(data) {
        Ok(Value::Object(map)) => map,
        Ok(_) => Map::new(),
        Err(e) => {
            return Err(GatewayError::Decode {
                kind: D::KIND,
                reason: e.to_string(),
            })
        }
    };

    let mut row = Map::new();
    for mapping in D::REMOTE_FIELDS {
        let value = internal.remove(mapping.internal).unwrap_or(Value::Null);
        let value = mapping
            .to_external(value)
            .map_err(|value| GatewayError::InvalidReference {
                kind: D::KIND,
                field: mapping.internal,
                value,
            })?;
        row.insert(mapping.external.to_string(), value);
    }
    Ok(row)
}

/// Decodes a record store row.
pub fn from_external<D: EntityData>(row: Value) -> Result<Record<D>, GatewayError> {
    let decode_error = |reason: String| GatewayError::Decode {
        kind: D::KIND,
        reason,
    };

    let mut row = match row {
        Value::Object(map) => map,
        other => return Err(decode_error(format!("expected an object, got {}", other))),
    };

    let mut internal = Map::new();
    internal.insert(
        "Id".to_string(),
        row.remove(ID_FIELD)
            .ok_or_else(|| decode_error(format!("missing '{}'", ID_FIELD)))?,
    );
    if let Some(created) = row.remove(CREATED_FIELD).filter(|it| !it.is_null()) {
        internal.insert("createdAt".to_string(), created);
    }
    if let Some(modified) = row.remove(MODIFIED_FIELD).filter(|it| !it.is_null()) {
        internal.insert("updatedAt".to_string(), modified);
    }

    for mapping in D::REMOTE_FIELDS {
        if let Some(value) = row.remove(mapping.external) {
            let value = mapping.to_internal(value).map_err(decode_error)?;
            if !value.is_null() {
                internal.insert(mapping.internal.to_string(), value);
            }
        }
    }

    serde_json::from_value(Value::Object(internal)).map_err(|e| decode_error(e.to_string()))
}
