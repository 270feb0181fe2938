//! Request parameters and response decoding for the HTTP bindings.
//!
//! Responses are line oriented: every non-blank line of the body is one JSON document,
//! optionally wrapped in an envelope object.

use crate::core::{FieldSet, Fields};
use crate::utils::error::{BindingError, Result};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Query pairs shared by every request: static parameters, then `table` and `key`.
pub fn base_params<'a>(
    static_params: &'a BTreeMap<String, String>,
    table: &'a str,
    key: &'a str,
) -> Vec<(&'a str, &'a str)> {
    let mut params: Vec<(&str, &str)> = static_params
        .iter()
        .map(|(name, value)| (name.as_str(), value.as_str()))
        .collect();
    params.push(("table", table));
    params.push(("key", key));
    params
}

/// Appends one `name=value` pair per field, sorted by name.
pub fn push_values<'a>(params: &mut Vec<(&'a str, &'a str)>, values: &'a Fields) {
    let mut sorted: Vec<_> = values.iter().collect();
    sorted.sort();
    params.extend(sorted.into_iter().map(|(name, value)| (name.as_str(), value.as_str())));
}

/// Appends one `fields=<name>` pair per requested field.
pub fn push_field_filter<'a>(params: &mut Vec<(&'a str, &'a str)>, fields: Option<&'a FieldSet>) {
    if let Some(fields) = fields {
        let mut sorted: Vec<&String> = fields.iter().collect();
        sorted.sort();
        params.extend(sorted.into_iter().map(|name| ("fields", name.as_str())));
    }
}

/// JSON body of a `post_json` write. `table` and `key` win over same-named fields.
pub fn json_payload(table: &str, key: &str, values: &Fields) -> Value {
    let mut body: Map<String, Value> = values
        .iter()
        .map(|(name, value)| (name.clone(), Value::String(value.clone())))
        .collect();
    if values.contains_key("table") || values.contains_key("key") {
        tracing::warn!("Field named 'table' or 'key' is shadowed in the JSON payload of '{}'", key);
    }
    body.insert("table".to_string(), Value::String(table.to_string()));
    body.insert("key".to_string(), Value::String(key.to_string()));
    Value::Object(body)
}

/// Parses every non-blank line, unwrapping `envelope` when set.
fn documents<'a>(
    body: &'a str,
    envelope: Option<&'a str>,
) -> impl Iterator<Item = Result<Value>> + 'a {
    body.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(move |line| {
            let document: Value = serde_json::from_str(line)?;
            unwrap_envelope(document, envelope)
        })
}

fn unwrap_envelope(document: Value, envelope: Option<&str>) -> Result<Value> {
    let Some(name) = envelope else {
        return Ok(document);
    };

    match document {
        Value::Object(mut object) => object.remove(name).ok_or_else(|| BindingError::ResponseError {
            message: format!("response object has no '{}' member", name),
        }),
        other => Err(BindingError::ResponseError {
            message: format!("expected an object wrapping '{}', got {}", name, kind_of(&other)),
        }),
    }
}

/// Converts one JSON object into a flat field map.
pub fn flat_fields(value: Value) -> Result<Fields> {
    let object = match value {
        Value::Object(object) => object,
        other => {
            return Err(BindingError::ResponseError {
                message: format!("expected a JSON object, got {}", kind_of(&other)),
            })
        }
    };

    let mut fields = Fields::with_capacity(object.len());
    for (name, value) in object {
        let text = match value {
            Value::String(s) => s,
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            other => {
                return Err(BindingError::ResponseError {
                    message: format!("field '{}' holds {}, expected a scalar", name, kind_of(&other)),
                })
            }
        };
        fields.insert(name, text);
    }
    Ok(fields)
}

/// Decodes a `read` response: every line's map is merged, later lines win.
pub fn decode_record(body: &str, envelope: Option<&str>) -> Result<Fields> {
    let mut record = Fields::new();
    for document in documents(body, envelope) {
        record.extend(flat_fields(document?)?);
    }
    Ok(record)
}

/// Decodes a remote `scan` response into at most `limit` records.
///
/// A line holding an array contributes each element, a line holding an object
/// contributes one record.
pub fn decode_records(body: &str, envelope: Option<&str>, limit: usize) -> Result<Vec<Fields>> {
    let mut records = Vec::new();
    for document in documents(body, envelope) {
        match document? {
            Value::Array(items) => {
                for item in items {
                    records.push(flat_fields(item)?);
                }
            }
            object => records.push(flat_fields(object)?),
        }
    }
    records.truncate(limit);
    Ok(records)
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
