//! Frontmatter field renaming and type coercion

use chrono::{DateTime, SecondsFormat};
use serde_yaml::Value;
use tracing::debug;

use super::Stage;
use crate::config::{FieldType, FrontmatterRule};
use crate::constants as C;
use crate::error::{ExportError, Result};
use crate::note::Note;

/// Applies the configured rename rules, in order, to every note
#[derive(Debug, Clone, Default)]
pub struct MetadataTransform {
    rules: Vec<FrontmatterRule>,
}

impl MetadataTransform {
    pub fn new(rules: Vec<FrontmatterRule>) -> Self {
        Self { rules }
    }
}

impl Stage for MetadataTransform {
    fn name(&self) -> &'static str {
        "metadata-transform"
    }

    fn transform(&self, mut note: Note) -> Result<Note> {
        for rule in &self.rules {
            let key = Value::String(rule.field.clone());
            let Some(value) = note.frontmatter.remove(&key) else {
                continue;
            };

            let value = coerce(&rule.field, &rule.field_type, value)?;
            debug!(field = %rule.field, replace = %rule.replace, "renamed frontmatter field");
            note.frontmatter.insert(Value::String(rule.replace.clone()), value);
        }

        Ok(note)
    }
}

/// Re-type a value according to its rule
pub fn coerce(field: &str, field_type: &FieldType, value: Value) -> Result<Value> {
    match field_type {
        FieldType::Tags | FieldType::Links => slash_sequence(field, value),
        FieldType::Timestamp => epoch_millis_to_rfc3339(field, value),
        FieldType::Other(_) => Ok(value),
    }
}

fn slash_sequence(field: &str, value: Value) -> Result<Value> {
    let items = match value {
        Value::Sequence(items) => items,
        other => return Err(type_error(field, "sequence of strings", &other)),
    };

    items
        .into_iter()
        .map(|item| match item {
            Value::String(s) => Ok(Value::String(
                s.replace(C::HIERARCHY_SEPARATOR, &C::PATH_SEPARATOR.to_string()),
            )),
            other => Err(type_error(field, "sequence of strings", &other)),
        })
        .collect::<Result<Vec<_>>>()
        .map(Value::Sequence)
}

fn epoch_millis_to_rfc3339(field: &str, value: Value) -> Result<Value> {
    let millis = value
        .as_i64()
        .ok_or_else(|| type_error(field, "integer epoch milliseconds", &value))?;

    let timestamp = DateTime::from_timestamp_millis(millis).ok_or_else(|| ExportError::Type {
        field: field.to_string(),
        expected: "epoch milliseconds within the supported date range",
        found: "out of range integer",
    })?;

    Ok(Value::String(timestamp.to_rfc3339_opts(SecondsFormat::Secs, true)))
}

fn type_error(field: &str, expected: &'static str, found: &Value) -> ExportError {
    ExportError::Type {
        field: field.to_string(),
        expected,
        found: value_kind(found),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Sequence(_) => "sequence",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged value",
    }
}
