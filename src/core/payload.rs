//! Decode step from loosely-typed JSON request bodies into typed payload fields.
//!
//! Form clients submit every input as a string and echo back whatever a previous read
//! returned, so the reader is lenient about representation (numeric strings, objects
//! carrying an `id`, a single string where a list is expected) but strict about type:
//! a value that cannot be read as the field's type is recorded as a field error.
//! Absent keys read as `None`, which lets update payloads stay partial.

use crate::core::validation::FieldErrors;
use crate::errors::Result;
use serde_json::{Map, Value};

/// Reads typed fields out of a JSON object, collecting decode errors per field.
#[derive(Debug)]
pub struct PayloadReader<'a> {
    object: &'a Map<String, Value>,
    errors: FieldErrors,
}

impl<'a> PayloadReader<'a> {
    /// Starts reading `body`, which must be a JSON object.
    pub fn new(body: &'a Value) -> Result<Self> {
        if let Some(object) = body.as_object() {
            Ok(Self {
                object,
                errors: FieldErrors::new(),
            })
        } else {
            let mut errors = FieldErrors::new();
            errors.add("body", "Request body must be a JSON object");
            Err(errors.into())
        }
    }

    /// Reads a text field. `null` reads as an empty string and numbers as their text form.
    pub fn text(&mut self, field: &str, label: &str) -> Option<String> {
        let object = self.object;
        match object.get(field)? {
            Value::Null => Some(String::new()),
            Value::String(text) => Some(text.clone()),
            Value::Number(number) => Some(number.to_string()),
            _ => {
                self.errors.add(field, format!("{label} must be text"));
                None
            }
        }
    }

    /// Reads a numeric field from a JSON number or a numeric string.
    pub fn number(&mut self, field: &str, label: &str) -> Option<f64> {
        let object = self.object;
        match object.get(field)? {
            Value::Number(number) => number.as_f64().or_else(|| {
                self.errors.add(field, format!("{label} must be a number"));
                None
            }),
            Value::Null => {
                self.errors.add(field, format!("{label} is required"));
                None
            }
            Value::String(text) if text.trim().is_empty() => {
                self.errors.add(field, format!("{label} is required"));
                None
            }
            Value::String(text) => text.trim().parse::<f64>().ok().or_else(|| {
                self.errors.add(field, format!("{label} must be a number"));
                None
            }),
            _ => {
                self.errors.add(field, format!("{label} must be a number"));
                None
            }
        }
    }

    /// Reads a list of strings. A single string is split on commas.
    pub fn text_list(&mut self, field: &str, label: &str) -> Option<Vec<String>> {
        let object = self.object;
        match object.get(field)? {
            Value::Null => Some(Vec::new()),
            Value::String(text) => Some(split_list(text)),
            Value::Array(items) => {
                let mut values = Vec::with_capacity(items.len());
                for item in items {
                    if let Value::String(text) = item {
                        values.push(text.trim().to_string());
                    } else {
                        self.errors.add(field, format!("{label} must be a list of text values"));
                        return None;
                    }
                }
                Some(values)
            }
            _ => {
                self.errors.add(field, format!("{label} must be a list of text values"));
                None
            }
        }
    }

    /// Reads an ordered set of record ids, dropping repeats but keeping first-seen order.
    ///
    /// Elements may be numbers, numeric strings, or objects carrying an `id` (as returned
    /// by a previous read of the same record).
    pub fn id_list(&mut self, field: &str, label: &str) -> Option<Vec<i64>> {
        let object = self.object;
        let items = match object.get(field)? {
            Value::Null => return Some(Vec::new()),
            Value::Array(items) => items,
            _ => {
                self.errors.add(field, format!("{label} must be a list of ids"));
                return None;
            }
        };

        let mut ids: Vec<i64> = Vec::with_capacity(items.len());
        for item in items {
            let Some(id) = read_id(item) else {
                self.errors
                    .add(field, format!("{label} contains an invalid id: {item}"));
                return None;
            };
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        Some(ids)
    }

    /// Finishes reading and returns the collected decode errors.
    #[must_use]
    pub fn finish(self) -> FieldErrors {
        self.errors
    }
}

/// Reads a record id from a number, a numeric string, or an object with an `id` key.
#[must_use]
pub fn read_id(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number.as_i64(),
        Value::String(text) => text.trim().parse().ok(),
        Value::Object(object) => object.get("id").and_then(read_id),
        _ => None,
    }
}

/// Splits a comma-separated list, trimming entries and dropping blanks.
#[must_use]
pub fn split_list(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(ToString::to_string)
        .collect()
}
