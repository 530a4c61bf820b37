//! Field-level validation shared by every record kind.
//!
//! Validation is a pure function from a decoded payload to either a typed draft or a
//! [`FieldErrors`] mapping. The helpers in this module each check one rule and record a
//! human-readable reason under the field's wire name when it fails. The first reason
//! recorded for a field wins, so a decode failure is never masked by a later
//! "required" message for the same field.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Wire format of every date field.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    #[allow(clippy::expect_used)] // Literal pattern, checked by test_email_shape
    Regex::new(r"^\S+@\S+\.\S+$").expect("email pattern is valid")
});

/// Mapping of field name to the reason it was rejected.
///
/// Serializes as a plain JSON object, e.g. `{"email": "Email is not valid"}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    /// Creates an empty error mapping.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a reason for `field` unless one is already present.
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_insert_with(|| message.into());
    }

    /// Returns the recorded reason for `field`, if any.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    /// Whether `field` has a recorded reason.
    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Whether no field failed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of failed fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Converts into `Ok(value)` when empty, otherwise a validation error.
    pub fn into_result<T>(self, value: T) -> crate::errors::Result<T> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self.into())
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

/// Requires a string that is not blank. The value is returned exactly as submitted.
pub fn require_text(
    errors: &mut FieldErrors,
    field: &str,
    label: &str,
    value: Option<&str>,
) -> Option<String> {
    match value {
        Some(text) if !text.trim().is_empty() => Some(text.to_string()),
        _ => {
            errors.add(field, format!("{label} is required"));
            None
        }
    }
}

/// Requires a finite number strictly greater than zero.
pub fn require_positive(
    errors: &mut FieldErrors,
    field: &str,
    label: &str,
    value: Option<f64>,
) -> Option<f64> {
    match value {
        None => {
            errors.add(field, format!("{label} is required"));
            None
        }
        Some(number) if number.is_finite() && number > 0.0 => Some(number),
        Some(_) => {
            errors.add(field, format!("{label} must be a positive number"));
            None
        }
    }
}

/// Requires a string that parses as a calendar date.
pub fn require_date(
    errors: &mut FieldErrors,
    field: &str,
    label: &str,
    value: Option<&str>,
) -> Option<NaiveDate> {
    let text = require_text(errors, field, label, value)?;
    let date = parse_date(&text);
    if date.is_none() {
        errors.add(field, format!("{label} must be a valid date (YYYY-MM-DD)"));
    }
    date
}

/// Requires a non-blank string shaped like `local@domain.tld`.
pub fn require_email(
    errors: &mut FieldErrors,
    field: &str,
    label: &str,
    value: Option<&str>,
) -> Option<String> {
    let email = require_text(errors, field, label, value)?;
    if is_valid_email(&email) {
        Some(email)
    } else {
        errors.add(field, format!("{label} is not valid"));
        None
    }
}

/// Requires a non-blank string made of ASCII digits only, optionally of an exact length.
pub fn require_digits(
    errors: &mut FieldErrors,
    field: &str,
    label: &str,
    value: Option<&str>,
    exact_len: Option<usize>,
) -> Option<String> {
    let digits = require_text(errors, field, label, value)?;
    if !is_digits(&digits) {
        errors.add(field, format!("{label} must contain digits only"));
        return None;
    }
    match exact_len {
        Some(len) if digits.len() != len => {
            errors.add(field, format!("{label} must be {len} digits"));
            None
        }
        _ => Some(digits),
    }
}

/// Parses a canonical `YYYY-MM-DD` date.
///
/// Forms that would render back differently, such as `2030-1-1` or a full timestamp,
/// are rejected so a stored date always reads back as submitted.
#[must_use]
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text, DATE_FORMAT)
        .ok()
        .filter(|date| date.format(DATE_FORMAT).to_string() == text)
}

/// Whether `email` has the `local@domain.tld` shape.
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

/// Whether `text` is non-empty and consists of ASCII digits only.
#[must_use]
pub fn is_digits(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit())
}
