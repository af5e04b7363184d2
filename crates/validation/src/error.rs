use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// The category of a single field-level failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldErrorKind {
    /// A required field was absent or blank.
    Missing,
    /// The raw text could not be parsed into the field's type.
    InvalidType,
    /// The value parsed but falls outside its allowed range.
    OutOfRange,
    /// The value conflicts with another field (e.g., salvage value >= cost).
    CrossField,
}

impl fmt::Display for FieldErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FieldErrorKind::Missing => "missing",
            FieldErrorKind::InvalidType => "invalid type",
            FieldErrorKind::OutOfRange => "out of range",
            FieldErrorKind::CrossField => "conflict",
        };
        f.write_str(label)
    }
}

/// A message attached to one named form field.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("{field}: {message}")]
pub struct FieldError {
    pub field: String,
    pub kind: FieldErrorKind,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &str, kind: FieldErrorKind, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            kind,
            message: message.into(),
        }
    }
}

/// Every field error found in one form submission, in the order they were detected.
#[derive(Error, Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[error("{} invalid field(s): {}", .errors.len(), summary(.errors))]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

fn summary(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorthand for a submission that failed on exactly one field.
    pub fn single(field: &str, kind: FieldErrorKind, message: impl Into<String>) -> Self {
        Self {
            errors: vec![FieldError::new(field, kind, message)],
        }
    }

    pub fn push(&mut self, error: FieldError) {
        self.errors.push(error);
    }

    pub fn extend(&mut self, other: ValidationErrors) {
        self.errors.extend(other.errors);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Returns the errors reported for one field.
    pub fn for_field<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a FieldError> + 'a {
        self.errors.iter().filter(move |e| e.field == field)
    }

    /// `Ok(())` when nothing was collected, otherwise `Err(self)`.
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

/// Returned by `FromStr` on closed option sets (methods, units, levels) so the
/// reader can report which values would have been accepted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("'{value}' is not a valid option (expected one of: {expected})")]
pub struct UnknownChoice {
    pub value: String,
    pub expected: &'static str,
}

impl UnknownChoice {
    pub fn new(value: &str, expected: &'static str) -> Self {
        Self {
            value: value.to_string(),
            expected,
        }
    }
}
