use serde::Serialize;
use std::collections::BTreeMap;

/// Raw, untyped values from a submitted form, keyed by field name.
///
/// Values are kept as text exactly as entered; typing happens in
/// [`crate::FieldReader`] so that wrong-type input becomes a field error
/// instead of a parse failure somewhere deeper.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormInput {
    fields: BTreeMap<String, String>,
}

impl FormInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, field: &str, value: impl Into<String>) -> Self {
        self.insert(field, value);
        self
    }

    pub fn insert(&mut self, field: &str, value: impl Into<String>) {
        self.fields.insert(field.to_string(), value.into());
    }

    /// Inserts the value only when present. Handy for optional CLI flags.
    pub fn insert_opt(&mut self, field: &str, value: Option<impl Into<String>>) {
        if let Some(value) = value {
            self.insert(field, value);
        }
    }

    /// Returns the trimmed value, treating blank input as absent.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields
            .get(field)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormInput {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
