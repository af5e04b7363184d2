//! # Tally Form Validation
//!
//! Turns raw, text-valued form submissions into statically typed calculator
//! parameters, or into a list of field-level messages.
//!
//! Two stages, both of which collect every problem before failing:
//!
//! - [`FieldReader`] handles *missing* and *wrong type* fields.
//! - [`Checks`] handles *out of range* and *cross-field* rules on typed values.
//!
//! Calculator crates implement [`Validate`] on their params struct and
//! [`FromForm`] to read it from a [`FormInput`].

pub mod checks;
pub mod error;
pub mod form;
pub mod reader;

pub use checks::Checks;
pub use error::{FieldError, FieldErrorKind, UnknownChoice, ValidationErrors};
pub use form::FormInput;
pub use reader::{DATE_FORMAT, FieldReader};

/// Range and cross-field validation of a typed params struct.
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationErrors>;
}

/// Construction of a typed params struct from raw form input.
pub trait FromForm: Validate + Sized {
    /// Reads each field through the reader. Placeholders returned for bad
    /// fields are fine here; `from_form` discards them.
    fn read(reader: &mut FieldReader<'_>) -> Self;

    /// Parses and validates a submission. Type errors are reported first;
    /// range rules only run once every field has parsed.
    fn from_form(form: &FormInput) -> Result<Self, ValidationErrors> {
        let mut reader = FieldReader::new(form);
        let params = Self::read(&mut reader);
        reader.finish()?;
        params.validate()?;
        Ok(params)
    }
}
