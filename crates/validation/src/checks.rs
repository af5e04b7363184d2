use crate::error::{FieldError, FieldErrorKind, ValidationErrors};
use std::fmt::Display;

/// Range and cross-field rules applied to already-typed values.
///
/// Like [`crate::FieldReader`], every failing rule is recorded and reported together.
#[derive(Debug, Default)]
pub struct Checks {
    errors: ValidationErrors,
}

impl Checks {
    pub fn new() -> Self {
        Self::default()
    }

    fn out_of_range(&mut self, field: &str, message: String) {
        self.errors
            .push(FieldError::new(field, FieldErrorKind::OutOfRange, message));
    }

    /// Value must be strictly greater than zero.
    pub fn positive<T: PartialOrd + Default>(&mut self, field: &str, value: T) -> &mut Self {
        if !(value > T::default()) {
            self.out_of_range(field, "must be greater than 0".to_string());
        }
        self
    }

    /// Value must be zero or greater.
    pub fn non_negative<T: PartialOrd + Default>(&mut self, field: &str, value: T) -> &mut Self {
        if !(value >= T::default()) {
            self.out_of_range(field, "must not be negative".to_string());
        }
        self
    }

    /// Value must lie in `min..=max`.
    pub fn between<T: PartialOrd + Display>(
        &mut self,
        field: &str,
        value: T,
        min: T,
        max: T,
    ) -> &mut Self {
        if !(value >= min && value <= max) {
            self.out_of_range(field, format!("must be between {min} and {max}"));
        }
        self
    }

    /// Value must not exceed `max`.
    pub fn at_most<T: PartialOrd + Display>(&mut self, field: &str, value: T, max: T) -> &mut Self {
        if !(value <= max) {
            self.out_of_range(field, format!("must be at most {max}"));
        }
        self
    }

    /// A list must have at least `min` entries.
    pub fn min_len<T>(&mut self, field: &str, values: &[T], min: usize) -> &mut Self {
        if values.len() < min {
            self.out_of_range(field, format!("needs at least {min} value(s)"));
        }
        self
    }

    /// A rule relating two or more fields. The error is attached to `field`.
    pub fn ensure(&mut self, condition: bool, field: &str, message: &str) -> &mut Self {
        if !condition {
            self.errors
                .push(FieldError::new(field, FieldErrorKind::CrossField, message));
        }
        self
    }

    pub fn finish(self) -> Result<(), ValidationErrors> {
        self.errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn passing_rules_produce_no_errors() {
        let mut checks = Checks::new();
        checks
            .positive("cost", dec!(100))
            .non_negative("salvage", dec!(0))
            .between("life", 10u32, 1, 100)
            .ensure(dec!(0) < dec!(100), "salvage", "must be below cost");
        assert!(checks.finish().is_ok());
    }

    #[test]
    fn failing_rules_are_all_reported() {
        let mut checks = Checks::new();
        checks
            .positive("cost", dec!(0))
            .non_negative("salvage", dec!(-1))
            .between("life", 0u32, 1, 100)
            .ensure(false, "salvage", "salvage value must be less than cost");
        let errors = checks.finish().unwrap_err();
        assert_eq!(errors.len(), 4);
        assert_eq!(errors.errors()[3].kind, FieldErrorKind::CrossField);
    }

    #[test]
    fn nan_is_never_positive() {
        let mut checks = Checks::new();
        checks.positive("height", f64::NAN);
        assert!(checks.finish().is_err());
    }
}
