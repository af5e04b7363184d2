use crate::error::{FieldError, FieldErrorKind, ValidationErrors};
use crate::form::FormInput;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::fmt::Display;
use std::str::FromStr;

/// Accepted date layout for date fields.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Reads typed values out of a [`FormInput`], collecting every missing or
/// malformed field instead of stopping at the first one.
///
/// Accessors always return a value. When a field fails, a neutral placeholder
/// (zero, empty list, the type's default) is returned and an error recorded;
/// [`FieldReader::finish`] then fails, so placeholders never reach a calculation.
pub struct FieldReader<'a> {
    form: &'a FormInput,
    errors: ValidationErrors,
}

impl<'a> FieldReader<'a> {
    pub fn new(form: &'a FormInput) -> Self {
        Self {
            form,
            errors: ValidationErrors::new(),
        }
    }

    fn raw(&self, field: &str) -> Option<&'a str> {
        self.form.get(field)
    }

    fn missing(&mut self, field: &str) {
        self.errors
            .push(FieldError::new(field, FieldErrorKind::Missing, "is required"));
    }

    fn invalid(&mut self, field: &str, message: impl Into<String>) {
        self.errors
            .push(FieldError::new(field, FieldErrorKind::InvalidType, message));
    }

    /// A required decimal amount. Accepts an optional leading `$` and `,` grouping.
    pub fn decimal(&mut self, field: &str) -> Decimal {
        match self.raw(field) {
            Some(raw) => self.parse_decimal(field, raw),
            None => {
                self.missing(field);
                Decimal::ZERO
            }
        }
    }

    /// An optional decimal amount with a fallback.
    pub fn decimal_or(&mut self, field: &str, default: Decimal) -> Decimal {
        match self.raw(field) {
            Some(raw) => self.parse_decimal(field, raw),
            None => default,
        }
    }

    /// A required percentage entered as e.g. `7.5` and returned as the fraction `0.075`.
    pub fn percent(&mut self, field: &str) -> Decimal {
        self.decimal(field) / Decimal::ONE_HUNDRED
    }

    fn parse_decimal(&mut self, field: &str, raw: &str) -> Decimal {
        let cleaned: String = raw
            .trim_start_matches('$')
            .chars()
            .filter(|c| *c != ',' && *c != '_')
            .collect();
        match Decimal::from_str(&cleaned).or_else(|_| Decimal::from_scientific(&cleaned)) {
            Ok(value) => value,
            Err(_) => {
                self.invalid(field, format!("'{raw}' is not a number"));
                Decimal::ZERO
            }
        }
    }

    /// A required real-valued measurement.
    pub fn number(&mut self, field: &str) -> f64 {
        match self.raw(field) {
            Some(raw) => self.parse_number(field, raw),
            None => {
                self.missing(field);
                0.0
            }
        }
    }

    /// An optional real-valued measurement with a fallback.
    pub fn number_or(&mut self, field: &str, default: f64) -> f64 {
        match self.raw(field) {
            Some(raw) => self.parse_number(field, raw),
            None => default,
        }
    }

    fn parse_number(&mut self, field: &str, raw: &str) -> f64 {
        match raw.replace(',', "").parse::<f64>() {
            Ok(value) if value.is_finite() => value,
            _ => {
                self.invalid(field, format!("'{raw}' is not a number"));
                0.0
            }
        }
    }

    /// A required whole, non-negative count (periods, months, steps).
    pub fn count(&mut self, field: &str) -> u32 {
        match self.raw(field) {
            Some(raw) => self.parse_count(field, raw),
            None => {
                self.missing(field);
                0
            }
        }
    }

    /// An optional whole count with a fallback.
    pub fn count_or(&mut self, field: &str, default: u32) -> u32 {
        match self.raw(field) {
            Some(raw) => self.parse_count(field, raw),
            None => default,
        }
    }

    fn parse_count(&mut self, field: &str, raw: &str) -> u32 {
        match raw.parse::<u32>() {
            Ok(value) => value,
            Err(_) => {
                self.invalid(field, format!("'{raw}' is not a whole number"));
                0
            }
        }
    }

    /// A required selection from a closed set of options.
    pub fn choice<T>(&mut self, field: &str) -> T
    where
        T: FromStr + Default,
        T::Err: Display,
    {
        match self.raw(field) {
            Some(raw) => self.parse_choice(field, raw),
            None => {
                self.missing(field);
                T::default()
            }
        }
    }

    /// An optional selection with a fallback.
    pub fn choice_or<T>(&mut self, field: &str, default: T) -> T
    where
        T: FromStr + Default,
        T::Err: Display,
    {
        match self.raw(field) {
            Some(raw) => self.parse_choice(field, raw),
            None => default,
        }
    }

    fn parse_choice<T>(&mut self, field: &str, raw: &str) -> T
    where
        T: FromStr + Default,
        T::Err: Display,
    {
        match raw.parse::<T>() {
            Ok(value) => value,
            Err(e) => {
                self.invalid(field, e.to_string());
                T::default()
            }
        }
    }

    /// An optional yes/no flag. Accepts true/false, yes/no, 1/0, on/off.
    pub fn flag_or(&mut self, field: &str, default: bool) -> bool {
        match self.raw(field) {
            Some(raw) => match raw.to_ascii_lowercase().as_str() {
                "true" | "yes" | "1" | "on" => true,
                "false" | "no" | "0" | "off" => false,
                _ => {
                    self.invalid(field, format!("'{raw}' is not yes or no"));
                    default
                }
            },
            None => default,
        }
    }

    /// A required calendar date in `YYYY-MM-DD` form.
    pub fn date(&mut self, field: &str) -> NaiveDate {
        match self.raw(field) {
            Some(raw) => match NaiveDate::parse_from_str(raw, DATE_FORMAT) {
                Ok(date) => date,
                Err(_) => {
                    self.invalid(field, format!("'{raw}' is not a date (expected YYYY-MM-DD)"));
                    NaiveDate::default()
                }
            },
            None => {
                self.missing(field);
                NaiveDate::default()
            }
        }
    }

    /// A required comma- or whitespace-separated list of decimals.
    pub fn decimal_list(&mut self, field: &str) -> Vec<Decimal> {
        let Some(raw) = self.raw(field) else {
            self.missing(field);
            return Vec::new();
        };
        let mut values = Vec::new();
        for item in split_list(raw) {
            match Decimal::from_str(item).or_else(|_| Decimal::from_scientific(item)) {
                Ok(value) => values.push(value),
                Err(_) => {
                    self.invalid(field, format!("list item '{item}' is not a number"));
                    return Vec::new();
                }
            }
        }
        values
    }

    /// A required comma- or whitespace-separated list of measurements.
    pub fn number_list(&mut self, field: &str) -> Vec<f64> {
        let Some(raw) = self.raw(field) else {
            self.missing(field);
            return Vec::new();
        };
        let mut values = Vec::new();
        for item in split_list(raw) {
            match item.parse::<f64>() {
                Ok(value) if value.is_finite() => values.push(value),
                _ => {
                    self.invalid(field, format!("list item '{item}' is not a number"));
                    return Vec::new();
                }
            }
        }
        values
    }

    /// Fails with every collected error, if any.
    pub fn finish(self) -> Result<(), ValidationErrors> {
        if !self.errors.is_empty() {
            tracing::debug!(errors = self.errors.len(), "Form input rejected");
        }
        self.errors.into_result()
    }
}

fn split_list(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(|c: char| c == ',' || c == ';' || c.is_whitespace())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn reads_currency_text_as_decimal() {
        let form = FormInput::new().with("cost", "$100,000.50");
        let mut reader = FieldReader::new(&form);
        assert_eq!(reader.decimal("cost"), dec!(100000.50));
        assert!(reader.finish().is_ok());
    }

    #[test]
    fn collects_missing_and_invalid_fields_together() {
        let form = FormInput::new().with("life", "ten").with("rate", "");
        let mut reader = FieldReader::new(&form);
        reader.decimal("cost");
        reader.count("life");
        reader.decimal("rate");
        let errors = reader.finish().unwrap_err();

        let kinds: Vec<_> = errors.errors().iter().map(|e| (e.field.as_str(), e.kind)).collect();
        assert_eq!(
            kinds,
            vec![
                ("cost", FieldErrorKind::Missing),
                ("life", FieldErrorKind::InvalidType),
                ("rate", FieldErrorKind::Missing),
            ]
        );
    }

    #[test]
    fn fractional_count_is_a_type_error() {
        let form = FormInput::new().with("months", "12.5");
        let mut reader = FieldReader::new(&form);
        assert_eq!(reader.count("months"), 0);
        assert_eq!(reader.finish().unwrap_err().errors()[0].kind, FieldErrorKind::InvalidType);
    }

    #[test]
    fn optional_fields_fall_back() {
        let form = FormInput::new();
        let mut reader = FieldReader::new(&form);
        assert_eq!(reader.decimal_or("contribution", dec!(0)), dec!(0));
        assert_eq!(reader.count_or("steps", 100), 100);
        assert!(!reader.flag_or("switch", false));
        assert!(reader.finish().is_ok());
    }

    #[test]
    fn percent_is_returned_as_fraction() {
        let form = FormInput::new().with("apr", "19.99");
        let mut reader = FieldReader::new(&form);
        assert_eq!(reader.percent("apr"), dec!(0.1999));
    }

    #[test]
    fn parses_lists_and_dates() {
        let form = FormInput::new()
            .with("returns", "-0.01, 0.02 0.005")
            .with("start", "2024-02-29");
        let mut reader = FieldReader::new(&form);
        assert_eq!(reader.decimal_list("returns"), vec![dec!(-0.01), dec!(0.02), dec!(0.005)]);
        assert_eq!(reader.date("start"), NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
        assert!(reader.finish().is_ok());
    }

    #[test]
    fn bad_date_is_reported() {
        let form = FormInput::new().with("start", "2023-02-30");
        let mut reader = FieldReader::new(&form);
        reader.date("start");
        let errors = reader.finish().unwrap_err();
        assert_eq!(errors.for_field("start").count(), 1);
    }
}
