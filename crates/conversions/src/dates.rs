use crate::error::ConversionError;
use chrono::{Datelike, Months, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use validation::{FieldReader, FromForm, Validate, ValidationErrors};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateDiffParams {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Validate for DateDiffParams {
    fn validate(&self) -> Result<(), ValidationErrors> {
        // Any two parseable dates form a range; reversed ranges are allowed.
        Ok(())
    }
}

impl FromForm for DateDiffParams {
    fn read(reader: &mut FieldReader<'_>) -> Self {
        Self {
            start: reader.date("start"),
            end: reader.date("end"),
        }
    }
}

/// Calendar distance between two dates.
///
/// All fields but `total_days` are magnitudes; `reversed` is set when the end
/// date precedes the start date and `total_days` is then negative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateSpan {
    pub years: u32,
    pub months: u32,
    pub days: u32,
    pub total_days: i64,
    pub weeks: u32,
    pub remaining_days: u32,
    /// Monday to Friday days in the half-open range `[earlier, later)`.
    pub weekdays: u32,
    pub reversed: bool,
}

pub fn date_difference(params: &DateDiffParams) -> Result<DateSpan, ConversionError> {
    let reversed = params.end < params.start;
    let (earlier, later) = if reversed {
        (params.end, params.start)
    } else {
        (params.start, params.end)
    };

    let (whole_months, anchor) = whole_months_between(earlier, later)?;
    let days = (later - anchor).num_days();
    let magnitude = (later - earlier).num_days();

    let span = DateSpan {
        years: whole_months / 12,
        months: whole_months % 12,
        days: days as u32,
        total_days: if reversed { -magnitude } else { magnitude },
        weeks: (magnitude / 7) as u32,
        remaining_days: (magnitude % 7) as u32,
        weekdays: weekdays_between(earlier, magnitude),
        reversed,
    };
    tracing::debug!(start = %params.start, end = %params.end, total_days = span.total_days, "Date difference computed");
    Ok(span)
}

/// Largest month count `m` with `earlier + m months <= later`, and that date.
/// Adding months clamps to the end of shorter months (Jan 31 + 1 month = Feb 28/29).
fn whole_months_between(earlier: NaiveDate, later: NaiveDate) -> Result<(u32, NaiveDate), ConversionError> {
    let estimate = (later.year() - earlier.year()) * 12 + later.month() as i32 - earlier.month() as i32;
    let mut months = estimate.max(0) as u32;
    let mut anchor = add_months(earlier, months)?;
    if anchor > later {
        months = months.saturating_sub(1);
        anchor = add_months(earlier, months)?;
    }
    Ok((months, anchor))
}

fn add_months(date: NaiveDate, months: u32) -> Result<NaiveDate, ConversionError> {
    date.checked_add_months(Months::new(months))
        .ok_or(ConversionError::DateOutOfRange)
}

fn weekdays_between(start: NaiveDate, days: i64) -> u32 {
    let full_weeks = days / 7;
    let first = start.weekday().num_days_from_monday() as i64;
    let partial = (0..days % 7)
        .filter(|offset| {
            let weekday = (first + offset) % 7;
            weekday < Weekday::Sat.num_days_from_monday() as i64
        })
        .count() as i64;
    (full_weeks * 5 + partial) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use validation::FormInput;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn diff(start: &str, end: &str) -> DateSpan {
        date_difference(&DateDiffParams {
            start: date(start),
            end: date(end),
        })
        .unwrap()
    }

    #[test]
    fn years_months_days() {
        let span = diff("2020-03-15", "2024-07-20");
        assert_eq!((span.years, span.months, span.days), (4, 4, 5));
        assert!(!span.reversed);
    }

    #[test]
    fn month_end_is_clamped() {
        let span = diff("2024-01-31", "2024-02-29");
        assert_eq!((span.years, span.months, span.days), (0, 1, 0));
        assert_eq!(span.total_days, 29);

        let span = diff("2023-01-31", "2023-03-01");
        assert_eq!((span.months, span.days), (1, 1));
    }

    #[test]
    fn weeks_and_weekdays() {
        // Monday to the Wednesday of the following week.
        let span = diff("2024-01-01", "2024-01-10");
        assert_eq!((span.weeks, span.remaining_days), (1, 2));
        assert_eq!(span.weekdays, 7);

        // Saturday to Monday spans no working day.
        assert_eq!(diff("2024-01-06", "2024-01-08").weekdays, 0);
    }

    #[test]
    fn reversed_range_is_negative() {
        let span = diff("2024-07-20", "2020-03-15");
        assert!(span.reversed);
        assert_eq!((span.years, span.months, span.days), (4, 4, 5));
        assert_eq!(span.total_days, -diff("2020-03-15", "2024-07-20").total_days);
    }

    #[test]
    fn same_day_is_zero() {
        let span = diff("2024-05-05", "2024-05-05");
        assert_eq!(span.total_days, 0);
        assert_eq!(span.weekdays, 0);
    }

    #[test]
    fn malformed_date_is_a_type_error() {
        let form = FormInput::new()
            .with("start", "2024-13-01")
            .with("end", "2024-01-01");
        let errors = DateDiffParams::from_form(&form).unwrap_err();
        assert_eq!(errors.for_field("start").count(), 1);
    }
}
