use crate::enums::Direction;
use crate::error::CoreError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A currency amount. Kept as a `Decimal` so cents never drift.
pub type Money = Decimal;

/// A fractional rate, e.g. `0.2` for 20%.
pub type Rate = Decimal;

/// One row of an amortization, depreciation or growth schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodRecord {
    /// Sequential, 1-indexed.
    pub period: u32,
    pub beginning_value: Money,
    /// Always non-negative; `direction` decides whether it is added or subtracted.
    pub periodic_change: Money,
    pub ending_value: Money,
    pub direction: Direction,
}

impl PeriodRecord {
    /// Builds a record whose ending value is derived from the beginning value and change.
    pub fn new(period: u32, beginning_value: Money, periodic_change: Money, direction: Direction) -> Self {
        Self {
            period,
            beginning_value,
            periodic_change,
            ending_value: direction.apply(beginning_value, periodic_change),
            direction,
        }
    }
}

/// Immutable parameters for a declining-balance style schedule.
///
/// The generators treat these as preconditions: `initial_value > floor_value >= 0`
/// and `period_count >= 1`. Callers validate before building one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleInput {
    pub initial_value: Money,
    pub rate: Rate,
    pub period_count: u32,
    pub floor_value: Money,
}

/// Verifies that a schedule is numbered `1..=n` and that every period begins
/// where the previous one ended.
pub fn verify_continuity(records: &[PeriodRecord]) -> Result<(), CoreError> {
    for (i, record) in records.iter().enumerate() {
        if record.period as usize != i + 1 {
            return Err(CoreError::PeriodNumbering(record.period));
        }
    }

    for pair in records.windows(2) {
        if pair[0].ending_value != pair[1].beginning_value {
            return Err(CoreError::Discontinuity {
                period: pair[1].period,
                expected: pair[0].ending_value.to_string(),
                found: pair[1].beginning_value.to_string(),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn record_derives_ending_from_direction() {
        let decline = PeriodRecord::new(1, dec!(100), dec!(20), Direction::Decline);
        let growth = PeriodRecord::new(1, dec!(100), dec!(20), Direction::Growth);
        assert_eq!(decline.ending_value, dec!(80));
        assert_eq!(growth.ending_value, dec!(120));
    }

    #[test]
    fn continuity_detects_gap() {
        let records = vec![
            PeriodRecord::new(1, dec!(100), dec!(20), Direction::Decline),
            PeriodRecord::new(2, dec!(79), dec!(10), Direction::Decline),
        ];
        assert!(matches!(
            verify_continuity(&records),
            Err(CoreError::Discontinuity { period: 2, .. })
        ));
    }

    #[test]
    fn continuity_detects_bad_numbering() {
        let records = vec![PeriodRecord::new(2, dec!(100), dec!(20), Direction::Decline)];
        assert_eq!(verify_continuity(&records), Err(CoreError::PeriodNumbering(2)));
    }

    #[test]
    fn empty_schedule_is_continuous() {
        assert!(verify_continuity(&[]).is_ok());
    }
}
