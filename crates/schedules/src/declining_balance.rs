use core_types::{Direction, Money, PeriodRecord, Rate, ScheduleInput};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Multiplier of the straight-line rate used by double-declining balance.
pub const DOUBLE_DECLINING_FACTOR: Decimal = dec!(2);

/// The per-period rate for a declining-balance method: `factor / periods`.
///
/// Returns zero for zero periods rather than dividing by zero.
pub fn declining_rate(factor: Decimal, periods: u32) -> Rate {
    if periods == 0 {
        return Decimal::ZERO;
    }
    factor / Decimal::from(periods)
}

/// Generates a declining-balance schedule for the given input.
///
/// Each period charges `beginning * rate`, clamped so the value never drops
/// below `floor_value`. Once the floor is reached every later period charges
/// zero. The final period always closes the schedule at the floor exactly.
///
/// The generator is total: zero periods yields an empty schedule, and an
/// initial value at or below the floor yields all-zero charges.
pub fn declining_balance_schedule(input: &ScheduleInput) -> Vec<PeriodRecord> {
    declining_schedule(input, false)
}

/// Double-declining balance: `rate = 2 / period_count`.
pub fn double_declining_schedule(
    initial_value: Money,
    period_count: u32,
    floor_value: Money,
) -> Vec<PeriodRecord> {
    let input = ScheduleInput {
        initial_value,
        rate: declining_rate(DOUBLE_DECLINING_FACTOR, period_count),
        period_count,
        floor_value,
    };
    declining_balance_schedule(&input)
}

/// Declining balance with an optional switch to straight line.
///
/// With `switch_to_straight_line`, each period charges the larger of the
/// declining charge and the straight-line charge over the remaining life.
pub fn declining_schedule(input: &ScheduleInput, switch_to_straight_line: bool) -> Vec<PeriodRecord> {
    let rate = input.rate;
    let periods = input.period_count;
    let floor = input.floor_value;

    let records = build_decline(input.initial_value, floor, periods, |period, beginning| {
        // An overflowing product can only mean "more than the remaining room".
        let declining = beginning
            .checked_mul(rate)
            .unwrap_or(Decimal::MAX)
            .max(Decimal::ZERO);
        if switch_to_straight_line {
            let remaining_periods = Decimal::from(periods - period + 1);
            let straight_line = (beginning - floor).max(Decimal::ZERO) / remaining_periods;
            declining.max(straight_line)
        } else {
            declining
        }
    });

    tracing::debug!(
        initial = %input.initial_value,
        %rate,
        periods,
        %floor,
        switch_to_straight_line,
        "Generated declining-balance schedule"
    );
    records
}

/// Walks `periods` periods from `initial` toward `floor`.
///
/// `charge` proposes the change for a period given its number and beginning
/// value. Proposals are clamped to the room left above the floor, and the
/// last period takes whatever room remains.
pub(crate) fn build_decline<F>(initial: Money, floor: Money, periods: u32, mut charge: F) -> Vec<PeriodRecord>
where
    F: FnMut(u32, Money) -> Money,
{
    let mut records = Vec::with_capacity(periods as usize);
    let mut beginning = initial;

    for period in 1..=periods {
        let room = (beginning - floor).max(Decimal::ZERO);
        let change = if period == periods {
            room
        } else {
            let proposed = charge(period, beginning).max(Decimal::ZERO);
            if proposed > room {
                tracing::trace!(period, %proposed, %room, "Charge clamped to floor");
                room
            } else {
                proposed
            }
        };

        let record = PeriodRecord::new(period, beginning, change, Direction::Decline);
        beginning = record.ending_value;
        records.push(record);
    }

    records
}
