//! Properties of the declining-balance generator over arbitrary valid inputs.

use core_types::verify_continuity;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use schedules::{DepreciationParams, double_declining_schedule};
use validation::{FormInput, FromForm};

/// (initial, floor, periods) with `initial > floor >= 0`, amounts in cents.
fn valid_input() -> impl Strategy<Value = (Decimal, Decimal, u32)> {
    (1u64..=10_000_000_000, 1u32..=60).prop_flat_map(|(initial_cents, periods)| {
        (0u64..initial_cents).prop_map(move |floor_cents| {
            (
                Decimal::new(initial_cents as i64, 2),
                Decimal::new(floor_cents as i64, 2),
                periods,
            )
        })
    })
}

proptest! {
    #[test]
    fn has_exactly_period_count_records((initial, floor, periods) in valid_input()) {
        let records = double_declining_schedule(initial, periods, floor);
        prop_assert_eq!(records.len(), periods as usize);
        prop_assert_eq!(records[0].beginning_value, initial);
    }

    #[test]
    fn last_record_ends_exactly_at_floor((initial, floor, periods) in valid_input()) {
        let records = double_declining_schedule(initial, periods, floor);
        prop_assert_eq!(records.last().unwrap().ending_value, floor);
    }

    #[test]
    fn periods_are_continuous((initial, floor, periods) in valid_input()) {
        let records = double_declining_schedule(initial, periods, floor);
        prop_assert!(verify_continuity(&records).is_ok());
    }

    #[test]
    fn changes_are_non_negative_and_never_undershoot((initial, floor, periods) in valid_input()) {
        let records = double_declining_schedule(initial, periods, floor);
        for record in &records {
            prop_assert!(record.periodic_change >= Decimal::ZERO);
            prop_assert!(record.ending_value >= floor);
            prop_assert!(record.ending_value <= record.beginning_value);
        }
    }

    #[test]
    fn once_at_floor_stays_at_floor((initial, floor, periods) in valid_input()) {
        let records = double_declining_schedule(initial, periods, floor);
        if let Some(first) = records.iter().position(|r| r.ending_value == floor) {
            prop_assert!(records[first + 1..].iter().all(|r| r.periodic_change.is_zero()));
        }
    }

    #[test]
    fn generation_is_idempotent((initial, floor, periods) in valid_input()) {
        prop_assert_eq!(
            double_declining_schedule(initial, periods, floor),
            double_declining_schedule(initial, periods, floor)
        );
    }
}

#[test]
fn example_schedule_from_form() {
    let form = FormInput::new()
        .with("cost", "100000")
        .with("salvage_value", "10000")
        .with("useful_life", "10")
        .with("method", "ddb");
    let params = DepreciationParams::from_form(&form).unwrap();
    let schedule = schedules::depreciation_schedule(&params);

    let rows: Vec<_> = schedule
        .records
        .iter()
        .take(2)
        .map(|r| (r.period, r.beginning_value, r.periodic_change, r.ending_value))
        .collect();
    assert_eq!(
        rows,
        vec![
            (1, dec!(100000), dec!(20000), dec!(80000)),
            (2, dec!(80000), dec!(16000), dec!(64000)),
        ]
    );
    assert_eq!(schedule.records[9].ending_value, dec!(10000));
    assert_eq!(schedule.total_depreciation, dec!(90000));
}

#[test]
fn floor_equal_to_initial_is_rejected_by_validation() {
    let form = FormInput::new()
        .with("cost", "1000")
        .with("salvage_value", "1000")
        .with("useful_life", "5");
    assert!(DepreciationParams::from_form(&form).is_err());
}
