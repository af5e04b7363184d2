use crate::declining_balance::{DOUBLE_DECLINING_FACTOR, build_decline, declining_rate, declining_schedule};
use core_types::{Money, PeriodRecord, ScheduleInput};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use validation::{Checks, FieldReader, FromForm, UnknownChoice, Validate, ValidationErrors};

/// Largest cost accepted by the form. Keeps every intermediate product well
/// inside `Decimal` range.
pub const MAX_COST: Decimal = dec!(1000000000000000);

/// Longest useful life, in periods, accepted by the form.
pub const MAX_USEFUL_LIFE: u32 = 100;

/// How depreciation is spread over the useful life.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DepreciationMethod {
    /// Equal charge every period.
    StraightLine,
    /// Declining balance at `2 / life`.
    #[default]
    DoubleDeclining,
    /// Declining balance at `factor / life`.
    DecliningBalance,
    /// Charges weighted by remaining life: `life, life-1, ..., 1` over their sum.
    SumOfYearsDigits,
}

impl FromStr for DepreciationMethod {
    type Err = UnknownChoice;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace(['-', ' '], "_").as_str() {
            "straight_line" | "sl" => Ok(Self::StraightLine),
            "double_declining" | "ddb" => Ok(Self::DoubleDeclining),
            "declining_balance" | "db" => Ok(Self::DecliningBalance),
            "sum_of_years_digits" | "syd" => Ok(Self::SumOfYearsDigits),
            _ => Err(UnknownChoice::new(s, "straight-line, ddb, declining-balance, syd")),
        }
    }
}

/// Form values for the depreciation calculator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepreciationParams {
    pub cost: Money,
    pub salvage_value: Money,
    pub useful_life: u32,
    pub method: DepreciationMethod,
    /// Only used by `DecliningBalance`.
    pub factor: Decimal,
    /// Only used by the declining methods.
    pub switch_to_straight_line: bool,
}

impl Validate for DepreciationParams {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut checks = Checks::new();
        checks
            .positive("cost", self.cost)
            .at_most("cost", self.cost, MAX_COST)
            .non_negative("salvage_value", self.salvage_value)
            .between("useful_life", self.useful_life, 1, MAX_USEFUL_LIFE)
            .ensure(
                self.salvage_value < self.cost,
                "salvage_value",
                "cost must exceed salvage value",
            );
        if self.method == DepreciationMethod::DecliningBalance {
            checks.positive("factor", self.factor);
        }
        checks.finish()
    }
}

impl FromForm for DepreciationParams {
    fn read(reader: &mut FieldReader<'_>) -> Self {
        Self {
            cost: reader.decimal("cost"),
            salvage_value: reader.decimal_or("salvage_value", Decimal::ZERO),
            useful_life: reader.count("useful_life"),
            method: reader.choice_or("method", DepreciationMethod::default()),
            factor: reader.decimal_or("factor", DOUBLE_DECLINING_FACTOR),
            switch_to_straight_line: reader.flag_or("switch_to_straight_line", false),
        }
    }
}

/// A depreciation schedule together with its headline figures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepreciationSchedule {
    pub method: DepreciationMethod,
    pub records: Vec<PeriodRecord>,
    pub total_depreciation: Money,
}

/// Builds the schedule for validated params.
pub fn depreciation_schedule(params: &DepreciationParams) -> DepreciationSchedule {
    let life = params.useful_life;
    let cost = params.cost;
    let salvage = params.salvage_value;
    let depreciable = cost - salvage;

    let records = match params.method {
        DepreciationMethod::StraightLine => {
            let charge = if life == 0 { Decimal::ZERO } else { depreciable / Decimal::from(life) };
            build_decline(cost, salvage, life, |_, _| charge)
        }
        DepreciationMethod::DoubleDeclining | DepreciationMethod::DecliningBalance => {
            let factor = match params.method {
                DepreciationMethod::DoubleDeclining => DOUBLE_DECLINING_FACTOR,
                _ => params.factor,
            };
            let input = ScheduleInput {
                initial_value: cost,
                rate: declining_rate(factor, life),
                period_count: life,
                floor_value: salvage,
            };
            declining_schedule(&input, params.switch_to_straight_line)
        }
        DepreciationMethod::SumOfYearsDigits => {
            let digits = Decimal::from(u64::from(life) * (u64::from(life) + 1) / 2);
            build_decline(cost, salvage, life, |period, _| {
                depreciable * Decimal::from(life - period + 1) / digits
            })
        }
    };

    let total_depreciation = records.iter().map(|r| r.periodic_change).sum();
    tracing::debug!(method = ?params.method, life, %total_depreciation, "Depreciation schedule built");

    DepreciationSchedule {
        method: params.method,
        records,
        total_depreciation,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validation::{FieldErrorKind, FormInput};

    fn params(method: DepreciationMethod) -> DepreciationParams {
        DepreciationParams {
            cost: dec!(10000),
            salvage_value: dec!(1000),
            useful_life: 5,
            method,
            factor: dec!(1.5),
            switch_to_straight_line: false,
        }
    }

    #[test]
    fn straight_line_charges_evenly() {
        let schedule = depreciation_schedule(&params(DepreciationMethod::StraightLine));
        assert!(schedule.records.iter().all(|r| r.periodic_change == dec!(1800)));
        assert_eq!(schedule.total_depreciation, dec!(9000));
        assert_eq!(schedule.records[4].ending_value, dec!(1000));
    }

    #[test]
    fn sum_of_years_digits_weights_early_years() {
        let schedule = depreciation_schedule(&params(DepreciationMethod::SumOfYearsDigits));
        // 9000 * 5/15, 4/15, 3/15, 2/15, 1/15
        let changes: Vec<_> = schedule.records.iter().map(|r| r.periodic_change).collect();
        assert_eq!(changes, vec![dec!(3000), dec!(2400), dec!(1800), dec!(1200), dec!(600)]);
    }

    #[test]
    fn declining_balance_uses_custom_factor() {
        let schedule = depreciation_schedule(&params(DepreciationMethod::DecliningBalance));
        // 1.5 / 5 = 30% of 10000
        assert_eq!(schedule.records[0].periodic_change, dec!(3000));
        assert_eq!(schedule.total_depreciation, dec!(9000));
    }

    #[test]
    fn double_declining_ignores_factor() {
        let schedule = depreciation_schedule(&params(DepreciationMethod::DoubleDeclining));
        assert_eq!(schedule.records[0].periodic_change, dec!(4000));
    }

    #[test]
    fn form_with_salvage_equal_to_cost_is_rejected() {
        let form = FormInput::new()
            .with("cost", "5000")
            .with("salvage_value", "5000")
            .with("useful_life", "5");
        let errors = DepreciationParams::from_form(&form).unwrap_err();
        let error = errors.for_field("salvage_value").next().unwrap();
        assert_eq!(error.kind, FieldErrorKind::CrossField);
        assert_eq!(error.message, "cost must exceed salvage value");
    }

    #[test]
    fn form_rejects_non_positive_cost_and_life() {
        let form = FormInput::new()
            .with("cost", "-1")
            .with("useful_life", "0");
        let errors = DepreciationParams::from_form(&form).unwrap_err();
        assert_eq!(errors.for_field("cost").count(), 1);
        assert_eq!(errors.for_field("useful_life").count(), 1);
    }

    #[test]
    fn form_reads_method_aliases() {
        let form = FormInput::new()
            .with("cost", "100000")
            .with("salvage_value", "10000")
            .with("useful_life", "10")
            .with("method", "Sum-Of-Years-Digits");
        let params = DepreciationParams::from_form(&form).unwrap();
        assert_eq!(params.method, DepreciationMethod::SumOfYearsDigits);
    }

    #[test]
    fn unknown_method_is_a_type_error() {
        let form = FormInput::new()
            .with("cost", "100")
            .with("useful_life", "2")
            .with("method", "macrs");
        let errors = DepreciationParams::from_form(&form).unwrap_err();
        assert_eq!(errors.errors()[0].kind, FieldErrorKind::InvalidType);
    }
}
