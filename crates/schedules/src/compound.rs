use crate::error::ScheduleError;
use core_types::{Direction, Money, PeriodRecord, Rate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use validation::{Checks, FieldReader, FromForm, UnknownChoice, Validate, ValidationErrors};

/// Longest horizon, in years, accepted by the form.
pub const MAX_YEARS: u32 = 100;

/// How often interest is credited.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompoundingFrequency {
    Annually,
    SemiAnnually,
    Quarterly,
    #[default]
    Monthly,
    Daily,
}

impl CompoundingFrequency {
    pub fn periods_per_year(&self) -> u32 {
        match self {
            CompoundingFrequency::Annually => 1,
            CompoundingFrequency::SemiAnnually => 2,
            CompoundingFrequency::Quarterly => 4,
            CompoundingFrequency::Monthly => 12,
            CompoundingFrequency::Daily => 365,
        }
    }
}

impl FromStr for CompoundingFrequency {
    type Err = UnknownChoice;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace(['-', ' ', '_'], "").as_str() {
            "annually" | "yearly" | "1" => Ok(Self::Annually),
            "semiannually" | "2" => Ok(Self::SemiAnnually),
            "quarterly" | "4" => Ok(Self::Quarterly),
            "monthly" | "12" => Ok(Self::Monthly),
            "daily" | "365" => Ok(Self::Daily),
            _ => Err(UnknownChoice::new(
                s,
                "annually, semi-annually, quarterly, monthly, daily",
            )),
        }
    }
}

/// Form values for the compound-interest calculator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompoundParams {
    pub principal: Money,
    /// Nominal annual rate as a fraction.
    pub annual_rate: Rate,
    pub years: u32,
    pub frequency: CompoundingFrequency,
    /// Deposited at the end of every compounding period.
    pub contribution: Money,
}

impl Validate for CompoundParams {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut checks = Checks::new();
        checks
            .non_negative("principal", self.principal)
            .non_negative("contribution", self.contribution)
            .between("annual_rate", self.annual_rate, Decimal::ZERO, Decimal::ONE)
            .between("years", self.years, 1, MAX_YEARS)
            .ensure(
                self.principal > Decimal::ZERO || self.contribution > Decimal::ZERO,
                "principal",
                "either a starting principal or a contribution is required",
            );
        checks.finish()
    }
}

impl FromForm for CompoundParams {
    fn read(reader: &mut FieldReader<'_>) -> Self {
        Self {
            principal: reader.decimal("principal"),
            annual_rate: reader.percent("annual_rate"),
            years: reader.count("years"),
            frequency: reader.choice_or("frequency", CompoundingFrequency::default()),
            contribution: reader.decimal_or("contribution", Decimal::ZERO),
        }
    }
}

/// Year-by-year growth with totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrowthSchedule {
    /// One growth record per year; the change is interest plus contributions.
    pub records: Vec<PeriodRecord>,
    pub final_balance: Money,
    pub total_contributions: Money,
    pub total_interest: Money,
}

/// Compounds the balance period by period and reports one record per year.
///
/// Values are kept at full precision; rounding happens only when rendered.
/// Fails with [`ScheduleError::Overflow`] if the balance leaves `Decimal` range.
pub fn growth_schedule(params: &CompoundParams) -> Result<GrowthSchedule, ScheduleError> {
    let per_year = params.frequency.periods_per_year();
    let periodic_rate = params.annual_rate / Decimal::from(per_year);
    let overflow = || ScheduleError::Overflow(format!("balance after {} years", params.years));

    let mut records = Vec::with_capacity(params.years as usize);
    let mut balance = params.principal;
    let mut total_contributions = Decimal::ZERO;

    for year in 1..=params.years {
        let beginning = balance;
        for _ in 0..per_year {
            let interest = balance.checked_mul(periodic_rate).ok_or_else(overflow)?;
            balance = balance
                .checked_add(interest)
                .and_then(|b| b.checked_add(params.contribution))
                .ok_or_else(overflow)?;
            total_contributions += params.contribution;
        }
        records.push(PeriodRecord::new(year, beginning, balance - beginning, Direction::Growth));
    }

    let total_interest = balance - params.principal - total_contributions;
    tracing::debug!(
        years = params.years,
        frequency = ?params.frequency,
        final_balance = %balance,
        "Growth schedule built"
    );

    Ok(GrowthSchedule {
        records,
        final_balance: balance,
        total_contributions,
        total_interest,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::verify_continuity;
    use rust_decimal_macros::dec;

    fn params(frequency: CompoundingFrequency, contribution: Money) -> CompoundParams {
        CompoundParams {
            principal: dec!(1000),
            annual_rate: dec!(0.10),
            years: 3,
            frequency,
            contribution,
        }
    }

    #[test]
    fn annual_compounding_matches_closed_form() {
        let schedule = growth_schedule(&params(CompoundingFrequency::Annually, dec!(0))).unwrap();
        assert_eq!(schedule.records[0].ending_value, dec!(1100));
        assert_eq!(schedule.records[1].ending_value, dec!(1210));
        assert_eq!(schedule.final_balance, dec!(1331));
        assert_eq!(schedule.total_interest, dec!(331));
        assert!(verify_continuity(&schedule.records).is_ok());
    }

    #[test]
    fn contributions_are_added_each_period() {
        let schedule = growth_schedule(&params(CompoundingFrequency::Annually, dec!(100))).unwrap();
        // 1000 -> 1200 -> 1420 -> 1662
        assert_eq!(schedule.final_balance, dec!(1662));
        assert_eq!(schedule.total_contributions, dec!(300));
        assert_eq!(schedule.total_interest, dec!(362));
    }

    #[test]
    fn more_frequent_compounding_earns_more() {
        let annual = growth_schedule(&params(CompoundingFrequency::Annually, dec!(0))).unwrap();
        let monthly = growth_schedule(&params(CompoundingFrequency::Monthly, dec!(0))).unwrap();
        let daily = growth_schedule(&params(CompoundingFrequency::Daily, dec!(0))).unwrap();
        assert!(monthly.final_balance > annual.final_balance);
        assert!(daily.final_balance > monthly.final_balance);
        assert!(monthly.records.iter().all(|r| r.direction == Direction::Growth));
    }

    #[test]
    fn zero_principal_and_contribution_is_rejected() {
        let mut p = params(CompoundingFrequency::Monthly, dec!(0));
        p.principal = Decimal::ZERO;
        assert!(p.validate().is_err());
    }

    #[test]
    fn frequency_parses_common_spellings() {
        assert_eq!("Semi-Annually".parse::<CompoundingFrequency>().unwrap(), CompoundingFrequency::SemiAnnually);
        assert_eq!("12".parse::<CompoundingFrequency>().unwrap(), CompoundingFrequency::Monthly);
        assert!("hourly".parse::<CompoundingFrequency>().is_err());
    }
}
