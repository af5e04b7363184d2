use crate::error::FinanceError;
use core_types::{Money, Rate};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use validation::{Checks, FieldReader, FromForm, UnknownChoice, Validate, ValidationErrors};

/// Longest horizon accepted, in trading days (ten years).
pub const MAX_HORIZON_DAYS: u32 = 2520;

/// Largest portfolio value accepted by the form.
pub const MAX_PORTFOLIO_VALUE: Decimal = dec!(1000000000000);

/// One-tailed confidence levels offered by the form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfidenceLevel {
    Ninety,
    #[default]
    NinetyFive,
    NinetyNine,
}

impl ConfidenceLevel {
    /// Standard normal quantile for the level.
    pub fn z_score(&self) -> Decimal {
        match self {
            ConfidenceLevel::Ninety => dec!(1.2816),
            ConfidenceLevel::NinetyFive => dec!(1.6449),
            ConfidenceLevel::NinetyNine => dec!(2.3263),
        }
    }

    pub fn as_fraction(&self) -> Decimal {
        match self {
            ConfidenceLevel::Ninety => dec!(0.90),
            ConfidenceLevel::NinetyFive => dec!(0.95),
            ConfidenceLevel::NinetyNine => dec!(0.99),
        }
    }
}

impl FromStr for ConfidenceLevel {
    type Err = UnknownChoice;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim_end_matches('%') {
            "90" | "0.9" | "0.90" => Ok(Self::Ninety),
            "95" | "0.95" => Ok(Self::NinetyFive),
            "99" | "0.99" => Ok(Self::NinetyNine),
            _ => Err(UnknownChoice::new(s, "90, 95, 99")),
        }
    }
}

/// The estimated loss not exceeded with the given confidence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VarResult {
    pub confidence: ConfidenceLevel,
    pub horizon_days: u32,
    pub var_amount: Money,
    /// `var_amount` as a fraction of the portfolio value.
    pub var_fraction: Rate,
}

/// Form values for variance-covariance (normal) VaR.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParametricVarParams {
    pub portfolio_value: Money,
    /// Expected daily return as a fraction.
    pub mean_return: Rate,
    /// Daily standard deviation of returns as a fraction.
    pub volatility: Rate,
    pub horizon_days: u32,
    pub confidence: ConfidenceLevel,
}

impl Validate for ParametricVarParams {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut checks = Checks::new();
        checks
            .positive("portfolio_value", self.portfolio_value)
            .at_most("portfolio_value", self.portfolio_value, MAX_PORTFOLIO_VALUE)
            .between("mean_return", self.mean_return, -Decimal::ONE, Decimal::ONE)
            .positive("volatility", self.volatility)
            .at_most("volatility", self.volatility, Decimal::ONE)
            .between("horizon_days", self.horizon_days, 1, MAX_HORIZON_DAYS);
        checks.finish()
    }
}

impl FromForm for ParametricVarParams {
    fn read(reader: &mut FieldReader<'_>) -> Self {
        Self {
            portfolio_value: reader.decimal("portfolio_value"),
            mean_return: reader.decimal_or("mean_return", Decimal::ZERO) / Decimal::ONE_HUNDRED,
            volatility: reader.percent("volatility"),
            horizon_days: reader.count_or("horizon_days", 1),
            confidence: reader.choice_or("confidence", ConfidenceLevel::default()),
        }
    }
}

/// `value · (z·σ·√h − μ·h)`, floored at zero.
pub fn parametric_var(params: &ParametricVarParams) -> Result<VarResult, FinanceError> {
    let horizon = Decimal::from(params.horizon_days);
    let root_horizon = horizon
        .sqrt()
        .ok_or_else(|| FinanceError::Calculation("square root of horizon".to_string()))?;

    let z = params.confidence.z_score();
    let fraction = (z * params.volatility * root_horizon - params.mean_return * horizon).max(Decimal::ZERO);
    let var_amount = loss_amount(params.portfolio_value, fraction)?;

    tracing::debug!(confidence = ?params.confidence, %var_amount, "Parametric VaR computed");
    Ok(VarResult {
        confidence: params.confidence,
        horizon_days: params.horizon_days,
        var_amount,
        var_fraction: fraction,
    })
}

fn loss_amount(portfolio_value: Money, fraction: Rate) -> Result<Money, FinanceError> {
    portfolio_value
        .checked_mul(fraction)
        .ok_or_else(|| FinanceError::Overflow("loss amount".to_string()))
}

/// Form values for historical-simulation VaR.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoricalVarParams {
    pub portfolio_value: Money,
    /// Observed period returns as fractions.
    pub returns: Vec<Rate>,
    pub confidence: ConfidenceLevel,
}

impl Validate for HistoricalVarParams {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut checks = Checks::new();
        checks
            .positive("portfolio_value", self.portfolio_value)
            .at_most("portfolio_value", self.portfolio_value, MAX_PORTFOLIO_VALUE)
            .min_len("returns", &self.returns, 1)
            .ensure(
                self.returns.iter().all(|r| *r >= -Decimal::ONE),
                "returns",
                "a return cannot be below -100%",
            );
        checks.finish()
    }
}

impl FromForm for HistoricalVarParams {
    fn read(reader: &mut FieldReader<'_>) -> Self {
        Self {
            portfolio_value: reader.decimal("portfolio_value"),
            returns: reader
                .decimal_list("returns")
                .into_iter()
                .map(|r| r / Decimal::ONE_HUNDRED)
                .collect(),
            confidence: reader.choice_or("confidence", ConfidenceLevel::default()),
        }
    }
}

/// Loss at the `(1 − c)` empirical quantile of the observed returns, floored at zero.
///
/// The quantile is the `⌊(1 − c)·n⌋`-th worst return (0-based), so with fewer
/// than `1 / (1 − c)` observations the worst return is used.
pub fn historical_var(params: &HistoricalVarParams) -> Result<VarResult, FinanceError> {
    let mut sorted = params.returns.clone();
    sorted.sort();
    let Some(&worst) = sorted.first() else {
        return Err(FinanceError::Calculation("no returns supplied".to_string()));
    };

    let tail = Decimal::ONE - params.confidence.as_fraction();
    let index = (tail * Decimal::from(sorted.len()))
        .floor()
        .to_usize()
        .unwrap_or(0)
        .min(sorted.len() - 1);
    let quantile = sorted.get(index).copied().unwrap_or(worst);

    let fraction = (-quantile).max(Decimal::ZERO);
    let var_amount = loss_amount(params.portfolio_value, fraction)?;

    tracing::debug!(observations = sorted.len(), index, %var_amount, "Historical VaR computed");
    Ok(VarResult {
        confidence: params.confidence,
        horizon_days: 1,
        var_amount,
        var_fraction: fraction,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use validation::FormInput;

    #[test]
    fn one_day_normal_var_at_95() {
        let params = ParametricVarParams {
            portfolio_value: dec!(1000000),
            mean_return: Decimal::ZERO,
            volatility: dec!(0.02),
            horizon_days: 1,
            confidence: ConfidenceLevel::NinetyFive,
        };
        let result = parametric_var(&params).unwrap();
        assert_eq!(result.var_amount.round_dp(2), dec!(32898));
    }

    #[test]
    fn horizon_scales_with_square_root_of_time() {
        let params = ParametricVarParams {
            portfolio_value: dec!(1000000),
            mean_return: Decimal::ZERO,
            volatility: dec!(0.01),
            horizon_days: 4,
            confidence: ConfidenceLevel::NinetyNine,
        };
        let result = parametric_var(&params).unwrap();
        // 2.3263 * 0.01 * 2 = 4.6526%
        assert_eq!(result.var_amount.round_dp(2), dec!(46526));
    }

    #[test]
    fn large_positive_drift_floors_at_zero() {
        let params = ParametricVarParams {
            portfolio_value: dec!(1000),
            mean_return: dec!(0.5),
            volatility: dec!(0.01),
            horizon_days: 1,
            confidence: ConfidenceLevel::Ninety,
        };
        assert_eq!(parametric_var(&params).unwrap().var_amount, Decimal::ZERO);
    }

    #[test]
    fn historical_picks_empirical_quantile() {
        // -5%, -4%, ..., 14%: 20 observations, 5% tail -> index 1 -> -4%.
        let returns = (-5..15).map(|p| Decimal::new(p, 2)).collect();
        let params = HistoricalVarParams {
            portfolio_value: dec!(1000000),
            returns,
            confidence: ConfidenceLevel::NinetyFive,
        };
        assert_eq!(historical_var(&params).unwrap().var_amount, dec!(40000));
    }

    #[test]
    fn historical_form_reads_percent_list() {
        let form = FormInput::new()
            .with("portfolio_value", "50000")
            .with("returns", "-2.5, 1, 0.5")
            .with("confidence", "99%");
        let params = HistoricalVarParams::from_form(&form).unwrap();
        assert_eq!(params.returns[0], dec!(-0.025));
        assert_eq!(params.confidence, ConfidenceLevel::NinetyNine);
        assert_eq!(historical_var(&params).unwrap().var_amount, dec!(1250));
    }

    #[test]
    fn empty_returns_fail_validation() {
        let params = HistoricalVarParams {
            portfolio_value: dec!(100),
            returns: vec![],
            confidence: ConfidenceLevel::Ninety,
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn extreme_accepted_inputs_do_not_overflow() {
        let form = FormInput::new()
            .with("portfolio_value", "1000000000000")
            .with("mean_return", "-100")
            .with("volatility", "100")
            .with("horizon_days", "2520")
            .with("confidence", "99");
        let params = ParametricVarParams::from_form(&form).unwrap();
        let result = parametric_var(&params).unwrap();
        // 2.3263 * sqrt(2520) + 2520 is about 2636.8 portfolio values.
        assert!(result.var_fraction > dec!(2636) && result.var_fraction < dec!(2637));
        assert_eq!(result.var_amount, MAX_PORTFOLIO_VALUE * result.var_fraction);
    }

    #[test]
    fn portfolio_value_is_capped() {
        let form = FormInput::new()
            .with("portfolio_value", "10000000000000000000000000000")
            .with("volatility", "2");
        let errors = ParametricVarParams::from_form(&form).unwrap_err();
        assert_eq!(errors.for_field("portfolio_value").count(), 1);

        let params = HistoricalVarParams {
            portfolio_value: dec!(10000000000000000000000000000),
            returns: vec![dec!(-0.5)],
            confidence: ConfidenceLevel::Ninety,
        };
        assert_eq!(params.validate().unwrap_err().for_field("portfolio_value").count(), 1);
    }

    #[test]
    fn unvalidated_overflow_is_an_error() {
        let params = ParametricVarParams {
            portfolio_value: dec!(10000000000000000000000000000),
            mean_return: -Decimal::ONE,
            volatility: Decimal::ONE,
            horizon_days: MAX_HORIZON_DAYS,
            confidence: ConfidenceLevel::NinetyNine,
        };
        assert!(matches!(parametric_var(&params), Err(FinanceError::Overflow(_))));
    }
}
