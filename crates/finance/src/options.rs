use crate::error::FinanceError;
use core_types::{Money, Rate};
use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use validation::{Checks, FieldReader, FromForm, UnknownChoice, Validate, ValidationErrors};

/// Most tree steps accepted by the form.
pub const MAX_STEPS: u32 = 1000;

/// Smallest annualized volatility accepted by the form (0.01%).
pub const MIN_VOLATILITY: Decimal = dec!(0.0001);

/// Largest spot or strike accepted by the form.
pub const MAX_PRICE: Decimal = dec!(1000000000000);

/// Widest log-price range `σ·√(T·n)` the lattice may span. Edge prices of
/// `spot·e^±30` stay well inside the decimal range for any accepted spot.
pub const MAX_LATTICE_SPREAD: Decimal = dec!(30);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionKind {
    #[default]
    Call,
    Put,
}

impl OptionKind {
    /// Exercise value at a given underlying price.
    pub fn intrinsic(&self, spot: Money, strike: Money) -> Money {
        match self {
            OptionKind::Call => (spot - strike).max(Decimal::ZERO),
            OptionKind::Put => (strike - spot).max(Decimal::ZERO),
        }
    }
}

impl FromStr for OptionKind {
    type Err = UnknownChoice;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "call" | "c" => Ok(Self::Call),
            "put" | "p" => Ok(Self::Put),
            _ => Err(UnknownChoice::new(s, "call, put")),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExerciseStyle {
    /// Exercise at expiry only.
    #[default]
    European,
    /// Exercise at any node.
    American,
}

impl FromStr for ExerciseStyle {
    type Err = UnknownChoice;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "european" | "eu" => Ok(Self::European),
            "american" | "us" => Ok(Self::American),
            _ => Err(UnknownChoice::new(s, "european, american")),
        }
    }
}

/// Form values for the binomial option pricer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionParams {
    pub spot: Money,
    pub strike: Money,
    /// Continuously compounded annual risk-free rate as a fraction.
    pub risk_free_rate: Rate,
    /// Annualized volatility as a fraction.
    pub volatility: Rate,
    pub expiry_years: Decimal,
    pub steps: u32,
    pub kind: OptionKind,
    pub style: ExerciseStyle,
}

/// Cox–Ross–Rubinstein lattice constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeParameters {
    pub up: Decimal,
    pub down: Decimal,
    pub probability_up: Decimal,
    /// One-step discount factor `e^{−r·dt}`.
    pub discount: Decimal,
}

impl OptionParams {
    /// Builds the lattice constants. Fails when the lattice is too wide to
    /// represent, when the volatility cannot separate up and down moves, or when
    /// a step is too coarse for the risk-neutral probability to lie strictly
    /// between 0 and 1.
    pub fn tree(&self) -> Result<TreeParameters, FinanceError> {
        if self.steps == 0 {
            return Err(FinanceError::Calculation("at least one step is required".to_string()));
        }
        let spread = self
            .expiry_years
            .checked_mul(Decimal::from(self.steps))
            .and_then(|span| span.sqrt())
            .and_then(|root| self.volatility.checked_mul(root))
            .ok_or_else(|| FinanceError::Calculation("lattice width".to_string()))?;
        if spread > MAX_LATTICE_SPREAD {
            return Err(FinanceError::Calculation(
                "the tree spans too wide a price range; reduce steps, volatility or expiry".to_string(),
            ));
        }

        let dt = self.expiry_years / Decimal::from(self.steps);
        let root_dt = dt
            .sqrt()
            .ok_or_else(|| FinanceError::Calculation("square root of step length".to_string()))?;
        let up = (self.volatility * root_dt)
            .checked_exp()
            .ok_or_else(|| FinanceError::Overflow("up factor".to_string()))?;
        let down = Decimal::ONE
            .checked_div(up)
            .ok_or_else(|| FinanceError::Overflow("down factor".to_string()))?;
        if up <= down {
            return Err(FinanceError::Calculation(
                "volatility is too small to move the tree; increase volatility or expiry".to_string(),
            ));
        }
        let growth = self
            .risk_free_rate
            .checked_mul(dt)
            .and_then(|rate| rate.checked_exp())
            .ok_or_else(|| FinanceError::Overflow("growth factor".to_string()))?;
        let probability_up = (growth - down)
            .checked_div(up - down)
            .ok_or_else(|| FinanceError::Overflow("risk-neutral probability".to_string()))?;

        if probability_up <= Decimal::ZERO || probability_up >= Decimal::ONE {
            return Err(FinanceError::Calculation(
                "too few steps for this rate and volatility; increase steps".to_string(),
            ));
        }

        Ok(TreeParameters {
            up,
            down,
            probability_up,
            discount: Decimal::ONE / growth,
        })
    }
}

impl Validate for OptionParams {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut checks = Checks::new();
        checks
            .positive("spot", self.spot)
            .at_most("spot", self.spot, MAX_PRICE)
            .positive("strike", self.strike)
            .at_most("strike", self.strike, MAX_PRICE)
            .between("risk_free_rate", self.risk_free_rate, Decimal::ZERO, Decimal::ONE)
            .between("volatility", self.volatility, MIN_VOLATILITY, dec!(5))
            .positive("expiry_years", self.expiry_years)
            .at_most("expiry_years", self.expiry_years, dec!(50))
            .between("steps", self.steps, 1, MAX_STEPS);
        checks.finish()?;

        // Only meaningful once each field is in range.
        let reason = match self.tree() {
            Ok(_) => None,
            Err(FinanceError::Calculation(reason)) => Some(reason),
            Err(other) => Some(other.to_string()),
        };
        let mut lattice = Checks::new();
        lattice.ensure(reason.is_none(), "steps", reason.as_deref().unwrap_or_default());
        lattice.finish()
    }
}

impl FromForm for OptionParams {
    fn read(reader: &mut FieldReader<'_>) -> Self {
        Self {
            spot: reader.decimal("spot"),
            strike: reader.decimal("strike"),
            risk_free_rate: reader.percent("risk_free_rate"),
            volatility: reader.percent("volatility"),
            expiry_years: reader.decimal("expiry_years"),
            steps: reader.count_or("steps", 200),
            kind: reader.choice_or("kind", OptionKind::default()),
            style: reader.choice_or("style", ExerciseStyle::default()),
        }
    }
}

/// Price and lattice details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionPrice {
    pub price: Money,
    pub steps: u32,
    pub tree: TreeParameters,
}

/// Prices an option on a recombining CRR tree by backward induction.
///
/// American options compare continuation against exercise value at every node.
pub fn binomial_price(params: &OptionParams) -> Result<OptionPrice, FinanceError> {
    let tree = params.tree()?;
    let n = params.steps as usize;
    let overflow = || FinanceError::Overflow("underlying price at tree edge".to_string());

    // Terminal underlying prices S·d^n·u^(2j), j = 0..=n.
    let up_squared = tree.up * tree.up;
    let lowest = tree
        .down
        .checked_powi(i64::from(params.steps))
        .and_then(|d| d.checked_mul(params.spot))
        .ok_or_else(overflow)?;
    let mut prices = Vec::with_capacity(n + 1);
    let mut price = lowest;
    for _ in 0..=n {
        prices.push(price);
        price = price.checked_mul(up_squared).ok_or_else(overflow)?;
    }

    let mut values: Vec<Decimal> = prices
        .iter()
        .map(|s| params.kind.intrinsic(*s, params.strike))
        .collect();

    let p = tree.probability_up;
    let q = Decimal::ONE - p;
    for step in (0..n).rev() {
        for j in 0..=step {
            let continuation = tree.discount * (p * values[j + 1] + q * values[j]);
            values[j] = match params.style {
                ExerciseStyle::European => continuation,
                ExerciseStyle::American => {
                    // Node (step, j) sits one down-move above terminal node j.
                    prices[j] *= tree.up;
                    continuation.max(params.kind.intrinsic(prices[j], params.strike))
                }
            };
        }
    }

    tracing::debug!(kind = ?params.kind, style = ?params.style, steps = params.steps, price = %values[0], "Option priced");
    Ok(OptionPrice {
        price: values[0],
        steps: params.steps,
        tree,
    })
}
