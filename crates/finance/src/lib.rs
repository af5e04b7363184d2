//! # Tally Finance
//!
//! Single-shot risk and pricing calculators: Value at Risk and binomial
//! option pricing. Pure logic, `Decimal` throughout.

pub mod error;
pub mod options;
pub mod var;

pub use error::FinanceError;
pub use options::{
    ExerciseStyle, MAX_LATTICE_SPREAD, MAX_PRICE, MAX_STEPS, MIN_VOLATILITY, OptionKind,
    OptionParams, OptionPrice, TreeParameters, binomial_price,
};
pub use var::{
    ConfidenceLevel, HistoricalVarParams, MAX_HORIZON_DAYS, MAX_PORTFOLIO_VALUE, ParametricVarParams,
    VarResult, historical_var, parametric_var,
};
