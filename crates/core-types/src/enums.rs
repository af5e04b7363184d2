use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Which way a schedule moves a value from one period to the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Value shrinks toward a floor (depreciation, debt payoff).
    Decline,
    /// Value grows (compound interest, savings).
    Growth,
}

impl Direction {
    /// Applies a non-negative periodic change to a beginning value.
    pub fn apply(&self, beginning: Decimal, change: Decimal) -> Decimal {
        match self {
            Direction::Decline => beginning - change,
            Direction::Growth => beginning + change,
        }
    }
}
