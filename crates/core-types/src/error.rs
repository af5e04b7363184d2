use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("Schedule continuity broken at period {period}: expected beginning value {expected}, found {found}")]
    Discontinuity {
        period: u32,
        expected: String,
        found: String,
    },

    #[error("Period numbering must start at 1 and be sequential, found {0}")]
    PeriodNumbering(u32),
}
