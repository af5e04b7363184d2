use thiserror::Error;
use validation::ValidationErrors;

#[derive(Error, Debug)]
pub enum FinanceError {
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Calculation overflowed: {0}")]
    Overflow(String),

    #[error("Calculation error: {0}")]
    Calculation(String),
}
