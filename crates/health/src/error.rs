use thiserror::Error;
use validation::ValidationErrors;

#[derive(Error, Debug)]
pub enum HealthError {
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Calculation error: {0}")]
    Calculation(String),
}
