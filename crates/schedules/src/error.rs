use thiserror::Error;
use validation::ValidationErrors;

#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("The balance is not paid off within {months} months; increase the monthly payment")]
    PayoffTooLong { months: u32 },

    #[error("Calculation overflowed: {0}")]
    Overflow(String),
}
