use thiserror::Error;
use validation::ValidationErrors;

#[derive(Error, Debug)]
pub enum ConversionError {
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Cannot convert {from} to {to}: they measure different things")]
    IncompatibleUnits { from: String, to: String },

    #[error("{value} {unit} is below absolute zero")]
    BelowAbsoluteZero { value: f64, unit: String },

    #[error("Date arithmetic left the supported calendar range")]
    DateOutOfRange,
}
