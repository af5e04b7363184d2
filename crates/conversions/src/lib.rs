//! # Tally Conversions
//!
//! Unit conversion within a dimension (length, mass, volume, temperature)
//! and calendar differences between two dates.

pub mod dates;
pub mod error;
pub mod units;

pub use dates::{DateDiffParams, DateSpan, date_difference};
pub use error::ConversionError;
pub use units::{
    ConversionParams, ConversionResult, Dimension, LengthUnit, MassUnit, TemperatureUnit, Unit,
    VolumeUnit, convert,
};
