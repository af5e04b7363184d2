//! # Tally Health
//!
//! Body-measurement and energy calculators: BMI, body surface area, basal
//! metabolic rate with daily energy expenditure, activity calories from MET
//! values and heart-rate variability (RMSSD).
//!
//! Measurements are `f64`; none of these formulas are exact to begin with.
//! Every lookup table (BMI bands, activity multipliers, MET values) is a
//! closed enum matched exhaustively.

pub mod bmi;
pub mod bsa;
pub mod energy;
pub mod error;
pub mod hrv;

pub use bmi::{BmiCategory, BmiParams, BmiResult, UnitSystem, body_mass_index};
pub use bsa::{BsaFormula, BsaParams, body_surface_area};
pub use energy::{
    Activity, ActivityCaloriesParams, ActivityLevel, BmrFormula, EnergyResult, Sex, TdeeParams,
    activity_calories, basal_metabolic_rate, daily_energy_expenditure,
};
pub use error::HealthError;
pub use hrv::{HrvResult, RmssdParams, rmssd};
