//! # Tally Schedules
//!
//! Period-by-period schedules: depreciation, debt repayment and savings growth.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** Pure calculation. No I/O; depends only on `core-types`
//!   and `validation`.
//! - **Stateless Generators:** Every schedule is built in one synchronous call
//!   from immutable params and returned as an owned `Vec`.
//! - **Validated Input:** Each calculator has a params struct implementing
//!   `Validate` and `FromForm`. Generators assume validated params and never
//!   panic on them.
//!
//! ## Public API
//!
//! - `declining_balance_schedule` / `double_declining_schedule`: the core
//!   declining-balance generator.
//! - `depreciation_schedule`: straight line, declining balance, sum-of-years-digits.
//! - `amortization_schedule`: level-payment loans.
//! - `payoff_schedule`: fixed-payment credit-card payoff.
//! - `growth_schedule`: compound interest with periodic contributions.

pub mod compound;
pub mod credit_card;
pub mod declining_balance;
pub mod depreciation;
pub mod error;
pub mod loan;

pub use compound::{CompoundParams, CompoundingFrequency, GrowthSchedule, growth_schedule};
pub use credit_card::{PayoffParams, PayoffSchedule, payoff_schedule};
pub use declining_balance::{
    DOUBLE_DECLINING_FACTOR, declining_balance_schedule, declining_rate, declining_schedule,
    double_declining_schedule,
};
pub use depreciation::{DepreciationMethod, DepreciationParams, DepreciationSchedule, depreciation_schedule};
pub use error::ScheduleError;
pub use loan::{LoanParams, LoanPayment, LoanSchedule, amortization_schedule, monthly_payment};
