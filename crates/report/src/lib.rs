//! # Tally Report
//!
//! Turns calculator results into text: themed tables for the terminal or
//! pretty-printed JSON.
//!
//! ## Architectural Principles
//!
//! - **Layer 2:** Depends on the calculator crates for their result types but
//!   never calls a calculation itself.
//! - **Display-only rounding:** Results arrive at full precision. Money is
//!   rounded to `display.decimal_places` (half away from zero) only when it
//!   becomes text.
//! - **Checked schedules:** Period tables are verified for continuity before
//!   they are rendered.

pub mod error;
pub mod format;
pub mod render;
pub mod table;

pub use error::ReportError;
pub use format::{format_currency, format_number, format_percent};
pub use render::{Renderer, to_json};
