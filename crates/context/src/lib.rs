//! # Tally Context
//!
//! The state a calculator run shares with its host: the active theme and the
//! display settings used to render money.
//!
//! Nothing here is global. The binary builds one [`AppContext`] at startup and
//! passes it by reference. Persistence of the theme is a capability injected
//! as a [`ThemeStore`], so tests run against [`MemoryThemeStore`] and the CLI
//! against [`FileThemeStore`].

pub mod app;
pub mod error;
pub mod store;

pub use app::AppContext;
pub use error::ContextError;
pub use store::{FileThemeStore, MemoryThemeStore, ThemeStore};
