//! Potluck: one recipe search answered by several upstream sources.
//!
//! The heavy lifting lives in [`potluck_search`]; this crate adds the
//! application shell around it:
//!
//! - **Config**: TOML file loading with per-field defaults
//! - **Service**: [`RecipeService`], the `searchRecipes` / `advice` operations
//! - **CLI**: the `potluck` binary, which also installs logging

pub mod config;
pub mod error;
pub mod service;

pub use config::PotluckConfig;
pub use error::{PotluckError, Result};
pub use potluck_search::{Advice, Quote, Recipe};
pub use service::RecipeService;
