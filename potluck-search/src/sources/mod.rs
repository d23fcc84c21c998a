//! Recipe source implementations.
//!
//! Each module provides a struct implementing [`crate::source::RecipeSource`].

pub mod http;

pub use http::HttpSource;
