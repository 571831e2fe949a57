//! Command-line front end for the recipe store.
mod app;
mod args;

pub use app::*;
pub use args::*;
