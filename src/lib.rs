//! Mood-based recipe book library
//!
//! This library stores personal recipes as a single serialized collection in a
//! key-value backend and provides lookups by id, mood, visibility and favorite
//! status, plus the small set of app settings kept alongside them.

mod backend;
mod cli;
mod config;
mod errors;
mod helper;
mod preferences;
mod recipe;
mod storage;
mod types;

// Re-export key components
pub use backend::*;
pub use cli::*;
pub use config::*;
pub use errors::*;
pub use helper::*;
pub use preferences::*;
pub use recipe::*;
pub use storage::*;
pub use types::*;
