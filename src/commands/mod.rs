//! CLI command implementations.

mod clean;
mod config;
mod index;
mod search;

pub use clean::CleanCmd;
pub use config::ConfigCmd;
pub use index::IndexCmd;
pub use search::SearchCmd;
