//! CLI command implementations.

mod save;
mod search;

pub use save::run_save;
pub use search::run_search;
