//! CLI command handlers, one per file.

mod config;
mod fetch;
mod run;

pub use config::run_config;
pub use fetch::run_fetch;
pub use run::run_range;
