//! CLI command handlers.

pub mod catalog;
pub mod config;
pub mod info;
pub mod synthesize;

pub use catalog::{run_catalog_export, run_catalog_show};
pub use config::run_config_show;
pub use info::run_info;
pub use synthesize::{SynthesizeArgs, run_synthesize};
