pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::storage::LocalStorage;
pub use config::toml_config::MenuConfig;
pub use core::query::MenuService;
pub use utils::error::{KantineError, Result};
