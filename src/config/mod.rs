//! `.sigcodegen.toml` configuration.

pub mod core;
pub mod loader;

pub use self::core::{OutputConfig, ParallelConfig, SigCodegenConfig, DEFAULT_MARKER};
pub use loader::{
    default_config_toml, load_config, load_config_from, parse_config, CONFIG_FILE_NAME,
};
